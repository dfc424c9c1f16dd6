//! Profile field rules shared by the server's update endpoint and the
//! client-side settings form, so both sides reject the same inputs with
//! the same messages.

/// Maximum display name length, in characters.
pub const NAME_MAX_CHARS: usize = 13;

/// Maximum image size in kilobytes.
pub const MAX_IMAGE_KB: u64 = 5120;

/// Maximum image size in bytes.
pub const MAX_IMAGE_BYTES: u64 = MAX_IMAGE_KB * 1024;

pub const NAME_REQUIRED: &str = "Username is required.";
pub const NAME_TOO_LONG: &str = "Username must be 13 characters or less.";
pub const INVALID_URL: &str = "Invalid url";
pub const ONLY_IMAGES: &str = "Only images are allowed.";
pub const FILE_TOO_LARGE: &str = "Maximum file size is 5MB.";

/// Check a display name: 1 to [`NAME_MAX_CHARS`] characters.
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    let len = name.chars().count();
    if len == 0 {
        return Err(NAME_REQUIRED);
    }
    if len > NAME_MAX_CHARS {
        return Err(NAME_TOO_LONG);
    }
    Ok(())
}

/// Check that an image reference is a well-formed absolute http(s) URL.
/// Local references (`file:`, `blob:`, relative paths) are rejected.
pub fn validate_image_url(image: &str) -> Result<(), &'static str> {
    match url::Url::parse(image) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(()),
        _ => Err(INVALID_URL),
    }
}

/// Check a selected file before it is staged or stored.
///
/// The MIME type must mention `image`, and the size must not exceed
/// [`MAX_IMAGE_KB`] kilobytes (fractional kilobytes count).
pub fn check_image_file(mime: &str, size: u64) -> Result<(), &'static str> {
    if !mime.contains("image") {
        return Err(ONLY_IMAGES);
    }
    if size > MAX_IMAGE_BYTES {
        return Err(FILE_TOO_LARGE);
    }
    Ok(())
}

/// Strict form of the image rule for stored objects.
///
/// The `Content-Type` must parse as `image/<subtype>`, other than
/// `image/svg+xml`. Returns the lowercase media type
/// without parameters, which is what gets stored and served back.
pub fn image_media_type(content_type: &str) -> Result<String, &'static str> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    let (kind, subtype) = essence.split_once('/').ok_or(ONLY_IMAGES)?;
    let is_token = !subtype.is_empty()
        && subtype
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "!#$&-^_.+".contains(c));
    if kind != "image" || !is_token || subtype == "svg+xml" {
        return Err(ONLY_IMAGES);
    }
    Ok(essence)
}

/// Public URL of a stored object: `<base>/<key>`.
pub fn public_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key.trim_start_matches('/'))
}
