use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::{info, warn};

use settings_blob::BlobObject;
use settings_core::{new_id, now_rfc3339, profile};

use crate::model::{PresignedUrl, UploadClaims, UploadTicket};
use crate::service::{AccountError, AccountService};

fn ticket_key(storage_key: &str) -> String {
    format!("account:upload:{}", storage_key)
}

fn ticket_used_key(storage_key: &str) -> String {
    format!("account:upload_used:{}", storage_key)
}

impl AccountService {
    /// Issue a single-use, short-lived ticket for writing one profile image.
    ///
    /// The returned URL points at this server's `/storage/{key}` route and
    /// carries a signed token bound to the key and the user.
    pub fn presign_upload(&self, user_id: &str) -> Result<PresignedUrl, AccountError> {
        let key = format!("avatars/{}/{}", user_id, new_id());
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::seconds(self.config.upload_ttl);

        let claims = UploadClaims {
            sub: user_id.to_string(),
            key: key.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.session_secret.as_bytes()),
        )
        .map_err(|e| AccountError::Internal(format!("JWT encode failed: {}", e)))?;

        let ticket = UploadTicket {
            key: key.clone(),
            user_id: user_id.to_string(),
            issued_at: now.to_rfc3339(),
            expires_at: exp.to_rfc3339(),
        };
        self.put_record(&ticket_key(&key), &ticket)?;

        let url = format!(
            "{}/storage/{}?token={}",
            self.config.public_url.trim_end_matches('/'),
            key,
            token
        );
        Ok(PresignedUrl { url, key })
    }

    /// Accept a direct write made with a presigned URL.
    ///
    /// Checks the token (signature, expiry, key binding), the content type
    /// and size, then consumes the ticket and stores the object under its
    /// normalized media type. A ticket can be used once; a failed write
    /// releases it again.
    pub fn accept_upload(
        &self,
        key: &str,
        token: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<(), AccountError> {
        let claims = decode::<UploadClaims>(
            token,
            &DecodingKey::from_secret(self.config.session_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| AccountError::Unauthorized(format!("invalid upload token: {}", e)))?
        .claims;

        if claims.key != key {
            return Err(AccountError::Forbidden("upload token is for a different key".into()));
        }
        let ticket: UploadTicket = self
            .get_record(&ticket_key(key))?
            .ok_or_else(|| AccountError::NotFound(format!("upload ticket {}", key)))?;
        if ticket.user_id != claims.sub {
            return Err(AccountError::Forbidden("upload ticket owner mismatch".into()));
        }

        let media_type =
            profile::image_media_type(content_type).map_err(|m| AccountError::Validation(m.into()))?;
        profile::check_image_file(&media_type, data.len() as u64).map_err(|m| {
            if m == profile::FILE_TOO_LARGE {
                AccountError::TooLarge(m.into())
            } else {
                AccountError::Validation(m.into())
            }
        })?;

        let used_key = ticket_used_key(key);
        let stamp = serde_json::to_vec(&now_rfc3339()).map_err(|e| AccountError::Internal(e.to_string()))?;
        if !self.kv.insert_if_absent(&used_key, &stamp)? {
            return Err(AccountError::Conflict("upload ticket already used".into()));
        }

        if let Err(e) = self.blob.put(key, data, &media_type) {
            // Release the ticket; the same URL stays usable.
            if let Err(cleanup) = self.blob.delete(key) {
                warn!(key, error = %cleanup, "failed to remove partial upload");
            }
            if let Err(cleanup) = self.kv.delete(&used_key) {
                warn!(key, error = %cleanup, "failed to release upload ticket");
            }
            return Err(e.into());
        }
        info!(user_id = %claims.sub, key, size = data.len(), content_type = %media_type, "stored uploaded image");
        Ok(())
    }

    /// Read an uploaded object for the public read path.
    pub fn get_public_object(&self, key: &str) -> Result<BlobObject, AccountError> {
        self.blob
            .get(key)?
            .ok_or_else(|| AccountError::NotFound(format!("object {}", key)))
    }
}
