use settings_core::profile;

/// A file picked in the image input. Held locally until submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime: String,
    pub data: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            data,
        }
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// MIME and size checks run at selection time.
    pub fn check(&self) -> Result<(), &'static str> {
        profile::check_image_file(&self.mime, self.size())
    }
}
