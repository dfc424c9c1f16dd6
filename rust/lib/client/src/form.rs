use crate::file::SelectedFile;
use crate::model::{UpdatePayload, UserRecord};
use crate::upload::UploadPhase;
use crate::validate::{self, Field, FieldErrors};

/// Where the client talks to and where uploaded images are served from.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the RPC server.
    pub base_url: String,
    /// Public image URLs are `<public_bucket_base>/<key>`.
    pub public_bucket_base: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, public_bucket_base: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            public_bucket_base: public_bucket_base.into(),
        }
    }
}

/// Editable draft of the user's fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormInput {
    pub name: String,
    pub description: String,
    pub image: String,
}

impl FormInput {
    fn from_user(user: &UserRecord) -> Self {
        Self {
            name: user.name.clone(),
            description: user.description.clone(),
            image: user.image.clone(),
        }
    }
}

/// State of one settings form instance.
///
/// Edits are validated as they happen; a picked file is staged and only
/// uploaded when the form is submitted.
#[derive(Debug)]
pub struct SettingsForm {
    pub(crate) user: UserRecord,
    pub(crate) input: FormInput,
    pub(crate) errors: FieldErrors,
    pub(crate) staged: Option<SelectedFile>,
    pub(crate) submitting: bool,
    pub(crate) phase: UploadPhase,
    pub(crate) bucket_base: String,
}

impl SettingsForm {
    /// Start a form from the user record the session gate supplied.
    pub fn new(user: &UserRecord, config: &ClientConfig) -> Self {
        Self {
            user: user.clone(),
            input: FormInput::from_user(user),
            errors: FieldErrors::default(),
            staged: None,
            submitting: false,
            phase: UploadPhase::Idle,
            bucket_base: config.public_bucket_base.clone(),
        }
    }

    pub fn user(&self) -> &UserRecord {
        &self.user
    }

    pub fn input(&self) -> &FormInput {
        &self.input
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn staged_file(&self) -> Option<&SelectedFile> {
        self.staged.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn upload_phase(&self) -> UploadPhase {
        self.phase
    }

    /// Submit is allowed when no field has an error message and nothing is
    /// in flight.
    pub fn can_submit(&self) -> bool {
        !self.errors.blocks_submit() && !self.submitting
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.input.name = name.into();
        self.errors
            .apply(Field::Name, validate::check(Field::Name, &self.input.name));
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.input.description = description.into();
    }

    /// Edit the image URL text. While a file is staged the URL is replaced
    /// at submit, so it is not checked here.
    pub fn set_image(&mut self, image: impl Into<String>) {
        self.input.image = image.into();
        if self.staged.is_none() {
            self.errors
                .apply(Field::Image, validate::check(Field::Image, &self.input.image));
        }
    }

    /// Pick a file for the image field.
    ///
    /// A rejected file is not staged, clears any previously staged file and
    /// sets the image error. A valid file is staged and clears the error.
    pub fn select_file(&mut self, file: SelectedFile) -> Result<(), &'static str> {
        match file.check() {
            Ok(()) => {
                tracing::debug!(name = %file.name, size = file.size(), "staged image");
                self.staged = Some(file);
                self.errors.clear(Field::Image);
                Ok(())
            }
            Err(m) => {
                self.staged = None;
                self.errors.set(Field::Image, m);
                Err(m)
            }
        }
    }

    /// Drop the staged file and re-check the image URL text.
    pub fn clear_file(&mut self) {
        self.staged = None;
        self.errors
            .apply(Field::Image, validate::check(Field::Image, &self.input.image));
    }

    /// Validate every field the way submit does. The image URL is only
    /// checked when no file is staged; a previous upload marker is dropped.
    pub fn validate(&mut self) -> bool {
        self.errors.clear_markers();
        self.errors
            .apply(Field::Name, validate::check(Field::Name, &self.input.name));
        if self.staged.is_none() {
            self.errors
                .apply(Field::Image, validate::check(Field::Image, &self.input.image));
        }
        self.errors.is_empty()
    }

    pub(crate) fn payload(&self, image: String) -> UpdatePayload {
        UpdatePayload {
            name: self.input.name.clone(),
            description: self.input.description.clone(),
            image,
            setup_completed: true,
        }
    }

    /// Adopt a saved payload as the form's current values.
    pub(crate) fn commit(&mut self, saved: UserRecord) {
        self.input = FormInput::from_user(&saved);
        self.user = saved;
        self.staged = None;
    }
}
