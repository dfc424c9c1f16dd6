use crate::validate::FieldErrors;

/// Client-side API error.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("auth: {0}")]
    Auth(String),

    #[error("decode: {0}")]
    Decode(String),
}

/// Why a submission did not complete.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Field-scoped errors; nothing was sent.
    #[error("form has invalid fields")]
    Validation(FieldErrors),

    /// Ticket request or object write failed; the update was not sent.
    #[error("upload failed: {0}")]
    Upload(ApiError),

    /// The update call failed.
    #[error("update failed: {0}")]
    Update(ApiError),

    /// A submission on this form is still in flight.
    #[error("a submission is already in flight")]
    InFlight,
}
