use serde::{Deserialize, Serialize};

/// Response of `user.getPresignedUrl`: where to PUT the file, and the
/// storage key its public URL is derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresignedUrl {
    pub url: String,
    pub key: String,
}

/// Server-side record of an issued upload ticket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadTicket {
    pub key: String,
    pub user_id: String,
    pub issued_at: String,
    pub expires_at: String,
}

/// Claims carried by the `token` query parameter of a presigned URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadClaims {
    /// User the ticket was issued to.
    pub sub: String,

    /// Storage key the ticket authorizes a write to.
    pub key: String,

    pub iat: i64,
    pub exp: i64,
}
