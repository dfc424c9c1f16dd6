pub mod session;
pub mod upload;
pub mod user;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use settings_blob::BlobStore;
use settings_core::profile;
use settings_core::ServiceError;
use settings_kv::KVStore;

/// Account service error type.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    /// Carries a user-facing message; rendered without a prefix.
    #[error("{0}")]
    Validation(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("{0}")]
    TooLarge(String),

    #[error("storage: {0}")]
    Storage(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl From<AccountError> for ServiceError {
    fn from(e: AccountError) -> Self {
        match e {
            AccountError::NotFound(m) => ServiceError::NotFound(m),
            AccountError::Conflict(m) => ServiceError::Conflict(m),
            AccountError::Validation(m) => ServiceError::Validation(m),
            AccountError::Unauthorized(m) => ServiceError::Unauthorized(m),
            AccountError::Forbidden(m) => ServiceError::PermissionDenied(m),
            AccountError::TooLarge(m) => ServiceError::PayloadTooLarge(m),
            AccountError::Storage(m) => ServiceError::Storage(m),
            AccountError::Internal(m) => ServiceError::Internal(m),
        }
    }
}

impl From<settings_kv::KVError> for AccountError {
    fn from(e: settings_kv::KVError) -> Self {
        AccountError::Storage(e.to_string())
    }
}

impl From<settings_blob::BlobError> for AccountError {
    fn from(e: settings_blob::BlobError) -> Self {
        match e {
            settings_blob::BlobError::InvalidKey(m) => AccountError::Validation(m),
            other => AccountError::Storage(other.to_string()),
        }
    }
}

/// Configuration for the account service.
#[derive(Debug, Clone)]
pub struct AccountConfig {
    /// HS256 key for session tokens and presigned upload tokens.
    pub session_secret: String,
    /// Session token lifetime in seconds (default: 24h).
    pub session_ttl: i64,
    /// Name of the cookie carrying the session token.
    pub cookie_name: String,
    /// Externally reachable base URL of this server; presigned URLs point here.
    pub public_url: String,
    /// Base URL uploaded objects are served from. Public image URLs are
    /// `<public_bucket_base>/<key>`.
    pub public_bucket_base: String,
    /// Presigned upload ticket lifetime in seconds (default: 60).
    pub upload_ttl: i64,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            session_secret: "settings-dev-secret-change-me".to_string(),
            session_ttl: 86400,
            cookie_name: "session".to_string(),
            public_url: "http://localhost:8080".to_string(),
            public_bucket_base: "http://localhost:8080/public".to_string(),
            upload_ttl: 60,
        }
    }
}

/// The account service. Holds storage backends and configuration.
pub struct AccountService {
    pub(crate) kv: Arc<dyn KVStore>,
    pub(crate) blob: Arc<dyn BlobStore>,
    pub(crate) config: AccountConfig,
}

impl AccountService {
    pub fn new(
        kv: Arc<dyn KVStore>,
        blob: Arc<dyn BlobStore>,
        config: AccountConfig,
    ) -> Arc<Self> {
        Arc::new(Self { kv, blob, config })
    }

    pub fn config(&self) -> &AccountConfig {
        &self.config
    }

    /// Public URL of a stored object.
    pub fn public_object_url(&self, key: &str) -> String {
        profile::public_url(&self.config.public_bucket_base, key)
    }

    // ── JSON record helpers ──

    pub(crate) fn get_record<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, AccountError> {
        match self.kv.get(key)? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| AccountError::Internal(format!("decode {}: {}", key, e))),
            None => Ok(None),
        }
    }

    pub(crate) fn put_record<T: Serialize>(&self, key: &str, record: &T) -> Result<(), AccountError> {
        let bytes = serde_json::to_vec(record).map_err(|e| AccountError::Internal(e.to_string()))?;
        self.kv.set(key, &bytes)?;
        Ok(())
    }
}
