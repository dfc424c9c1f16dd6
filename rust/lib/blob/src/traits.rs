use crate::error::BlobError;

/// A stored object: raw bytes plus the content type they were written with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobObject {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// BlobStore is the object storage behind presigned uploads.
///
/// Keys are path-like strings: `avatars/{user_id}/{id}`.
/// The default implementation (`FileStore`) maps keys to local filesystem paths.
/// Can be swapped for S3/OSS backends by implementing this trait.
pub trait BlobStore: Send + Sync {
    /// Store an object. Overwrites if the key already exists.
    fn put(&self, key: &str, data: &[u8], content_type: &str) -> Result<(), BlobError>;

    /// Retrieve an object. Returns None if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<BlobObject>, BlobError>;

    /// Delete an object. No-op if the key does not exist.
    fn delete(&self, key: &str) -> Result<(), BlobError>;
}
