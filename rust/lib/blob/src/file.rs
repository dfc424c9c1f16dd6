use std::fs;
use std::path::{Path, PathBuf};

use crate::error::BlobError;
use crate::traits::{BlobObject, BlobStore};

const OBJECTS_DIR: &str = "objects";
const TYPES_DIR: &str = "types";

/// Content type reported for objects whose type record is missing.
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// FileStore is a BlobStore implementation backed by the local filesystem.
///
/// Keys are mapped to paths under `base_dir`:
///   key "avatars/u1/abc" → `{base_dir}/objects/avatars/u1/abc`
///   content type         → `{base_dir}/types/avatars/u1/abc`
///
/// Parent directories are created automatically on `put`.
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    /// Create a new FileStore rooted at `base_dir`.
    /// The directory is created if it doesn't exist.
    pub fn open(base_dir: &Path) -> Result<Self, BlobError> {
        fs::create_dir_all(base_dir.join(OBJECTS_DIR)).map_err(|e| BlobError::Io(e.to_string()))?;
        fs::create_dir_all(base_dir.join(TYPES_DIR)).map_err(|e| BlobError::Io(e.to_string()))?;
        Ok(Self {
            base_dir: base_dir.to_path_buf(),
        })
    }

    /// Resolve a key to its object and content-type paths.
    ///
    /// Rejects empty keys, absolute keys, and any `.`/`..`/empty segment so a
    /// key can never escape `base_dir`.
    fn resolve(&self, key: &str) -> Result<(PathBuf, PathBuf), BlobError> {
        if key.is_empty() || key.starts_with('/') || key.contains('\\') {
            return Err(BlobError::InvalidKey(format!("{:?}", key)));
        }
        if key
            .split('/')
            .any(|seg| seg.is_empty() || seg == "." || seg == "..")
        {
            return Err(BlobError::InvalidKey(format!("{:?}", key)));
        }

        Ok((
            self.base_dir.join(OBJECTS_DIR).join(key),
            self.base_dir.join(TYPES_DIR).join(key),
        ))
    }
}

impl BlobStore for FileStore {
    fn put(&self, key: &str, data: &[u8], content_type: &str) -> Result<(), BlobError> {
        let (object_path, type_path) = self.resolve(key)?;
        for path in [&object_path, &type_path] {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| BlobError::Io(e.to_string()))?;
            }
        }
        fs::write(&object_path, data).map_err(|e| BlobError::Io(e.to_string()))?;
        fs::write(&type_path, content_type).map_err(|e| BlobError::Io(e.to_string()))?;
        tracing::debug!(key, size = data.len(), "stored blob");
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<BlobObject>, BlobError> {
        let (object_path, type_path) = self.resolve(key)?;
        if !object_path.is_file() {
            return Ok(None);
        }
        let data = fs::read(&object_path).map_err(|e| BlobError::Io(e.to_string()))?;
        let content_type = fs::read_to_string(&type_path)
            .unwrap_or_else(|_| FALLBACK_CONTENT_TYPE.to_string());
        Ok(Some(BlobObject { data, content_type }))
    }

    fn delete(&self, key: &str) -> Result<(), BlobError> {
        let (object_path, type_path) = self.resolve(key)?;
        for path in [&object_path, &type_path] {
            if path.is_file() {
                fs::remove_file(path).map_err(|e| BlobError::Io(e.to_string()))?;
            }
        }
        Ok(())
    }
}
