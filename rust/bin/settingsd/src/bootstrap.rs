//! Bootstrap: startup checks and storage initialization.

use std::sync::Arc;

use tracing::info;

use crate::config::ServerConfig;

/// Storage backends shared by the modules.
pub struct Stores {
    pub kv: Arc<dyn settings_kv::KVStore>,
    pub blob: Arc<dyn settings_blob::BlobStore>,
}

/// Refuse to start with a configuration that cannot work.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.session.secret.is_empty() {
        anyhow::bail!("Session secret is empty in configuration.");
    }
    if config.storage.data_dir.is_empty() {
        anyhow::bail!("Storage data_dir is empty in configuration.");
    }
    if config.session.expire_secs <= 0 || config.storage.upload_ttl_secs <= 0 {
        anyhow::bail!("Session and upload lifetimes must be positive.");
    }
    Ok(())
}

/// Open the embedded KV store and the blob directory under `data_dir`.
pub fn open_stores(config: &ServerConfig, listen: &str) -> anyhow::Result<Stores> {
    let data_dir = std::path::PathBuf::from(&config.storage.data_dir);
    std::fs::create_dir_all(&data_dir)?;

    let core_config = settings_core::ServiceConfig {
        data_dir: Some(data_dir),
        listen: listen.to_string(),
        ..Default::default()
    };

    let kv: Arc<dyn settings_kv::KVStore> = Arc::new(
        settings_kv::RedbStore::open(&core_config.resolve_db_path())
            .map_err(|e| anyhow::anyhow!("failed to open KV store: {}", e))?,
    );
    let blob: Arc<dyn settings_blob::BlobStore> = Arc::new(
        settings_blob::FileStore::open(&core_config.resolve_blob_dir())
            .map_err(|e| anyhow::anyhow!("failed to open blob store: {}", e))?,
    );
    info!(
        db = %core_config.resolve_db_path().display(),
        blobs = %core_config.resolve_blob_dir().display(),
        "storage opened"
    );
    Ok(Stores { kv, blob })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ServerConfig {
        let mut config = ServerConfig::default();
        config.session.secret = "test".to_string();
        config.storage.data_dir = "/tmp/settingsd".to_string();
        config
    }

    #[test]
    fn test_verify_config() {
        assert!(verify_config(&valid()).is_ok());

        let mut config = valid();
        config.session.secret.clear();
        assert!(verify_config(&config).is_err());

        let mut config = valid();
        config.storage.data_dir.clear();
        assert!(verify_config(&config).is_err());

        let mut config = valid();
        config.storage.upload_ttl_secs = 0;
        assert!(verify_config(&config).is_err());
    }

    #[test]
    fn test_open_stores() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = valid();
        config.storage.data_dir = dir.path().join("data").display().to_string();

        let stores = open_stores(&config, "127.0.0.1:0").unwrap();
        stores.kv.set("k", b"v").unwrap();
        assert!(dir.path().join("data/data.redb").exists());
        assert!(dir.path().join("data/blobs").is_dir());
    }
}
