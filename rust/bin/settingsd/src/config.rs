//! Server configuration: `/etc/settingsd/<context>.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use account::service::AccountConfig;

/// Top-level server configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: HttpConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Externally reachable base URL; presigned upload URLs point here.
    #[serde(default = "default_public_url")]
    pub public_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// HS256 key for session tokens and upload tokens.
    #[serde(default)]
    pub secret: String,
    #[serde(default = "default_expire_secs")]
    pub expire_secs: i64,
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Where the settings page sends visitors without a session.
    #[serde(default = "default_login_url")]
    pub login_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub data_dir: String,
    /// Base of public image URLs. Empty means `<server.public_url>/public`.
    #[serde(default)]
    pub public_base_url: String,
    #[serde(default = "default_upload_ttl")]
    pub upload_ttl_secs: i64,
}

fn default_public_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_expire_secs() -> i64 {
    86400
}

fn default_cookie_name() -> String {
    "session".to_string()
}

fn default_login_url() -> String {
    "/login".to_string()
}

fn default_upload_ttl() -> i64 {
    60
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            public_url: default_public_url(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            expire_secs: default_expire_secs(),
            cookie_name: default_cookie_name(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            login_url: default_login_url(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: String::new(),
            public_base_url: String::new(),
            upload_ttl_secs: default_upload_ttl(),
        }
    }
}

impl ServerConfig {
    /// Resolve a context name or path to a config file.
    ///
    /// A value containing `/` or `.` is a path; a bare name maps to
    /// `/etc/settingsd/<name>.toml`.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.contains('.') {
            PathBuf::from(name_or_path)
        } else {
            PathBuf::from(format!("/etc/settingsd/{}.toml", name_or_path))
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e))?;
        Ok(toml::from_str(&content)?)
    }

    /// Base URL uploaded images are served from.
    pub fn public_base_url(&self) -> String {
        if self.storage.public_base_url.is_empty() {
            format!("{}/public", self.server.public_url.trim_end_matches('/'))
        } else {
            self.storage.public_base_url.trim_end_matches('/').to_string()
        }
    }

    pub fn account_config(&self) -> AccountConfig {
        AccountConfig {
            session_secret: self.session.secret.clone(),
            session_ttl: self.session.expire_secs,
            cookie_name: self.session.cookie_name.clone(),
            public_url: self.server.public_url.trim_end_matches('/').to_string(),
            public_bucket_base: self.public_base_url(),
            upload_ttl: self.storage.upload_ttl_secs,
        }
    }
}
