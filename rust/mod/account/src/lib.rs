//! Account module: sessions, the profile record behind the settings page,
//! and presigned profile-image uploads.
//!
//! # Resources
//!
//! - **User**: profile edited by the settings page (name, description, image)
//! - **Session**: JWT issuance record, revocable
//! - **Upload ticket**: single-use presigned write of one profile image
//!
//! # Usage
//!
//! ```ignore
//! use account::{AccountModule, service::AccountConfig};
//!
//! let module = AccountModule::new(kv, blob, AccountConfig::default());
//! let router = module.routes(); // Absolute paths: /rpc, /storage, /public
//! ```

pub mod api;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;

use settings_core::Module;

use crate::service::{AccountConfig, AccountService};

/// Account module implementing the Module trait.
pub struct AccountModule {
    service: Arc<AccountService>,
}

impl AccountModule {
    pub fn new(
        kv: Arc<dyn settings_kv::KVStore>,
        blob: Arc<dyn settings_blob::BlobStore>,
        config: AccountConfig,
    ) -> Self {
        Self {
            service: AccountService::new(kv, blob, config),
        }
    }

    /// Get a reference to the underlying AccountService.
    pub fn service(&self) -> &Arc<AccountService> {
        &self.service
    }
}

impl Module for AccountModule {
    fn name(&self) -> &str {
        "account"
    }

    fn routes(&self) -> Router {
        api::build_router(self.service.clone())
    }
}
