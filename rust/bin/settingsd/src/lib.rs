//! `settingsd`: the account settings server.
//!
//! Serves the session-gated settings page, the account RPC procedures and
//! the presigned-upload storage endpoints from one process.

pub mod bootstrap;
pub mod config;
pub mod gate;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tracing::info;

use account::service::AccountService;
use account::AccountModule;
use settings_core::Module;

use crate::bootstrap::Stores;
use crate::config::ServerConfig;
use crate::gate::GateState;

/// A fully wired server.
pub struct App {
    pub router: Router,
    pub account: Arc<AccountService>,
}

/// Wire modules, the gate and system routes over opened storage.
pub fn build_app(config: &ServerConfig, stores: Stores) -> anyhow::Result<App> {
    let account_module = AccountModule::new(stores.kv, stores.blob, config.account_config());
    info!("Account module initialized");

    let account = account_module.service().clone();
    let gate_state = GateState::new(account.clone(), config.auth.login_url.clone())?;

    let module_routes = vec![(account_module.name(), account_module.routes())];
    let router = routes::build_router(gate_state, module_routes);

    Ok(App { router, account })
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn system_endpoints() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ServerConfig::default();
        config.session.secret = "test".into();
        config.storage.data_dir = dir.path().display().to_string();
        let stores = bootstrap::open_stores(&config, "127.0.0.1:0").unwrap();
        let app = build_app(&config, stores).unwrap();

        let resp = app
            .router
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = app
            .router
            .oneshot(Request::builder().uri("/version").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["name"], "settingsd");
    }
}
