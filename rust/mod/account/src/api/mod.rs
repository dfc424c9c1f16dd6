mod middleware;
mod rpc;
mod storage;

use std::sync::Arc;

use axum::Router;

use crate::service::AccountService;

pub use middleware::{extract_session_token, resolve_session};

/// Shared application state.
pub type AppState = Arc<AccountService>;

/// Build the account API router.
///
/// - `/rpc/*` procedures require a session (401 otherwise).
/// - `/storage/{*key}` accepts presigned writes; the token is the credential.
/// - `/public/{*key}` serves uploaded objects without authentication.
pub fn build_router(svc: Arc<AccountService>) -> Router {
    let rpc = rpc::routes().layer(axum::middleware::from_fn_with_state(
        svc.clone(),
        middleware::session_middleware,
    ));

    Router::new()
        .merge(rpc)
        .merge(storage::routes())
        .with_state(svc)
}
