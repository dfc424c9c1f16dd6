//! Route registration: module routes, the settings page, system endpoints.

use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use crate::gate::{self, GateState};

/// Build the complete router. Module routes carry absolute paths and are
/// merged at the root.
pub fn build_router(gate_state: GateState, module_routes: Vec<(&str, Router)>) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
        .merge(gate::routes(gate_state));

    for (name, router) in module_routes {
        tracing::debug!(module = name, "mounting module routes");
        app = app.merge(router);
    }
    app
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "settingsd",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
