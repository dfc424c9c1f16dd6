use axum::extract::State;
use axum::http::{header, HeaderMap, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use settings_core::ServiceError;

use crate::api::AppState;
use crate::model::Claims;
use crate::service::{AccountError, AccountService};

/// Session middleware for RPC procedures.
///
/// Resolves the session from the session cookie or a Bearer token. If valid,
/// stores Claims as Extension for handlers to access via `Extension<Claims>`.
pub async fn session_middleware(
    State(svc): State<AppState>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    match resolve_session(&svc, req.headers()) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!("rpc rejected: {}", e);
            ServiceError::Unauthorized("no active session".into()).into_response()
        }
    }
}

/// Resolve the caller's session from request headers.
pub fn resolve_session(svc: &AccountService, headers: &HeaderMap) -> Result<Claims, AccountError> {
    let token = extract_session_token(headers, &svc.config().cookie_name)
        .ok_or_else(|| AccountError::Unauthorized("missing session".into()))?;
    svc.verify_session(token)
}

/// Extract the session token: the named cookie first, then an
/// `Authorization: Bearer` header.
pub fn extract_session_token<'a>(headers: &'a HeaderMap, cookie_name: &str) -> Option<&'a str> {
    extract_cookie(headers, cookie_name).or_else(|| extract_bearer(headers))
}

fn extract_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, v)| *k == name && !v.is_empty())
        .map(|(_, v)| v)
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}
