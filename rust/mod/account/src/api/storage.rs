use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::Router;
use serde::Deserialize;

use settings_core::{profile, ServiceError};

use crate::api::AppState;
use crate::service::AccountError;

/// One byte over the image limit so oversize bodies reach the size check
/// instead of failing extraction.
const UPLOAD_BODY_LIMIT: usize = profile::MAX_IMAGE_BYTES as usize + 1;

#[derive(Debug, Deserialize)]
struct UploadQuery {
    token: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/storage/{*key}",
            put(put_object).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/public/{*key}", get(get_object))
}

/// PUT /storage/{key}?token=...: direct write through a presigned URL.
async fn put_object(
    State(svc): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, ServiceError> {
    let token = query
        .token
        .ok_or_else(|| AccountError::Unauthorized("missing upload token".into()))?;
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    svc.accept_upload(&key, &token, content_type, &body)?;
    Ok(StatusCode::OK)
}

/// GET /public/{key}: serve an uploaded object.
///
/// Objects are served same-origin, so the browser must not sniff them into
/// something executable. A stored type that is not a plain image is served
/// as opaque bytes.
async fn get_object(
    State(svc): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response, ServiceError> {
    let obj = svc.get_public_object(&key)?;
    let content_type = profile::image_media_type(&obj.content_type)
        .unwrap_or_else(|_| "application/octet-stream".to_string());
    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::X_CONTENT_TYPE_OPTIONS, "nosniff".to_string()),
            (header::CONTENT_SECURITY_POLICY, "sandbox".to_string()),
        ],
        obj.data,
    )
        .into_response())
}
