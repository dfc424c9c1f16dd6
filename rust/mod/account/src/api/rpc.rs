use axum::extract::{Extension, State};
use axum::routing::post;
use axum::{Json, Router};

use settings_core::ServiceError;

use crate::api::AppState;
use crate::model::{Claims, PresignedUrl, UpdateProfile, User};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/rpc/user.getPresignedUrl", post(get_presigned_url))
        .route("/rpc/user.update", post(update))
        .route("/rpc/user.me", post(me))
}

/// POST /rpc/user.getPresignedUrl: issue a single-use upload ticket.
async fn get_presigned_url(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<PresignedUrl>, ServiceError> {
    let ticket = svc.presign_upload(&claims.sub)?;
    Ok(Json(ticket))
}

/// POST /rpc/user.update: save the settings form.
async fn update(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<UpdateProfile>,
) -> Result<Json<User>, ServiceError> {
    let user = svc.update_profile(&claims.sub, input)?;
    Ok(Json(user))
}

/// POST /rpc/user.me: the current user.
async fn me(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<User>, ServiceError> {
    Ok(Json(svc.get_user(&claims.sub)?))
}
