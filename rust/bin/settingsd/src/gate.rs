//! Session gate for the settings page.
//!
//! `GET /settings` renders only for a resolved session. Every resolution
//! failure sends the visitor to the login URL with `303 See Other`.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use minijinja::Environment;
use serde::Serialize;
use tracing::{debug, warn};

use account::api::resolve_session;
use account::model::User;
use account::service::{AccountError, AccountService};
use settings_core::ServiceError;

const SETTINGS_TEMPLATE: &str = "settings.html";

#[derive(Clone)]
pub struct GateState {
    svc: Arc<AccountService>,
    login_url: String,
    pages: Arc<Environment<'static>>,
}

impl GateState {
    pub fn new(svc: Arc<AccountService>, login_url: impl Into<String>) -> anyhow::Result<Self> {
        let mut pages = Environment::new();
        pages.add_template(SETTINGS_TEMPLATE, include_str!("web/settings.html"))?;
        Ok(Self {
            svc,
            login_url: login_url.into(),
            pages: Arc::new(pages),
        })
    }
}

/// Data handed to the page script.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageData<'a> {
    user: &'a User,
    public_bucket_base: &'a str,
}

pub fn routes(state: GateState) -> Router {
    Router::new()
        .route("/settings", get(settings_page))
        .with_state(state)
}

async fn settings_page(State(state): State<GateState>, headers: HeaderMap) -> Response {
    let user = match current_user(&state.svc, &headers) {
        Ok(user) => user,
        Err(e) => {
            match e {
                AccountError::Storage(_) | AccountError::Internal(_) => {
                    warn!(error = %e, "session lookup failed; redirecting to login")
                }
                _ => debug!(reason = %e, "no session; redirecting to login"),
            }
            return Redirect::to(&state.login_url).into_response();
        }
    };

    match render(&state, &user) {
        Ok(html) => Html(html).into_response(),
        Err(e) => ServiceError::Internal(format!("render settings page: {}", e)).into_response(),
    }
}

fn current_user(svc: &AccountService, headers: &HeaderMap) -> Result<User, AccountError> {
    let claims = resolve_session(svc, headers)?;
    svc.get_user(&claims.sub)
}

fn render(state: &GateState, user: &User) -> Result<String, minijinja::Error> {
    let page = PageData {
        user,
        public_bucket_base: &state.svc.config().public_bucket_base,
    };
    state
        .pages
        .get_template(SETTINGS_TEMPLATE)?
        .render(minijinja::context! { user => user, page => page })
}
