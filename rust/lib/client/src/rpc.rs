use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::model::{PresignedTicket, UpdatePayload, UserRecord};
use crate::token::TokenSource;

/// Procedures the settings page calls.
#[async_trait::async_trait]
pub trait SettingsRpc: Send + Sync {
    /// Request a single-use upload ticket.
    async fn get_presigned_url(&self) -> Result<PresignedTicket, ApiError>;

    /// Save the form.
    async fn update(&self, payload: &UpdatePayload) -> Result<UserRecord, ApiError>;

    /// Load the current user.
    async fn me(&self) -> Result<UserRecord, ApiError>;
}

/// JSON-over-HTTP transport: `POST {base_url}/rpc/{procedure}`.
pub struct HttpRpc {
    http: reqwest::Client,
    base_url: String,
    token_source: Arc<dyn TokenSource>,
}

impl HttpRpc {
    pub fn new(base_url: impl Into<String>, token_source: Arc<dyn TokenSource>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token_source,
        }
    }

    fn procedure_url(&self, name: &str) -> String {
        format!("{}/rpc/{}", self.base_url, name)
    }

    async fn call<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        name: &str,
        body: &B,
    ) -> Result<R, ApiError> {
        let mut req = self.http.post(self.procedure_url(name)).json(body);
        if let Some(token) = self.token_source.token().await? {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let code = status.as_u16();
            let message = resp.text().await.unwrap_or_default();
            if code == 401 {
                return Err(ApiError::Auth(message));
            }
            return Err(ApiError::Server { status: code, message });
        }
        resp.json::<R>()
            .await
            .map_err(|e| ApiError::Decode(format!("{} response: {}", name, e)))
    }
}

#[async_trait::async_trait]
impl SettingsRpc for HttpRpc {
    async fn get_presigned_url(&self) -> Result<PresignedTicket, ApiError> {
        self.call("user.getPresignedUrl", &serde_json::json!({})).await
    }

    async fn update(&self, payload: &UpdatePayload) -> Result<UserRecord, ApiError> {
        self.call("user.update", payload).await
    }

    async fn me(&self) -> Result<UserRecord, ApiError> {
        self.call("user.me", &serde_json::json!({})).await
    }
}
