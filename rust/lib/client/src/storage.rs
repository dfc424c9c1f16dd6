use crate::error::ApiError;

/// Direct object-storage write through a presigned URL.
#[async_trait::async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn put(&self, url: &str, content_type: &str, data: Vec<u8>) -> Result<(), ApiError>;
}

/// Plain HTTP PUT. The URL carries its own credential; no session is sent.
pub struct HttpObjectStorage {
    http: reqwest::Client,
}

impl HttpObjectStorage {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

impl Default for HttpObjectStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ObjectStorage for HttpObjectStorage {
    async fn put(&self, url: &str, content_type: &str, data: Vec<u8>) -> Result<(), ApiError> {
        let resp = self
            .http
            .put(url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(data)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}
