use settings_core::profile;

use crate::error::ApiError;
use crate::file::SelectedFile;
use crate::rpc::SettingsRpc;
use crate::storage::ObjectStorage;

/// Progress of the upload handshake.
///
/// `Idle → RequestingTicket → Uploading → Rewriting → Done`; any failure
/// returns to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadPhase {
    #[default]
    Idle,
    RequestingTicket,
    Uploading,
    Rewriting,
    Done,
}

/// Upload a staged file and return the public URL that replaces the
/// payload's `image`.
///
/// `phase` tracks progress and is left at `Done` on success, `Idle` on
/// failure.
pub async fn run_handshake(
    rpc: &dyn SettingsRpc,
    storage: &dyn ObjectStorage,
    file: &SelectedFile,
    bucket_base: &str,
    phase: &mut UploadPhase,
) -> Result<String, ApiError> {
    let result = handshake(rpc, storage, file, bucket_base, phase).await;
    if result.is_err() {
        *phase = UploadPhase::Idle;
    }
    result
}

async fn handshake(
    rpc: &dyn SettingsRpc,
    storage: &dyn ObjectStorage,
    file: &SelectedFile,
    bucket_base: &str,
    phase: &mut UploadPhase,
) -> Result<String, ApiError> {
    *phase = UploadPhase::RequestingTicket;
    let ticket = rpc.get_presigned_url().await?;
    tracing::debug!(key = %ticket.key, "upload ticket issued");

    *phase = UploadPhase::Uploading;
    storage.put(&ticket.url, &file.mime, file.data.clone()).await?;

    *phase = UploadPhase::Rewriting;
    let image = profile::public_url(bucket_base, &ticket.key);

    *phase = UploadPhase::Done;
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{FakeRpc, FakeStorage};

    #[tokio::test]
    async fn uploads_then_rewrites() {
        let rpc = FakeRpc::new();
        let storage = FakeStorage::new();
        let file = SelectedFile::new("me.jpg", "image/jpeg", vec![7; 16]);
        let mut phase = UploadPhase::Idle;

        let image = run_handshake(&rpc, &storage, &file, "https://bucket.test/public/", &mut phase)
            .await
            .unwrap();

        assert_eq!(image, "https://bucket.test/public/avatars/u1/k1");
        assert_eq!(phase, UploadPhase::Done);
        let puts = storage.puts();
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].url, "https://store.test/avatars/u1/k1?token=t");
        assert_eq!(puts[0].content_type, "image/jpeg");
        assert_eq!(puts[0].data, vec![7; 16]);
    }

    #[tokio::test]
    async fn failed_put_returns_to_idle() {
        let rpc = FakeRpc::new();
        let storage = FakeStorage::failing();
        let file = SelectedFile::new("me.png", "image/png", vec![1]);
        let mut phase = UploadPhase::Idle;

        let err = run_handshake(&rpc, &storage, &file, "https://bucket.test", &mut phase)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Server { status: 403, .. }));
        assert_eq!(phase, UploadPhase::Idle);
    }
}
