use tracing::{info, warn};

use crate::error::SubmitError;
use crate::form::SettingsForm;
use crate::model::UserRecord;
use crate::notify::{Notification, Notifier};
use crate::rpc::SettingsRpc;
use crate::storage::ObjectStorage;
use crate::upload::{run_handshake, UploadPhase};
use crate::validate::{self, Field};

/// Submit the form: validate, upload a staged image, then send the update.
///
/// One attempt per call, no retry. On success the form adopts the saved
/// values and drops the staged file. On any failure the form stays
/// editable and `can_submit()` reflects only field error messages.
pub async fn submit(
    form: &mut SettingsForm,
    rpc: &dyn SettingsRpc,
    storage: &dyn ObjectStorage,
    notifier: &dyn Notifier,
) -> Result<UserRecord, SubmitError> {
    if form.submitting {
        return Err(SubmitError::InFlight);
    }
    if !form.validate() {
        return Err(SubmitError::Validation(form.errors.clone()));
    }

    form.submitting = true;
    form.phase = UploadPhase::Idle;
    let result = run(form, rpc, storage, notifier).await;
    form.submitting = false;
    result
}

async fn run(
    form: &mut SettingsForm,
    rpc: &dyn SettingsRpc,
    storage: &dyn ObjectStorage,
    notifier: &dyn Notifier,
) -> Result<UserRecord, SubmitError> {
    let image = match form.staged.clone() {
        Some(file) => {
            match run_handshake(rpc, storage, &file, &form.bucket_base, &mut form.phase).await {
                Ok(image) => image,
                Err(e) => {
                    warn!(error = %e, "image upload failed");
                    form.errors.mark(Field::Image);
                    notifier.notify(Notification::failure());
                    return Err(SubmitError::Upload(e));
                }
            }
        }
        None => form.input.image.clone(),
    };

    if let Err(m) = validate::check(Field::Image, &image) {
        form.errors.set(Field::Image, m);
        return Err(SubmitError::Validation(form.errors.clone()));
    }

    let payload = form.payload(image);
    match rpc.update(&payload).await {
        Ok(saved) => {
            info!(user_id = %saved.id, "profile saved");
            form.commit(saved.clone());
            notifier.notify(Notification::profile_updated());
            Ok(saved)
        }
        Err(e) => {
            warn!(error = %e, "profile update failed");
            notifier.notify(Notification::failure());
            Err(SubmitError::Update(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{alice, FakeRpc, FakeStorage, RecordingNotifier};
    use crate::file::SelectedFile;
    use crate::form::ClientConfig;
    use crate::model::UpdatePayload;
    use settings_core::profile;

    fn form() -> SettingsForm {
        SettingsForm::new(
            &alice(),
            &ClientConfig::new("http://x.test", "https://bucket.test/public"),
        )
    }

    #[tokio::test]
    async fn update_without_file() {
        let rpc = FakeRpc::new();
        let storage = FakeStorage::new();
        let notifier = RecordingNotifier::default();
        let mut form = form();
        form.set_name("Alice");
        form.set_description("Hi");

        submit(&mut form, &rpc, &storage, &notifier).await.unwrap();

        assert_eq!(rpc.ticket_calls(), 0);
        assert!(storage.puts().is_empty());
        assert_eq!(
            rpc.updates(),
            vec![UpdatePayload {
                name: "Alice".into(),
                description: "Hi".into(),
                image: "https://cdn.test/old.png".into(),
                setup_completed: true,
            }]
        );
        assert_eq!(notifier.seen(), vec![Notification::profile_updated()]);
        assert!(form.can_submit());
        assert!(form.user().setup_completed);
    }

    #[tokio::test]
    async fn upload_rewrites_image() {
        let rpc = FakeRpc::new();
        let storage = FakeStorage::new();
        let notifier = RecordingNotifier::default();
        let mut form = form();

        let jpeg = vec![0xFF; 2 * 1024 * 1024];
        form.select_file(SelectedFile::new("me.jpg", "image/jpeg", jpeg.clone()))
            .unwrap();
        submit(&mut form, &rpc, &storage, &notifier).await.unwrap();

        assert_eq!(rpc.ticket_calls(), 1);
        let puts = storage.puts();
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].url, "https://store.test/avatars/u1/k1?token=t");
        assert_eq!(puts[0].content_type, "image/jpeg");
        assert_eq!(puts[0].data.len(), jpeg.len());

        let updates = rpc.updates();
        assert_eq!(updates[0].image, "https://bucket.test/public/avatars/u1/k1");
        assert_eq!(form.upload_phase(), UploadPhase::Done);
        assert!(form.staged_file().is_none());
        assert_eq!(form.input().image, "https://bucket.test/public/avatars/u1/k1");
    }

    #[tokio::test]
    async fn ticket_failure_skips_update() {
        let rpc = FakeRpc {
            fail_ticket: true,
            ..Default::default()
        };
        let storage = FakeStorage::new();
        let notifier = RecordingNotifier::default();
        let mut form = form();
        form.select_file(SelectedFile::new("me.png", "image/png", vec![1]))
            .unwrap();

        let err = submit(&mut form, &rpc, &storage, &notifier).await.unwrap_err();
        assert!(matches!(err, SubmitError::Upload(_)));
        assert!(rpc.updates().is_empty());
        assert!(storage.puts().is_empty());
        assert_eq!(notifier.seen(), vec![Notification::failure()]);

        // Message-less marker on the image field; not submitting any more.
        assert!(form.errors().has(Field::Image));
        assert_eq!(form.errors().message(Field::Image), None);
        assert!(!form.is_submitting());
        assert_eq!(form.upload_phase(), UploadPhase::Idle);
        assert!(form.staged_file().is_some());
        assert!(form.can_submit());

        // A retry clears the marker before running again.
        let rpc = FakeRpc::new();
        submit(&mut form, &rpc, &storage, &notifier).await.unwrap();
        assert!(form.errors().is_empty());
        assert_eq!(rpc.updates().len(), 1);
    }

    #[tokio::test]
    async fn put_failure_skips_update() {
        let rpc = FakeRpc::new();
        let storage = FakeStorage::failing();
        let notifier = RecordingNotifier::default();
        let mut form = form();
        form.select_file(SelectedFile::new("me.png", "image/png", vec![1]))
            .unwrap();

        let err = submit(&mut form, &rpc, &storage, &notifier).await.unwrap_err();
        assert!(matches!(err, SubmitError::Upload(_)));
        assert_eq!(rpc.ticket_calls(), 1);
        assert!(rpc.updates().is_empty());
        assert_eq!(notifier.seen(), vec![Notification::failure()]);
    }

    #[tokio::test]
    async fn update_failure_keeps_form_editable() {
        let rpc = FakeRpc {
            fail_update: true,
            ..Default::default()
        };
        let storage = FakeStorage::new();
        let notifier = RecordingNotifier::default();
        let mut form = form();
        form.set_name("Alice");

        let err = submit(&mut form, &rpc, &storage, &notifier).await.unwrap_err();
        assert!(matches!(err, SubmitError::Update(_)));
        assert_eq!(notifier.seen(), vec![Notification::failure()]);
        assert!(form.can_submit());
        assert_eq!(form.input().name, "Alice");
        assert_eq!(form.user().name, "alice");
    }

    #[tokio::test]
    async fn invalid_fields_send_nothing() {
        let rpc = FakeRpc::new();
        let storage = FakeStorage::new();
        let notifier = RecordingNotifier::default();
        let mut form = form();
        form.input.name = String::new();
        form.input.image = String::new();

        let err = submit(&mut form, &rpc, &storage, &notifier).await.unwrap_err();
        match err {
            SubmitError::Validation(errors) => {
                assert_eq!(errors.message(Field::Name), Some(profile::NAME_REQUIRED));
                assert_eq!(errors.message(Field::Image), Some(profile::INVALID_URL));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(rpc.updates().is_empty());
        assert!(notifier.seen().is_empty());
    }

    #[tokio::test]
    async fn in_flight_submit_is_refused() {
        let rpc = FakeRpc::new();
        let storage = FakeStorage::new();
        let notifier = RecordingNotifier::default();
        let mut form = form();
        form.submitting = true;
        assert!(!form.can_submit());

        let err = submit(&mut form, &rpc, &storage, &notifier).await.unwrap_err();
        assert!(matches!(err, SubmitError::InFlight));
        assert!(rpc.updates().is_empty());
    }

    #[tokio::test]
    async fn resubmit_sends_identical_payload() {
        let rpc = FakeRpc::new();
        let storage = FakeStorage::new();
        let notifier = RecordingNotifier::default();
        let mut form = form();
        form.set_name("Alice");
        form.select_file(SelectedFile::new("me.png", "image/png", vec![1]))
            .unwrap();

        submit(&mut form, &rpc, &storage, &notifier).await.unwrap();
        submit(&mut form, &rpc, &storage, &notifier).await.unwrap();
        submit(&mut form, &rpc, &storage, &notifier).await.unwrap();

        let updates = rpc.updates();
        assert_eq!(updates.len(), 3);
        assert_eq!(updates[1], updates[2]);
        assert_eq!(updates[0], updates[1]);
        // The file was uploaded once; later submissions reuse its URL.
        assert_eq!(rpc.ticket_calls(), 1);
    }
}
