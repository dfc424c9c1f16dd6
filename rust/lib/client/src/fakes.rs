//! In-memory transports and notifier that record every call.

use std::sync::Mutex;

use crate::error::ApiError;
use crate::model::{PresignedTicket, UpdatePayload, UserRecord};
use crate::notify::{Notification, Notifier};
use crate::rpc::SettingsRpc;
use crate::storage::ObjectStorage;

pub fn alice() -> UserRecord {
    UserRecord {
        id: "u1".into(),
        email: "alice@example.com".into(),
        name: "alice".into(),
        description: String::new(),
        image: "https://cdn.test/old.png".into(),
        setup_completed: false,
    }
}

#[derive(Default)]
pub struct FakeRpc {
    pub fail_ticket: bool,
    pub fail_update: bool,
    pub(crate) ticket_calls: Mutex<usize>,
    pub(crate) updates: Mutex<Vec<UpdatePayload>>,
}

impl FakeRpc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ticket_calls(&self) -> usize {
        *self.ticket_calls.lock().unwrap()
    }

    pub fn updates(&self) -> Vec<UpdatePayload> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl SettingsRpc for FakeRpc {
    async fn get_presigned_url(&self) -> Result<PresignedTicket, ApiError> {
        let mut calls = self.ticket_calls.lock().unwrap();
        *calls += 1;
        if self.fail_ticket {
            return Err(ApiError::Server {
                status: 503,
                message: "unavailable".into(),
            });
        }
        let key = format!("avatars/u1/k{}", *calls);
        Ok(PresignedTicket {
            url: format!("https://store.test/{}?token=t", key),
            key,
        })
    }

    async fn update(&self, payload: &UpdatePayload) -> Result<UserRecord, ApiError> {
        self.updates.lock().unwrap().push(payload.clone());
        if self.fail_update {
            return Err(ApiError::Server {
                status: 500,
                message: "boom".into(),
            });
        }
        Ok(UserRecord {
            name: payload.name.clone(),
            description: payload.description.clone(),
            image: payload.image.clone(),
            setup_completed: payload.setup_completed,
            ..alice()
        })
    }

    async fn me(&self) -> Result<UserRecord, ApiError> {
        Ok(alice())
    }
}

#[derive(Debug, Clone)]
pub struct Put {
    pub url: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

#[derive(Default)]
pub struct FakeStorage {
    fail: bool,
    puts: Mutex<Vec<Put>>,
}

impl FakeStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn puts(&self) -> Vec<Put> {
        self.puts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ObjectStorage for FakeStorage {
    async fn put(&self, url: &str, content_type: &str, data: Vec<u8>) -> Result<(), ApiError> {
        self.puts.lock().unwrap().push(Put {
            url: url.to_string(),
            content_type: content_type.to_string(),
            data,
        });
        if self.fail {
            return Err(ApiError::Server {
                status: 403,
                message: "expired".into(),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn seen(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}
