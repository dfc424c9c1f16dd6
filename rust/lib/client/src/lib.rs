//! Settings page client.
//!
//! Owns the settings form state and drives a submission end to end:
//! field validation, the presigned upload handshake for a staged image,
//! the `user.update` call, and user-facing notifications.
//!
//! Transport is pluggable: [`SettingsRpc`] for procedure calls and
//! [`ObjectStorage`] for the direct object write. [`HttpRpc`] and
//! [`HttpObjectStorage`] talk to `settingsd` over HTTP; tests substitute
//! in-memory fakes.
//!
//! # Usage
//!
//! ```ignore
//! use settings_client::{submit, ClientConfig, HttpObjectStorage, HttpRpc, SettingsForm, StaticToken, TracingNotifier};
//!
//! let config = ClientConfig::new("http://localhost:8080", "http://localhost:8080/public");
//! let rpc = HttpRpc::new(&config.base_url, Arc::new(StaticToken::new(token)));
//! let user = rpc.me().await?;
//! let mut form = SettingsForm::new(&user, &config);
//! form.set_name("Alice");
//! submit(&mut form, &rpc, &HttpObjectStorage::new(), &TracingNotifier).await?;
//! ```

mod error;
mod file;
mod form;
mod model;
mod notify;
mod rpc;
mod storage;
mod submit;
mod token;
mod upload;
mod validate;

pub use error::{ApiError, SubmitError};
pub use file::SelectedFile;
pub use form::{ClientConfig, FormInput, SettingsForm};
pub use model::{PresignedTicket, UpdatePayload, UserRecord};
pub use notify::{Notification, Notifier, TracingNotifier};
pub use rpc::{HttpRpc, SettingsRpc};
pub use storage::{HttpObjectStorage, ObjectStorage};
pub use submit::submit;
pub use token::{NoAuth, StaticToken, TokenSource};
pub use upload::{run_handshake, UploadPhase};
pub use validate::{Field, FieldError, FieldErrors};

#[cfg(test)]
pub(crate) mod fakes;
