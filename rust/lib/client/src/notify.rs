/// Shown after a successful update.
pub const PROFILE_UPDATED: &str = "Profile updated.";

/// Shown for any failed upload or update. Failures are not classified for
/// the user.
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong. Please try again.";

/// Transient feedback for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Failure(String),
}

impl Notification {
    pub fn profile_updated() -> Self {
        Notification::Success(PROFILE_UPDATED.to_string())
    }

    pub fn failure() -> Self {
        Notification::Failure(SOMETHING_WENT_WRONG.to_string())
    }
}

/// Where notifications go (toast, terminal, log).
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Forwards notifications to the `tracing` log.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification {
            Notification::Success(message) => tracing::info!(%message, "notification"),
            Notification::Failure(message) => tracing::warn!(%message, "notification"),
        }
    }
}
