use serde::{Deserialize, Serialize};

/// An account. Created at first login, edited only through the settings
/// page's update call, never deleted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier (UUIDv4, no dashes).
    pub id: String,

    /// Email address. Managed by the identity provider, never edited here.
    pub email: String,

    /// Display name, 1 to 13 characters.
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Profile image URL. Empty until the user sets one.
    #[serde(default)]
    pub image: String,

    /// Whether the user has gone through the settings page at least once.
    #[serde(default)]
    pub setup_completed: bool,

    /// RFC 3339 creation timestamp.
    pub created_at: String,

    /// RFC 3339 last update timestamp.
    pub updated_at: String,
}

/// Body of the `user.update` procedure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfile {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub image: String,
    #[serde(default)]
    pub setup_completed: bool,
}
