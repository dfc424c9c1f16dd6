use serde::{Deserialize, Serialize};

/// The user record as the settings page sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub setup_completed: bool,
}

/// Response of `user.getPresignedUrl`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresignedTicket {
    pub url: String,
    pub key: String,
}

/// Body of `user.update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePayload {
    pub name: String,
    pub description: String,
    pub image: String,
    pub setup_completed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_payload_wire_shape() {
        let payload = UpdatePayload {
            name: "Alice".into(),
            description: "Hi".into(),
            image: "https://cdn.test/a.png".into(),
            setup_completed: true,
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            serde_json::json!({
                "name": "Alice",
                "description": "Hi",
                "image": "https://cdn.test/a.png",
                "setupCompleted": true,
            })
        );
    }

    #[test]
    fn user_record_tolerates_extra_fields() {
        let user: UserRecord = serde_json::from_value(serde_json::json!({
            "id": "u1",
            "email": "a@example.com",
            "name": "alice",
            "createdAt": "2026-01-01T00:00:00Z",
        }))
        .unwrap();
        assert_eq!(user.image, "");
        assert!(!user.setup_completed);
    }
}
