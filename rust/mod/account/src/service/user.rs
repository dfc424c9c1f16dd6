use tracing::info;

use settings_core::{new_id, now_rfc3339, profile};

use crate::model::{UpdateProfile, User};
use crate::service::{AccountError, AccountService};

pub(crate) fn user_key(id: &str) -> String {
    format!("account:user:{}", id)
}

fn email_key(email: &str) -> String {
    format!("account:email:{}", email.trim().to_lowercase())
}

impl AccountService {
    /// Get a user by id.
    pub fn get_user(&self, id: &str) -> Result<User, AccountError> {
        self.get_record(&user_key(id))?
            .ok_or_else(|| AccountError::NotFound(format!("user {}", id)))
    }

    /// Look up a user by email (case-insensitive).
    pub fn find_user_by_email(&self, email: &str) -> Result<User, AccountError> {
        let id: String = self
            .get_record(&email_key(email))?
            .ok_or_else(|| AccountError::NotFound(format!("user with email {}", email.trim())))?;
        self.get_user(&id)
    }

    /// Find the user for an identity-provider email, creating the account on
    /// first login. New accounts start with `setup_completed = false`.
    pub fn find_or_create_user(&self, email: &str, name: &str) -> Result<User, AccountError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AccountError::Validation("email is required".into()));
        }

        if let Some(id) = self.get_record::<String>(&email_key(email))? {
            return self.get_user(&id);
        }

        let now = now_rfc3339();
        let user = User {
            id: new_id(),
            email: email.to_string(),
            name: name.to_string(),
            description: String::new(),
            image: String::new(),
            setup_completed: false,
            created_at: now.clone(),
            updated_at: now,
        };
        self.put_record(&user_key(&user.id), &user)?;

        let id_json = serde_json::to_vec(&user.id).map_err(|e| AccountError::Internal(e.to_string()))?;
        if !self.kv.insert_if_absent(&email_key(email), &id_json)? {
            // Lost a race with a concurrent first login for the same email.
            self.kv.delete(&user_key(&user.id))?;
            let id: String = self
                .get_record(&email_key(email))?
                .ok_or_else(|| AccountError::Internal("email index vanished".into()))?;
            return self.get_user(&id);
        }

        info!(user_id = %user.id, "created account on first login");
        Ok(user)
    }

    /// Apply the settings form to a user.
    ///
    /// Only `name`, `description`, `image` and `setup_completed` change;
    /// `id`, `email` and `created_at` are kept.
    pub fn update_profile(&self, id: &str, input: UpdateProfile) -> Result<User, AccountError> {
        profile::validate_name(&input.name).map_err(|m| AccountError::Validation(m.into()))?;
        profile::validate_image_url(&input.image).map_err(|m| AccountError::Validation(m.into()))?;

        let mut user = self.get_user(id)?;
        user.name = input.name;
        user.description = input.description;
        user.image = input.image;
        user.setup_completed = input.setup_completed;
        user.updated_at = now_rfc3339();

        self.put_record(&user_key(id), &user)?;
        info!(user_id = %id, setup_completed = user.setup_completed, "updated profile");
        Ok(user)
    }
}
