use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use tracing::info;

use settings_core::new_id;

use crate::model::{Claims, IssuedSession, Session, User};
use crate::service::{AccountError, AccountService};

fn session_key(id: &str) -> String {
    format!("account:session:{}", id)
}

impl AccountService {
    /// Issue a session token for a user and record the session.
    pub fn issue_session(&self, user: &User) -> Result<IssuedSession, AccountError> {
        let session_id = new_id();
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::seconds(self.config.session_ttl);

        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            sid: session_id.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.session_secret.as_bytes()),
        )
        .map_err(|e| AccountError::Internal(format!("JWT encode failed: {}", e)))?;

        let session = Session {
            id: session_id,
            user_id: user.id.clone(),
            issued_at: now.to_rfc3339(),
            expires_at: exp.to_rfc3339(),
            revoked: false,
        };
        self.put_record(&session_key(&session.id), &session)?;

        Ok(IssuedSession {
            token,
            session,
            expires_in: self.config.session_ttl,
        })
    }

    /// Verify a session token.
    ///
    /// Returns the claims if the signature and expiry are valid and the
    /// session record exists and is not revoked.
    pub fn verify_session(&self, token: &str) -> Result<Claims, AccountError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.session_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| AccountError::Unauthorized(format!("invalid token: {}", e)))?;

        let claims = token_data.claims;
        let session: Session = self
            .get_record(&session_key(&claims.sid))?
            .ok_or_else(|| AccountError::Unauthorized("unknown session".into()))?;
        if session.revoked {
            return Err(AccountError::Unauthorized("session has been revoked".into()));
        }
        if session.user_id != claims.sub {
            return Err(AccountError::Unauthorized("session does not belong to subject".into()));
        }

        Ok(claims)
    }

    /// Revoke a session (its token becomes invalid).
    pub fn revoke_session(&self, session_id: &str) -> Result<(), AccountError> {
        let mut session: Session = self
            .get_record(&session_key(session_id))?
            .ok_or_else(|| AccountError::NotFound(format!("session {}", session_id)))?;
        session.revoked = true;
        self.put_record(&session_key(session_id), &session)
    }

    /// Revoke every active session of a user. Returns how many were revoked.
    pub fn revoke_user_sessions(&self, user_id: &str) -> Result<usize, AccountError> {
        let sessions = self.list_user_sessions(user_id)?;
        for session in &sessions {
            self.revoke_session(&session.id)?;
        }
        if !sessions.is_empty() {
            info!(user_id, count = sessions.len(), "revoked user sessions");
        }
        Ok(sessions.len())
    }

    /// List a user's sessions that are not revoked.
    pub fn list_user_sessions(&self, user_id: &str) -> Result<Vec<Session>, AccountError> {
        let mut sessions = Vec::new();
        for (_, bytes) in self.kv.scan("account:session:")? {
            let session: Session = serde_json::from_slice(&bytes)
                .map_err(|e| AccountError::Internal(e.to_string()))?;
            if session.user_id == user_id && !session.revoked {
                sessions.push(session);
            }
        }
        sessions.sort_by(|a, b| b.issued_at.cmp(&a.issued_at));
        Ok(sessions)
    }
}

#[cfg(test)]
mod tests {
    use crate::service::testutil::test_service;
    use crate::service::{AccountConfig, AccountService};

    #[test]
    fn test_issue_and_verify() {
        let env = test_service();
        let svc = &env.svc;
        let user = svc.find_or_create_user("alice@example.com", "Alice").unwrap();

        let issued = svc.issue_session(&user).unwrap();
        assert!(!issued.token.is_empty());
        assert_eq!(issued.expires_in, 86400);

        let claims = svc.verify_session(&issued.token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.sid, issued.session.id);
    }

    #[test]
    fn test_revoke_session() {
        let env = test_service();
        let svc = &env.svc;
        let user = svc.find_or_create_user("carol@example.com", "Carol").unwrap();

        let first = svc.issue_session(&user).unwrap();
        let second = svc.issue_session(&user).unwrap();
        assert_eq!(svc.list_user_sessions(&user.id).unwrap().len(), 2);

        svc.revoke_session(&first.session.id).unwrap();
        assert!(svc.verify_session(&first.token).is_err());
        assert!(svc.verify_session(&second.token).is_ok());
        assert_eq!(svc.list_user_sessions(&user.id).unwrap().len(), 1);
    }

    #[test]
    fn test_revoke_user_sessions() {
        let env = test_service();
        let svc = &env.svc;
        let erin = svc.find_or_create_user("erin@example.com", "Erin").unwrap();
        let frank = svc.find_or_create_user("frank@example.com", "Frank").unwrap();

        let a = svc.issue_session(&erin).unwrap();
        let b = svc.issue_session(&erin).unwrap();
        let other = svc.issue_session(&frank).unwrap();

        let found = svc.find_user_by_email(" ERIN@example.com").unwrap();
        assert_eq!(svc.revoke_user_sessions(&found.id).unwrap(), 2);
        assert!(svc.verify_session(&a.token).is_err());
        assert!(svc.verify_session(&b.token).is_err());
        assert!(svc.verify_session(&other.token).is_ok());
        assert_eq!(svc.revoke_user_sessions(&erin.id).unwrap(), 0);
    }

    #[test]
    fn test_invalid_tokens() {
        let env = test_service();
        let svc = &env.svc;

        assert!(svc.verify_session("this.is.not.a.valid.jwt").is_err());
        assert!(svc.verify_session("").is_err());
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let env = test_service();
        let user = env.svc.find_or_create_user("dave@example.com", "Dave").unwrap();

        let other = {
            let dir = tempfile::tempdir().unwrap();
            let kv = std::sync::Arc::new(
                settings_kv::RedbStore::open(&dir.path().join("o.redb")).unwrap(),
            );
            let blob = std::sync::Arc::new(
                settings_blob::FileStore::open(&dir.path().join("b")).unwrap(),
            );
            let svc = AccountService::new(
                kv,
                blob,
                AccountConfig {
                    session_secret: "another-secret".into(),
                    ..Default::default()
                },
            );
            svc.issue_session(&user).unwrap()
        };

        assert!(env.svc.verify_session(&other.token).is_err());
    }
}
