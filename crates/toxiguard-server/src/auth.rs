//! Moderator authentication
//!
//! Passwords are stored as Argon2id PHC strings. A successful login yields
//! an opaque bearer token that expires after the configured TTL.

use crate::config::AdminConfig;
use crate::error::AppError;
use crate::state::AppState;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};
use uuid::Uuid;

/// Hash a plaintext password using Argon2id with a random salt
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC hash.
///
/// Returns `Ok(false)` on a mismatch and `Err` only for a malformed hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Check moderator credentials against the configuration
pub fn check_credentials(config: &AdminConfig, username: &str, password: &str) -> bool {
    let Some(hash) = config.password_hash.as_deref() else {
        warn!("Admin login attempted but no password hash is configured");
        return false;
    };

    let username_ok: bool = username.as_bytes().ct_eq(config.username.as_bytes()).into();
    // Verify the password regardless of the username result
    let password_ok = match verify_password(password, hash) {
        Ok(ok) => ok,
        Err(e) => {
            warn!(error = %e, "Configured admin password hash is not a valid PHC string");
            false
        }
    };

    username_ok && password_ok
}

/// An issued admin session
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// In-memory bearer tokens for moderator sessions
pub struct SessionStore {
    sessions: RwLock<HashMap<String, DateTime<Utc>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl: Duration::seconds(ttl_secs.min(u64::from(u32::MAX)) as i64),
        }
    }

    /// Start a new session
    pub fn issue(&self) -> Session {
        let now = Utc::now();
        let session = Session {
            token: Uuid::new_v4().to_string(),
            expires_at: now + self.ttl,
        };

        let mut sessions = self.sessions.write();
        sessions.retain(|_, expires_at| *expires_at > now);
        sessions.insert(session.token.clone(), session.expires_at);
        session
    }

    /// Whether `token` names a live session
    pub fn validate(&self, token: &str) -> bool {
        let now = Utc::now();
        let expired = match self.sessions.read().get(token) {
            Some(expires_at) if *expires_at > now => return true,
            Some(_) => true,
            None => false,
        };

        if expired {
            self.sessions.write().remove(token);
            debug!("Admin session expired");
        }
        false
    }

    /// End a session; returns whether it existed
    pub fn revoke(&self, token: &str) -> bool {
        self.sessions.write().remove(token).is_some()
    }

    pub fn active(&self) -> usize {
        let now = Utc::now();
        self.sessions.read().values().filter(|e| **e > now).count()
    }
}

/// Authenticated moderator, extracted from an `Authorization: Bearer` header
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub token: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Unauthorized("Invalid Authorization format. Expected: Bearer <token>".into())
        })?;

        if !state.sessions.validate(token) {
            return Err(AppError::Unauthorized("Invalid or expired session".into()));
        }

        Ok(AdminSession {
            token: token.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin_config(password: &str) -> AdminConfig {
        AdminConfig {
            username: "admin".into(),
            password_hash: Some(hash_password(password).expect("hashing should succeed")),
            ..Default::default()
        }
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct-horse").expect("hashing should succeed");
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct-horse", &hash).unwrap());
        assert!(!verify_password("wrong-horse", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }

    #[test]
    fn test_check_credentials() {
        let config = admin_config("s3cret");
        assert!(check_credentials(&config, "admin", "s3cret"));
        assert!(!check_credentials(&config, "admin", "123"));
        assert!(!check_credentials(&config, "root", "s3cret"));
    }

    #[test]
    fn test_login_disabled_without_hash() {
        let config = AdminConfig::default();
        assert!(!check_credentials(&config, "admin", "123"));
    }

    #[test]
    fn test_session_lifecycle() {
        let sessions = SessionStore::new(60);
        let session = sessions.issue();
        assert!(sessions.validate(&session.token));
        assert_eq!(sessions.active(), 1);

        assert!(sessions.revoke(&session.token));
        assert!(!sessions.validate(&session.token));
        assert!(!sessions.revoke(&session.token));
    }

    #[test]
    fn test_zero_ttl_session_is_expired() {
        let sessions = SessionStore::new(0);
        let session = sessions.issue();
        assert!(!sessions.validate(&session.token));
        assert_eq!(sessions.active(), 0);
    }
}
