use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{Credentials, Session, User};
use crate::infrastructure::security::{
    generate_token, hash_password, validate_token, verify_password,
};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, trace, warn};

/// Stateless authentication over a [`UserRepository`]: registration, login and
/// resolution of session tokens back to users.
pub struct AuthService<R: UserRepository> {
    user_repository: Arc<R>,
    session_secret: String,
    session_ttl_secs: i64,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(user_repository: Arc<R>, session_secret: String, session_ttl_secs: i64) -> Self {
        Self {
            user_repository,
            session_secret,
            session_ttl_secs,
        }
    }

    #[instrument(skip(self, req), fields(username = %req.username))]
    pub async fn register_user(&self, req: Credentials) -> Result<User> {
        trace!("Starting user registration");

        let username = req.username.trim();
        if username.is_empty() || req.password.is_empty() {
            return Err(
                DomainError::Validation("Username and password are required".to_string()).into(),
            );
        }

        if self
            .user_repository
            .find_user_by_username(username)
            .await?
            .is_some()
        {
            warn!("Username already taken");
            return Err(DomainError::UsernameTaken.into());
        }

        let password_hash = hash_password(&req.password).map_err(|e| {
            error!(error = %e, "Failed to hash password");
            DomainError::Internal(format!("Failed to hash password: {}", e))
        })?;

        // A concurrent registration can still win the race; the UNIQUE
        // constraint turns that into UsernameTaken as well.
        let user = self
            .user_repository
            .create_user(username, &password_hash)
            .await?;

        info!(user_id = user.id, "User registered successfully");
        Ok(user)
    }

    #[instrument(skip(self, req), fields(username = %req.username))]
    pub async fn login(&self, req: Credentials) -> Result<Session> {
        trace!("Starting login");

        let user = self
            .user_repository
            .find_user_by_username(req.username.trim())
            .await?
            .ok_or_else(|| {
                warn!("Unknown username during login");
                DomainError::InvalidCredentials
            })?;

        let is_valid = verify_password(&req.password, &user.password_hash).map_err(|e| {
            error!(error = %e, "Failed to verify password");
            DomainError::Internal(format!("Failed to verify password: {}", e))
        })?;

        if !is_valid {
            warn!(user_id = user.id, "Invalid password during login");
            return Err(DomainError::InvalidCredentials.into());
        }

        let token =
            generate_token(user.id, &self.session_secret, self.session_ttl_secs).map_err(|e| {
                error!(error = %e, "Failed to generate session token");
                DomainError::Internal(format!("Failed to generate session token: {}", e))
            })?;

        info!(user_id = user.id, "Login successful");
        Ok(Session { user, token })
    }

    /// Resolves a session token to its user. Invalid or expired tokens, and
    /// tokens for users that no longer exist, resolve to `None`.
    #[instrument(skip_all)]
    pub async fn authenticate(&self, token: &str) -> Result<Option<User>> {
        let user_id = match validate_token(token, &self.session_secret) {
            Ok(user_id) => user_id,
            Err(e) => {
                debug!(error = %e, "Rejected session token");
                return Ok(None);
            }
        };

        let user = self.user_repository.find_user_by_id(user_id).await?;
        if user.is_none() {
            debug!(user_id, "Session refers to a missing user");
        }
        Ok(user)
    }
}
