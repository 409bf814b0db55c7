//! Authentication service
//!
//! Account creation, credential checks and database-backed sessions:
//! - signup creates the account and logs it in
//! - login verifies the password and opens a session
//! - session validation drops expired sessions as it finds them

use crate::config::MAX_SESSION_DAYS;
use crate::db::is_unique_violation;
use crate::db::repositories::{SessionRepository, UserRepository};
use crate::models::{CreateUserInput, Session, User};
use crate::services::password::{hash_password, verify_password};
use anyhow::Context;
use chrono::Duration;
use std::sync::Arc;
use uuid::Uuid;

/// Default session lifetime in days
const DEFAULT_SESSION_EXPIRATION_DAYS: i64 = 30;

/// Error types for authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Email address already registered
    #[error("A user with this email already exists")]
    EmailTaken,

    /// Credentials rejected; the message is shown to the user
    #[error("{0}")]
    Authorization(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Authentication service
pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    session_repo: Arc<dyn SessionRepository>,
    session_ttl: Duration,
}

impl AuthService {
    /// Create a new auth service with the default session lifetime
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        session_repo: Arc<dyn SessionRepository>,
    ) -> Self {
        Self::with_session_expiration(user_repo, session_repo, DEFAULT_SESSION_EXPIRATION_DAYS)
    }

    /// Create a new auth service with a custom session lifetime.
    ///
    /// Lifetimes beyond `MAX_SESSION_DAYS` in either direction are capped.
    pub fn with_session_expiration(
        user_repo: Arc<dyn UserRepository>,
        session_repo: Arc<dyn SessionRepository>,
        session_expiration_days: i64,
    ) -> Self {
        let days = session_expiration_days.clamp(-MAX_SESSION_DAYS, MAX_SESSION_DAYS);
        Self {
            user_repo,
            session_repo,
            session_ttl: Duration::days(days),
        }
    }

    /// Create an account.
    ///
    /// The input is expected to be validated already (see
    /// `services::validation::validate_signup`). Two signups racing for
    /// one email both pass the lookup; the loser hits the unique index and
    /// still gets `EmailTaken`.
    pub async fn create_user(&self, input: CreateUserInput) -> Result<User, AuthError> {
        if self
            .user_repo
            .get_by_email(&input.email)
            .await
            .context("Failed to check email")?
            .is_some()
        {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = hash_password(&input.password).context("Failed to hash password")?;
        let user = User::new(input.name, input.email, password_hash);

        let created = match self.user_repo.create(&user).await {
            Ok(created) => created,
            Err(e) if is_unique_violation(&e) => return Err(AuthError::EmailTaken),
            Err(e) => return Err(AuthError::InternalError(e.context("Failed to create user"))),
        };

        tracing::info!(user_id = created.id, "User registered");
        Ok(created)
    }

    /// Create an account and open a session for it
    pub async fn signup(&self, input: CreateUserInput) -> Result<(User, Session), AuthError> {
        let user = self.create_user(input).await?;
        let session = self.start_session(user.id).await?;
        Ok((user, session))
    }

    /// Check credentials.
    ///
    /// Unknown emails and wrong passwords are reported with different
    /// messages: "User not found" and "Invalid credentials".
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let user = self
            .user_repo
            .get_by_email(email)
            .await
            .context("Failed to look up user")?
            .ok_or_else(|| AuthError::Authorization("User not found".to_string()))?;

        let valid = verify_password(password, &user.password_hash)
            .context("Failed to verify password")?;
        if !valid {
            tracing::debug!(user_id = user.id, "Rejected login with wrong password");
            return Err(AuthError::Authorization("Invalid credentials".to_string()));
        }

        Ok(user)
    }

    /// Check credentials and open a session
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, Session), AuthError> {
        let user = self.authenticate(email, password).await?;
        let session = self.start_session(user.id).await?;
        tracing::info!(user_id = user.id, "User logged in");
        Ok((user, session))
    }

    /// Open a new session for a user
    pub async fn start_session(&self, user_id: i64) -> Result<Session, AuthError> {
        let session = Session::new(Uuid::new_v4().to_string(), user_id, self.session_ttl);

        let created = self
            .session_repo
            .create(&session)
            .await
            .context("Failed to create session")?;

        Ok(created)
    }

    /// Delete a session. A missing session is not an error.
    pub async fn logout(&self, session_id: &str) -> Result<(), AuthError> {
        self.session_repo
            .delete(session_id)
            .await
            .context("Failed to delete session")?;

        Ok(())
    }

    /// Resolve a session token to its user.
    ///
    /// Returns `None` for unknown and expired sessions; expired ones are
    /// deleted on the way.
    pub async fn validate_session(&self, token: &str) -> Result<Option<User>, AuthError> {
        let session = match self
            .session_repo
            .get_by_id(token)
            .await
            .context("Failed to get session")?
        {
            Some(session) => session,
            None => return Ok(None),
        };

        if session.is_expired() {
            self.session_repo
                .delete(token)
                .await
                .context("Failed to delete expired session")?;
            return Ok(None);
        }

        let user = self
            .user_repo
            .get_by_id(session.user_id)
            .await
            .context("Failed to get user for session")?;

        Ok(user)
    }

    /// Remove expired sessions, returning how many were deleted
    pub async fn cleanup_expired_sessions(&self) -> Result<u64, AuthError> {
        Ok(self
            .session_repo
            .delete_expired()
            .await
            .context("Failed to clean up expired sessions")?)
    }
}
