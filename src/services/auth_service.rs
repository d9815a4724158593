//! Domain service for authentication against the external provider.
//!
//! Handles sign-in, sign-up, session lookup, sign-out, and password
//! recovery.

use crate::models::user::UserProfile;
use thiserror::Error;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email is already registered")]
    EmailInUse,

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Network unavailable: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("No active session")]
    NotSignedIn,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Whether a retry has a realistic chance of succeeding.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_))
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_decode() {
            Self::Internal(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials and opens a session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] when the provider
    /// rejects the credentials, [`AuthError::Validation`] when the
    /// input is rejected before any network call.
    async fn sign_in(&self, email: &str, password: &str) -> Result<UserProfile, AuthError>;

    /// Registers a new account, optionally with a display name.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::EmailInUse`] or [`AuthError::WeakPassword`]
    /// on provider rejection, [`AuthError::Validation`] on local input
    /// rejection.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<UserProfile, AuthError>;

    /// Ends the current session. Signing out without a session is a
    /// no-op.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Profile of the signed-in user, or `None` when no valid session
    /// exists.
    async fn current_user(&self) -> Result<Option<UserProfile>, AuthError>;

    /// Asks the provider to send a password-recovery email.
    async fn reset_password(&self, email: &str) -> Result<(), AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(AuthError::Network("unreachable".to_string()).is_transient());
        assert!(AuthError::Timeout("deadline".to_string()).is_transient());
        assert!(!AuthError::InvalidCredentials.is_transient());
        assert!(!AuthError::EmailInUse.is_transient());
        assert!(!AuthError::Validation("bad email".to_string()).is_transient());
    }

    #[test]
    fn auth_error_display() {
        assert_eq!(AuthError::InvalidCredentials.to_string(), "Invalid credentials");
        assert_eq!(AuthError::NotSignedIn.to_string(), "No active session");
    }
}
