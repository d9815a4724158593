//! REST implementation of the `AuthService` trait.
//!
//! Wraps the provider client with input validation, a bounded retry
//! for transient failures, and a file-persisted session so account
//! state survives across process runs.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::clients::auth::{AuthClient, Session};
use crate::constants::auth::MIN_PASSWORD_LENGTH;
use crate::domain::events::NotificationEvent;
use crate::models::user::UserProfile;
use crate::services::auth_service::{AuthError, AuthService};
use crate::services::retry::RetryPolicy;

pub struct RestAuthService {
    client: Arc<AuthClient>,
    retry: RetryPolicy,
    session_path: PathBuf,
    event_bus: broadcast::Sender<NotificationEvent>,
}

impl RestAuthService {
    #[must_use]
    pub fn new(
        client: Arc<AuthClient>,
        retry: RetryPolicy,
        session_path: impl Into<PathBuf>,
        event_bus: broadcast::Sender<NotificationEvent>,
    ) -> Self {
        Self {
            client,
            retry,
            session_path: session_path.into(),
            event_bus,
        }
    }

    fn load_session(&self) -> Option<Session> {
        let content = std::fs::read_to_string(&self.session_path).ok()?;
        match serde_json::from_str(&content) {
            Ok(session) => Some(session),
            Err(err) => {
                warn!(
                    "Discarding unreadable session file {}: {}",
                    self.session_path.display(),
                    err
                );
                None
            }
        }
    }

    fn save_session(&self, session: &Session) -> Result<(), AuthError> {
        if let Some(parent) = self.session_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| AuthError::Internal(format!("cannot create session dir: {err}")))?;
        }

        let content = serde_json::to_string_pretty(session)
            .map_err(|err| AuthError::Internal(format!("cannot encode session: {err}")))?;

        std::fs::write(&self.session_path, content)
            .map_err(|err| AuthError::Internal(format!("cannot write session file: {err}")))?;

        Ok(())
    }

    fn clear_session(&self) {
        if self.session_path.exists()
            && let Err(err) = std::fs::remove_file(&self.session_path)
        {
            warn!(
                "Failed to remove session file {}: {}",
                self.session_path.display(),
                err
            );
        }
    }

    fn emit(&self, event: NotificationEvent) {
        let _ = self.event_bus.send(event);
    }
}

fn validate_email(email: &str) -> Result<(), AuthError> {
    let email = email.trim();
    let well_formed = email.contains('@')
        && !email.starts_with('@')
        && !email.ends_with('@')
        && !email.contains(char::is_whitespace);

    if well_formed {
        Ok(())
    } else {
        Err(AuthError::Validation(format!("Malformed email: {email}")))
    }
}

fn validate_password(password: &str, for_sign_up: bool) -> Result<(), AuthError> {
    if password.is_empty() {
        return Err(AuthError::Validation("Password cannot be empty".to_string()));
    }

    if for_sign_up && password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

#[async_trait]
impl AuthService for RestAuthService {
    async fn sign_in(&self, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        validate_email(email)?;
        validate_password(password, false)?;

        let session = self
            .retry
            .run(AuthError::is_transient, || {
                self.client.sign_in(email.trim(), password)
            })
            .await?;

        self.save_session(&session)?;
        info!("Signed in as {}", session.user.email);
        self.emit(NotificationEvent::SignedIn {
            email: session.user.email.clone(),
        });

        Ok(session.user)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<UserProfile, AuthError> {
        validate_email(email)?;
        validate_password(password, true)?;

        let (profile, session) = self
            .retry
            .run(AuthError::is_transient, || {
                self.client.sign_up(email.trim(), password, display_name)
            })
            .await?;

        // Providers with auto-confirm hand back a session right away;
        // otherwise the account exists but stays signed out until the
        // email is confirmed.
        if let Some(session) = session {
            self.save_session(&session)?;
            self.emit(NotificationEvent::SignedIn {
                email: profile.email.clone(),
            });
        }

        info!("Registered account for {}", profile.email);
        Ok(profile)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        if let Some(session) = self.load_session()
            && let Err(err) = self.client.sign_out(&session.access_token).await
        {
            warn!("Provider sign-out failed, dropping local session: {}", err);
        }

        self.clear_session();
        self.emit(NotificationEvent::SignedOut);
        Ok(())
    }

    async fn current_user(&self) -> Result<Option<UserProfile>, AuthError> {
        let Some(session) = self.load_session() else {
            return Ok(None);
        };

        match self.client.get_user(&session.access_token).await? {
            Some(profile) => Ok(Some(profile)),
            None => {
                // Token no longer accepted upstream.
                self.clear_session();
                Ok(None)
            }
        }
    }

    async fn reset_password(&self, email: &str) -> Result<(), AuthError> {
        validate_email(email)?;

        self.retry
            .run(AuthError::is_transient, || {
                self.client.reset_password(email.trim())
            })
            .await?;

        info!("Requested password recovery for {}", email.trim());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(validate_email("homer@springfield.example").is_ok());
        assert!(validate_email("  homer@springfield.example  ").is_ok());
        assert!(validate_email("homer").is_err());
        assert!(validate_email("@springfield.example").is_err());
        assert!(validate_email("homer@").is_err());
        assert!(validate_email("ho mer@springfield.example").is_err());
    }

    #[test]
    fn password_validation() {
        assert!(validate_password("secret", false).is_ok());
        assert!(validate_password("", false).is_err());
        assert!(validate_password("short", true).is_err());
        assert!(validate_password("longenough", true).is_ok());
    }
}
