use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::models::user::UserProfile;
use crate::services::auth_service::AuthError;

/// A signed-in session as returned by the auth provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub user: UserProfile,
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: Option<Value>,
}

impl ApiUser {
    fn into_profile(self) -> UserProfile {
        let metadata_str = |key: &str| -> Option<String> {
            self.user_metadata
                .as_ref()
                .and_then(|m| m.get(key))
                .and_then(Value::as_str)
                .map(ToString::to_string)
        };

        UserProfile {
            display_name: metadata_str("display_name"),
            avatar_url: metadata_str("avatar_url"),
            id: self.id,
            email: self.email.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    user: ApiUser,
}

/// Sign-up responses carry a session when the provider auto-confirms
/// and a bare profile when email confirmation is still pending.
#[derive(Debug, Deserialize)]
struct SignUpResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    user: Option<ApiUser>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Client for a GoTrue-compatible REST auth API.
#[derive(Clone)]
pub struct AuthClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl AuthClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_shared_client(Client::new(), base_url, api_key)
    }

    #[must_use]
    pub fn with_shared_client(
        client: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let url = format!("{}/token?grant_type=password", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::failure_from_response(response).await);
        }

        let token: TokenResponse = response.json().await?;
        Ok(Session {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            user: token.user.into_profile(),
        })
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<(UserProfile, Option<Session>), AuthError> {
        let url = format!("{}/signup", self.base_url);

        let mut payload = json!({ "email": email, "password": password });
        if let Some(name) = display_name {
            payload["data"] = json!({ "display_name": name });
        }

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::failure_from_response(response).await);
        }

        let body: SignUpResponse = response.json().await?;

        if let (Some(access_token), Some(user)) = (body.access_token, body.user) {
            let profile = user.into_profile();
            let session = Session {
                access_token,
                refresh_token: body.refresh_token,
                user: profile.clone(),
            };
            return Ok((profile, Some(session)));
        }

        if let Some(id) = body.id {
            let profile = ApiUser {
                id,
                email: body.email,
                user_metadata: body.user_metadata,
            }
            .into_profile();
            return Ok((profile, None));
        }

        Err(AuthError::Internal(
            "sign-up response carried no user profile".to_string(),
        ))
    }

    pub async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let url = format!("{}/logout", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        // An already-expired token is as signed-out as it gets.
        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(());
        }

        if !response.status().is_success() {
            return Err(Self::failure_from_response(response).await);
        }

        Ok(())
    }

    /// Resolves the profile behind an access token; `None` when the
    /// provider no longer accepts the token.
    pub async fn get_user(&self, access_token: &str) -> Result<Option<UserProfile>, AuthError> {
        let url = format!("{}/user", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED || response.status() == StatusCode::FORBIDDEN
        {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(Self::failure_from_response(response).await);
        }

        let user: ApiUser = response.json().await?;
        Ok(Some(user.into_profile()))
    }

    pub async fn reset_password(&self, email: &str) -> Result<(), AuthError> {
        let url = format!("{}/recover", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .json(&json!({ "email": email }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::failure_from_response(response).await);
        }

        Ok(())
    }

    async fn failure_from_response(response: reqwest::Response) -> AuthError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        classify_failure(status, &error_message(&body))
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error_description.or(parsed.msg).or(parsed.error))
        .unwrap_or_else(|| body.to_string())
}

/// Maps the provider's status + message to a typed failure, mirroring
/// the message matching the upstream API actually requires.
fn classify_failure(status: StatusCode, message: &str) -> AuthError {
    let lower = message.to_lowercase();

    if lower.contains("invalid login credentials") || status == StatusCode::UNAUTHORIZED {
        return AuthError::InvalidCredentials;
    }

    if lower.contains("already registered") || lower.contains("already been registered") {
        return AuthError::EmailInUse;
    }

    if lower.contains("password") && (lower.contains("at least") || lower.contains("weak")) {
        return AuthError::WeakPassword(message.to_string());
    }

    if status.is_server_error() {
        return AuthError::Network(format!("auth service error: {status} - {message}"));
    }

    AuthError::Internal(format!("{status} - {message}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_invalid_credentials() {
        let err = classify_failure(StatusCode::BAD_REQUEST, "Invalid login credentials");
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[test]
    fn classify_unauthorized_status() {
        let err = classify_failure(StatusCode::UNAUTHORIZED, "nope");
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[test]
    fn classify_email_in_use() {
        let err = classify_failure(
            StatusCode::UNPROCESSABLE_ENTITY,
            "User already registered",
        );
        assert!(matches!(err, AuthError::EmailInUse));
    }

    #[test]
    fn classify_weak_password() {
        let err = classify_failure(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Password should be at least 6 characters",
        );
        assert!(matches!(err, AuthError::WeakPassword(_)));
    }

    #[test]
    fn classify_server_error_is_transient() {
        let err = classify_failure(StatusCode::SERVICE_UNAVAILABLE, "try later");
        assert!(err.is_transient());
    }

    #[test]
    fn classify_other_client_error() {
        let err = classify_failure(StatusCode::BAD_REQUEST, "bad payload");
        assert!(matches!(err, AuthError::Internal(_)));
        assert!(!err.is_transient());
    }

    #[test]
    fn error_message_prefers_description() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        assert_eq!(error_message(body), "Invalid login credentials");
    }

    #[test]
    fn error_message_falls_back_to_raw_body() {
        assert_eq!(error_message("plain text"), "plain text");
    }

    #[test]
    fn api_user_maps_metadata() {
        let user = ApiUser {
            id: "u1".to_string(),
            email: Some("lisa@springfield.example".to_string()),
            user_metadata: Some(json!({
                "display_name": "Lisa",
                "avatar_url": "https://cdn.example/lisa.png"
            })),
        };

        let profile = user.into_profile();
        assert_eq!(profile.display_name.as_deref(), Some("Lisa"));
        assert_eq!(
            profile.avatar_url.as_deref(),
            Some("https://cdn.example/lisa.png")
        );
    }
}
