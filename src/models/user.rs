use serde::{Deserialize, Serialize};

/// Profile of a signed-in user as reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl UserProfile {
    /// Name to show in user-facing output, falling back to the email.
    #[must_use]
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_prefers_display_name() {
        let user = UserProfile {
            id: "u1".to_string(),
            email: "homer@springfield.example".to_string(),
            display_name: Some("Homer".to_string()),
            avatar_url: None,
        };
        assert_eq!(user.label(), "Homer");
    }

    #[test]
    fn label_falls_back_to_email() {
        let user = UserProfile {
            id: "u1".to_string(),
            email: "homer@springfield.example".to_string(),
            display_name: Some(String::new()),
            avatar_url: None,
        };
        assert_eq!(user.label(), "homer@springfield.example");
    }
}
