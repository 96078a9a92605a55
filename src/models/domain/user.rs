use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(username: &str, display_name: &str, email: &str, password_hash: &str) -> Self {
        User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            display_name: display_name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Some(Utc::now()),
        }
    }
}

#[cfg(test)]
impl User {
    pub fn test_user(username: &str) -> Self {
        User::new(
            username,
            "Test User",
            &format!("{}@example.com", username),
            "unhashed-test-password",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = User::new("johndoe", "John Doe", "john@example.com", "hash");

        assert_eq!(user.username, "johndoe");
        assert_eq!(user.display_name, "John Doe");
        assert_eq!(user.email, "john@example.com");
        assert!(user.created_at.is_some());
        assert!(!user.id.is_empty());
    }

    #[test]
    fn test_user_ids_are_unique() {
        let a = User::test_user("a");
        let b = User::test_user("b");
        assert_ne!(a.id, b.id);
    }
}
