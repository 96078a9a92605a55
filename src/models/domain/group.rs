use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_private: bool,
    pub members: Vec<String>,
    pub admins: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Group {
    /// The creator starts out as both first member and admin.
    pub fn new(name: &str, description: Option<String>, is_private: bool, creator_id: &str) -> Self {
        Group {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description,
            is_private,
            members: vec![creator_id.to_string()],
            admins: vec![creator_id.to_string()],
            created_at: Some(Utc::now()),
        }
    }

    pub fn is_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m == user_id)
    }

    pub fn is_admin(&self, user_id: &str) -> bool {
        self.admins.iter().any(|a| a == user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creator_is_member_and_admin() {
        let group = Group::new("Rustaceans", None, false, "user-1");

        assert!(group.is_member("user-1"));
        assert!(group.is_admin("user-1"));
        assert!(!group.is_member("user-2"));
        assert!(!group.is_admin("user-2"));
    }

    #[test]
    fn private_flag_round_trips() {
        let group = Group::new("Secret", Some("invite only".to_string()), true, "user-1");
        let json = serde_json::to_string(&group).expect("group should serialize");
        let parsed: Group = serde_json::from_str(&json).expect("group should deserialize");

        assert!(parsed.is_private);
        assert_eq!(parsed.description.as_deref(), Some("invite only"));
    }
}
