use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Thread {
    pub id: String,
    pub group_id: String,
    pub author_id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Thread {
    pub fn new(group_id: &str, author_id: &str, title: &str, content: &str) -> Self {
        Thread {
            id: Uuid::new_v4().to_string(),
            group_id: group_id.to_string(),
            author_id: author_id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
        }
    }
}
