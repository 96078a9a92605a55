use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Post {
    pub id: String,
    pub thread_id: String,
    pub author_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn new(thread_id: &str, author_id: &str, content: &str) -> Self {
        Post {
            id: Uuid::new_v4().to_string(),
            thread_id: thread_id.to_string(),
            author_id: author_id.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
        }
    }
}
