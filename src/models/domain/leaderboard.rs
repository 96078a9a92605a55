use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-quiz ranked board. One document per quiz, entries kept sorted
/// descending by score after every upsert.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Leaderboard {
    pub id: String,
    pub quiz_id: String,
    pub group_id: String,
    pub entries: Vec<LeaderboardEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct LeaderboardEntry {
    pub user_id: String,
    /// Best total_score across the user's attempts; only ever increases.
    pub score: i32,
    /// Latest attempt number, overwritten on every submission.
    pub attempts: u32,
    pub last_attempt: DateTime<Utc>,
}

impl Leaderboard {
    pub fn new(quiz_id: &str, group_id: &str) -> Self {
        Leaderboard {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz_id.to_string(),
            group_id: group_id.to_string(),
            entries: Vec::new(),
            created_at: Some(Utc::now()),
        }
    }

    pub fn position_of(&self, user_id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.user_id == user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_board_is_empty() {
        let board = Leaderboard::new("quiz-1", "group-1");
        assert!(board.entries.is_empty());
        assert_eq!(board.position_of("user-1"), None);
    }

    #[test]
    fn position_of_finds_entry() {
        let mut board = Leaderboard::new("quiz-1", "group-1");
        board.entries.push(LeaderboardEntry {
            user_id: "user-2".to_string(),
            score: 10,
            attempts: 1,
            last_attempt: Utc::now(),
        });
        board.entries.push(LeaderboardEntry {
            user_id: "user-1".to_string(),
            score: 5,
            attempts: 2,
            last_attempt: Utc::now(),
        });

        assert_eq!(board.position_of("user-1"), Some(1));
        assert_eq!(board.position_of("user-2"), Some(0));
    }
}
