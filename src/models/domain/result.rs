use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What the client selected for one question: an option index for
/// multiple-choice, free text for true-false and short-answer. Stored on the
/// result exactly as submitted.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum SelectedAnswer {
    Index(u32),
    Text(String),
}

impl SelectedAnswer {
    pub fn as_index(&self) -> Option<usize> {
        match self {
            SelectedAnswer::Index(i) => Some(*i as usize),
            SelectedAnswer::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            SelectedAnswer::Index(i) => i.to_string(),
            SelectedAnswer::Text(t) => t.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct EvaluatedAnswer {
    pub question_id: String,
    pub selected: SelectedAnswer,
    pub is_correct: bool,
    /// Always 0 or the question's full point value; no partial credit.
    pub points_earned: i32,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizResult {
    pub id: String,
    pub quiz_id: String,
    pub user_id: String,
    pub group_id: String,
    pub answers: Vec<EvaluatedAnswer>,
    pub total_score: i32,
    pub max_score: i32,
    pub percentage_score: f64,
    pub time_taken: Option<i64>,
    /// 1-based, strictly increasing per (quiz, user); reserved through a
    /// unique index so concurrent submissions cannot share a number.
    pub attempt_number: u32,
    pub is_passed: bool,
    pub completed_at: DateTime<Utc>,
}

impl QuizResult {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        quiz_id: &str,
        user_id: &str,
        group_id: &str,
        answers: Vec<EvaluatedAnswer>,
        total_score: i32,
        max_score: i32,
        passing_score: f64,
        time_taken: Option<i64>,
        attempt_number: u32,
        completed_at: DateTime<Utc>,
    ) -> Self {
        let percentage_score = if max_score > 0 {
            f64::from(total_score) / f64::from(max_score) * 100.0
        } else {
            0.0
        };

        QuizResult {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz_id.to_string(),
            user_id: user_id.to_string(),
            group_id: group_id.to_string(),
            answers,
            total_score,
            max_score,
            percentage_score,
            time_taken,
            attempt_number,
            is_passed: percentage_score >= passing_score,
            completed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_is_zero_when_max_score_is_zero() {
        let result = QuizResult::new(
            "quiz-1", "user-1", "group-1", vec![], 0, 0, 60.0, None, 1, Utc::now(),
        );

        assert_eq!(result.percentage_score, 0.0);
        assert!(!result.is_passed);
    }

    #[test]
    fn passing_is_inclusive_of_threshold() {
        let result = QuizResult::new(
            "quiz-1", "user-1", "group-1", vec![], 3, 5, 60.0, None, 1, Utc::now(),
        );

        assert_eq!(result.percentage_score, 60.0);
        assert!(result.is_passed);
    }

    #[test]
    fn selected_answer_deserializes_untagged() {
        let index: SelectedAnswer = serde_json::from_str("2").unwrap();
        let text: SelectedAnswer = serde_json::from_str("\"true\"").unwrap();

        assert_eq!(index, SelectedAnswer::Index(2));
        assert_eq!(text, SelectedAnswer::Text("true".to_string()));
        assert_eq!(index.as_index(), Some(2));
        assert_eq!(text.as_index(), None);
        assert_eq!(text.as_text(), "true");
    }
}
