use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::question::{Difficulty, QuestionType};
use crate::models::domain::result::{EvaluatedAnswer, SelectedAnswer};
use crate::models::domain::{Question, Quiz, User};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub display_name: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        UserSummary {
            id: user.id.clone(),
            username: user.username.clone(),
            display_name: user.display_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: UserSummary,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&Quiz> for QuizSummary {
    fn from(quiz: &Quiz) -> Self {
        QuizSummary {
            id: quiz.id.clone(),
            title: quiz.title.clone(),
            description: quiz.description.clone(),
        }
    }
}

/// Member-facing view of a question: option texts only, correctness stripped.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: String,
    pub quiz_id: String,
    pub question_text: String,
    pub question_type: QuestionType,
    pub options: Vec<String>,
    pub points: i32,
    pub difficulty: Difficulty,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        QuestionView {
            id: question.id.clone(),
            quiz_id: question.quiz_id.clone(),
            question_text: question.question_text.clone(),
            question_type: question.question_type,
            options: question.options.iter().map(|o| o.text.clone()).collect(),
            points: question.points,
            difficulty: question.difficulty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AvailabilityStatus {
    Available,
    Inactive,
    Unpublished,
    NotStarted,
    Active,
    Ended,
    MaxAttempts,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAvailability {
    pub is_available: bool,
    pub status: AvailabilityStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts_used: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts_remaining: Option<u64>,
    /// Seconds until the schedule window opens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_in: Option<i64>,
    /// Seconds until the schedule window closes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_in: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluatedAnswerView {
    pub selected: SelectedAnswer,
    pub is_correct: bool,
    pub points_earned: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionView>,
    pub question_id: String,
}

impl EvaluatedAnswerView {
    pub fn populate(answer: &EvaluatedAnswer, question: Option<&Question>) -> Self {
        EvaluatedAnswerView {
            selected: answer.selected.clone(),
            is_correct: answer.is_correct,
            points_earned: answer.points_earned,
            question: question.map(QuestionView::from),
            question_id: answer.question_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultResponse {
    pub id: String,
    pub quiz: QuizSummary,
    pub user: UserSummary,
    pub group_id: String,
    pub answers: Vec<EvaluatedAnswerView>,
    pub total_score: i32,
    pub max_score: i32,
    pub percentage_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_taken: Option<i64>,
    pub attempt_number: u32,
    pub is_passed: bool,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    pub rank: usize,
    pub user: UserSummary,
    pub score: i32,
    pub attempts: u32,
    pub last_attempt: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizLeaderboardResponse {
    pub quiz: QuizSummary,
    pub entries: Vec<RankedEntry>,
    pub total_entries: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Row of a read-time aggregation over raw results (group or global board).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateEntry {
    pub rank: usize,
    pub user: UserSummary,
    pub total_score: i64,
    pub total_quizzes: i64,
    pub average_score: f64,
    pub total_passed: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateLeaderboardResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub entries: Vec<AggregateEntry>,
    pub total_entries: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizRankResponse {
    /// None when the user has no entry; never rank 0.
    pub rank: Option<usize>,
    pub score: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_attempt: Option<DateTime<Utc>>,
    pub total_participants: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRankResponse {
    pub rank: Option<usize>,
    pub total_score: i64,
    pub total_quizzes: i64,
    pub average_score: f64,
    pub total_participants: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizStatisticsResponse {
    pub total_attempts: usize,
    pub unique_users: usize,
    pub average_score: f64,
    pub highest_score: f64,
    pub lowest_score: f64,
    pub pass_rate: f64,
    pub average_time_taken: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallPerformance {
    pub percentage: i64,
    pub change_from_last_month: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectScore {
    pub name: String,
    pub score: i64,
    pub max_score: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnalytics {
    pub average_score: i64,
    pub subjects: Vec<SubjectScore>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionContribution {
    pub threads_created: i64,
    pub comments_posted: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Badges {
    pub top_contributor: bool,
    pub quick_learner: bool,
    pub team_player: bool,
    pub streak_master: bool,
    pub quiz_master: bool,
    pub perfect_score: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub user: UserSummary,
    /// 1-based position among all users by summed percentage score.
    pub ranking: usize,
    /// Consecutive calendar days with activity, counting back from today.
    pub streak: i64,
    pub overall_performance: OverallPerformance,
    pub quiz_analytics: QuizAnalytics,
    pub discussion_contribution: DiscussionContribution,
    pub badges: Badges,
    pub groups_joined: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn availability_status_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&AvailabilityStatus::MaxAttempts).unwrap(),
            "\"max-attempts\""
        );
        assert_eq!(
            serde_json::to_string(&AvailabilityStatus::NotStarted).unwrap(),
            "\"not-started\""
        );
    }

    #[test]
    fn question_view_hides_correct_flags() {
        let question = crate::models::domain::question::multiple_choice(
            "quiz-1",
            &["A", "B"],
            0,
            1,
        );
        let view = QuestionView::from(&question);
        let json = serde_json::to_string(&view).unwrap();

        assert!(json.contains("\"options\":[\"A\",\"B\"]"));
        assert!(!json.contains("isCorrect"));
    }

    #[test]
    fn quiz_rank_response_null_rank_serializes() {
        let response = QuizRankResponse {
            rank: None,
            score: 0,
            attempts: None,
            last_attempt: None,
            total_participants: 3,
            message: Some("You haven't taken this quiz yet".to_string()),
        };
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("\"rank\":null"));
        assert!(!json.contains("attempts"));
    }
}
