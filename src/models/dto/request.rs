use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::models::domain::question::{Difficulty, QuestionType};
use crate::models::domain::result::SelectedAnswer;

// Wire format is camelCase for compatibility with the existing web client.

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(length(max = 100))]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub email_or_username: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    #[serde(default)]
    pub is_private: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizRequest {
    pub group_id: String,

    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[serde(default)]
    pub question_ids: Vec<String>,

    pub difficulty: Option<Difficulty>,
    pub time_limit: Option<i64>,
    pub max_attempts: Option<u32>,
    pub passing_score: Option<f64>,
    pub scheduled_start_time: Option<DateTime<Utc>>,
    pub scheduled_end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOptionInput {
    #[validate(length(min = 1, max = 500))]
    pub text: String,

    #[serde(default)]
    pub is_correct: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    pub quiz_id: String,

    #[validate(length(min = 1, max = 2000))]
    pub question_text: String,

    pub question_type: QuestionType,

    #[serde(default)]
    #[validate(nested)]
    pub options: Vec<QuestionOptionInput>,

    pub correct_answer: Option<String>,

    #[validate(range(min = 1))]
    pub points: Option<i32>,

    pub difficulty: Option<Difficulty>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerInput {
    pub question_id: String,
    pub selected_option: SelectedAnswer,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResultRequest {
    pub quiz_id: String,
    pub answers: Vec<SubmitAnswerInput>,
    pub time_taken: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LeaderboardQuery {
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<i64>,
}

impl LeaderboardQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(50)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateThreadRequest {
    pub group_id: String,

    #[validate(length(min = 1, max = 300))]
    pub title: String,

    #[validate(length(max = 10000))]
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 10000))]
    pub content: String,
}
