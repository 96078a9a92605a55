use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::domain::question::{Difficulty, QuestionOption, QuestionType},
    models::domain::Question,
    models::dto::request::CreateQuestionRequest,
    models::dto::response::QuestionView,
    repositories::{GroupRepository, QuestionRepository, QuizRepository},
};

/// Full question documents for group admins, sanitized views for everyone
/// else (no correctness flags, no expected answers).
pub enum QuestionListing {
    Full(Vec<Question>),
    Sanitized(Vec<QuestionView>),
}

pub struct QuestionService {
    questions: Arc<dyn QuestionRepository>,
    quizzes: Arc<dyn QuizRepository>,
    groups: Arc<dyn GroupRepository>,
}

impl QuestionService {
    pub fn new(
        questions: Arc<dyn QuestionRepository>,
        quizzes: Arc<dyn QuizRepository>,
        groups: Arc<dyn GroupRepository>,
    ) -> Self {
        Self {
            questions,
            quizzes,
            groups,
        }
    }

    pub async fn create_question(
        &self,
        user_id: &str,
        request: CreateQuestionRequest,
    ) -> AppResult<Question> {
        request.validate()?;
        Self::validate_answer_shape(&request)?;

        let quiz = self
            .quizzes
            .find_by_id(&request.quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

        let group = self
            .groups
            .find_by_id(&quiz.group_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Group not found".to_string()))?;

        if !group.is_member(user_id) {
            return Err(AppError::Forbidden(
                "Must be a group member to add questions".to_string(),
            ));
        }

        let question = Question {
            id: Uuid::new_v4().to_string(),
            quiz_id: request.quiz_id,
            question_text: request.question_text,
            question_type: request.question_type,
            options: request
                .options
                .into_iter()
                .map(|opt| QuestionOption {
                    text: opt.text,
                    is_correct: opt.is_correct,
                })
                .collect(),
            correct_answer: request.correct_answer,
            points: request.points.unwrap_or(1),
            difficulty: request.difficulty.unwrap_or(Difficulty::Medium),
            created_by: user_id.to_string(),
            created_at: Some(Utc::now()),
        };

        self.questions.create(question).await
    }

    pub async fn questions_for_quiz(
        &self,
        user_id: &str,
        quiz_id: &str,
    ) -> AppResult<QuestionListing> {
        let quiz = self
            .quizzes
            .find_by_id(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

        let group = self
            .groups
            .find_by_id(&quiz.group_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Group not found".to_string()))?;

        if !group.is_member(user_id) {
            return Err(AppError::Forbidden(
                "Must be a group member to view questions".to_string(),
            ));
        }

        let questions = self.questions.find_by_quiz(quiz_id).await?;

        if group.is_admin(user_id) {
            Ok(QuestionListing::Full(questions))
        } else {
            Ok(QuestionListing::Sanitized(
                questions.iter().map(QuestionView::from).collect(),
            ))
        }
    }

    /// Scoring behavior is unspecified when several options claim to be
    /// correct, so creation rejects that shape outright.
    fn validate_answer_shape(request: &CreateQuestionRequest) -> AppResult<()> {
        match request.question_type {
            QuestionType::MultipleChoice => {
                if request.options.len() < 2 {
                    return Err(AppError::ValidationError(
                        "Multiple-choice questions need at least two options".to_string(),
                    ));
                }
                let correct_count = request.options.iter().filter(|o| o.is_correct).count();
                if correct_count != 1 {
                    return Err(AppError::ValidationError(format!(
                        "Multiple-choice questions must have exactly one correct option, found {}",
                        correct_count
                    )));
                }
            }
            QuestionType::TrueFalse | QuestionType::ShortAnswer => {
                if request
                    .correct_answer
                    .as_deref()
                    .map(str::trim)
                    .unwrap_or("")
                    .is_empty()
                {
                    return Err(AppError::ValidationError(
                        "correctAnswer is required for this question type".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}
