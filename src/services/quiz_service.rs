use std::sync::Arc;

use validator::Validate;

use crate::{
    clock::Clock,
    errors::{AppError, AppResult},
    models::domain::quiz::{ScheduleState, DEFAULT_PASSING_SCORE},
    models::domain::Quiz,
    models::dto::request::CreateQuizRequest,
    models::dto::response::{AvailabilityStatus, QuizAvailability},
    repositories::{GroupRepository, QuizRepository, ResultRepository},
};

pub struct QuizService {
    quizzes: Arc<dyn QuizRepository>,
    groups: Arc<dyn GroupRepository>,
    results: Arc<dyn ResultRepository>,
    clock: Arc<dyn Clock>,
}

impl QuizService {
    pub fn new(
        quizzes: Arc<dyn QuizRepository>,
        groups: Arc<dyn GroupRepository>,
        results: Arc<dyn ResultRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            quizzes,
            groups,
            results,
            clock,
        }
    }

    pub async fn create_quiz(&self, user_id: &str, request: CreateQuizRequest) -> AppResult<Quiz> {
        request.validate()?;

        let group = self
            .groups
            .find_by_id(&request.group_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Group not found".to_string()))?;

        if !group.is_member(user_id) {
            return Err(AppError::Forbidden(
                "Must be a group member to create quizzes".to_string(),
            ));
        }

        let is_scheduled =
            request.scheduled_start_time.is_some() && request.scheduled_end_time.is_some();
        if is_scheduled && request.scheduled_start_time >= request.scheduled_end_time {
            return Err(AppError::ValidationError(
                "scheduledEndTime must be after scheduledStartTime".to_string(),
            ));
        }

        let mut quiz = Quiz::new(&request.group_id, &request.title, user_id);
        quiz.description = request.description;
        quiz.question_ids = request.question_ids;
        if let Some(difficulty) = request.difficulty {
            quiz.difficulty = difficulty;
        }
        quiz.time_limit = request.time_limit;
        quiz.max_attempts = request.max_attempts;
        quiz.passing_score = request.passing_score.unwrap_or(DEFAULT_PASSING_SCORE);
        quiz.is_scheduled = is_scheduled;
        quiz.scheduled_start_time = request.scheduled_start_time;
        quiz.scheduled_end_time = request.scheduled_end_time;

        self.quizzes.create(quiz).await
    }

    pub async fn get_quiz(&self, user_id: &str, quiz_id: &str) -> AppResult<Quiz> {
        let quiz = self.require_quiz(quiz_id).await?;
        let group = self
            .groups
            .find_by_id(&quiz.group_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Group not found".to_string()))?;

        if group.is_private && !group.is_member(user_id) {
            return Err(AppError::Forbidden(
                "Must be a member to view this quiz".to_string(),
            ));
        }

        Ok(quiz)
    }

    pub async fn quizzes_for_group(&self, user_id: &str, group_id: &str) -> AppResult<Vec<Quiz>> {
        let group = self
            .groups
            .find_by_id(group_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Group not found".to_string()))?;

        if group.is_private && !group.is_member(user_id) {
            return Err(AppError::Forbidden(
                "Must be a member to view quizzes".to_string(),
            ));
        }

        self.quizzes.find_by_group(group_id).await
    }

    /// Can this user submit right now, and if not, why not. The quiz-state
    /// gates run in the same order submission applies them, so the two never
    /// disagree on which rejection a caller sees first.
    pub async fn availability(&self, user_id: &str, quiz_id: &str) -> AppResult<QuizAvailability> {
        let quiz = self.require_quiz(quiz_id).await?;

        if !quiz.is_active {
            return Ok(unavailable(
                AvailabilityStatus::Inactive,
                "This quiz is no longer active",
            ));
        }
        if !quiz.is_published {
            return Ok(unavailable(
                AvailabilityStatus::Unpublished,
                "This quiz is not yet published",
            ));
        }

        let attempts_used = self.results.count_attempts(quiz_id, user_id).await?;
        let attempts_remaining = quiz.attempts_remaining(attempts_used);

        if matches!(attempts_remaining, Some(0)) {
            let max = quiz.max_attempts.unwrap_or_default();
            return Ok(QuizAvailability {
                is_available: false,
                status: AvailabilityStatus::MaxAttempts,
                message: format!("Maximum attempts ({}) reached", max),
                attempts_used: Some(attempts_used),
                attempts_remaining: Some(0),
                starts_in: None,
                ends_in: None,
            });
        }

        let availability = match quiz.schedule_state(self.clock.now()) {
            ScheduleState::NotStarted { starts_in_seconds } => QuizAvailability {
                is_available: false,
                status: AvailabilityStatus::NotStarted,
                message: "Quiz has not started yet".to_string(),
                attempts_used: Some(attempts_used),
                attempts_remaining,
                starts_in: Some(starts_in_seconds),
                ends_in: None,
            },
            ScheduleState::Ended => QuizAvailability {
                is_available: false,
                status: AvailabilityStatus::Ended,
                message: "Quiz submission period has ended".to_string(),
                attempts_used: Some(attempts_used),
                attempts_remaining,
                starts_in: None,
                ends_in: None,
            },
            ScheduleState::Open { ends_in_seconds } => QuizAvailability {
                is_available: true,
                status: AvailabilityStatus::Active,
                message: "Quiz is open for submissions".to_string(),
                attempts_used: Some(attempts_used),
                attempts_remaining,
                starts_in: None,
                ends_in: Some(ends_in_seconds),
            },
            ScheduleState::Unscheduled => QuizAvailability {
                is_available: true,
                status: AvailabilityStatus::Available,
                message: "Quiz is available".to_string(),
                attempts_used: Some(attempts_used),
                attempts_remaining,
                starts_in: None,
                ends_in: None,
            },
        };

        Ok(availability)
    }

    async fn require_quiz(&self, quiz_id: &str) -> AppResult<Quiz> {
        self.quizzes
            .find_by_id(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))
    }
}

fn unavailable(status: AvailabilityStatus, message: &str) -> QuizAvailability {
    QuizAvailability {
        is_available: false,
        status,
        message: message.to_string(),
        attempts_used: None,
        attempts_remaining: None,
        starts_in: None,
        ends_in: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    use crate::clock::FixedClock;
    use crate::repositories::group_repository::MockGroupRepository;
    use crate::repositories::quiz_repository::MockQuizRepository;
    use crate::repositories::result_repository::MockResultRepository;

    fn service_with(
        quiz: Quiz,
        attempts: u64,
        now: chrono::DateTime<Utc>,
    ) -> QuizService {
        let mut quizzes = MockQuizRepository::new();
        quizzes
            .expect_find_by_id()
            .returning(move |_| Ok(Some(quiz.clone())));

        let mut results = MockResultRepository::new();
        results
            .expect_count_attempts()
            .returning(move |_, _| Ok(attempts));

        QuizService::new(
            Arc::new(quizzes),
            Arc::new(MockGroupRepository::new()),
            Arc::new(results),
            Arc::new(FixedClock(now)),
        )
    }

    #[actix_rt::test]
    async fn inactive_quiz_reports_inactive() {
        let mut quiz = Quiz::new("group-1", "Old quiz", "user-1");
        quiz.is_active = false;

        let service = service_with(quiz, 0, Utc::now());
        let availability = service.availability("user-1", "quiz-1").await.unwrap();

        assert!(!availability.is_available);
        assert_eq!(availability.status, AvailabilityStatus::Inactive);
    }

    #[actix_rt::test]
    async fn attempt_ceiling_wins_over_schedule() {
        let mut quiz = Quiz::new("group-1", "Limited", "user-1");
        quiz.max_attempts = Some(2);

        let service = service_with(quiz, 2, Utc::now());
        let availability = service.availability("user-1", "quiz-1").await.unwrap();

        assert_eq!(availability.status, AvailabilityStatus::MaxAttempts);
        assert_eq!(availability.attempts_used, Some(2));
        assert_eq!(availability.attempts_remaining, Some(0));
    }

    #[actix_rt::test]
    async fn scheduled_quiz_counts_down_to_start() {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        let mut quiz = Quiz::new("group-1", "Scheduled", "user-1");
        quiz.is_scheduled = true;
        quiz.scheduled_start_time = Some(start);
        quiz.scheduled_end_time = Some(start + Duration::hours(1));

        let service = service_with(quiz, 0, start - Duration::seconds(30));
        let availability = service.availability("user-1", "quiz-1").await.unwrap();

        assert_eq!(availability.status, AvailabilityStatus::NotStarted);
        assert_eq!(availability.starts_in, Some(30));

        // Exactly at the end bound the quiz still accepts submissions.
        let start2 = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        let mut quiz = Quiz::new("group-1", "Scheduled", "user-1");
        quiz.is_scheduled = true;
        quiz.scheduled_start_time = Some(start2);
        quiz.scheduled_end_time = Some(start2 + Duration::hours(1));

        let service = service_with(quiz, 0, start2 + Duration::hours(1));
        let availability = service.availability("user-1", "quiz-1").await.unwrap();

        assert_eq!(availability.status, AvailabilityStatus::Active);
        assert!(availability.is_available);
        assert_eq!(availability.ends_in, Some(0));
    }

    #[actix_rt::test]
    async fn unscheduled_published_quiz_is_available() {
        let quiz = Quiz::new("group-1", "Open", "user-1");
        let service = service_with(quiz, 1, Utc::now());

        let availability = service.availability("user-1", "quiz-1").await.unwrap();

        assert!(availability.is_available);
        assert_eq!(availability.status, AvailabilityStatus::Available);
        assert_eq!(availability.attempts_used, Some(1));
        assert_eq!(availability.attempts_remaining, None);
    }
}
