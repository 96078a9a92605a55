use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    clock::Clock,
    errors::{AppError, AppResult},
    models::domain::quiz::ScheduleState,
    models::domain::{LeaderboardEntry, Question, Quiz, QuizResult},
    models::dto::request::SubmitResultRequest,
    models::dto::response::{
        EvaluatedAnswerView, QuizStatisticsResponse, QuizSummary, ResultResponse, UserSummary,
    },
    repositories::{
        GroupRepository, LeaderboardRepository, QuestionRepository, QuizRepository,
        ResultRepository, UserRepository,
    },
    services::scorer::Scorer,
};

/// How many times a submission re-reads the attempt count after losing the
/// unique-index race on (quiz, user, attempt_number).
const ATTEMPT_RESERVATION_RETRIES: u32 = 3;

pub struct ResultService {
    results: Arc<dyn ResultRepository>,
    quizzes: Arc<dyn QuizRepository>,
    groups: Arc<dyn GroupRepository>,
    questions: Arc<dyn QuestionRepository>,
    users: Arc<dyn UserRepository>,
    leaderboards: Arc<dyn LeaderboardRepository>,
    clock: Arc<dyn Clock>,
}

impl ResultService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        results: Arc<dyn ResultRepository>,
        quizzes: Arc<dyn QuizRepository>,
        groups: Arc<dyn GroupRepository>,
        questions: Arc<dyn QuestionRepository>,
        users: Arc<dyn UserRepository>,
        leaderboards: Arc<dyn LeaderboardRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            results,
            quizzes,
            groups,
            questions,
            users,
            leaderboards,
            clock,
        }
    }

    /// The submission pipeline: gate, score, reserve an attempt number, then
    /// run the best-effort follow-ups (quiz statistics, leaderboard).
    pub async fn submit(
        &self,
        user_id: &str,
        request: SubmitResultRequest,
    ) -> AppResult<ResultResponse> {
        let quiz = self
            .quizzes
            .find_by_id(&request.quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

        // Quiz-state gates come before the membership gate, so a non-member
        // hitting a retired quiz sees the same rejection a member would.
        if !quiz.is_active {
            return Err(AppError::Forbidden(
                "This quiz is no longer active".to_string(),
            ));
        }
        if !quiz.is_published {
            return Err(AppError::Forbidden(
                "This quiz is not yet published".to_string(),
            ));
        }

        let group = self
            .groups
            .find_by_id(&quiz.group_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Group not found".to_string()))?;
        if !group.is_member(user_id) {
            return Err(AppError::Forbidden(
                "Must be a group member to take quiz".to_string(),
            ));
        }

        match quiz.schedule_state(self.clock.now()) {
            ScheduleState::NotStarted { .. } => {
                let opens = quiz
                    .scheduled_start_time
                    .map(|t| format!(" (opens {})", t.to_rfc3339()))
                    .unwrap_or_default();
                return Err(AppError::Forbidden(format!(
                    "Quiz has not started yet{opens}"
                )));
            }
            ScheduleState::Ended => {
                let closed = quiz
                    .scheduled_end_time
                    .map(|t| format!(" (closed {})", t.to_rfc3339()))
                    .unwrap_or_default();
                return Err(AppError::Forbidden(format!(
                    "Quiz submission period has ended{closed}"
                )));
            }
            ScheduleState::Unscheduled | ScheduleState::Open { .. } => {}
        }

        let questions = self.questions.find_by_ids(&quiz.question_ids).await?;
        let evaluation = Scorer::evaluate(&questions, &request.answers);

        let result = self
            .reserve_and_store(user_id, &quiz, &request, evaluation)
            .await?;

        // Follow-ups are best-effort: the result is already durable, so a
        // failed statistics refresh or leaderboard update must not turn an
        // accepted submission into an error.
        if let Err(e) = self.refresh_quiz_statistics(&quiz.id).await {
            log::warn!("Failed to refresh statistics for quiz {}: {}", quiz.id, e);
        }
        let entry = LeaderboardEntry {
            user_id: result.user_id.clone(),
            score: result.total_score,
            attempts: result.attempt_number,
            last_attempt: result.completed_at,
        };
        if let Err(e) = self
            .leaderboards
            .upsert_entry(&quiz.id, &quiz.group_id, entry)
            .await
        {
            log::warn!("Failed to update leaderboard for quiz {}: {}", quiz.id, e);
        }

        let question_map: HashMap<&str, &Question> =
            questions.iter().map(|q| (q.id.as_str(), q)).collect();
        self.populate(&result, Some(&quiz), Some(&question_map)).await
    }

    /// Reserve the next attempt number through the unique index. Losing the
    /// race surfaces as `AlreadyExists` from the insert; re-read the count and
    /// try again, re-checking the ceiling each pass.
    async fn reserve_and_store(
        &self,
        user_id: &str,
        quiz: &Quiz,
        request: &SubmitResultRequest,
        evaluation: crate::services::scorer::Evaluation,
    ) -> AppResult<QuizResult> {
        for _ in 0..ATTEMPT_RESERVATION_RETRIES {
            let attempts_used = self.results.count_attempts(&quiz.id, user_id).await?;
            if matches!(quiz.attempts_remaining(attempts_used), Some(0)) {
                let max = quiz.max_attempts.unwrap_or_default();
                return Err(AppError::Forbidden(format!(
                    "Maximum attempts ({}) reached",
                    max
                )));
            }

            let attempt_number = u32::try_from(attempts_used)
                .map_err(|_| AppError::InternalError("Attempt count overflow".to_string()))?
                + 1;
            let result = QuizResult::new(
                &quiz.id,
                user_id,
                &quiz.group_id,
                evaluation.answers.clone(),
                evaluation.total_score,
                evaluation.max_score,
                quiz.passing_score,
                request.time_taken,
                attempt_number,
                self.clock.now(),
            );

            match self.results.create(result).await {
                Ok(stored) => return Ok(stored),
                Err(AppError::AlreadyExists(_)) => continue,
                Err(e) => return Err(e),
            }
        }

        Err(AppError::AlreadyExists(
            "Could not reserve an attempt number, please retry".to_string(),
        ))
    }

    async fn refresh_quiz_statistics(&self, quiz_id: &str) -> AppResult<()> {
        let all = self.results.find_by_quiz(quiz_id).await?;
        let total_attempts = all.len() as u64;
        let average_score = if all.is_empty() {
            0.0
        } else {
            all.iter().map(|r| r.percentage_score).sum::<f64>() / all.len() as f64
        };
        self.quizzes
            .update_statistics(quiz_id, total_attempts, average_score)
            .await
    }

    pub async fn result_by_id(&self, user_id: &str, result_id: &str) -> AppResult<ResultResponse> {
        let result = self
            .results
            .find_by_id(result_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Result not found".to_string()))?;

        if result.user_id != user_id {
            let group = self
                .groups
                .find_by_id(&result.group_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Group not found".to_string()))?;
            if !group.is_admin(user_id) {
                return Err(AppError::Forbidden(
                    "Not authorized to view this result".to_string(),
                ));
            }
        }

        let quiz = self.quizzes.find_by_id(&result.quiz_id).await?;
        let questions = match &quiz {
            Some(q) => self.questions.find_by_ids(&q.question_ids).await?,
            None => Vec::new(),
        };
        let question_map: HashMap<&str, &Question> =
            questions.iter().map(|q| (q.id.as_str(), q)).collect();
        self.populate(&result, quiz.as_ref(), Some(&question_map))
            .await
    }

    /// Group admins see every attempt for the quiz; members see their own.
    pub async fn results_for_quiz(
        &self,
        user_id: &str,
        quiz_id: &str,
    ) -> AppResult<Vec<ResultResponse>> {
        let quiz = self.require_quiz(quiz_id).await?;
        let group = self
            .groups
            .find_by_id(&quiz.group_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Group not found".to_string()))?;

        let results = if group.is_admin(user_id) {
            self.results.find_by_quiz(quiz_id).await?
        } else if group.is_member(user_id) {
            self.results.find_by_quiz_and_user(quiz_id, user_id).await?
        } else {
            return Err(AppError::Forbidden(
                "Must be a group member to view results".to_string(),
            ));
        };

        self.populate_all(results, Some(&quiz)).await
    }

    /// All of the caller's attempts at one quiz, newest attempt first.
    pub async fn user_results_for_quiz(
        &self,
        user_id: &str,
        quiz_id: &str,
    ) -> AppResult<Vec<ResultResponse>> {
        let quiz = self.require_quiz(quiz_id).await?;
        let results = self.results.find_by_quiz_and_user(quiz_id, user_id).await?;
        self.populate_all(results, Some(&quiz)).await
    }

    pub async fn user_results(&self, user_id: &str) -> AppResult<Vec<ResultResponse>> {
        let results = self.results.find_by_user(user_id).await?;
        self.populate_all(results, None).await
    }

    pub async fn quiz_statistics(
        &self,
        user_id: &str,
        quiz_id: &str,
    ) -> AppResult<QuizStatisticsResponse> {
        let quiz = self.require_quiz(quiz_id).await?;
        let group = self
            .groups
            .find_by_id(&quiz.group_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Group not found".to_string()))?;
        if !group.is_admin(user_id) {
            return Err(AppError::Forbidden(
                "Only admins can view quiz statistics".to_string(),
            ));
        }

        let results = self.results.find_by_quiz(quiz_id).await?;
        Ok(compute_statistics(&results))
    }

    pub async fn delete_result(&self, user_id: &str, result_id: &str) -> AppResult<()> {
        let result = self
            .results
            .find_by_id(result_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Result not found".to_string()))?;

        let group = self
            .groups
            .find_by_id(&result.group_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Group not found".to_string()))?;
        if !group.is_admin(user_id) {
            return Err(AppError::Forbidden(
                "Only admins can delete results".to_string(),
            ));
        }

        self.results.delete(result_id).await?;

        if let Err(e) = self.refresh_quiz_statistics(&result.quiz_id).await {
            log::warn!(
                "Failed to refresh statistics for quiz {} after delete: {}",
                result.quiz_id,
                e
            );
        }
        Ok(())
    }

    async fn require_quiz(&self, quiz_id: &str) -> AppResult<Quiz> {
        self.quizzes
            .find_by_id(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))
    }

    async fn populate_all(
        &self,
        results: Vec<QuizResult>,
        quiz: Option<&Quiz>,
    ) -> AppResult<Vec<ResultResponse>> {
        let mut responses = Vec::with_capacity(results.len());
        for result in &results {
            responses.push(self.populate(result, quiz, None).await?);
        }
        Ok(responses)
    }

    /// Attach user and quiz summaries; question detail only where the caller
    /// supplied a map (the single-result paths). A vanished user still keeps
    /// their row so ranks and attempt lists stay intact.
    async fn populate(
        &self,
        result: &QuizResult,
        quiz: Option<&Quiz>,
        question_map: Option<&HashMap<&str, &Question>>,
    ) -> AppResult<ResultResponse> {
        let user = self
            .users
            .find_by_id(&result.user_id)
            .await?
            .map(|u| UserSummary::from(&u))
            .unwrap_or_else(|| placeholder_user(&result.user_id));

        let quiz_summary = match quiz {
            Some(q) if q.id == result.quiz_id => QuizSummary::from(q),
            _ => match self.quizzes.find_by_id(&result.quiz_id).await? {
                Some(q) => QuizSummary::from(&q),
                None => QuizSummary {
                    id: result.quiz_id.clone(),
                    title: "Deleted quiz".to_string(),
                    description: None,
                },
            },
        };

        let answers = result
            .answers
            .iter()
            .map(|a| {
                let question =
                    question_map.and_then(|m| m.get(a.question_id.as_str()).copied());
                EvaluatedAnswerView::populate(a, question)
            })
            .collect();

        Ok(ResultResponse {
            id: result.id.clone(),
            quiz: quiz_summary,
            user,
            group_id: result.group_id.clone(),
            answers,
            total_score: result.total_score,
            max_score: result.max_score,
            percentage_score: result.percentage_score,
            time_taken: result.time_taken,
            attempt_number: result.attempt_number,
            is_passed: result.is_passed,
            completed_at: result.completed_at,
        })
    }
}

pub(crate) fn placeholder_user(user_id: &str) -> UserSummary {
    UserSummary {
        id: user_id.to_string(),
        username: "unknown".to_string(),
        display_name: "Unknown user".to_string(),
    }
}

fn compute_statistics(results: &[QuizResult]) -> QuizStatisticsResponse {
    if results.is_empty() {
        return QuizStatisticsResponse {
            total_attempts: 0,
            unique_users: 0,
            average_score: 0.0,
            highest_score: 0.0,
            lowest_score: 0.0,
            pass_rate: 0.0,
            average_time_taken: 0.0,
        };
    }

    let unique_users = results
        .iter()
        .map(|r| r.user_id.as_str())
        .collect::<std::collections::HashSet<_>>()
        .len();
    let average_score =
        results.iter().map(|r| r.percentage_score).sum::<f64>() / results.len() as f64;
    let highest_score = results
        .iter()
        .map(|r| r.percentage_score)
        .fold(0.0_f64, f64::max);
    let lowest_score = results
        .iter()
        .map(|r| r.percentage_score)
        .fold(100.0_f64, f64::min);
    let passed = results.iter().filter(|r| r.is_passed).count();
    let pass_rate = passed as f64 / results.len() as f64 * 100.0;
    let timed: Vec<i64> = results.iter().filter_map(|r| r.time_taken).collect();
    let average_time_taken = if timed.is_empty() {
        0.0
    } else {
        timed.iter().sum::<i64>() as f64 / timed.len() as f64
    };

    QuizStatisticsResponse {
        total_attempts: results.len(),
        unique_users,
        average_score,
        highest_score,
        lowest_score,
        pass_rate,
        average_time_taken,
    }
}
