use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{Group, Quiz},
    models::dto::response::{
        AggregateEntry, AggregateLeaderboardResponse, GroupRankResponse, QuizLeaderboardResponse,
        QuizRankResponse, QuizSummary, RankedEntry, UserSummary,
    },
    repositories::{
        result_repository::UserScoreTotals, GroupRepository, LeaderboardRepository,
        QuizRepository, ResultRepository, UserRepository,
    },
    services::result_service::placeholder_user,
};

pub const GLOBAL_LEADERBOARD_LIMIT: i64 = 100;

pub struct LeaderboardService {
    leaderboards: Arc<dyn LeaderboardRepository>,
    results: Arc<dyn ResultRepository>,
    quizzes: Arc<dyn QuizRepository>,
    groups: Arc<dyn GroupRepository>,
    users: Arc<dyn UserRepository>,
}

impl LeaderboardService {
    pub fn new(
        leaderboards: Arc<dyn LeaderboardRepository>,
        results: Arc<dyn ResultRepository>,
        quizzes: Arc<dyn QuizRepository>,
        groups: Arc<dyn GroupRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            leaderboards,
            results,
            quizzes,
            groups,
            users,
        }
    }

    /// Materialized per-quiz board, best-score-per-user, already sorted by the
    /// write path. A quiz with no submissions yet gets an empty board and an
    /// explanatory message rather than a 404.
    pub async fn quiz_leaderboard(
        &self,
        user_id: &str,
        quiz_id: &str,
        limit: i64,
    ) -> AppResult<QuizLeaderboardResponse> {
        let quiz = self.require_quiz(quiz_id).await?;
        self.require_visible(&quiz, user_id).await?;

        let board = self.leaderboards.find_by_quiz(quiz_id).await?;
        let entries = board.map(|b| b.entries).unwrap_or_default();
        let total_entries = entries.len();

        if entries.is_empty() {
            return Ok(QuizLeaderboardResponse {
                quiz: QuizSummary::from(&quiz),
                entries: Vec::new(),
                total_entries: 0,
                message: Some("No leaderboard data available yet".to_string()),
            });
        }

        let limited: Vec<_> = entries.into_iter().take(limit.max(0) as usize).collect();
        let user_map = self
            .summaries_for(limited.iter().map(|e| e.user_id.clone()).collect())
            .await?;

        let ranked = limited
            .into_iter()
            .enumerate()
            .map(|(i, entry)| RankedEntry {
                rank: i + 1,
                user: user_map
                    .get(&entry.user_id)
                    .cloned()
                    .unwrap_or_else(|| placeholder_user(&entry.user_id)),
                score: entry.score,
                attempts: entry.attempts,
                last_attempt: entry.last_attempt,
            })
            .collect();

        Ok(QuizLeaderboardResponse {
            quiz: QuizSummary::from(&quiz),
            entries: ranked,
            total_entries,
            message: None,
        })
    }

    pub async fn user_rank_for_quiz(
        &self,
        user_id: &str,
        quiz_id: &str,
    ) -> AppResult<QuizRankResponse> {
        let quiz = self.require_quiz(quiz_id).await?;
        self.require_visible(&quiz, user_id).await?;

        let board = self.leaderboards.find_by_quiz(quiz_id).await?;
        let entries = board.map(|b| b.entries).unwrap_or_default();
        let total_participants = entries.len();

        match entries.iter().position(|e| e.user_id == user_id) {
            Some(position) => {
                let entry = &entries[position];
                Ok(QuizRankResponse {
                    rank: Some(position + 1),
                    score: entry.score,
                    attempts: Some(entry.attempts),
                    last_attempt: Some(entry.last_attempt),
                    total_participants,
                    message: None,
                })
            }
            None => Ok(QuizRankResponse {
                rank: None,
                score: 0,
                attempts: None,
                last_attempt: None,
                total_participants,
                message: Some("You haven't taken this quiz yet".to_string()),
            }),
        }
    }

    /// Read-time aggregation over raw results, summed per user across all of
    /// the group's quizzes.
    pub async fn group_leaderboard(
        &self,
        user_id: &str,
        group_id: &str,
        limit: i64,
    ) -> AppResult<AggregateLeaderboardResponse> {
        let group = self.require_group(group_id).await?;
        if group.is_private && !group.is_member(user_id) {
            return Err(AppError::Forbidden(
                "Must be a member to view the leaderboard".to_string(),
            ));
        }

        let totals = self
            .results
            .aggregate_user_totals(Some(group_id.to_string()), Some(limit))
            .await?;
        let entries = self.rank_totals(totals).await?;
        let total_entries = entries.len();

        Ok(AggregateLeaderboardResponse {
            group: Some(group.name),
            entries,
            total_entries,
        })
    }

    pub async fn global_leaderboard(&self, limit: i64) -> AppResult<AggregateLeaderboardResponse> {
        let totals = self
            .results
            .aggregate_user_totals(None, Some(limit))
            .await?;
        let entries = self.rank_totals(totals).await?;
        let total_entries = entries.len();

        Ok(AggregateLeaderboardResponse {
            group: None,
            entries,
            total_entries,
        })
    }

    pub async fn user_rank_in_group(
        &self,
        user_id: &str,
        group_id: &str,
    ) -> AppResult<GroupRankResponse> {
        let group = self.require_group(group_id).await?;
        if group.is_private && !group.is_member(user_id) {
            return Err(AppError::Forbidden(
                "Must be a member to view the leaderboard".to_string(),
            ));
        }

        let totals = self
            .results
            .aggregate_user_totals(Some(group_id.to_string()), None)
            .await?;
        let total_participants = totals.len();

        match totals.iter().position(|t| t.user_id == user_id) {
            Some(position) => {
                let row = &totals[position];
                Ok(GroupRankResponse {
                    rank: Some(position + 1),
                    total_score: row.total_score,
                    total_quizzes: row.total_quizzes,
                    average_score: round2(row.average_score),
                    total_participants,
                    message: None,
                })
            }
            None => Ok(GroupRankResponse {
                rank: None,
                total_score: 0,
                total_quizzes: 0,
                average_score: 0.0,
                total_participants,
                message: Some("You haven't taken any quizzes in this group".to_string()),
            }),
        }
    }

    /// Clears the board for a quiz; raw results are untouched, so the group
    /// and global aggregations are unaffected.
    pub async fn reset(&self, user_id: &str, quiz_id: &str) -> AppResult<()> {
        let quiz = self.require_quiz(quiz_id).await?;
        let group = self.require_group(&quiz.group_id).await?;
        if !group.is_admin(user_id) {
            return Err(AppError::Forbidden(
                "Only admins can reset leaderboards".to_string(),
            ));
        }

        self.leaderboards.reset(quiz_id).await
    }

    async fn rank_totals(&self, totals: Vec<UserScoreTotals>) -> AppResult<Vec<AggregateEntry>> {
        let user_map = self
            .summaries_for(totals.iter().map(|t| t.user_id.clone()).collect())
            .await?;

        Ok(totals
            .into_iter()
            .enumerate()
            .map(|(i, row)| AggregateEntry {
                rank: i + 1,
                user: user_map
                    .get(&row.user_id)
                    .cloned()
                    .unwrap_or_else(|| placeholder_user(&row.user_id)),
                total_score: row.total_score,
                total_quizzes: row.total_quizzes,
                average_score: round2(row.average_score),
                total_passed: row.total_passed,
            })
            .collect())
    }

    /// Deleted accounts keep their row via a placeholder so ranks below them
    /// do not shift.
    async fn summaries_for(&self, user_ids: Vec<String>) -> AppResult<HashMap<String, UserSummary>> {
        let mut map = HashMap::with_capacity(user_ids.len());
        for user_id in user_ids {
            if let Some(user) = self.users.find_by_id(&user_id).await? {
                map.insert(user_id, UserSummary::from(&user));
            }
        }
        Ok(map)
    }

    async fn require_quiz(&self, quiz_id: &str) -> AppResult<Quiz> {
        self.quizzes
            .find_by_id(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))
    }

    async fn require_group(&self, group_id: &str) -> AppResult<Group> {
        self.groups
            .find_by_id(group_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Group not found".to_string()))
    }

    async fn require_visible(&self, quiz: &Quiz, user_id: &str) -> AppResult<()> {
        let group = self.require_group(&quiz.group_id).await?;
        if group.is_private && !group.is_member(user_id) {
            return Err(AppError::Forbidden(
                "Must be a member to view the leaderboard".to_string(),
            ));
        }
        Ok(())
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
