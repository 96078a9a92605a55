use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::{
    clock::Clock,
    config::BadgePolicy,
    errors::{AppError, AppResult},
    models::domain::question::Difficulty,
    models::domain::QuizResult,
    models::dto::response::{
        Badges, DashboardResponse, DiscussionContribution, OverallPerformance, QuizAnalytics,
        SubjectScore, UserSummary,
    },
    repositories::{
        GroupRepository, PostRepository, QuizRepository, ResultRepository, ThreadRepository,
        UserRepository,
    },
};

/// How many recent threads/posts feed the streak calculation.
const ACTIVITY_SAMPLE: i64 = 100;

pub struct DashboardService {
    users: Arc<dyn UserRepository>,
    results: Arc<dyn ResultRepository>,
    quizzes: Arc<dyn QuizRepository>,
    groups: Arc<dyn GroupRepository>,
    threads: Arc<dyn ThreadRepository>,
    posts: Arc<dyn PostRepository>,
    clock: Arc<dyn Clock>,
    badge_policy: BadgePolicy,
}

impl DashboardService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: Arc<dyn UserRepository>,
        results: Arc<dyn ResultRepository>,
        quizzes: Arc<dyn QuizRepository>,
        groups: Arc<dyn GroupRepository>,
        threads: Arc<dyn ThreadRepository>,
        posts: Arc<dyn PostRepository>,
        clock: Arc<dyn Clock>,
        badge_policy: BadgePolicy,
    ) -> Self {
        Self {
            users,
            results,
            quizzes,
            groups,
            threads,
            posts,
            clock,
            badge_policy,
        }
    }

    pub async fn user_dashboard(&self, user_id: &str) -> AppResult<DashboardResponse> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let now = self.clock.now();
        let results = self.results.find_by_user(user_id).await?;
        let groups = self.groups.find_by_member(user_id).await?;
        let threads_created = self.threads.count_by_author(user_id).await?;
        let comments_posted = self.posts.count_by_author(user_id).await?;

        let ranking = self.global_ranking(user_id).await?;

        let mut activity: Vec<DateTime<Utc>> =
            results.iter().map(|r| r.completed_at).collect();
        activity.extend(
            self.threads
                .recent_activity_dates(user_id, ACTIVITY_SAMPLE)
                .await?,
        );
        activity.extend(
            self.posts
                .recent_activity_dates(user_id, ACTIVITY_SAMPLE)
                .await?,
        );
        let streak = compute_streak(&activity, now.date_naive());

        let average = average_percentage(&results);
        let overall_performance = OverallPerformance {
            percentage: average.round() as i64,
            change_from_last_month: monthly_change(&results, now),
        };

        let quiz_analytics = QuizAnalytics {
            average_score: average.round() as i64,
            subjects: self.subject_breakdown(&results).await?,
        };

        let badges = Badges {
            top_contributor: comments_posted as i64 > self.badge_policy.top_contributor_comments,
            quick_learner: !results.is_empty() && average > self.badge_policy.quick_learner_average,
            team_player: groups.len() >= self.badge_policy.team_player_groups,
            streak_master: streak >= self.badge_policy.streak_master_days,
            quiz_master: results.len() >= self.badge_policy.quiz_master_results,
            perfect_score: results.iter().any(|r| r.percentage_score >= 100.0),
        };

        Ok(DashboardResponse {
            user: UserSummary::from(&user),
            ranking,
            streak,
            overall_performance,
            quiz_analytics,
            discussion_contribution: DiscussionContribution {
                threads_created: threads_created as i64,
                comments_posted: comments_posted as i64,
            },
            badges,
            groups_joined: groups.len(),
        })
    }

    /// 1-based position among all users ordered by summed percentage score.
    /// A user with no results ranks after everyone who has any.
    async fn global_ranking(&self, user_id: &str) -> AppResult<usize> {
        let mut totals = self.results.aggregate_user_totals(None, None).await?;
        totals.sort_by(|a, b| {
            b.percentage_total
                .partial_cmp(&a.percentage_total)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(totals
            .iter()
            .position(|t| t.user_id == user_id)
            .map(|p| p + 1)
            .unwrap_or(totals.len() + 1))
    }

    /// Points earned vs points possible, bucketed by quiz difficulty.
    async fn subject_breakdown(&self, results: &[QuizResult]) -> AppResult<Vec<SubjectScore>> {
        let mut quiz_ids: Vec<String> = results.iter().map(|r| r.quiz_id.clone()).collect();
        quiz_ids.sort();
        quiz_ids.dedup();

        let quizzes = self.quizzes.find_by_ids(&quiz_ids).await?;
        let difficulty_of: HashMap<&str, Difficulty> = quizzes
            .iter()
            .map(|q| (q.id.as_str(), q.difficulty))
            .collect();

        let mut buckets: HashMap<Difficulty, (i64, i64)> = HashMap::new();
        for result in results {
            let difficulty = difficulty_of
                .get(result.quiz_id.as_str())
                .copied()
                .unwrap_or_default();
            let bucket = buckets.entry(difficulty).or_insert((0, 0));
            bucket.0 += i64::from(result.total_score);
            bucket.1 += i64::from(result.max_score);
        }

        let subjects = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
            .into_iter()
            .filter_map(|difficulty| {
                buckets.get(&difficulty).map(|(score, max)| SubjectScore {
                    name: difficulty.label().to_string(),
                    score: *score,
                    max_score: *max,
                })
            })
            .collect();
        Ok(subjects)
    }
}

fn average_percentage(results: &[QuizResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    results.iter().map(|r| r.percentage_score).sum::<f64>() / results.len() as f64
}

/// Average of the last 30 days minus the average of everything before.
fn monthly_change(results: &[QuizResult], now: DateTime<Utc>) -> i64 {
    let cutoff = now - Duration::days(30);
    let (recent, older): (Vec<_>, Vec<_>) =
        results.iter().partition(|r| r.completed_at >= cutoff);

    if recent.is_empty() || older.is_empty() {
        return 0;
    }

    let recent_avg =
        recent.iter().map(|r| r.percentage_score).sum::<f64>() / recent.len() as f64;
    let older_avg = older.iter().map(|r| r.percentage_score).sum::<f64>() / older.len() as f64;
    (recent_avg - older_avg).round() as i64
}

/// Consecutive unique calendar days of activity, counting back from today.
/// A streak may start yesterday; any older gap ends it.
fn compute_streak(activity: &[DateTime<Utc>], today: NaiveDate) -> i64 {
    let mut days: Vec<NaiveDate> = activity.iter().map(|d| d.date_naive()).collect();
    days.sort_unstable_by(|a, b| b.cmp(a));
    days.dedup();

    let mut streak = 0;
    let mut expected = today;
    for day in days {
        if day == expected || day == expected - Duration::days(1) {
            streak += 1;
            expected = day - Duration::days(1);
        } else {
            break;
        }
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::clock::FixedClock;
    use crate::models::domain::{Group, Quiz, User};
    use crate::repositories::group_repository::MockGroupRepository;
    use crate::repositories::post_repository::MockPostRepository;
    use crate::repositories::quiz_repository::MockQuizRepository;
    use crate::repositories::result_repository::{MockResultRepository, UserScoreTotals};
    use crate::repositories::thread_repository::MockThreadRepository;
    use crate::repositories::user_repository::MockUserRepository;

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn streak_counts_consecutive_days() {
        let today = day(2024, 6, 10).date_naive();
        let activity = vec![day(2024, 6, 10), day(2024, 6, 9), day(2024, 6, 8)];
        assert_eq!(compute_streak(&activity, today), 3);
    }

    #[test]
    fn streak_may_start_yesterday() {
        let today = day(2024, 6, 10).date_naive();
        let activity = vec![day(2024, 6, 9), day(2024, 6, 8)];
        assert_eq!(compute_streak(&activity, today), 2);
    }

    #[test]
    fn streak_breaks_on_gap() {
        let today = day(2024, 6, 10).date_naive();
        let activity = vec![day(2024, 6, 10), day(2024, 6, 7)];
        assert_eq!(compute_streak(&activity, today), 1);
    }

    #[test]
    fn streak_ignores_duplicate_days() {
        let today = day(2024, 6, 10).date_naive();
        let activity = vec![
            day(2024, 6, 10),
            day(2024, 6, 10),
            day(2024, 6, 9),
        ];
        assert_eq!(compute_streak(&activity, today), 2);
    }

    #[test]
    fn streak_is_zero_without_recent_activity() {
        let today = day(2024, 6, 10).date_naive();
        let activity = vec![day(2024, 6, 1)];
        assert_eq!(compute_streak(&activity, today), 0);
        assert_eq!(compute_streak(&[], today), 0);
    }

    #[test]
    fn monthly_change_compares_recent_to_older() {
        let now = day(2024, 6, 30);
        let results = vec![
            QuizResult::new("q1", "u1", "g1", vec![], 9, 10, 60.0, None, 1, day(2024, 6, 20)),
            QuizResult::new("q2", "u1", "g1", vec![], 5, 10, 60.0, None, 1, day(2024, 4, 1)),
        ];
        // 90% recent vs 50% older.
        assert_eq!(monthly_change(&results, now), 40);
    }

    #[test]
    fn monthly_change_needs_both_windows() {
        let now = day(2024, 6, 30);
        let recent_only = vec![QuizResult::new(
            "q1", "u1", "g1", vec![], 9, 10, 60.0, None, 1, day(2024, 6, 20),
        )];
        assert_eq!(monthly_change(&recent_only, now), 0);
        assert_eq!(monthly_change(&[], now), 0);
    }

    #[actix_rt::test]
    async fn dashboard_aggregates_badges_and_rank() {
        let user = User::test_user("alice");
        let user_id = user.id.clone();
        let now = day(2024, 6, 10);

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));

        let uid = user_id.clone();
        let mut results = MockResultRepository::new();
        results.expect_find_by_user().returning(move |_| {
            Ok(vec![
                QuizResult::new("q1", &uid, "g1", vec![], 10, 10, 60.0, None, 1, day(2024, 6, 10)),
                QuizResult::new("q1", &uid, "g1", vec![], 8, 10, 60.0, None, 2, day(2024, 6, 9)),
            ])
        });
        let uid = user_id.clone();
        results.expect_aggregate_user_totals().returning(move |_, _| {
            Ok(vec![
                UserScoreTotals {
                    user_id: "other".to_string(),
                    total_score: 100,
                    total_quizzes: 5,
                    average_score: 70.0,
                    percentage_total: 350.0,
                    total_passed: 4,
                },
                UserScoreTotals {
                    user_id: uid.clone(),
                    total_score: 18,
                    total_quizzes: 2,
                    average_score: 90.0,
                    percentage_total: 180.0,
                    total_passed: 2,
                },
            ])
        });

        let mut quizzes = MockQuizRepository::new();
        quizzes.expect_find_by_ids().returning(|_| {
            let mut quiz = Quiz::new("g1", "Medium quiz", "creator");
            quiz.id = "q1".to_string();
            Ok(vec![quiz])
        });

        let uid = user_id.clone();
        let mut groups = MockGroupRepository::new();
        groups
            .expect_find_by_member()
            .returning(move |_| Ok(vec![Group::new("Rustaceans", None, false, &uid)]));

        let mut threads = MockThreadRepository::new();
        threads.expect_count_by_author().returning(|_| Ok(2));
        threads
            .expect_recent_activity_dates()
            .returning(|_, _| Ok(vec![]));

        let mut posts = MockPostRepository::new();
        posts.expect_count_by_author().returning(|_| Ok(5));
        posts
            .expect_recent_activity_dates()
            .returning(|_, _| Ok(vec![]));

        let service = DashboardService::new(
            Arc::new(users),
            Arc::new(results),
            Arc::new(quizzes),
            Arc::new(groups),
            Arc::new(threads),
            Arc::new(posts),
            Arc::new(FixedClock(now)),
            BadgePolicy::default(),
        );

        let dashboard = service.user_dashboard(&user_id).await.unwrap();

        assert_eq!(dashboard.ranking, 2);
        assert_eq!(dashboard.streak, 2);
        assert_eq!(dashboard.overall_performance.percentage, 90);
        assert_eq!(dashboard.quiz_analytics.subjects.len(), 1);
        assert_eq!(dashboard.quiz_analytics.subjects[0].name, "Medium");
        assert_eq!(dashboard.quiz_analytics.subjects[0].score, 18);
        assert_eq!(dashboard.quiz_analytics.subjects[0].max_score, 20);
        assert!(dashboard.badges.quick_learner);
        assert!(dashboard.badges.perfect_score);
        assert!(!dashboard.badges.quiz_master);
        assert!(!dashboard.badges.team_player);
        assert_eq!(dashboard.discussion_contribution.comments_posted, 5);
        assert_eq!(dashboard.groups_joined, 1);
    }
}
