use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::question::Difficulty;

pub const DEFAULT_PASSING_SCORE: f64 = 60.0;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub group_id: String,
    pub title: String,
    pub description: Option<String>,
    /// Ordered question references; authoritative order for the quiz.
    pub question_ids: Vec<String>,
    pub difficulty: Difficulty,
    pub time_limit: Option<i64>,
    pub is_scheduled: bool,
    pub scheduled_start_time: Option<DateTime<Utc>>,
    pub scheduled_end_time: Option<DateTime<Utc>>,
    /// None means unlimited attempts.
    pub max_attempts: Option<u32>,
    pub shuffle_questions: bool,
    pub shuffle_options: bool,
    pub passing_score: f64,
    pub is_published: bool,
    pub is_active: bool,
    pub total_attempts: u64,
    pub average_score: f64,
    pub created_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Where "now" falls relative to a quiz's schedule window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScheduleState {
    /// Quiz has no schedule window.
    Unscheduled,
    NotStarted { starts_in_seconds: i64 },
    Open { ends_in_seconds: i64 },
    Ended,
}

impl Quiz {
    pub fn new(group_id: &str, title: &str, created_by: &str) -> Self {
        Quiz {
            id: Uuid::new_v4().to_string(),
            group_id: group_id.to_string(),
            title: title.to_string(),
            description: None,
            question_ids: Vec::new(),
            difficulty: Difficulty::Medium,
            time_limit: None,
            is_scheduled: false,
            scheduled_start_time: None,
            scheduled_end_time: None,
            max_attempts: None,
            shuffle_questions: false,
            shuffle_options: false,
            passing_score: DEFAULT_PASSING_SCORE,
            is_published: true,
            is_active: true,
            total_attempts: 0,
            average_score: 0.0,
            created_by: created_by.to_string(),
            created_at: Some(Utc::now()),
        }
    }

    /// Classify `now` against the schedule window. The end bound is inclusive:
    /// a submission landing exactly at `scheduled_end_time` is accepted.
    pub fn schedule_state(&self, now: DateTime<Utc>) -> ScheduleState {
        if !self.is_scheduled {
            return ScheduleState::Unscheduled;
        }
        let (Some(start), Some(end)) = (self.scheduled_start_time, self.scheduled_end_time) else {
            return ScheduleState::Unscheduled;
        };

        if now < start {
            ScheduleState::NotStarted {
                starts_in_seconds: (start - now).num_seconds(),
            }
        } else if now > end {
            ScheduleState::Ended
        } else {
            ScheduleState::Open {
                ends_in_seconds: (end - now).num_seconds(),
            }
        }
    }

    pub fn attempts_remaining(&self, attempts_used: u64) -> Option<u64> {
        self.max_attempts
            .map(|max| u64::from(max).saturating_sub(attempts_used))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn scheduled_quiz(start: DateTime<Utc>, end: DateTime<Utc>) -> Quiz {
        let mut quiz = Quiz::new("group-1", "Scheduled", "user-1");
        quiz.is_scheduled = true;
        quiz.scheduled_start_time = Some(start);
        quiz.scheduled_end_time = Some(end);
        quiz
    }

    #[test]
    fn unscheduled_quiz_has_no_window() {
        let quiz = Quiz::new("group-1", "Open quiz", "user-1");
        assert_eq!(quiz.schedule_state(Utc::now()), ScheduleState::Unscheduled);
    }

    #[test]
    fn schedule_state_before_start() {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        let end = start + Duration::hours(1);
        let quiz = scheduled_quiz(start, end);

        let state = quiz.schedule_state(start - Duration::seconds(90));
        assert_eq!(
            state,
            ScheduleState::NotStarted {
                starts_in_seconds: 90
            }
        );
    }

    #[test]
    fn schedule_state_end_is_inclusive() {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        let end = start + Duration::hours(1);
        let quiz = scheduled_quiz(start, end);

        assert_eq!(
            quiz.schedule_state(end),
            ScheduleState::Open { ends_in_seconds: 0 }
        );
        assert_eq!(
            quiz.schedule_state(end + Duration::seconds(1)),
            ScheduleState::Ended
        );
    }

    #[test]
    fn schedule_state_start_is_inclusive() {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        let end = start + Duration::hours(1);
        let quiz = scheduled_quiz(start, end);

        assert_eq!(
            quiz.schedule_state(start),
            ScheduleState::Open {
                ends_in_seconds: 3600
            }
        );
    }

    #[test]
    fn attempts_remaining_saturates_at_zero() {
        let mut quiz = Quiz::new("group-1", "Limited", "user-1");
        quiz.max_attempts = Some(2);

        assert_eq!(quiz.attempts_remaining(0), Some(2));
        assert_eq!(quiz.attempts_remaining(2), Some(0));
        assert_eq!(quiz.attempts_remaining(5), Some(0));

        quiz.max_attempts = None;
        assert_eq!(quiz.attempts_remaining(3), None);
    }
}
