pub mod dashboard_service;
pub mod discussion_service;
pub mod group_service;
pub mod leaderboard_service;
pub mod question_service;
pub mod quiz_service;
pub mod result_service;
pub mod scorer;
pub mod user_service;

pub use dashboard_service::DashboardService;
pub use discussion_service::DiscussionService;
pub use group_service::GroupService;
pub use leaderboard_service::LeaderboardService;
pub use question_service::{QuestionListing, QuestionService};
pub use quiz_service::QuizService;
pub use result_service::ResultService;
pub use scorer::Scorer;
pub use user_service::UserService;
