pub mod group_repository;
pub mod leaderboard_repository;
pub mod post_repository;
pub mod question_repository;
pub mod quiz_repository;
pub mod result_repository;
pub mod thread_repository;
pub mod user_repository;

pub use group_repository::{GroupRepository, MongoGroupRepository};
pub use leaderboard_repository::{LeaderboardRepository, MongoLeaderboardRepository};
pub use post_repository::{MongoPostRepository, PostRepository};
pub use question_repository::{MongoQuestionRepository, QuestionRepository};
pub use quiz_repository::{MongoQuizRepository, QuizRepository};
pub use result_repository::{MongoResultRepository, ResultRepository, UserScoreTotals};
pub use thread_repository::{MongoThreadRepository, ThreadRepository};
pub use user_repository::{MongoUserRepository, UserRepository};
