pub mod group;
pub mod leaderboard;
pub mod post;
pub mod question;
pub mod quiz;
pub mod result;
pub mod thread;
pub mod user;

pub use group::Group;
pub use leaderboard::{Leaderboard, LeaderboardEntry};
pub use post::Post;
pub use question::Question;
pub use quiz::Quiz;
pub use result::QuizResult;
pub use thread::Thread;
pub use user::User;
