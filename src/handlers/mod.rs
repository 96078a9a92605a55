pub mod auth_handler;
pub mod dashboard_handler;
pub mod discussion_handler;
pub mod group_handler;
pub mod health_handler;
pub mod leaderboard_handler;
pub mod question_handler;
pub mod quiz_handler;
pub mod result_handler;

pub use auth_handler::{current_user, login, register};
pub use dashboard_handler::dashboard;
pub use discussion_handler::{create_post, create_thread, posts_for_thread, threads_for_group};
pub use group_handler::{create_group, get_group, join_group, my_groups};
pub use health_handler::{health_check, health_check_live, health_check_ready};
pub use leaderboard_handler::{
    global_leaderboard, group_leaderboard, group_rank, quiz_leaderboard, quiz_rank,
    reset_leaderboard,
};
pub use question_handler::create_question;
pub use quiz_handler::{create_quiz, get_quiz, quiz_availability, quiz_questions, quizzes_for_group};
pub use result_handler::{
    delete_result, get_result, my_results, my_results_for_quiz, quiz_statistics, results_for_quiz,
    submit_result,
};
