use std::sync::Arc;

use crate::{
    auth::JwtService,
    clock::{Clock, SystemClock},
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        MongoGroupRepository, MongoLeaderboardRepository, MongoPostRepository,
        MongoQuestionRepository, MongoQuizRepository, MongoResultRepository,
        MongoThreadRepository, MongoUserRepository,
    },
    services::{
        DashboardService, DiscussionService, GroupService, LeaderboardService, QuestionService,
        QuizService, ResultService, UserService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub group_service: Arc<GroupService>,
    pub quiz_service: Arc<QuizService>,
    pub question_service: Arc<QuestionService>,
    pub result_service: Arc<ResultService>,
    pub leaderboard_service: Arc<LeaderboardService>,
    pub dashboard_service: Arc<DashboardService>,
    pub discussion_service: Arc<DiscussionService>,
    pub db: Database,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let jwt = Arc::new(JwtService::new(
            &config.jwt_secret,
            config.jwt_expiration_hours,
        ));

        let user_repository = Arc::new(MongoUserRepository::new(&db));
        user_repository.ensure_indexes().await?;
        let group_repository = Arc::new(MongoGroupRepository::new(&db));
        let quiz_repository = Arc::new(MongoQuizRepository::new(&db));
        quiz_repository.ensure_indexes().await?;
        let question_repository = Arc::new(MongoQuestionRepository::new(&db));
        let result_repository = Arc::new(MongoResultRepository::new(&db));
        result_repository.ensure_indexes().await?;
        let leaderboard_repository = Arc::new(MongoLeaderboardRepository::new(&db));
        leaderboard_repository.ensure_indexes().await?;
        let thread_repository = Arc::new(MongoThreadRepository::new(&db));
        let post_repository = Arc::new(MongoPostRepository::new(&db));

        let user_service = Arc::new(UserService::new(user_repository.clone(), jwt));
        let group_service = Arc::new(GroupService::new(group_repository.clone()));
        let quiz_service = Arc::new(QuizService::new(
            quiz_repository.clone(),
            group_repository.clone(),
            result_repository.clone(),
            clock.clone(),
        ));
        let question_service = Arc::new(QuestionService::new(
            question_repository.clone(),
            quiz_repository.clone(),
            group_repository.clone(),
        ));
        let result_service = Arc::new(ResultService::new(
            result_repository.clone(),
            quiz_repository.clone(),
            group_repository.clone(),
            question_repository,
            user_repository.clone(),
            leaderboard_repository.clone(),
            clock.clone(),
        ));
        let leaderboard_service = Arc::new(LeaderboardService::new(
            leaderboard_repository,
            result_repository.clone(),
            quiz_repository.clone(),
            group_repository.clone(),
            user_repository.clone(),
        ));
        let dashboard_service = Arc::new(DashboardService::new(
            user_repository,
            result_repository,
            quiz_repository,
            group_repository.clone(),
            thread_repository.clone(),
            post_repository.clone(),
            clock,
            config.badge_policy.clone(),
        ));
        let discussion_service = Arc::new(DiscussionService::new(
            thread_repository,
            post_repository,
            group_repository,
        ));

        Ok(Self {
            user_service,
            group_service,
            quiz_service,
            question_service,
            result_service,
            leaderboard_service,
            dashboard_service,
            discussion_service,
            db,
            config: Arc::new(config),
        })
    }
}
