use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use studygroups_server::{
    app_state::AppState,
    auth::{AuthMiddleware, JwtService},
    config::Config,
    handlers,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    if std::env::var("APP_ENV").as_deref() == Ok("production") {
        config.validate_for_production();
    }

    let host = config.web_server_host.clone();
    let port = config.web_server_port;

    let state = Arc::new(
        AppState::new(config)
            .await
            .unwrap_or_else(|e| panic!("Failed to initialize application state: {e}")),
    );
    let jwt_service = JwtService::new(
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    );

    log::info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(jwt_service.clone()))
            .wrap(Logger::default())
            .wrap(cors)
            .service(handlers::health_check)
            .service(handlers::health_check_ready)
            .service(handlers::health_check_live)
            .service(handlers::register)
            .service(handlers::login)
            .service(
                web::scope("")
                    .wrap(AuthMiddleware)
                    .service(handlers::current_user)
                    .service(handlers::create_group)
                    .service(handlers::my_groups)
                    .service(handlers::get_group)
                    .service(handlers::join_group)
                    .service(handlers::create_quiz)
                    .service(handlers::quizzes_for_group)
                    .service(handlers::quiz_availability)
                    .service(handlers::quiz_questions)
                    .service(handlers::quiz_statistics)
                    .service(handlers::results_for_quiz)
                    .service(handlers::my_results_for_quiz)
                    .service(handlers::get_quiz)
                    .service(handlers::create_question)
                    .service(handlers::submit_result)
                    .service(handlers::my_results)
                    .service(handlers::get_result)
                    .service(handlers::delete_result)
                    .service(handlers::quiz_leaderboard)
                    .service(handlers::quiz_rank)
                    .service(handlers::group_leaderboard)
                    .service(handlers::group_rank)
                    .service(handlers::global_leaderboard)
                    .service(handlers::reset_leaderboard)
                    .service(handlers::dashboard)
                    .service(handlers::create_thread)
                    .service(handlers::threads_for_group)
                    .service(handlers::create_post)
                    .service(handlers::posts_for_thread),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
