use std::sync::Arc;

use actix_web::{delete, get, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::LeaderboardQuery,
    models::dto::response::MessageResponse,
    services::leaderboard_service::GLOBAL_LEADERBOARD_LIMIT,
};

#[get("/api/leaderboard/quiz/{quiz_id}")]
async fn quiz_leaderboard(
    state: web::Data<Arc<AppState>>,
    quiz_id: web::Path<String>,
    query: web::Query<LeaderboardQuery>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    query.validate()?;
    let board = state
        .leaderboard_service
        .quiz_leaderboard(&auth.0.sub, &quiz_id, query.limit())
        .await?;
    Ok(HttpResponse::Ok().json(board))
}

#[get("/api/leaderboard/quiz/{quiz_id}/rank")]
async fn quiz_rank(
    state: web::Data<Arc<AppState>>,
    quiz_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let rank = state
        .leaderboard_service
        .user_rank_for_quiz(&auth.0.sub, &quiz_id)
        .await?;
    Ok(HttpResponse::Ok().json(rank))
}

#[get("/api/leaderboard/group/{group_id}")]
async fn group_leaderboard(
    state: web::Data<Arc<AppState>>,
    group_id: web::Path<String>,
    query: web::Query<LeaderboardQuery>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    query.validate()?;
    let board = state
        .leaderboard_service
        .group_leaderboard(&auth.0.sub, &group_id, query.limit())
        .await?;
    Ok(HttpResponse::Ok().json(board))
}

#[get("/api/leaderboard/group/{group_id}/rank")]
async fn group_rank(
    state: web::Data<Arc<AppState>>,
    group_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let rank = state
        .leaderboard_service
        .user_rank_in_group(&auth.0.sub, &group_id)
        .await?;
    Ok(HttpResponse::Ok().json(rank))
}

#[get("/api/leaderboard/global")]
async fn global_leaderboard(
    state: web::Data<Arc<AppState>>,
    query: web::Query<LeaderboardQuery>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    query.validate()?;
    let limit = query.limit.unwrap_or(GLOBAL_LEADERBOARD_LIMIT);
    let board = state.leaderboard_service.global_leaderboard(limit).await?;
    Ok(HttpResponse::Ok().json(board))
}

#[delete("/api/leaderboard/quiz/{quiz_id}/reset")]
async fn reset_leaderboard(
    state: web::Data<Arc<AppState>>,
    quiz_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    state
        .leaderboard_service
        .reset(&auth.0.sub, &quiz_id)
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Leaderboard reset successfully")))
}
