use std::sync::Arc;

use actix_web::{delete, get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::SubmitResultRequest,
    models::dto::response::MessageResponse,
};

#[post("/api/results")]
async fn submit_result(
    state: web::Data<Arc<AppState>>,
    request: web::Json<SubmitResultRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let response = state
        .result_service
        .submit(&auth.0.sub, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(response))
}

#[get("/api/results/me")]
async fn my_results(
    state: web::Data<Arc<AppState>>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let results = state.result_service.user_results(&auth.0.sub).await?;
    Ok(HttpResponse::Ok().json(results))
}

#[get("/api/results/{result_id}")]
async fn get_result(
    state: web::Data<Arc<AppState>>,
    result_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let result = state
        .result_service
        .result_by_id(&auth.0.sub, &result_id)
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

#[delete("/api/results/{result_id}")]
async fn delete_result(
    state: web::Data<Arc<AppState>>,
    result_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    state
        .result_service
        .delete_result(&auth.0.sub, &result_id)
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Result deleted successfully")))
}

#[get("/api/results/quiz/{quiz_id}")]
async fn results_for_quiz(
    state: web::Data<Arc<AppState>>,
    quiz_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let results = state
        .result_service
        .results_for_quiz(&auth.0.sub, &quiz_id)
        .await?;
    Ok(HttpResponse::Ok().json(results))
}

#[get("/api/results/quiz/{quiz_id}/mine")]
async fn my_results_for_quiz(
    state: web::Data<Arc<AppState>>,
    quiz_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let results = state
        .result_service
        .user_results_for_quiz(&auth.0.sub, &quiz_id)
        .await?;
    Ok(HttpResponse::Ok().json(results))
}

#[get("/api/results/quiz/{quiz_id}/statistics")]
async fn quiz_statistics(
    state: web::Data<Arc<AppState>>,
    quiz_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let statistics = state
        .result_service
        .quiz_statistics(&auth.0.sub, &quiz_id)
        .await?;
    Ok(HttpResponse::Ok().json(statistics))
}
