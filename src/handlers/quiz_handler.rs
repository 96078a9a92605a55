use std::sync::Arc;

use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::CreateQuizRequest,
    services::QuestionListing,
};

#[post("/api/quizzes")]
async fn create_quiz(
    state: web::Data<Arc<AppState>>,
    request: web::Json<CreateQuizRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quiz = state
        .quiz_service
        .create_quiz(&auth.0.sub, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(quiz))
}

#[get("/api/quizzes/{quiz_id}")]
async fn get_quiz(
    state: web::Data<Arc<AppState>>,
    quiz_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.get_quiz(&auth.0.sub, &quiz_id).await?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[get("/api/groups/{group_id}/quizzes")]
async fn quizzes_for_group(
    state: web::Data<Arc<AppState>>,
    group_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quizzes = state
        .quiz_service
        .quizzes_for_group(&auth.0.sub, &group_id)
        .await?;
    Ok(HttpResponse::Ok().json(quizzes))
}

/// The pre-flight check clients call before showing the "take quiz" button.
#[get("/api/quizzes/{quiz_id}/availability")]
async fn quiz_availability(
    state: web::Data<Arc<AppState>>,
    quiz_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let availability = state
        .quiz_service
        .availability(&auth.0.sub, &quiz_id)
        .await?;
    Ok(HttpResponse::Ok().json(availability))
}

#[get("/api/quizzes/{quiz_id}/questions")]
async fn quiz_questions(
    state: web::Data<Arc<AppState>>,
    quiz_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let listing = state
        .question_service
        .questions_for_quiz(&auth.0.sub, &quiz_id)
        .await?;

    // Admins get the full questions, members a sanitized view.
    match listing {
        QuestionListing::Full(questions) => Ok(HttpResponse::Ok().json(questions)),
        QuestionListing::Sanitized(views) => Ok(HttpResponse::Ok().json(views)),
    }
}
