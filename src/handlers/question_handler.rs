use std::sync::Arc;

use actix_web::{post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::CreateQuestionRequest,
};

#[post("/api/questions")]
async fn create_question(
    state: web::Data<Arc<AppState>>,
    request: web::Json<CreateQuestionRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let question = state
        .question_service
        .create_question(&auth.0.sub, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(question))
}
