use std::sync::Arc;

use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::{LoginRequest, RegisterRequest},
};

#[post("/api/auth/register")]
async fn register(
    state: web::Data<Arc<AppState>>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state.user_service.register(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

#[post("/api/auth/login")]
async fn login(
    state: web::Data<Arc<AppState>>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state.user_service.login(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/api/auth/me")]
async fn current_user(
    state: web::Data<Arc<AppState>>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let summary = state.user_service.get_summary(&auth.0.sub).await?;
    Ok(HttpResponse::Ok().json(summary))
}
