use std::sync::Arc;

use actix_web::{get, web, HttpResponse};

use crate::{app_state::AppState, auth::AuthenticatedUser, errors::AppError};

#[get("/api/dashboard")]
async fn dashboard(
    state: web::Data<Arc<AppState>>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let response = state
        .dashboard_service
        .user_dashboard(&auth.0.sub)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}
