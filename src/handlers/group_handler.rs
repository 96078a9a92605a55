use std::sync::Arc;

use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::CreateGroupRequest,
};

#[post("/api/groups")]
async fn create_group(
    state: web::Data<Arc<AppState>>,
    request: web::Json<CreateGroupRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let group = state
        .group_service
        .create_group(&auth.0.sub, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(group))
}

#[get("/api/groups")]
async fn my_groups(
    state: web::Data<Arc<AppState>>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let groups = state.group_service.groups_for_user(&auth.0.sub).await?;
    Ok(HttpResponse::Ok().json(groups))
}

#[get("/api/groups/{group_id}")]
async fn get_group(
    state: web::Data<Arc<AppState>>,
    group_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let group = state.group_service.get_group(&auth.0.sub, &group_id).await?;
    Ok(HttpResponse::Ok().json(group))
}

#[post("/api/groups/{group_id}/join")]
async fn join_group(
    state: web::Data<Arc<AppState>>,
    group_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let group = state
        .group_service
        .join_group(&auth.0.sub, &group_id)
        .await?;
    Ok(HttpResponse::Ok().json(group))
}
