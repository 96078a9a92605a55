use std::sync::Arc;

use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::{CreatePostRequest, CreateThreadRequest},
};

#[post("/api/threads")]
async fn create_thread(
    state: web::Data<Arc<AppState>>,
    request: web::Json<CreateThreadRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let thread = state
        .discussion_service
        .create_thread(&auth.0.sub, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(thread))
}

#[get("/api/groups/{group_id}/threads")]
async fn threads_for_group(
    state: web::Data<Arc<AppState>>,
    group_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let threads = state
        .discussion_service
        .threads_for_group(&auth.0.sub, &group_id)
        .await?;
    Ok(HttpResponse::Ok().json(threads))
}

#[post("/api/threads/{thread_id}/posts")]
async fn create_post(
    state: web::Data<Arc<AppState>>,
    thread_id: web::Path<String>,
    request: web::Json<CreatePostRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let post = state
        .discussion_service
        .create_post(&auth.0.sub, &thread_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(post))
}

#[get("/api/threads/{thread_id}/posts")]
async fn posts_for_thread(
    state: web::Data<Arc<AppState>>,
    thread_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let posts = state
        .discussion_service
        .posts_for_thread(&auth.0.sub, &thread_id)
        .await?;
    Ok(HttpResponse::Ok().json(posts))
}
