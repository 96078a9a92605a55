use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{Group, Post, Thread},
    models::dto::request::{CreatePostRequest, CreateThreadRequest},
    repositories::{GroupRepository, PostRepository, ThreadRepository},
};

pub struct DiscussionService {
    threads: Arc<dyn ThreadRepository>,
    posts: Arc<dyn PostRepository>,
    groups: Arc<dyn GroupRepository>,
}

impl DiscussionService {
    pub fn new(
        threads: Arc<dyn ThreadRepository>,
        posts: Arc<dyn PostRepository>,
        groups: Arc<dyn GroupRepository>,
    ) -> Self {
        Self {
            threads,
            posts,
            groups,
        }
    }

    pub async fn create_thread(
        &self,
        user_id: &str,
        request: CreateThreadRequest,
    ) -> AppResult<Thread> {
        request.validate()?;

        let group = self.require_group(&request.group_id).await?;
        if !group.is_member(user_id) {
            return Err(AppError::Forbidden(
                "Must be a group member to post".to_string(),
            ));
        }

        let thread = Thread::new(&request.group_id, user_id, &request.title, &request.content);
        self.threads.create(thread).await
    }

    pub async fn threads_for_group(&self, user_id: &str, group_id: &str) -> AppResult<Vec<Thread>> {
        let group = self.require_group(group_id).await?;
        if group.is_private && !group.is_member(user_id) {
            return Err(AppError::Forbidden(
                "Must be a member to view discussions".to_string(),
            ));
        }

        self.threads.find_by_group(group_id).await
    }

    pub async fn create_post(
        &self,
        user_id: &str,
        thread_id: &str,
        request: CreatePostRequest,
    ) -> AppResult<Post> {
        request.validate()?;

        let thread = self
            .threads
            .find_by_id(thread_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Thread not found".to_string()))?;
        let group = self.require_group(&thread.group_id).await?;
        if !group.is_member(user_id) {
            return Err(AppError::Forbidden(
                "Must be a group member to post".to_string(),
            ));
        }

        let post = Post::new(thread_id, user_id, &request.content);
        self.posts.create(post).await
    }

    pub async fn posts_for_thread(&self, user_id: &str, thread_id: &str) -> AppResult<Vec<Post>> {
        let thread = self
            .threads
            .find_by_id(thread_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Thread not found".to_string()))?;
        let group = self.require_group(&thread.group_id).await?;
        if group.is_private && !group.is_member(user_id) {
            return Err(AppError::Forbidden(
                "Must be a member to view discussions".to_string(),
            ));
        }

        self.posts.find_by_thread(thread_id).await
    }

    async fn require_group(&self, group_id: &str) -> AppResult<Group> {
        self.groups
            .find_by_id(group_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Group not found".to_string()))
    }
}
