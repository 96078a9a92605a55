use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{bson::doc, Collection};

use crate::{db::Database, errors::AppResult, models::domain::Post};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: Post) -> AppResult<Post>;
    async fn find_by_thread(&self, thread_id: &str) -> AppResult<Vec<Post>>;
    async fn count_by_author(&self, author_id: &str) -> AppResult<u64>;
    async fn recent_activity_dates(
        &self,
        author_id: &str,
        limit: i64,
    ) -> AppResult<Vec<DateTime<Utc>>>;
}

pub struct MongoPostRepository {
    collection: Collection<Post>,
}

impl MongoPostRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("posts");
        Self { collection }
    }
}

#[async_trait]
impl PostRepository for MongoPostRepository {
    async fn create(&self, post: Post) -> AppResult<Post> {
        self.collection.insert_one(&post).await?;
        Ok(post)
    }

    async fn find_by_thread(&self, thread_id: &str) -> AppResult<Vec<Post>> {
        let posts = self
            .collection
            .find(doc! { "thread_id": thread_id })
            .sort(doc! { "created_at": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(posts)
    }

    async fn count_by_author(&self, author_id: &str) -> AppResult<u64> {
        let count = self
            .collection
            .count_documents(doc! { "author_id": author_id })
            .await?;
        Ok(count)
    }

    async fn recent_activity_dates(
        &self,
        author_id: &str,
        limit: i64,
    ) -> AppResult<Vec<DateTime<Utc>>> {
        let posts: Vec<Post> = self
            .collection
            .find(doc! { "author_id": author_id })
            .sort(doc! { "created_at": -1 })
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        Ok(posts.into_iter().map(|p| p.created_at).collect())
    }
}
