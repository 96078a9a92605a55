use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{bson::doc, Collection};

use crate::{db::Database, errors::AppResult, models::domain::Thread};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ThreadRepository: Send + Sync {
    async fn create(&self, thread: Thread) -> AppResult<Thread>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Thread>>;
    async fn find_by_group(&self, group_id: &str) -> AppResult<Vec<Thread>>;
    async fn count_by_author(&self, author_id: &str) -> AppResult<u64>;
    /// Creation timestamps of the author's most recent threads, newest first.
    async fn recent_activity_dates(
        &self,
        author_id: &str,
        limit: i64,
    ) -> AppResult<Vec<DateTime<Utc>>>;
}

pub struct MongoThreadRepository {
    collection: Collection<Thread>,
}

impl MongoThreadRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("threads");
        Self { collection }
    }
}

#[async_trait]
impl ThreadRepository for MongoThreadRepository {
    async fn create(&self, thread: Thread) -> AppResult<Thread> {
        self.collection.insert_one(&thread).await?;
        Ok(thread)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Thread>> {
        let thread = self.collection.find_one(doc! { "id": id }).await?;
        Ok(thread)
    }

    async fn find_by_group(&self, group_id: &str) -> AppResult<Vec<Thread>> {
        let threads = self
            .collection
            .find(doc! { "group_id": group_id })
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(threads)
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
        let threads: Vec<Thread> = self
            .collection
            .find(doc! { "author_id": author_id })
            .sort(doc! { "created_at": -1 })
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        Ok(threads.into_iter().map(|t| t.created_at).collect())
    }
}
