use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::Quiz};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>>;
    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<Quiz>>;
    async fn find_by_group(&self, group_id: &str) -> AppResult<Vec<Quiz>>;
    /// Running statistics maintained after each accepted submission.
    async fn update_statistics(
        &self,
        quiz_id: &str,
        total_attempts: u64,
        average_score: f64,
    ) -> AppResult<()>;
}

pub struct MongoQuizRepository {
    collection: Collection<Quiz>,
}

impl MongoQuizRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("quizzes");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quizzes collection");

        let group_index = IndexModel::builder()
            .keys(doc! { "group_id": 1, "is_published": 1, "is_active": 1 })
            .build();

        self.collection.create_index(group_index).await?;
        Ok(())
    }
}

#[async_trait]
impl QuizRepository for MongoQuizRepository {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        self.collection.insert_one(&quiz).await?;
        Ok(quiz)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        let quiz = self.collection.find_one(doc! { "id": id }).await?;
        Ok(quiz)
    }

    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<Quiz>> {
        let quizzes = self
            .collection
            .find(doc! { "id": { "$in": ids } })
            .await?
            .try_collect()
            .await?;
        Ok(quizzes)
    }

    async fn find_by_group(&self, group_id: &str) -> AppResult<Vec<Quiz>> {
        let quizzes = self
            .collection
            .find(doc! { "group_id": group_id })
            .await?
            .try_collect()
            .await?;
        Ok(quizzes)
    }

    async fn update_statistics(
        &self,
        quiz_id: &str,
        total_attempts: u64,
        average_score: f64,
    ) -> AppResult<()> {
        self.collection
            .update_one(
                doc! { "id": quiz_id },
                doc! { "$set": {
                    "total_attempts": total_attempts as i64,
                    "average_score": average_score,
                }},
            )
            .await?;
        Ok(())
    }
}
