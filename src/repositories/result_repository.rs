use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::IndexOptions,
    Collection, IndexModel,
};
use serde::{Deserialize, Serialize};

use crate::{db::Database, errors::AppResult, models::domain::QuizResult};

/// One row of the read-time aggregation over raw results: a user's summed
/// scores within a group, or globally when no group filter is applied.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct UserScoreTotals {
    #[serde(rename = "_id")]
    pub user_id: String,
    pub total_score: i64,
    pub total_quizzes: i64,
    pub average_score: f64,
    /// Sum of percentage scores; the dashboard's global-ranking key.
    pub percentage_total: f64,
    pub total_passed: i64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// Insert fails with `AlreadyExists` when another submission already holds
    /// the same (quiz, user, attempt_number); callers re-read and retry.
    async fn create(&self, result: QuizResult) -> AppResult<QuizResult>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizResult>>;
    async fn count_attempts(&self, quiz_id: &str, user_id: &str) -> AppResult<u64>;
    async fn find_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<QuizResult>>;
    /// Newest attempt first.
    async fn find_by_quiz_and_user(
        &self,
        quiz_id: &str,
        user_id: &str,
    ) -> AppResult<Vec<QuizResult>>;
    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<QuizResult>>;
    async fn delete(&self, id: &str) -> AppResult<()>;
    /// Group-by-user aggregation, sorted descending by summed total_score.
    /// `group_id = None` aggregates globally. Owned so the trait stays
    /// object-safe under mock generation.
    async fn aggregate_user_totals(
        &self,
        group_id: Option<String>,
        limit: Option<i64>,
    ) -> AppResult<Vec<UserScoreTotals>>;
}

pub struct MongoResultRepository {
    collection: Collection<QuizResult>,
}

impl MongoResultRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("results");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for results collection");

        // The attempt-number reservation guard: two concurrent submissions
        // cannot both land on attempt N+1.
        let attempt_index = IndexModel::builder()
            .keys(doc! { "quiz_id": 1, "user_id": 1, "attempt_number": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("quiz_user_attempt_unique".to_string())
                    .build(),
            )
            .build();

        let group_index = IndexModel::builder()
            .keys(doc! { "group_id": 1, "total_score": -1 })
            .build();

        self.collection.create_index(attempt_index).await?;
        self.collection.create_index(group_index).await?;

        Ok(())
    }
}

#[async_trait]
impl ResultRepository for MongoResultRepository {
    async fn create(&self, result: QuizResult) -> AppResult<QuizResult> {
        self.collection.insert_one(&result).await?;
        Ok(result)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizResult>> {
        let result = self.collection.find_one(doc! { "id": id }).await?;
        Ok(result)
    }

    async fn count_attempts(&self, quiz_id: &str, user_id: &str) -> AppResult<u64> {
        let count = self
            .collection
            .count_documents(doc! { "quiz_id": quiz_id, "user_id": user_id })
            .await?;
        Ok(count)
    }

    async fn find_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<QuizResult>> {
        let results = self
            .collection
            .find(doc! { "quiz_id": quiz_id })
            .sort(doc! { "completed_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(results)
    }

    async fn find_by_quiz_and_user(
        &self,
        quiz_id: &str,
        user_id: &str,
    ) -> AppResult<Vec<QuizResult>> {
        let results = self
            .collection
            .find(doc! { "quiz_id": quiz_id, "user_id": user_id })
            .sort(doc! { "attempt_number": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(results)
    }

    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<QuizResult>> {
        let results = self
            .collection
            .find(doc! { "user_id": user_id })
            .sort(doc! { "completed_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(results)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.collection.delete_one(doc! { "id": id }).await?;
        Ok(())
    }

    async fn aggregate_user_totals(
        &self,
        group_id: Option<String>,
        limit: Option<i64>,
    ) -> AppResult<Vec<UserScoreTotals>> {
        let mut pipeline: Vec<Document> = Vec::new();

        if let Some(gid) = group_id {
            pipeline.push(doc! { "$match": { "group_id": gid } });
        }

        pipeline.push(doc! { "$group": {
            "_id": "$user_id",
            "total_score": { "$sum": "$total_score" },
            "total_quizzes": { "$sum": 1 },
            "average_score": { "$avg": "$percentage_score" },
            "percentage_total": { "$sum": "$percentage_score" },
            "total_passed": { "$sum": { "$cond": ["$is_passed", 1, 0] } },
        }});
        pipeline.push(doc! { "$sort": { "total_score": -1 } });

        if let Some(n) = limit {
            pipeline.push(doc! { "$limit": n });
        }

        let totals = self
            .collection
            .aggregate(pipeline)
            .with_type::<UserScoreTotals>()
            .await?
            .try_collect()
            .await?;
        Ok(totals)
    }
}
