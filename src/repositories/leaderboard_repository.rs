use async_trait::async_trait;
use mongodb::{
    bson::{doc, to_bson, to_document},
    options::{IndexOptions, UpdateOptions},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::AppResult,
    models::domain::{Leaderboard, LeaderboardEntry},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeaderboardRepository: Send + Sync {
    async fn find_by_quiz(&self, quiz_id: &str) -> AppResult<Option<Leaderboard>>;
    /// Insert-or-update one user's entry and restore descending score order.
    /// Score only ever increases; attempts and last_attempt always reflect the
    /// latest submission.
    async fn upsert_entry(
        &self,
        quiz_id: &str,
        group_id: &str,
        entry: LeaderboardEntry,
    ) -> AppResult<()>;
    /// Clears the board's entries; underlying results are untouched.
    async fn reset(&self, quiz_id: &str) -> AppResult<()>;
}

pub struct MongoLeaderboardRepository {
    collection: Collection<Leaderboard>,
}

impl MongoLeaderboardRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("leaderboards");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for leaderboards collection");

        let quiz_index = IndexModel::builder()
            .keys(doc! { "quiz_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("quiz_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(quiz_index).await?;
        Ok(())
    }
}

#[async_trait]
impl LeaderboardRepository for MongoLeaderboardRepository {
    async fn find_by_quiz(&self, quiz_id: &str) -> AppResult<Option<Leaderboard>> {
        let board = self.collection.find_one(doc! { "quiz_id": quiz_id }).await?;
        Ok(board)
    }

    async fn upsert_entry(
        &self,
        quiz_id: &str,
        group_id: &str,
        entry: LeaderboardEntry,
    ) -> AppResult<()> {
        // Create the board document on first use.
        let empty_board = Leaderboard::new(quiz_id, group_id);
        self.collection
            .update_one(
                doc! { "quiz_id": quiz_id },
                doc! { "$setOnInsert": to_document(&empty_board)? },
            )
            .with_options(UpdateOptions::builder().upsert(true).build())
            .await?;

        // Targeted atomic update of an existing entry: best-score-wins on
        // score, unconditional overwrite of attempts and last_attempt. This
        // replaces the read-modify-write of the whole list, so concurrent
        // upserts for different users cannot clobber each other.
        let updated = self
            .collection
            .update_one(
                doc! { "quiz_id": quiz_id, "entries.user_id": &entry.user_id },
                doc! {
                    "$max": { "entries.$.score": to_bson(&entry.score)? },
                    "$set": {
                        "entries.$.attempts": to_bson(&entry.attempts)?,
                        "entries.$.last_attempt": to_bson(&entry.last_attempt)?,
                    },
                },
            )
            .await?;

        if updated.matched_count == 0 {
            // First submission for this user; the $ne guard keeps a racing
            // duplicate insert out.
            self.collection
                .update_one(
                    doc! { "quiz_id": quiz_id, "entries.user_id": { "$ne": &entry.user_id } },
                    doc! { "$push": { "entries": to_document(&entry)? } },
                )
                .await?;
        }

        // Re-sort in place; $each:[] pushes nothing but applies the sort.
        self.collection
            .update_one(
                doc! { "quiz_id": quiz_id },
                doc! { "$push": { "entries": { "$each": [], "$sort": { "score": -1 } } } },
            )
            .await?;

        Ok(())
    }

    async fn reset(&self, quiz_id: &str) -> AppResult<()> {
        self.collection
            .update_one(
                doc! { "quiz_id": quiz_id },
                doc! { "$set": { "entries": [] } },
            )
            .await?;
        Ok(())
    }
}
