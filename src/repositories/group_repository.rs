use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, Collection};

use crate::{db::Database, errors::AppResult, models::domain::Group};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn create(&self, group: Group) -> AppResult<Group>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Group>>;
    async fn find_by_member(&self, user_id: &str) -> AppResult<Vec<Group>>;
    async fn add_member(&self, group_id: &str, user_id: &str) -> AppResult<()>;
}

pub struct MongoGroupRepository {
    collection: Collection<Group>,
}

impl MongoGroupRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("groups");
        Self { collection }
    }
}

#[async_trait]
impl GroupRepository for MongoGroupRepository {
    async fn create(&self, group: Group) -> AppResult<Group> {
        self.collection.insert_one(&group).await?;
        Ok(group)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Group>> {
        let group = self.collection.find_one(doc! { "id": id }).await?;
        Ok(group)
    }

    async fn find_by_member(&self, user_id: &str) -> AppResult<Vec<Group>> {
        let groups = self
            .collection
            .find(doc! { "members": user_id })
            .await?
            .try_collect()
            .await?;
        Ok(groups)
    }

    async fn add_member(&self, group_id: &str, user_id: &str) -> AppResult<()> {
        self.collection
            .update_one(
                doc! { "id": group_id },
                doc! { "$addToSet": { "members": user_id } },
            )
            .await?;
        Ok(())
    }
}
