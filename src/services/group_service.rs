use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::domain::Group,
    models::dto::request::CreateGroupRequest,
    repositories::GroupRepository,
};

pub struct GroupService {
    repository: Arc<dyn GroupRepository>,
}

impl GroupService {
    pub fn new(repository: Arc<dyn GroupRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_group(
        &self,
        creator_id: &str,
        request: CreateGroupRequest,
    ) -> AppResult<Group> {
        request.validate()?;

        let group = Group::new(
            &request.name,
            request.description,
            request.is_private,
            creator_id,
        );
        self.repository.create(group).await
    }

    pub async fn get_group(&self, user_id: &str, group_id: &str) -> AppResult<Group> {
        let group = self.require_group(group_id).await?;

        if group.is_private && !group.is_member(user_id) {
            return Err(AppError::Forbidden(
                "Must be a member to view this group".to_string(),
            ));
        }

        Ok(group)
    }

    pub async fn groups_for_user(&self, user_id: &str) -> AppResult<Vec<Group>> {
        self.repository.find_by_member(user_id).await
    }

    pub async fn join_group(&self, user_id: &str, group_id: &str) -> AppResult<Group> {
        let group = self.require_group(group_id).await?;

        if group.is_member(user_id) {
            return Ok(group);
        }

        if group.is_private {
            return Err(AppError::Forbidden(
                "This group is private; ask an admin to add you".to_string(),
            ));
        }

        self.repository.add_member(group_id, user_id).await?;
        self.require_group(group_id).await
    }

    async fn require_group(&self, group_id: &str) -> AppResult<Group> {
        self.repository
            .find_by_id(group_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Group not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::group_repository::MockGroupRepository;

    #[actix_rt::test]
    async fn creator_becomes_member_and_admin() {
        let mut repo = MockGroupRepository::new();
        repo.expect_create().returning(Ok);

        let service = GroupService::new(Arc::new(repo));
        let group = service
            .create_group(
                "user-1",
                CreateGroupRequest {
                    name: "Rustaceans".to_string(),
                    description: None,
                    is_private: false,
                },
            )
            .await
            .unwrap();

        assert!(group.is_member("user-1"));
        assert!(group.is_admin("user-1"));
    }

    #[actix_rt::test]
    async fn private_group_hidden_from_non_members() {
        let mut repo = MockGroupRepository::new();
        repo.expect_find_by_id()
            .returning(|_| Ok(Some(Group::new("Secret", None, true, "owner"))));

        let service = GroupService::new(Arc::new(repo));
        let err = service.get_group("outsider", "group-1").await.unwrap_err();

        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[actix_rt::test]
    async fn joining_private_group_is_forbidden() {
        let mut repo = MockGroupRepository::new();
        repo.expect_find_by_id()
            .returning(|_| Ok(Some(Group::new("Secret", None, true, "owner"))));

        let service = GroupService::new(Arc::new(repo));
        let err = service.join_group("outsider", "group-1").await.unwrap_err();

        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
