use std::sync::Arc;

use validator::Validate;

use crate::{
    auth::{hash_password, verify_password, JwtService},
    errors::{AppError, AppResult},
    models::domain::User,
    models::dto::request::{LoginRequest, RegisterRequest},
    models::dto::response::{AuthResponse, UserSummary},
    repositories::UserRepository,
};

pub struct UserService {
    repository: Arc<dyn UserRepository>,
    jwt: Arc<JwtService>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>, jwt: Arc<JwtService>) -> Self {
        Self { repository, jwt }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        request.validate()?;

        if self.repository.find_by_login(&request.email).await?.is_some()
            || self
                .repository
                .find_by_login(&request.username)
                .await?
                .is_some()
        {
            return Err(AppError::AlreadyExists(
                "User with that email or username already exists".to_string(),
            ));
        }

        let password_hash = hash_password(&request.password)?;
        let display_name = request
            .display_name
            .clone()
            .unwrap_or_else(|| request.username.clone());

        let user = User::new(
            &request.username,
            &display_name,
            &request.email,
            &password_hash,
        );

        // The unique indexes on username/email close the race the lookup
        // above leaves open; a duplicate insert surfaces as AlreadyExists.
        let user = self.repository.create(user).await?;
        let token = self.jwt.create_token(&user)?;

        Ok(AuthResponse {
            token,
            user: UserSummary::from(&user),
        })
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        request.validate()?;

        let user = self
            .repository
            .find_by_login(&request.email_or_username)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        let token = self.jwt.create_token(&user)?;

        Ok(AuthResponse {
            token,
            user: UserSummary::from(&user),
        })
    }

    pub async fn get_summary(&self, user_id: &str) -> AppResult<UserSummary> {
        let user = self
            .repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id '{}' not found", user_id)))?;
        Ok(UserSummary::from(&user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::repositories::user_repository::MockUserRepository;

    fn jwt() -> Arc<JwtService> {
        let config = Config::test_config();
        Arc::new(JwtService::new(&config.jwt_secret, 1))
    }

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            username: "johndoe".to_string(),
            email: "john@example.com".to_string(),
            password: "long-enough-password".to_string(),
            display_name: None,
        }
    }

    #[actix_rt::test]
    async fn register_rejects_duplicate_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_login()
            .returning(|_| Ok(Some(User::test_user("existing"))));

        let service = UserService::new(Arc::new(repo), jwt());
        let err = service.register(register_request()).await.unwrap_err();

        assert!(matches!(err, AppError::AlreadyExists(_)));
    }

    #[actix_rt::test]
    async fn register_issues_token_for_new_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_login().returning(|_| Ok(None));
        repo.expect_create().returning(Ok);

        let service = UserService::new(Arc::new(repo), jwt());
        let response = service.register(register_request()).await.unwrap();

        assert!(!response.token.is_empty());
        assert_eq!(response.user.username, "johndoe");
        assert_eq!(response.user.display_name, "johndoe");
    }

    #[actix_rt::test]
    async fn login_failure_is_uniform_for_unknown_user_and_bad_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_login().returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repo), jwt());
        let err = service
            .login(LoginRequest {
                email_or_username: "nobody".to_string(),
                password: "whatever".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Unauthorized: Invalid credentials");

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_login().returning(|_| {
            let mut user = User::test_user("johndoe");
            user.password_hash = hash_password("the-real-password").unwrap();
            Ok(Some(user))
        });

        let service = UserService::new(Arc::new(repo), jwt());
        let err = service
            .login(LoginRequest {
                email_or_username: "johndoe".to_string(),
                password: "wrong-password".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Unauthorized: Invalid credentials");
    }
}
