use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{LoginRequestDto, LoginResponseDto, RegisterRequestDto};
use crate::features::auth::error::AuthError;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::password;
use crate::features::auth::services::token_service::TokenService;
use crate::features::auth::store::{NewUser, UserStore};

/// Service for account registration and credential checks
pub struct AuthService {
    users: Arc<dyn UserStore>,
    token_service: Arc<TokenService>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, token_service: Arc<TokenService>) -> Self {
        Self {
            users,
            token_service,
        }
    }

    /// Register a new account with the requested role
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<()> {
        let password = dto.password;
        let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))??;

        let user = self
            .users
            .create(&NewUser {
                username: dto.username,
                password_hash,
                role: dto.role,
            })
            .await?;

        tracing::info!("Registered user {} with role {}", user.id, user.role);
        Ok(())
    }

    /// Verify a username/password pair and resolve the account's claims
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<AuthenticatedUser> {
        let user = self.users.find_by_username(username).await?;

        // Unknown usernames still pay for one verification
        let password = password.to_string();
        let stored_hash = user
            .as_ref()
            .map(|u| u.password_hash.clone())
            .unwrap_or_else(|| password::UNKNOWN_USER_HASH.to_string());
        let matches =
            tokio::task::spawn_blocking(move || password::verify_password(&password, &stored_hash))
                .await
                .map_err(|e| {
                    AppError::Internal(format!("Password verification task failed: {}", e))
                })?;

        match user {
            Some(user) if matches => Ok(AuthenticatedUser::new(user.id.to_string(), user.role)),
            _ => Err(AppError::Auth(AuthError::InvalidCredentials)),
        }
    }

    /// Authenticate and issue a session token
    pub async fn login(&self, dto: LoginRequestDto) -> Result<LoginResponseDto> {
        let user = self.authenticate(&dto.username, &dto.password).await?;
        let issued = self.token_service.issue(&user)?;

        tracing::info!("User {} logged in as {}", user.sub, user.role);

        Ok(LoginResponseDto {
            token: issued.token,
            token_type: "Bearer".to_string(),
            expires_in: issued.expires_in,
            role: user.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::Role;
    use crate::features::auth::store::MemoryUserStore;
    use crate::features::auth::JwtValidator;
    use crate::shared::test_helpers::test_auth_config;

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(MemoryUserStore::new()),
            Arc::new(TokenService::new(&test_auth_config())),
        )
    }

    fn register_dto(username: &str, password: &str, role: Role) -> RegisterRequestDto {
        RegisterRequestDto {
            username: username.to_string(),
            password: password.to_string(),
            role,
        }
    }

    fn login_dto(username: &str, password: &str) -> LoginRequestDto {
        LoginRequestDto {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_authenticate() {
        let service = service();
        service
            .register(register_dto("alice", "pw1", Role::User))
            .await
            .unwrap();

        let user = service.authenticate("alice", "pw1").await.unwrap();
        assert_eq!(user.role, Role::User);
        assert_eq!(user.sub, "1");
    }

    #[tokio::test]
    async fn test_unknown_user_and_wrong_password_look_the_same() {
        let service = service();
        service
            .register(register_dto("alice", "pw1", Role::User))
            .await
            .unwrap();

        for (username, password) in [("alice", "nope"), ("mallory", "pw1")] {
            match service.authenticate(username, password).await {
                Err(AppError::Auth(err)) => assert_eq!(err, AuthError::InvalidCredentials),
                other => panic!("expected InvalidCredentials, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_login_token_carries_role() {
        let service = service();
        service
            .register(register_dto("mgr", "secret", Role::Manager))
            .await
            .unwrap();

        let response = service.login(login_dto("mgr", "secret")).await.unwrap();
        assert_eq!(response.role, Role::Manager);
        assert_eq!(response.token_type, "Bearer");

        let claims = JwtValidator::new(&test_auth_config())
            .validate(&response.token)
            .unwrap();
        assert_eq!(claims.role, Role::Manager);
    }
}
