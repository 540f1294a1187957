use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    password,
    token::TokenConfig,
    types::{LoginRequest, RegisterRequest, TokenResponse, UserResponse},
};
use crate::shared::AppError;
use crate::user::{UserModel, UserRepository};

const BAD_CREDENTIALS: &str = "Incorrect username or password";

/// Service for registration, login and token-to-user resolution
pub struct AuthService {
    repository: Arc<dyn UserRepository + Send + Sync>,
    token_config: TokenConfig,
}

impl AuthService {
    pub fn new(repository: Arc<dyn UserRepository + Send + Sync>, token_config: TokenConfig) -> Self {
        Self {
            repository,
            token_config,
        }
    }

    /// Registers a new user after checking username and email are free
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: RegisterRequest) -> Result<UserResponse, AppError> {
        info!("Registering new user");

        if self
            .repository
            .find_by_username(&request.username)
            .await?
            .is_some()
        {
            warn!("Username already registered");
            return Err(AppError::Conflict("Username already registered".to_string()));
        }
        if self.repository.find_by_email(&request.email).await?.is_some() {
            warn!(email = %request.email, "Email already registered");
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let hashed_password = hash_off_thread(request.password).await?;
        let user = UserModel::new(
            request.username,
            request.email,
            request.full_name,
            hashed_password,
        );

        // A concurrent registration can still win between the checks and here;
        // the repository rejects it with Conflict.
        self.repository.insert_user(&user).await?;

        info!("User registered successfully");
        Ok(UserResponse::from(&user))
    }

    /// Checks credentials and issues an access token
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn login(&self, request: LoginRequest) -> Result<TokenResponse, AppError> {
        info!("Login attempt");

        let user = self.repository.find_by_username(&request.username).await?;

        // Unknown usernames still pay for a full verification
        let hashed_password = user.as_ref().map(|u| u.hashed_password.clone());
        let password_ok = tokio::task::spawn_blocking(move || {
            let hash = hashed_password
                .as_deref()
                .unwrap_or_else(|| password::dummy_hash());
            password::verify_password(&request.password, hash)
        })
        .await
        .map_err(|e| {
            warn!(error = %e, "Password verification task failed");
            AppError::Internal
        })?;

        let user = match user {
            Some(user) if password_ok => user,
            Some(_) => {
                warn!("Login failed: wrong password");
                return Err(AppError::Unauthorized(BAD_CREDENTIALS.to_string()));
            }
            None => {
                warn!("Login failed: unknown username");
                return Err(AppError::Unauthorized(BAD_CREDENTIALS.to_string()));
            }
        };

        if !user.is_active() {
            warn!("Login refused: account disabled");
            return Err(AppError::Unauthorized("Inactive user".to_string()));
        }

        let access_token = self.token_config.create_token(&user.username)?;

        info!("Login successful, access token issued");
        Ok(TokenResponse::bearer(access_token))
    }

    /// Resolves a bearer token to an active user
    #[instrument(skip(self, token))]
    pub async fn authenticate(&self, token: &str) -> Result<UserModel, AppError> {
        let claims = self.token_config.validate_token(token)?;

        let user = self
            .repository
            .find_by_username(&claims.sub)
            .await?
            .ok_or_else(|| {
                warn!(username = %claims.sub, "Token subject no longer exists");
                AppError::Unauthorized("Could not validate credentials".to_string())
            })?;

        if !user.is_active() {
            warn!(username = %user.username, "Token belongs to a disabled user");
            return Err(AppError::Unauthorized("Inactive user".to_string()));
        }

        info!(username = %user.username, "Token resolved to active user");
        Ok(user)
    }
}

/// Argon2 is CPU-bound, so it runs on the blocking pool
async fn hash_off_thread(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || password::hash_password(&password))
        .await
        .map_err(|e| {
            warn!(error = %e, "Password hashing task failed");
            AppError::Internal
        })?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::{test_token_config, test_user};
    use crate::user::InMemoryUserRepository;
    use chrono::Duration;

    fn register_request(username: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            full_name: "Test User".to_string(),
            password: "hunter2".to_string(),
        }
    }

    fn service_with(repo: Arc<InMemoryUserRepository>) -> AuthService {
        AuthService::new(repo, test_token_config())
    }

    #[tokio::test]
    async fn test_register_returns_public_view() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let service = service_with(repo.clone());

        let user = service
            .register(register_request("alice", "alice@example.com"))
            .await
            .unwrap();

        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "alice@example.com");
        assert!(!user.disabled);

        let stored = repo.find_by_username("alice").await.unwrap().unwrap();
        assert_ne!(stored.hashed_password, "hunter2");
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let service = service_with(Arc::new(InMemoryUserRepository::new()));
        service
            .register(register_request("alice", "alice@example.com"))
            .await
            .unwrap();

        let result = service
            .register(register_request("alice", "other@example.com"))
            .await;
        match result {
            Err(AppError::Conflict(msg)) => assert_eq!(msg, "Username already registered"),
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let service = service_with(Arc::new(InMemoryUserRepository::new()));
        service
            .register(register_request("alice", "shared@example.com"))
            .await
            .unwrap();

        let result = service
            .register(register_request("bob", "shared@example.com"))
            .await;
        match result {
            Err(AppError::Conflict(msg)) => assert_eq!(msg, "Email already registered"),
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_login_and_authenticate() {
        let service = service_with(Arc::new(InMemoryUserRepository::new()));
        service
            .register(register_request("alice", "alice@example.com"))
            .await
            .unwrap();

        let token = service
            .login(LoginRequest {
                username: "alice".to_string(),
                password: "hunter2".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(token.token_type, "bearer");

        let claims = test_token_config()
            .validate_token(&token.access_token)
            .unwrap();
        assert_eq!(claims.sub, "alice");

        let user = service.authenticate(&token.access_token).await.unwrap();
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let repo = Arc::new(InMemoryUserRepository::with_users(vec![test_user(
            "alice", "hunter2", false,
        )]));
        let service = service_with(repo);

        let result = service
            .login(LoginRequest {
                username: "alice".to_string(),
                password: "wrong".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let service = service_with(Arc::new(InMemoryUserRepository::new()));

        for password in ["hunter2", "no-such-user"] {
            let result = service
                .login(LoginRequest {
                    username: "ghost".to_string(),
                    password: password.to_string(),
                })
                .await;
            assert!(matches!(result, Err(AppError::Unauthorized(ref msg)) if msg == BAD_CREDENTIALS));
        }
    }

    #[tokio::test]
    async fn test_disabled_user_cannot_login_or_authenticate() {
        let repo = Arc::new(InMemoryUserRepository::with_users(vec![test_user(
            "mallory", "hunter2", true,
        )]));
        let service = service_with(repo);

        let login = service
            .login(LoginRequest {
                username: "mallory".to_string(),
                password: "hunter2".to_string(),
            })
            .await;
        assert!(matches!(login, Err(AppError::Unauthorized(_))));

        // A token minted before the account was disabled is refused too
        let token = test_token_config().create_token("mallory").unwrap();
        let result = service.authenticate(&token).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_subject() {
        let service = service_with(Arc::new(InMemoryUserRepository::new()));
        let token = test_token_config().create_token("ghost").unwrap();

        let result = service.authenticate(&token).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_authenticate_expired_token() {
        let repo = Arc::new(InMemoryUserRepository::with_users(vec![test_user(
            "alice", "hunter2", false,
        )]));
        let service = service_with(repo);
        let token = test_token_config()
            .create_token_with_ttl("alice", Duration::minutes(-1))
            .unwrap();

        let result = service.authenticate(&token).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}
