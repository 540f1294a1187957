use axum::{extract::State, http::StatusCode, Extension, Json};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    service::AuthService,
    types::{LoginRequest, RegisterRequest, TokenResponse, UserResponse},
};
use crate::shared::{AppError, AppState};
use crate::user::UserModel;
use crate::validation::ValidatedJson;

fn auth_service(state: &AppState) -> AuthService {
    AuthService::new(Arc::clone(&state.user_repository), state.token_config.clone())
}

/// HTTP handler for registering a new account
///
/// POST /auth/register
#[instrument(name = "register_user", skip(state, request))]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = auth_service(&state).register(request).await?;

    info!(username = %user.username, "User registered");
    Ok((StatusCode::CREATED, Json(user)))
}

/// HTTP handler for exchanging credentials for an access token
///
/// POST /auth/login
#[instrument(name = "login", skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let token = auth_service(&state).login(request).await?;
    Ok(Json(token))
}

/// GET /auth/me
#[instrument(name = "read_current_user", skip(user))]
pub async fn me(Extension(user): Extension<UserModel>) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::AppStateBuilder;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::post,
        Router,
    };
    use tower::ServiceExt; // for `oneshot`

    fn app() -> Router {
        Router::new()
            .route("/auth/register", post(register))
            .route("/auth/login", post(login))
            .with_state(AppStateBuilder::new().build())
    }

    fn json_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_register_handler_created() {
        let body = r#"{"username":"alice","email":"alice@example.com","full_name":"Alice Doe","password":"hunter2"}"#;

        let response = app().oneshot(json_post("/auth/register", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let user: UserResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.full_name, "Alice Doe");
        assert!(!user.disabled);
    }

    #[tokio::test]
    async fn test_register_handler_missing_field() {
        let body = r#"{"username":"alice","password":"hunter2"}"#;

        let response = app().oneshot(json_post("/auth/register", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_handler_rejects_unknown_user() {
        let body = r#"{"username":"ghost","password":"hunter2"}"#;

        let response = app().oneshot(json_post("/auth/login", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
