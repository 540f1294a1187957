use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::{auth, employee, shared::AppState};

pub const SERVICE_NAME: &str = "Employee API with JWT Authentication";

/// GET / - liveness message
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": SERVICE_NAME,
        "status": "Active"
    }))
}

/// Builds the full application router
///
/// Everything except `/`, `/auth/register` and `/auth/login` sits behind `auth::jwt_auth`.
pub fn build_router(app_state: AppState) -> Router {
    let protected = Router::new()
        .route("/auth/me", get(auth::me))
        .route(
            "/employees",
            post(employee::create_employee).get(employee::list_employees),
        )
        .route(
            "/employees/avg-salary",
            get(employee::average_salary_by_department),
        )
        .route("/employees/search", get(employee::search_by_skill))
        .route(
            "/employees/:employee_id",
            get(employee::get_employee)
                .put(employee::update_employee)
                .delete(employee::delete_employee),
        )
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth::jwt_auth,
        ));

    Router::new()
        .route("/", get(root))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::AppStateBuilder;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt; // for `oneshot`

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_root_is_public() {
        let app = build_router(AppStateBuilder::new().build());

        let response = app.oneshot(get_request("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], SERVICE_NAME);
        assert_eq!(json["status"], "Active");
    }

    #[tokio::test]
    async fn test_protected_routes_require_token() {
        for uri in [
            "/auth/me",
            "/employees",
            "/employees/avg-salary",
            "/employees/search?skill=rust",
            "/employees/E1",
        ] {
            let app = build_router(AppStateBuilder::new().build());
            let response = app.oneshot(get_request(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "uri {}", uri);
        }
    }
}
