use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

use super::setup::TestSetup;

// ============================================================================
// Action Helpers
// ============================================================================

#[derive(Debug)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestSetup {
    /// Send a request through the full router and decode the JSON body
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> ApiResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        ApiResponse { status, body }
    }

    // ============================================================================
    // Convenience Action Methods
    // ============================================================================

    pub async fn register(&self, username: &str, email: &str, password: &str) -> ApiResponse {
        self.send(
            "POST",
            "/auth/register",
            None,
            Some(json!({
                "username": username,
                "email": email,
                "full_name": format!("{} Example", username),
                "password": password,
            })),
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> ApiResponse {
        self.send(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "username": username, "password": password })),
        )
        .await
    }

    /// Register + login, returning the access token
    pub async fn signed_in_user(&self, username: &str) -> String {
        let registered = self
            .register(username, &format!("{}@example.com", username), "hunter2")
            .await;
        assert_eq!(registered.status, StatusCode::CREATED);

        let login = self.login(username, "hunter2").await;
        assert_eq!(login.status, StatusCode::OK);
        login.body["access_token"].as_str().unwrap().to_string()
    }

    pub async fn create_employee(
        &self,
        token: &str,
        employee_id: &str,
        department: &str,
        salary: i32,
        joining_date: &str,
        skills: &[&str],
    ) -> ApiResponse {
        self.send(
            "POST",
            "/employees",
            Some(token),
            Some(json!({
                "employee_id": employee_id,
                "name": format!("Employee {}", employee_id),
                "department": department,
                "salary": salary,
                "joining_date": joining_date,
                "skills": skills,
            })),
        )
        .await
    }

    pub async fn get(&self, uri: &str, token: &str) -> ApiResponse {
        self.send("GET", uri, Some(token), None).await
    }
}

/// Collects `employee_id` from a JSON list response
pub fn employee_ids(body: &Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|e| e["employee_id"].as_str().unwrap().to_string())
        .collect()
}
