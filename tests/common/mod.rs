#![allow(dead_code)]

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use todo_api::auth::password::MIN_COST;
use todo_api::auth::JwtKeys;
use todo_api::config::AppConfig;
use todo_api::database::Store;
use todo_api::services::OwnershipPolicy;
use todo_api::{app, AppState};

pub const PASSWORD: &str = "Sup3r$ecret";

/// The full router on a fresh in-memory store.
pub struct TestApp {
    router: Router,
}

/// A registered account and its bearer token.
pub struct TestUser {
    pub id: String,
    pub token: String,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_policy(OwnershipPolicy::owner_only())
    }

    pub fn with_policy(policy: OwnershipPolicy) -> Self {
        let config = AppConfig::development();
        let jwt = JwtKeys::new("integration-secret", 1).expect("test keys");
        let state = AppState::new(Store::memory(), jwt, policy, MIN_COST);
        Self {
            router: app(state, &config),
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).with_context(|| {
                format!("non-JSON body: {}", String::from_utf8_lossy(&bytes))
            })?
        };
        Ok((status, json))
    }

    pub async fn get(&self, uri: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.request(Method::PATCH, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    /// Registers `username` with `<username>@example.com` and the shared test password.
    pub async fn register(&self, username: &str) -> Result<TestUser> {
        let body = json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": PASSWORD,
        });
        let (status, json) = self
            .request(Method::POST, "/api/auth/register", None, Some(body))
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "register failed: {} {}", status, json);

        Ok(TestUser {
            id: json["data"]["user"]["id"].as_str().context("user id")?.to_string(),
            token: json["data"]["token"].as_str().context("token")?.to_string(),
        })
    }

    /// Creates a task list and returns its id.
    pub async fn create_task_list(&self, user: &TestUser, title: &str) -> Result<String> {
        let (status, json) = self
            .post("/api/task-list", &user.token, json!({ "title": title }))
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create task list failed: {} {}", status, json);
        Ok(json["data"]["id"].as_str().context("task list id")?.to_string())
    }
}

/// Titles (or names) of the items in a listing response, in order.
pub fn titles(json: &Value, field: &str) -> Vec<String> {
    json["data"]["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item[field].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
