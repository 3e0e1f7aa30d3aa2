/// Common test utilities for integration tests
///
/// Builds the full router over an in-memory store, so the tests run without
/// a database, and provides request helpers.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use taskdesk_api::app::{build_router, AppState};
use taskdesk_api::config::Config;
use taskdesk_shared::store::MemoryStore;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Response pieces the tests look at
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
    pub raw: Vec<u8>,
}

/// Test context containing the router and its backing store
pub struct TestContext {
    pub app: Router,
    pub config: Config,
    pub store: Arc<MemoryStore>,
}

impl TestContext {
    /// Creates a fresh context with empty storage
    pub fn new() -> Self {
        let config = test_config();
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(config.clone(), store.clone(), store.clone());

        TestContext {
            app: build_router(state),
            config,
            store,
        }
    }

    /// Sends a request with an optional bearer token and JSON body
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.send(builder.body(body).unwrap()).await
    }

    /// Sends a prepared request
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let raw = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();
        let body = serde_json::from_slice(&raw).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
            raw,
        }
    }

    /// Registers a user and returns a fresh token for them
    pub async fn register_and_login(&self, username: &str, password: &str) -> String {
        let credentials = serde_json::json!({ "username": username, "password": password });

        let registered = self
            .request(Method::POST, "/auth/register", None, Some(credentials.clone()))
            .await;
        assert_eq!(registered.status, StatusCode::CREATED, "register {}", username);

        let logged_in = self
            .request(Method::POST, "/auth/login", None, Some(credentials))
            .await;
        assert_eq!(logged_in.status, StatusCode::CREATED, "login {}", username);

        logged_in.body["token"].as_str().unwrap().to_string()
    }
}

fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "DATABASE_URL" => Some("postgresql://unused/taskdesk_test".to_string()),
        "JWT_SECRET" => Some(TEST_SECRET.to_string()),
        _ => None,
    })
    .unwrap()
}
