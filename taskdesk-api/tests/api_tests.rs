/// End-to-end tests for the HTTP surface
///
/// Every test drives the real router (middleware included) over an
/// in-memory store.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use chrono::{Duration, Utc};
use common::{TestContext, TEST_SECRET};
use serde_json::json;
use taskdesk_shared::auth::jwt::{create_token, Claims};
use taskdesk_shared::store::UserStore;

#[tokio::test]
async fn test_full_scenario() {
    let ctx = TestContext::new();
    let credentials = json!({ "username": "alice", "password": "pw1" });

    let registered = ctx
        .request(Method::POST, "/auth/register", None, Some(credentials.clone()))
        .await;
    assert_eq!(registered.status, StatusCode::CREATED);
    assert_eq!(registered.body, json!({ "message": "User registered successfully" }));

    let again = ctx
        .request(Method::POST, "/auth/register", None, Some(credentials.clone()))
        .await;
    assert_eq!(again.status, StatusCode::UNAUTHORIZED);
    assert_eq!(again.body["message"], "Username already exists");

    let login = ctx
        .request(Method::POST, "/auth/login", None, Some(credentials))
        .await;
    assert_eq!(login.status, StatusCode::CREATED);
    let token = login.body["token"].as_str().unwrap().to_string();

    let created = ctx
        .request(
            Method::POST,
            "/tasks",
            Some(&token),
            Some(json!({ "title": "buy milk" })),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(
        created.body,
        json!({
            "id": 1,
            "title": "buy milk",
            "description": null,
            "isComplete": false,
            "ownerId": 1
        })
    );

    let updated = ctx
        .request(
            Method::PUT,
            "/tasks/1",
            Some(&token),
            Some(json!({ "isComplete": true })),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["isComplete"], true);
    assert_eq!(updated.body["title"], "buy milk");

    let deleted = ctx.request(Method::DELETE, "/tasks/1", Some(&token), None).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert!(deleted.raw.is_empty());

    let listed = ctx.request(Method::GET, "/tasks", Some(&token), None).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body, json!([]));
}

#[tokio::test]
async fn test_password_is_stored_hashed() {
    let ctx = TestContext::new();
    ctx.register_and_login("alice", "pw1").await;

    let user = ctx.store.find_by_username("alice").await.unwrap().unwrap();
    assert_ne!(user.password_hash, "pw1");
}

#[tokio::test]
async fn test_login_failures() {
    let ctx = TestContext::new();
    ctx.register_and_login("alice", "pw1").await;

    let wrong_password = ctx
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "username": "alice", "password": "nope" })),
        )
        .await;
    let unknown_user = ctx
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "username": "mallory", "password": "pw1" })),
        )
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_user.body);
    assert_eq!(wrong_password.body["error"], "unauthorized");
}

#[tokio::test]
async fn test_task_routes_require_token() {
    let ctx = TestContext::new();

    for (method, uri) in [
        (Method::GET, "/tasks"),
        (Method::POST, "/tasks"),
        (Method::GET, "/tasks/1"),
        (Method::PUT, "/tasks/1"),
        (Method::DELETE, "/tasks/1"),
    ] {
        let response = ctx.request(method.clone(), uri, None, None).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(response.body["error"], "unauthorized");
    }
}

#[tokio::test]
async fn test_bad_tokens_rejected() {
    let ctx = TestContext::new();
    ctx.register_and_login("alice", "pw1").await;

    let garbage = ctx.request(Method::GET, "/tasks", Some("not-a-jwt"), None).await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);

    let expired_claims = Claims::issued_at(
        1,
        "alice",
        Utc::now() - Duration::hours(2),
        Duration::hours(1),
    );
    let expired = create_token(&expired_claims, TEST_SECRET).unwrap();
    let response = ctx.request(Method::GET, "/tasks", Some(&expired), None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Token expired");

    let foreign = create_token(&Claims::new(1, "alice"), "another-secret-that-is-32-bytes-long!").unwrap();
    let response = ctx.request(Method::GET, "/tasks", Some(&foreign), None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let basic = Request::builder()
        .uri("/tasks")
        .header(header::AUTHORIZATION, "Basic YWxpY2U6cHcx")
        .body(Body::empty())
        .unwrap();
    assert_eq!(ctx.send(basic).await.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_tasks_are_isolated_between_users() {
    let ctx = TestContext::new();
    let alice = ctx.register_and_login("alice", "pw1").await;
    let bob = ctx.register_and_login("bob", "pw2").await;

    let created = ctx
        .request(
            Method::POST,
            "/tasks",
            Some(&alice),
            Some(json!({ "title": "private", "description": "alice only" })),
        )
        .await;
    let id = created.body["id"].as_i64().unwrap();
    let uri = format!("/tasks/{}", id);

    let listed = ctx.request(Method::GET, "/tasks", Some(&bob), None).await;
    assert_eq!(listed.body, json!([]));

    let fetched = ctx.request(Method::GET, &uri, Some(&bob), None).await;
    assert_eq!(fetched.status, StatusCode::NOT_FOUND);
    assert_eq!(
        fetched.body,
        json!({ "error": "not_found", "message": "Task not found" })
    );

    let updated = ctx
        .request(Method::PUT, &uri, Some(&bob), Some(json!({ "title": "mine now" })))
        .await;
    assert_eq!(updated.status, StatusCode::NOT_FOUND);

    let deleted = ctx.request(Method::DELETE, &uri, Some(&bob), None).await;
    assert_eq!(deleted.status, StatusCode::NOT_FOUND);

    let still_there = ctx.request(Method::GET, &uri, Some(&alice), None).await;
    assert_eq!(still_there.status, StatusCode::OK);
    assert_eq!(still_there.body["title"], "private");
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let ctx = TestContext::new();
    let token = ctx.register_and_login("alice", "pw1").await;

    for title in ["first", "second", "third"] {
        ctx.request(Method::POST, "/tasks", Some(&token), Some(json!({ "title": title })))
            .await;
    }

    let listed = ctx.request(Method::GET, "/tasks", Some(&token), None).await;
    let titles: Vec<&str> = listed
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn test_empty_update_returns_task_unchanged() {
    let ctx = TestContext::new();
    let token = ctx.register_and_login("alice", "pw1").await;

    let created = ctx
        .request(
            Method::POST,
            "/tasks",
            Some(&token),
            Some(json!({ "title": "stable", "description": "as is" })),
        )
        .await;

    let updated = ctx
        .request(Method::PUT, "/tasks/1", Some(&token), Some(json!({})))
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body, created.body);
}

#[tokio::test]
async fn test_deleted_task_is_gone() {
    let ctx = TestContext::new();
    let token = ctx.register_and_login("alice", "pw1").await;
    ctx.request(Method::POST, "/tasks", Some(&token), Some(json!({ "title": "temp" })))
        .await;

    let first = ctx.request(Method::DELETE, "/tasks/1", Some(&token), None).await;
    assert_eq!(first.status, StatusCode::OK);

    let fetched = ctx.request(Method::GET, "/tasks/1", Some(&token), None).await;
    assert_eq!(fetched.status, StatusCode::NOT_FOUND);

    let second = ctx.request(Method::DELETE, "/tasks/1", Some(&token), None).await;
    assert_eq!(second.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_request_body_errors() {
    let ctx = TestContext::new();
    let token = ctx.register_and_login("alice", "pw1").await;

    let missing_title = ctx
        .request(Method::POST, "/tasks", Some(&token), Some(json!({ "description": "x" })))
        .await;
    assert_eq!(missing_title.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing_title.body["error"], "bad_request");

    let empty_title = ctx
        .request(Method::POST, "/tasks", Some(&token), Some(json!({ "title": "" })))
        .await;
    assert_eq!(empty_title.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(empty_title.body["error"], "validation_error");
    assert_eq!(empty_title.body["details"][0]["field"], "title");

    let wrong_type = ctx
        .request(
            Method::PUT,
            "/tasks/1",
            Some(&token),
            Some(json!({ "isComplete": "yes" })),
        )
        .await;
    assert_eq!(wrong_type.status, StatusCode::BAD_REQUEST);

    let not_json = Request::builder()
        .method(Method::POST)
        .uri("/auth/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{username"))
        .unwrap();
    assert_eq!(ctx.send(not_json).await.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_numeric_id_is_bad_request() {
    let ctx = TestContext::new();
    let token = ctx.register_and_login("alice", "pw1").await;

    let response = ctx.request(Method::GET, "/tasks/abc", Some(&token), None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_and_security_headers() {
    let ctx = TestContext::new();

    let health = ctx.request(Method::GET, "/health", None, None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["status"], "healthy");
    assert_eq!(health.body["database"], "connected");
    assert_eq!(health.headers.get("X-Content-Type-Options").unwrap(), "nosniff");
    assert!(health.headers.get("Strict-Transport-Security").is_none());
    assert!(!ctx.config.api.production);

    let unknown = ctx.request(Method::GET, "/nope", None, None).await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_login_fields_fail_like_bad_credentials() {
    let ctx = TestContext::new();
    ctx.register_and_login("alice", "pw1").await;

    let mut bodies = Vec::new();
    for credentials in [
        json!({ "username": "", "password": "x" }),
        json!({ "username": "alice", "password": "" }),
        json!({ "username": "alice", "password": "nope" }),
        json!({ "username": "nobody", "password": "x" }),
    ] {
        let response = ctx
            .request(Method::POST, "/auth/login", None, Some(credentials.clone()))
            .await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{}", credentials);
        bodies.push(response.body);
    }

    assert_eq!(
        bodies[0],
        json!({ "error": "unauthorized", "message": "Invalid credentials" })
    );
    assert!(bodies.iter().all(|body| body == &bodies[0]));
}

#[tokio::test]
async fn test_null_description_clears_it() {
    let ctx = TestContext::new();
    let token = ctx.register_and_login("alice", "pw1").await;
    ctx.request(
        Method::POST,
        "/tasks",
        Some(&token),
        Some(json!({ "title": "a", "description": "d" })),
    )
    .await;

    let kept = ctx
        .request(Method::PUT, "/tasks/1", Some(&token), Some(json!({ "isComplete": true })))
        .await;
    assert_eq!(kept.body["description"], "d");

    let cleared = ctx
        .request(Method::PUT, "/tasks/1", Some(&token), Some(json!({ "description": null })))
        .await;
    assert_eq!(cleared.status, StatusCode::OK);
    assert!(cleared.body["description"].is_null());
    assert_eq!(cleared.body["title"], "a");
    assert_eq!(cleared.body["isComplete"], true);

    let fetched = ctx.request(Method::GET, "/tasks/1", Some(&token), None).await;
    assert!(fetched.body["description"].is_null());
}

#[tokio::test]
async fn test_lowercase_bearer_scheme_accepted() {
    let ctx = TestContext::new();
    let token = ctx.register_and_login("alice", "pw1").await;

    let request = Request::builder()
        .uri("/tasks")
        .header(header::AUTHORIZATION, format!("bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = ctx.send(request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!([]));
}
