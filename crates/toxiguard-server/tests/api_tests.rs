//! HTTP API tests driven through the router with `oneshot`

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use toxiguard_classifiers::ToxicityClassifier;
use toxiguard_moderation::SubmissionWorkflow;
use toxiguard_server::auth::hash_password;
use toxiguard_server::config::AdminConfig;
use toxiguard_server::{build_app, AppState};
use toxiguard_store::{CommentStore, MemoryCommentStore};

const PASSWORD: &str = "moderate-me";

fn test_app() -> (Router, Arc<MemoryCommentStore>) {
    let store = Arc::new(MemoryCommentStore::new());
    let workflow = SubmissionWorkflow::new(Arc::new(ToxicityClassifier::new().unwrap()), store.clone());
    let admin = AdminConfig {
        username: "admin".into(),
        password_hash: Some(hash_password(PASSWORD).unwrap()),
        ..Default::default()
    };
    let state = AppState::new(workflow, admin);
    (build_app(state, &["*".to_string()]), store)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>, token: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

async fn login(app: &Router) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/admin/login",
        Some(json!({"username": "admin", "password": PASSWORD})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let (app, _) = test_app();
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["classifier"], "toxicity-lexicon");
}

#[tokio::test]
async fn test_clean_comment_is_accepted() {
    let (app, store) = test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/comments",
        Some(json!({"text": "Hello there", "author": "alice"})),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["outcome"], "accepted");
    assert_eq!(body["comment"]["label"], "non_toxic");
    assert_eq!(body["comment"]["status"], "accepted");
    assert_eq!(body["comment"]["author"], "alice");
    assert_eq!(store.count().unwrap(), 1);
}

#[tokio::test]
async fn test_flag_then_accept_anyway() {
    let (app, store) = test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/comments",
        Some(json!({"text": "You are stupid"})),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "flagged");
    assert_eq!(store.count().unwrap(), 0);
    // A random profile stands in for the missing author
    assert!(body["draft"]["author"]["profile_color"]
        .as_str()
        .unwrap()
        .starts_with("rgb("));

    let id = body["draft"]["id"].as_str().unwrap().to_string();
    let (status, draft) = send(&app, Method::GET, &format!("/api/drafts/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(draft["text"], "You are stupid");

    let (status, body) = send(&app, Method::POST, &format!("/api/drafts/{id}/accept"), None, None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["comment"]["label"], "toxic");
    assert_eq!(body["comment"]["text"], "You are stupid");
    assert_eq!(store.count().unwrap(), 1);

    let (status, body) = send(&app, Method::POST, &format!("/api/drafts/{id}/accept"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "DRAFT_NOT_FOUND");
}

#[tokio::test]
async fn test_edit_and_cancel() {
    let (app, store) = test_app();
    let (_, body) = send(
        &app,
        Method::POST,
        "/api/comments",
        Some(json!({"text": "What an idiot", "author": "bob"})),
        None,
    )
    .await;
    let id = body["draft"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/drafts/{id}/edit"),
        Some(json!({"text": "Still an idiot"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "flagged");
    assert_eq!(body["draft"]["status"], "edited");
    assert_eq!(body["draft"]["revisions"], 1);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/drafts/{id}"), None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(store.count().unwrap(), 0);

    let (status, _) = send(&app, Method::GET, &format!("/api/drafts/{id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_text_is_rejected() {
    let (app, store) = test_app();
    let (status, body) = send(&app, Method::POST, "/api/comments", Some(json!({"text": "   "})), None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(store.count().unwrap(), 0);
}

#[tokio::test]
async fn test_malformed_bodies_use_error_contract() {
    let (app, store) = test_app();

    let (status, body) = send(&app, Method::POST, "/api/comments", Some(json!({"author": "x"})), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/comments")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "BAD_REQUEST");

    let (status, body) = send(&app, Method::GET, "/api/comments?limit=lots", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");

    assert_eq!(store.count().unwrap(), 0);
}

#[tokio::test]
async fn test_feed_is_newest_first() {
    let (app, _) = test_app();
    for text in ["first", "second"] {
        send(&app, Method::POST, "/api/comments", Some(json!({"text": text})), None).await;
    }

    let (status, body) = send(&app, Method::GET, "/api/comments?limit=10", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let feed = body.as_array().unwrap();
    assert_eq!(feed.len(), 2);
    assert_eq!(feed[0]["text"], "second");
    assert_eq!(feed[0]["relative_time"], "just now");
}

#[tokio::test]
async fn test_admin_requires_session() {
    let (app, _) = test_app();

    let (status, body) = send(&app, Method::GET, "/api/admin/overview", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = send(&app, Method::GET, "/api/admin/overview", None, Some("bogus")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/admin/login",
        Some(json!({"username": "admin", "password": "123"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, Method::POST, "/api/admin/login", Some(json!({"username": "admin"})), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_admin_reports() {
    let (app, _) = test_app();
    for (text, author) in [
        ("Hello there", "alice"),
        ("Nice post", "bob"),
        ("You are stupid", "bob"),
    ] {
        let (_, body) = send(
            &app,
            Method::POST,
            "/api/comments",
            Some(json!({"text": text, "author": author})),
            None,
        )
        .await;
        if body["outcome"] == "flagged" {
            let id = body["draft"]["id"].as_str().unwrap().to_string();
            send(&app, Method::POST, &format!("/api/drafts/{id}/accept"), None, None).await;
        }
    }

    let token = login(&app).await;

    let (status, overview) = send(&app, Method::GET, "/api/admin/overview", None, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(overview["total"], 3);
    assert_eq!(overview["toxic"], 1);
    assert_eq!(overview["non_toxic"], 2);
    assert_eq!(overview["distribution"][0]["color"], "#ff6347");

    let (_, users) = send(&app, Method::GET, "/api/admin/users", None, Some(&token)).await;
    assert_eq!(users[1]["author"], "bob");
    assert_eq!(users[1]["total_comments"], 2);
    assert_eq!(users[1]["toxic_comments"], 1);

    let (_, toxic) = send(&app, Method::GET, "/api/admin/toxic", None, Some(&token)).await;
    assert_eq!(toxic.as_array().unwrap().len(), 1);

    let (_, terms) = send(&app, Method::GET, "/api/admin/terms?top=5", None, Some(&token)).await;
    assert_eq!(terms[0]["term"], "stupid");

    let (_, recent) = send(&app, Method::GET, "/api/admin/recent", None, Some(&token)).await;
    assert_eq!(recent.as_array().unwrap().len(), 3);

    let (_, filtered) = send(
        &app,
        Method::GET,
        "/api/admin/comments?author=bob&label=non_toxic",
        None,
        Some(&token),
    )
    .await;
    assert_eq!(filtered.as_array().unwrap().len(), 1);
    assert_eq!(filtered[0]["text"], "Nice post");
}

#[tokio::test]
async fn test_export_csv() {
    let (app, _) = test_app();
    send(
        &app,
        Method::POST,
        "/api/comments",
        Some(json!({"text": "Hello, there", "author": "alice"})),
        None,
    )
    .await;
    let token = login(&app).await;

    let request = Request::builder()
        .uri("/api/admin/export?format=csv")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let csv = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(csv.starts_with("id,author,text,label,status,created_at,score,profile_color"));
    assert!(csv.contains(",alice,\"Hello, there\",non_toxic,accepted,"));

    let (status, body) = send(&app, Method::GET, "/api/admin/export?format=xml", None, Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let (app, _) = test_app();
    let token = login(&app).await;

    let (status, _) = send(&app, Method::POST, "/api/admin/logout", None, Some(&token)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, "/api/admin/overview", None, Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
