//! WordPress publishing through the API, against a local fake site

mod helpers;

use axum::http::StatusCode;
use ccos_cg::build_router;
use ccos_cg::db;
use ccos_common::config::{TomlConfig, WordPressConfig};
use ccos_common::models::PostStatus;
use chrono::{DateTime, Utc};
use helpers::*;
use serde_json::json;
use tower::ServiceExt;

const TOPIC: &str = "겨울철 건조 피부";

#[tokio::test]
async fn test_future_publish_schedules_post() {
    let (site, seen) = spawn_fake_wordpress(
        StatusCode::CREATED,
        json!({"id": 42, "link": "https://blog.example.com/?p=42"}),
    )
    .await;

    let pool = setup_test_db().await;
    let id = db::posts::insert_post(&pool, &sample_post(TOPIC)).await.unwrap();
    let app = build_router(test_state(pool.clone()));

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/posts/publish",
            json!({"id": id, "wpUrl": format!("{}/", site), "wpUser": "editor", "wpPass": "app pass"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["link"], "https://blog.example.com/?p=42");

    let captured = seen.lock().unwrap().clone();
    assert_eq!(captured.len(), 1);
    let sent = &captured[0].body;
    assert_eq!(sent["title"], TOPIC);
    assert_eq!(sent["status"], "future");
    assert_eq!(sent["format"], "standard");
    assert!(captured[0].authorization.as_deref().unwrap().starts_with("Basic "));

    let date: DateTime<Utc> = sent["date"].as_str().unwrap().parse().unwrap();
    let delay = date - Utc::now();
    assert!(delay <= chrono::Duration::hours(3));
    assert!(delay > chrono::Duration::minutes(55));

    let stored = db::posts::get_post(&pool, id).await.unwrap().unwrap();
    assert_eq!(stored.post.status, PostStatus::Scheduled);
}

#[tokio::test]
async fn test_publish_now_uses_configured_credentials() {
    let (site, seen) = spawn_fake_wordpress(StatusCode::CREATED, json!({"link": "https://blog.example.com/winter"})).await;

    let pool = setup_test_db().await;
    let id = db::posts::insert_post(&pool, &sample_post(TOPIC)).await.unwrap();
    let config = TomlConfig {
        wordpress: WordPressConfig {
            url: Some(site),
            username: Some("editor".to_string()),
            password: Some("app-pass".to_string()),
        },
        ..Default::default()
    };
    let app = build_router(test_state_with_config(pool.clone(), config));

    let response = app
        .oneshot(json_request("POST", "/api/posts/publish", json!({"id": id, "status": "publish"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let captured = seen.lock().unwrap().clone();
    assert_eq!(captured[0].body["status"], "publish");
    assert!(captured[0].body.get("date").is_none());

    let stored = db::posts::get_post(&pool, id).await.unwrap().unwrap();
    assert_eq!(stored.post.status, PostStatus::Published);
}

#[tokio::test]
async fn test_rejected_publish_forwards_status_and_keeps_record() {
    let (site, _) = spawn_fake_wordpress(
        StatusCode::FORBIDDEN,
        json!({"code": "rest_cannot_create", "message": "Sorry, you are not allowed to create posts as this user."}),
    )
    .await;

    let pool = setup_test_db().await;
    let id = db::posts::insert_post(&pool, &sample_post(TOPIC)).await.unwrap();
    let app = build_router(test_state(pool.clone()));

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/posts/publish",
            json!({"id": id, "wpUrl": site, "wpUser": "editor", "wpPass": "wrong", "status": "publish"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "PUBLISH_ERROR");
    assert!(body["error"]["message"].as_str().unwrap().contains("not allowed"));

    let stored = db::posts::get_post(&pool, id).await.unwrap().unwrap();
    assert_eq!(stored.post.status, PostStatus::Draft);
}

#[tokio::test]
async fn test_publish_without_credentials_is_config_error() {
    let pool = setup_test_db().await;
    let id = db::posts::insert_post(&pool, &sample_post(TOPIC)).await.unwrap();
    let app = build_router(test_state(pool));

    let response = app
        .oneshot(json_request("POST", "/api/posts/publish", json!({"id": id})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"]["code"], "CONFIG_ERROR");
}

#[tokio::test]
async fn test_publish_unknown_post_is_not_found() {
    let app = build_router(test_state(setup_test_db().await));

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/posts/publish",
            json!({"id": 999, "wpUrl": "http://127.0.0.1:9", "wpUser": "u", "wpPass": "p"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
