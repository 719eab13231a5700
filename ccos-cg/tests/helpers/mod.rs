//! Shared fixtures for ccos-cg integration tests
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    response::Response,
    routing::post,
    Json, Router,
};
use ccos_cg::services::genai_client::{GenAiError, GenerativeService, ResponseMode};
use ccos_cg::services::WordPressPublisher;
use ccos_cg::AppState;
use ccos_common::config::TomlConfig;
use ccos_common::models::{DisclosureType, NewPost, PageType, Platform, PostStatus};
use chrono::Utc;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

pub async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    ccos_common::db::init_schema(&pool).await.unwrap();
    pool
}

pub fn test_state(pool: SqlitePool) -> AppState {
    test_state_with_config(pool, TomlConfig::default())
}

pub fn test_state_with_config(pool: SqlitePool, config: TomlConfig) -> AppState {
    let publisher = WordPressPublisher::new(Duration::from_secs(5)).unwrap();
    AppState::new(pool, config, publisher)
}

/// Generative service replaying canned responses in call order
pub struct ScriptedService {
    responses: Mutex<VecDeque<Result<String, GenAiError>>>,
    calls: Mutex<Vec<(String, ResponseMode)>>,
}

impl ScriptedService {
    pub fn new(responses: Vec<Result<String, GenAiError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(responses: &[String]) -> Arc<Self> {
        Self::new(responses.iter().cloned().map(Ok).collect())
    }

    pub fn calls(&self) -> Vec<(String, ResponseMode)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeService for ScriptedService {
    fn model(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, prompt: &str, mode: ResponseMode) -> Result<String, GenAiError> {
        self.calls.lock().unwrap().push((prompt.to_string(), mode));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(GenAiError::EmptyResponse))
    }
}

/// Article that passes every rule for `topic` when no product, disclosure
/// or personal data is involved
pub fn compliant_article(topic: &str) -> String {
    [
        format!("## {} 원인", topic),
        "실내 난방으로 습도가 낮아지면 피부 장벽이 약해지고 각질이 쉽게 일어납니다.".to_string(),
        "## 관리 체크리스트".to_string(),
        "- [ ] 세안 후 3분 안에 보습제 바르기\n- [ ] 실내 습도 40% 이상 유지".to_string(),
        "[사진: 실제 제형 비교]".to_string(),
        "## FAQ".to_string(),
        "FAQ 1. 하루 몇 번 바르나요? FAQ 2. 지성 피부도 괜찮나요? FAQ 3. 아이도 써도 되나요?".to_string(),
    ]
    .join("\n\n")
}

pub fn pain_points_response() -> String {
    json!({
        "pain_points": ["세안 후 당김", "각질 부각", "화장 들뜸"],
        "value_prop": "생활 습관만 바꿔도 체감되는 보습 루틴"
    })
    .to_string()
}

pub fn final_draft_response(final_content: &str) -> String {
    json!({
        "final_content": final_content,
        "meta_description": "겨울철 건조한 피부를 위한 보습 루틴 정리",
        "quality_notes": "체크리스트와 FAQ 보강",
        "hashtags": ["#겨울보습", "#건조피부"],
        "disclaimer": ""
    })
    .to_string()
}

pub fn ai_audit_response(score: u32) -> String {
    json!({
        "score": score,
        "fail": [],
        "warn": [],
        "fix_suggestions": ["사례 수치를 하나 더 추가"]
    })
    .to_string()
}

/// Four responses for one full pipeline run
pub fn pipeline_script(topic: &str, score: u32) -> Vec<String> {
    vec![
        pain_points_response(),
        format!("# 초안\n\n{}", compliant_article(topic)),
        final_draft_response(&compliant_article(topic)),
        ai_audit_response(score),
    ]
}

pub fn sample_post(topic: &str) -> NewPost {
    NewPost {
        topic: topic.to_string(),
        content: compliant_article(topic),
        meta_description: "meta".to_string(),
        product_link: None,
        product_id: None,
        platform: Platform::Wordpress,
        quality_notes: String::new(),
        hashtags: vec![],
        disclaimer: String::new(),
        audit_score: 88,
        audit_fails: vec![],
        audit_warns: vec![],
        audit_checklist: vec![],
        disclosure_type: DisclosureType::None,
        video_link: None,
        page_type: PageType::Info,
        personal_data: None,
        category: "General".to_string(),
        status: PostStatus::Draft,
        created_at: Utc::now(),
    }
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Request captured by the fake WordPress site
#[derive(Debug, Clone)]
pub struct CapturedPost {
    pub authorization: Option<String>,
    pub body: Value,
}

/// Local stand-in for `{site}/wp-json/wp/v2/posts`
pub async fn spawn_fake_wordpress(status: StatusCode, reply: Value) -> (String, Arc<Mutex<Vec<CapturedPost>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    let app = Router::new().route(
        "/wp-json/wp/v2/posts",
        post(move |headers: HeaderMap, Json(body): Json<Value>| {
            let seen = seen_clone.clone();
            let reply = reply.clone();
            async move {
                let authorization = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                seen.lock().unwrap().push(CapturedPost { authorization, body });
                (status, Json(reply))
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), seen)
}
