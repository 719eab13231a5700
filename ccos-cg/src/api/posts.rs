//! Stored post endpoints: listing, publishing, winning-template flag

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use ccos_common::models::GeneratedPost;
use serde::{Deserialize, Serialize};

use crate::db::posts;
use crate::services::wordpress_publisher::{PublishMode, WordPressCredentials};
use crate::{ApiError, ApiResult, AppState};

/// GET /api/posts
pub async fn list_posts(State(state): State<AppState>) -> ApiResult<Json<Vec<GeneratedPost>>> {
    Ok(Json(posts::list_posts(&state.db).await?))
}

/// GET /api/posts/:id
pub async fn get_post(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<GeneratedPost>> {
    posts::get_post(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Post {}", id)))
}

/// Publish request; credentials are optional when configured in TOML
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    pub id: i64,
    #[serde(default)]
    pub wp_url: Option<String>,
    #[serde(default)]
    pub wp_user: Option<String>,
    #[serde(default)]
    pub wp_pass: Option<String>,
    #[serde(default)]
    pub status: PublishMode,
}

#[derive(Debug, Serialize)]
pub struct PublishResponse {
    pub success: bool,
    pub link: Option<String>,
}

/// POST /api/posts/publish
///
/// **Behavior:**
/// 1. Load the stored post by id
/// 2. Resolve WordPress credentials (request, then `[wordpress]` config)
/// 3. Create the WordPress post
/// 4. On HTTP 201 only, update the local status to match the mode
///
/// **Errors:**
/// - 404 Not Found: unknown post id
/// - 500 CONFIG_ERROR: no credentials from either source
/// - upstream status (or 502) PUBLISH_ERROR: WordPress refused; record untouched
pub async fn publish_post(
    State(state): State<AppState>,
    Json(payload): Json<PublishRequest>,
) -> ApiResult<Json<PublishResponse>> {
    let stored = posts::get_post(&state.db, payload.id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Post {}", payload.id)))?;

    let credentials = WordPressCredentials::resolve(
        payload.wp_url.as_deref(),
        payload.wp_user.as_deref(),
        payload.wp_pass.as_deref(),
        &state.config.wordpress,
    )?;

    let receipt = state
        .publisher
        .publish(&credentials, &stored.post.topic, &stored.post.content, payload.status)
        .await?;

    let status = payload.status.resulting_status();
    posts::update_status(&state.db, stored.id, status).await?;

    tracing::info!(
        post_id = stored.id,
        status = status.as_str(),
        link = receipt.link.as_deref().unwrap_or("-"),
        "Post published to WordPress"
    );

    Ok(Json(PublishResponse {
        success: true,
        link: receipt.link,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WinningResponse {
    pub is_winning_template: bool,
}

/// POST /api/posts/:id/winning
pub async fn toggle_winning(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<WinningResponse>> {
    let is_winning_template = posts::toggle_winning_template(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Post {}", id)))?;

    tracing::info!(post_id = id, is_winning_template, "Winning template flag toggled");
    Ok(Json(WinningResponse { is_winning_template }))
}

pub fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/api/posts", get(list_posts))
        .route("/api/posts/publish", post(publish_post))
        .route("/api/posts/:id", get(get_post))
        .route("/api/posts/:id/winning", post(toggle_winning))
}
