//! Keyword research endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use ccos_common::models::KeywordRecord;
use serde::Deserialize;

use crate::db::keywords;
use crate::services::genai_client::GenAiError;
use crate::services::keyword_planner::KeywordPlanner;
use crate::services::stages::SourcedKeyword;
use crate::{ApiError, ApiResult, AppState};

fn generation_error(operation: &str) -> impl FnOnce(GenAiError) -> ApiError + '_ {
    move |e| ApiError::Generation(format!("{} failed: {}", operation, e))
}

/// GET /api/keywords
pub async fn list_keywords(State(state): State<AppState>) -> ApiResult<Json<Vec<KeywordRecord>>> {
    Ok(Json(keywords::list_keywords(&state.db).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateKeywordRequest {
    pub keyword: String,
    #[serde(default)]
    pub volume: Option<i64>,
    #[serde(default)]
    pub competition_ratio: Option<f64>,
}

/// POST /api/keywords
///
/// Blank or already-known keywords are rejected with 400.
pub async fn create_keyword(
    State(state): State<AppState>,
    Json(payload): Json<CreateKeywordRequest>,
) -> ApiResult<(StatusCode, Json<KeywordRecord>)> {
    let record =
        keywords::create_keyword(&state.db, &payload.keyword, payload.volume, payload.competition_ratio).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// POST /api/keywords/source
///
/// One JSON-mode call; new keywords are stored, known ones left as they are.
/// Returns the full sourced list either way.
pub async fn source_keywords(State(state): State<AppState>) -> ApiResult<Json<Vec<SourcedKeyword>>> {
    let genai = state.generative_service().await?;
    let sourced = KeywordPlanner::new(genai.as_ref())
        .source()
        .await
        .map_err(generation_error("Keyword sourcing"))?;

    let mut inserted = 0;
    for candidate in &sourced {
        if keywords::insert_keyword_if_absent(&state.db, &candidate.keyword, candidate.volume, candidate.competition_ratio)
            .await?
        {
            inserted += 1;
        }
    }

    tracing::info!(sourced = sourced.len(), inserted, "Keyword sourcing stored");
    Ok(Json(sourced))
}

#[derive(Debug, Deserialize)]
pub struct PlanKeywordRequest {
    pub id: i64,
}

/// POST /api/keywords/plan
///
/// Drafts an outline for a stored keyword and marks it planned.
pub async fn plan_keyword(
    State(state): State<AppState>,
    Json(payload): Json<PlanKeywordRequest>,
) -> ApiResult<Json<KeywordRecord>> {
    let not_found = || ApiError::NotFound(format!("Keyword {}", payload.id));

    let keyword = keywords::get_keyword(&state.db, payload.id)
        .await?
        .ok_or_else(not_found)?;

    let genai = state.generative_service().await?;
    let outline = KeywordPlanner::new(genai.as_ref())
        .outline(&keyword.keyword)
        .await
        .map_err(generation_error("Keyword planning"))?;

    if !keywords::set_outline(&state.db, keyword.id, &outline).await? {
        return Err(not_found());
    }

    keywords::get_keyword(&state.db, keyword.id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

/// DELETE /api/keywords/:id
pub async fn delete_keyword(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    if !keywords::delete_keyword(&state.db, id).await? {
        return Err(ApiError::NotFound(format!("Keyword {}", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub fn keyword_routes() -> Router<AppState> {
    Router::new()
        .route("/api/keywords", get(list_keywords).post(create_keyword))
        .route("/api/keywords/source", post(source_keywords))
        .route("/api/keywords/plan", post(plan_keyword))
        .route("/api/keywords/:id", delete(delete_keyword))
}
