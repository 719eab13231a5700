//! Content generation endpoint

use axum::{extract::State, routing::post, Json, Router};
use ccos_common::models::{AuditFinding, PostStatus};
use serde::Serialize;

use crate::db::SqliteContentStore;
use crate::models::GenerationRequest;
use crate::services::decision_engine::Verdict;
use crate::services::pipeline::{ContentPipeline, PipelineOutcome};
use crate::{ApiError, ApiResult, AppState};

/// Audit part of the generation response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditSummary {
    pub score: u32,
    pub fail: Vec<AuditFinding>,
    pub warn: Vec<AuditFinding>,
    pub fix_suggestions: Vec<String>,
    /// Stored post status
    pub status: PostStatus,
    pub verdict: Verdict,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub id: i64,
    pub content: String,
    pub meta_description: String,
    pub quality_notes: String,
    pub hashtags: Vec<String>,
    pub disclaimer: String,
    pub audit: AuditSummary,
}

impl From<PipelineOutcome> for GenerateResponse {
    fn from(outcome: PipelineOutcome) -> Self {
        let verdict = outcome.decision.verdict();
        let PipelineOutcome { id, post, decision } = outcome;

        Self {
            id,
            content: post.content,
            meta_description: post.meta_description,
            quality_notes: post.quality_notes,
            hashtags: post.hashtags,
            disclaimer: post.disclaimer,
            audit: AuditSummary {
                score: decision.score,
                fail: decision.fails,
                warn: decision.warns,
                fix_suggestions: decision.fix_suggestions,
                status: decision.status,
                verdict,
            },
        }
    }
}

/// POST /api/generate
///
/// Runs the full pipeline and stores the post. A blank topic is rejected
/// before the API key is resolved.
///
/// **Errors:**
/// - 400 Bad Request: blank topic
/// - 500 CONFIG_ERROR: no Gemini API key configured
/// - 502 GENERATION_ERROR: a stage failed; nothing stored
pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerationRequest>,
) -> ApiResult<Json<GenerateResponse>> {
    if request.topic.trim().is_empty() {
        return Err(ApiError::BadRequest("topic must not be empty".to_string()));
    }

    let genai = state.generative_service().await?;
    let store = SqliteContentStore::new(state.db.clone());
    let pipeline = ContentPipeline::new(genai.as_ref(), &store, &store, &store);

    let outcome = pipeline.run(&request).await?;
    Ok(Json(outcome.into()))
}

pub fn generate_routes() -> Router<AppState> {
    Router::new().route("/api/generate", post(generate))
}
