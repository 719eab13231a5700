//! Content generation pipeline
//!
//! Fixed four-stage sequence of generative calls followed by the rule-based
//! audit, the AI audit and the publication gate. The orchestrator holds no
//! storage of its own: products, related posts and persistence are reached
//! through collaborator traits, so runs can be driven by fakes in tests.
//!
//! A run either persists exactly one post (the last step) or fails without
//! side effects. Dropping the run future before completion persists nothing.

use async_trait::async_trait;
use ccos_common::models::{NewPost, ProductRecord};
use chrono::Utc;
use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{GenerationRequest, PriorPost, RelatedPost};
use crate::services::decision_engine::{self, Decision};
use crate::services::genai_client::{generate_structured, GenAiError, GenerativeService, ResponseMode};
use crate::services::prompt_composer::{self, PromptContext};
use crate::services::rule_auditor::{self, AuditContext, MAX_PRIOR_POSTS};
use crate::services::stages::{
    AiAudit, FinalDraft, PainPointAnalysis, Stage, StageOutput, EXPECTED_PAIN_POINTS,
};
use crate::services::structured_data;
use crate::services::tracking_link::build_tracking_link;

/// Same-category posts offered as internal-link candidates
pub const RELATED_POST_LIMIT: usize = 3;

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Generation failed at {stage}: {source}")]
    Generation {
        stage: Stage,
        #[source]
        source: GenAiError,
    },

    #[error("Content store error: {0}")]
    Store(#[from] ccos_common::Error),
}

impl PipelineError {
    fn at(stage: Stage) -> impl FnOnce(GenAiError) -> PipelineError {
        move |source| PipelineError::Generation { stage, source }
    }
}

/// Product master lookup
#[async_trait]
pub trait ProductLookup: Send + Sync {
    async fn product(&self, id: i64) -> ccos_common::Result<Option<ProductRecord>>;
}

/// Queries over previously generated posts
#[async_trait]
pub trait RelatedPosts: Send + Sync {
    /// Posts in `category`, newest first, excluding `exclude_id`
    async fn in_category(
        &self,
        category: &str,
        exclude_id: Option<i64>,
        limit: usize,
    ) -> ccos_common::Result<Vec<RelatedPost>>;

    /// Posts generated for `product_id`, newest first
    async fn for_product(&self, product_id: i64, limit: usize) -> ccos_common::Result<Vec<PriorPost>>;
}

/// Post persistence
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Store a new post and return its id
    async fn insert(&self, post: &NewPost) -> ccos_common::Result<i64>;
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub id: i64,
    pub post: NewPost,
    pub decision: Decision,
}

/// Pipeline orchestrator, borrowed per request
pub struct ContentPipeline<'a> {
    genai: &'a dyn GenerativeService,
    products: &'a dyn ProductLookup,
    related: &'a dyn RelatedPosts,
    posts: &'a dyn PostRepository,
}

impl<'a> ContentPipeline<'a> {
    pub fn new(
        genai: &'a dyn GenerativeService,
        products: &'a dyn ProductLookup,
        related: &'a dyn RelatedPosts,
        posts: &'a dyn PostRepository,
    ) -> Self {
        Self {
            genai,
            products,
            related,
            posts,
        }
    }

    /// Run the full pipeline for one request
    ///
    /// **Algorithm:**
    /// 1. Resolve the product reference and rewrite its link for tracking
    /// 2. Load internal-link candidates and prior posts for the same product
    /// 3. Stage 1 pain-point analysis, stage 2 draft, stage 3 quality gate
    /// 4. Rule-based audit of the final text, then stage 4 AI audit
    /// 5. Merge findings and decide the status
    /// 6. Append structured data and persist the post
    ///
    /// Any generation failure aborts the run before step 6.
    pub async fn run(&self, request: &GenerationRequest) -> Result<PipelineOutcome, PipelineError> {
        if request.topic.trim().is_empty() {
            return Err(PipelineError::InvalidRequest("topic must not be empty".to_string()));
        }

        let run_id = Uuid::new_v4();
        tracing::info!(
            run_id = %run_id,
            topic = %request.topic,
            platform = %request.platform,
            page_type = %request.page_type,
            model = %self.genai.model(),
            "Starting content pipeline"
        );

        let product = match request.product_id {
            Some(id) => {
                let product = self.products.product(id).await?;
                if product.is_none() {
                    tracing::warn!(run_id = %run_id, product_id = id, "Referenced product not found, continuing without it");
                }
                product
            }
            None => None,
        };

        let tracking_link = resolve_tracking_link(request, product.as_ref());

        let related_posts = self
            .related
            .in_category(&request.category, None, RELATED_POST_LIMIT)
            .await?;
        let prior_posts = match &product {
            Some(p) => self.related.for_product(p.id, MAX_PRIOR_POSTS).await?,
            None => Vec::new(),
        };

        tracing::debug!(
            run_id = %run_id,
            product = product.as_ref().map(|p| p.sku.as_str()).unwrap_or("-"),
            related = related_posts.len(),
            prior = prior_posts.len(),
            "Pipeline context resolved"
        );

        let ctx = PromptContext {
            request,
            product: product.as_ref(),
            tracking_link: tracking_link.as_deref(),
            related_posts: &related_posts,
            prior_posts: &prior_posts,
        };

        // Stage 1
        let analysis: PainPointAnalysis = self
            .structured_stage(Stage::PainPointAnalysis, &prompt_composer::pain_point_prompt(&ctx))
            .await?;
        if analysis.pain_points.len() != EXPECTED_PAIN_POINTS {
            tracing::warn!(
                run_id = %run_id,
                pain_points = analysis.pain_points.len(),
                expected = EXPECTED_PAIN_POINTS,
                "Pain-point count differs from request, continuing"
            );
        }
        tracing::info!(run_id = %run_id, stage = %Stage::PainPointAnalysis, "Stage complete");

        // Stage 2
        let draft = self
            .genai
            .generate(&prompt_composer::copywriting_prompt(&ctx, &analysis), ResponseMode::Text)
            .await
            .map_err(PipelineError::at(Stage::DraftCopywriting))?;
        if draft.trim().is_empty() {
            return Err(PipelineError::Generation {
                stage: Stage::DraftCopywriting,
                source: GenAiError::EmptyResponse,
            });
        }
        tracing::info!(
            run_id = %run_id,
            stage = %Stage::DraftCopywriting,
            draft_chars = draft.chars().count(),
            "Stage complete"
        );

        // Stage 3
        let final_draft: FinalDraft = self
            .structured_stage(
                Stage::QualityGateRewrite,
                &prompt_composer::quality_gate_prompt(&ctx, &draft),
            )
            .await?;
        tracing::info!(run_id = %run_id, stage = %Stage::QualityGateRewrite, "Stage complete");

        let prohibited = product
            .as_ref()
            .map(ProductRecord::prohibited_expression_list)
            .unwrap_or_default();
        let rule_report = rule_auditor::audit(
            &final_draft.final_content,
            &AuditContext {
                topic: &request.topic,
                disclosure: request.disclosure_type,
                personal_data: request.personal_data(),
                tracking_link: tracking_link.as_deref(),
                had_link_candidates: !related_posts.is_empty(),
                prior_posts: &prior_posts,
                prohibited_expressions: &prohibited,
            },
        );

        // Stage 4
        let ai_audit: AiAudit = self
            .structured_stage(Stage::AiAudit, &prompt_composer::audit_prompt(&final_draft.final_content))
            .await?;
        tracing::info!(
            run_id = %run_id,
            stage = %Stage::AiAudit,
            score = ai_audit.score(),
            "Stage complete"
        );

        let decision = decision_engine::decide(rule_report, ai_audit, request.schedule);

        let FinalDraft {
            final_content,
            meta_description,
            quality_notes,
            hashtags,
            disclaimer,
        } = final_draft;

        let product_name = product.as_ref().map(|p| p.name.as_str()).unwrap_or(request.topic.as_str());
        let content = structured_data::inject(
            final_content,
            request.platform,
            &request.page_type,
            product_name,
            &meta_description,
        );

        let post = NewPost {
            topic: request.topic.clone(),
            content,
            meta_description,
            product_link: tracking_link,
            product_id: product.as_ref().map(|p| p.id),
            platform: request.platform,
            quality_notes,
            hashtags,
            disclaimer,
            audit_score: decision.score,
            audit_fails: decision.fails.clone(),
            audit_warns: decision.warns.clone(),
            audit_checklist: decision.fix_suggestions.clone(),
            disclosure_type: request.disclosure_type,
            video_link: request.video_link().map(str::to_string),
            page_type: request.page_type.clone(),
            personal_data: request.personal_data().map(str::to_string),
            category: request.category.clone(),
            status: decision.status,
            created_at: Utc::now(),
        };

        let id = self.posts.insert(&post).await?;

        tracing::info!(
            run_id = %run_id,
            post_id = id,
            status = post.status.as_str(),
            score = decision.score,
            fails = decision.fails.len(),
            warns = decision.warns.len(),
            "Content pipeline complete"
        );

        Ok(PipelineOutcome { id, post, decision })
    }

    /// JSON-mode call parsed and validated into `T`
    async fn structured_stage<T>(&self, stage: Stage, prompt: &str) -> Result<T, PipelineError>
    where
        T: DeserializeOwned + StageOutput + Send,
    {
        let value = generate_structured::<T>(self.genai, prompt)
            .await
            .and_then(|structured| structured.into_result())
            .map_err(PipelineError::at(stage))?;

        value
            .validate()
            .map_err(|reason| PipelineError::at(stage)(GenAiError::Malformed(reason)))?;

        Ok(value)
    }
}

/// Product link to track: the resolved product's link wins over the request's
fn resolve_tracking_link(request: &GenerationRequest, product: Option<&ProductRecord>) -> Option<String> {
    let product_link = product
        .map(|p| p.product_link.trim())
        .filter(|l| !l.is_empty());
    let raw = product_link.or_else(|| request.product_link())?;
    let sku = product.map(|p| p.sku.as_str()).unwrap_or("");

    Some(build_tracking_link(raw, request.platform, sku, &request.page_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccos_common::models::PageType;

    fn product(link: &str) -> ProductRecord {
        ProductRecord {
            id: 4,
            sku: "H-004".to_string(),
            name: "유기농 효소 밸런스 365".to_string(),
            usp: String::new(),
            target: String::new(),
            price: 28000,
            shipping: String::new(),
            usage: String::new(),
            precautions: String::new(),
            faq: String::new(),
            product_link: link.to_string(),
            options: None,
            as_info: None,
            prohibited_expressions: None,
            mandatory_disclaimer: None,
            evidence_data: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_no_link_means_no_tracking_link() {
        let request = GenerationRequest::new("topic");
        assert_eq!(resolve_tracking_link(&request, None), None);
    }

    #[test]
    fn test_product_link_overrides_request_link() {
        let mut request = GenerationRequest::new("topic");
        request.product_link = Some("https://other.example.com/x".to_string());
        request.page_type = PageType::Story;
        let product = product("https://smartstore.naver.com/example/products/4");

        let link = resolve_tracking_link(&request, Some(&product)).unwrap();
        assert!(link.starts_with("https://smartstore.naver.com/example/products/4?"));
        assert!(link.contains("sku=H-004"));
        assert!(link.contains("intent=story"));
    }

    #[test]
    fn test_request_link_used_without_product() {
        let mut request = GenerationRequest::new("topic");
        request.product_link = Some("https://other.example.com/x".to_string());
        let link = resolve_tracking_link(&request, None).unwrap();
        assert!(link.contains("sku=N%2FA"));
    }

    #[test]
    fn test_stage_named_in_generation_error() {
        let err = PipelineError::at(Stage::PainPointAnalysis)(GenAiError::Malformed("expected value".to_string()));
        assert!(err.to_string().contains("stage 1 (pain-point analysis)"));
    }
}
