//! Generative text service client
//!
//! The pipeline talks to the generative service only through the
//! [`GenerativeService`] trait; [`GeminiClient`] is the production
//! implementation over the Gemini `generateContent` REST API.
//!
//! Structured (JSON-mode) responses come from an untrusted boundary, so they
//! are parsed into [`Structured`] instead of being assumed valid.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const USER_AGENT: &str = concat!("ccos-cg/", env!("CARGO_PKG_VERSION"));
const TEXT_TEMPERATURE: f32 = 0.7;

/// Generative service errors
#[derive(Debug, Error)]
pub enum GenAiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Generative service returned no text")]
    EmptyResponse,

    #[error("Malformed structured response: {0}")]
    Malformed(String),
}

/// Response mode requested from the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// Free text (markdown)
    Text,
    /// A single JSON object or array, nothing else
    Json,
}

/// Generative text service boundary
#[async_trait]
pub trait GenerativeService: Send + Sync {
    /// Model identifier sent with each call
    fn model(&self) -> &str;

    /// Send one prompt and return the raw response text
    async fn generate(&self, prompt: &str, mode: ResponseMode) -> Result<String, GenAiError>;
}

/// Outcome of parsing a JSON-mode response
#[derive(Debug, Clone, PartialEq)]
pub enum Structured<T> {
    Parsed(T),
    Malformed { reason: String, raw: String },
}

impl<T: DeserializeOwned> Structured<T> {
    /// Parse raw response text, tolerating a surrounding ```json fence
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<T>(strip_code_fence(raw)) {
            Ok(value) => Structured::Parsed(value),
            Err(e) => Structured::Malformed {
                reason: e.to_string(),
                raw: raw.to_string(),
            },
        }
    }
}

impl<T> Structured<T> {
    pub fn into_result(self) -> Result<T, GenAiError> {
        match self {
            Structured::Parsed(value) => Ok(value),
            Structured::Malformed { reason, raw } => {
                tracing::debug!(raw_len = raw.len(), "Discarding malformed structured response");
                Err(GenAiError::Malformed(reason))
            }
        }
    }
}

/// JSON-mode call followed by parsing into `T`
pub async fn generate_structured<T: DeserializeOwned>(
    service: &dyn GenerativeService,
    prompt: &str,
) -> Result<Structured<T>, GenAiError> {
    let raw = service.generate(prompt, ResponseMode::Json).await?;
    Ok(Structured::parse(&raw))
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    if let Some(rest) = trimmed.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        if let Some(body) = rest.strip_suffix("```") {
            return body.trim();
        }
    }
    trimmed
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

/// Gemini REST client
pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self, GenAiError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| GenAiError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
            model,
            base_url: GEMINI_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different endpoint root (proxies, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl GenerativeService for GeminiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str, mode: ResponseMode) -> Result<String, GenAiError> {
        let generation_config = match mode {
            ResponseMode::Text => GenerationConfig {
                response_mime_type: None,
                temperature: Some(TEXT_TEMPERATURE),
            },
            ResponseMode::Json => GenerationConfig {
                response_mime_type: Some("application/json"),
                temperature: None,
            },
        };
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config,
        };

        tracing::debug!(
            model = %self.model,
            mode = ?mode,
            prompt_chars = prompt.chars().count(),
            "Calling generative service"
        );

        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenAiError::Network(e.to_string()))?;

        let status = response.status();

        if status == 401 || status == 403 {
            return Err(GenAiError::InvalidApiKey);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&error_text)
                .ok()
                .and_then(|b| b.error)
                .and_then(|e| e.message)
                .unwrap_or(error_text);
            return Err(GenAiError::Api(status.as_u16(), message));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenAiError::Malformed(e.to_string()))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(GenAiError::EmptyResponse);
        }

        Ok(text)
    }
}
