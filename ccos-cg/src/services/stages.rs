//! Structured outputs expected from the JSON-mode pipeline stages
//!
//! Keys are requested in snake_case; camelCase aliases are accepted because
//! the service does not always follow the requested casing. Beyond JSON
//! well-formedness each shape has a `validate` step; a shape that parses but
//! fails validation is treated the same as malformed output.

use ccos_common::models::AuditFinding;
use serde::Deserialize;
use std::fmt;

/// Pipeline stage identifiers, used in errors and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    PainPointAnalysis,
    DraftCopywriting,
    QualityGateRewrite,
    AiAudit,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::PainPointAnalysis => "stage 1 (pain-point analysis)",
            Stage::DraftCopywriting => "stage 2 (draft copywriting)",
            Stage::QualityGateRewrite => "stage 3 (quality-gate rewrite)",
            Stage::AiAudit => "stage 4 (AI audit)",
        };
        f.write_str(name)
    }
}

/// Semantic validation applied after JSON parsing
pub trait StageOutput {
    fn validate(&self) -> Result<(), String>;
}

/// Number of pain points the analysis prompt asks for
pub const EXPECTED_PAIN_POINTS: usize = 3;

/// Stage 1 output
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PainPointAnalysis {
    #[serde(alias = "painPoints")]
    pub pain_points: Vec<String>,
    #[serde(alias = "valueProp")]
    pub value_prop: String,
}

impl StageOutput for PainPointAnalysis {
    fn validate(&self) -> Result<(), String> {
        if self.pain_points.iter().all(|p| p.trim().is_empty()) {
            return Err("pain_points is empty".to_string());
        }
        if self.value_prop.trim().is_empty() {
            return Err("value_prop is empty".to_string());
        }
        Ok(())
    }
}

/// Stage 3 output
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FinalDraft {
    #[serde(alias = "finalContent")]
    pub final_content: String,
    #[serde(alias = "metaDescription", default)]
    pub meta_description: String,
    #[serde(alias = "qualityNotes", default)]
    pub quality_notes: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub disclaimer: String,
}

impl StageOutput for FinalDraft {
    fn validate(&self) -> Result<(), String> {
        if self.final_content.trim().is_empty() {
            return Err("final_content is empty".to_string());
        }
        Ok(())
    }
}

/// Stage 4 output
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AiAudit {
    pub score: f64,
    #[serde(default)]
    pub fail: Vec<AuditFinding>,
    #[serde(default)]
    pub warn: Vec<AuditFinding>,
    #[serde(alias = "fixSuggestions", default)]
    pub fix_suggestions: Vec<String>,
}

impl AiAudit {
    /// Score as an integer in 0..=100 (call after `validate`)
    pub fn score(&self) -> u32 {
        self.score.round().clamp(0.0, 100.0) as u32
    }
}

impl StageOutput for AiAudit {
    fn validate(&self) -> Result<(), String> {
        if !(0.0..=100.0).contains(&self.score) {
            return Err(format!("score {} outside 0..=100", self.score));
        }
        Ok(())
    }
}

/// Sourced keyword candidate (keyword research call)
#[derive(Debug, Clone, PartialEq, Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcedKeyword {
    pub keyword: String,
    #[serde(default)]
    pub volume: Option<i64>,
    #[serde(alias = "competition_ratio", default)]
    pub competition_ratio: Option<f64>,
}

impl StageOutput for Vec<SourcedKeyword> {
    fn validate(&self) -> Result<(), String> {
        if self.iter().any(|k| k.keyword.trim().is_empty()) {
            return Err("keyword entry without keyword text".to_string());
        }
        Ok(())
    }
}
