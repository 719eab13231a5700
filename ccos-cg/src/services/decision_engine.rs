//! Publication gate
//!
//! Merges rule-based and AI findings and decides the initial post status.
//! A post with any fail, more than [`MAX_WARNINGS`] warnings, or a score
//! below [`MIN_PASSING_SCORE`] is always held as a draft.

use ccos_common::models::{AuditFinding, PostStatus};
use serde::Serialize;

use crate::services::rule_auditor::RuleAuditReport;
use crate::services::stages::AiAudit;

pub const MAX_WARNINGS: usize = 3;
pub const MIN_PASSING_SCORE: u32 = 70;

/// API-level audit verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Pass,
    Reject,
}

impl From<PostStatus> for Verdict {
    fn from(status: PostStatus) -> Self {
        match status {
            PostStatus::Draft => Verdict::Reject,
            PostStatus::Published | PostStatus::Scheduled => Verdict::Pass,
        }
    }
}

/// Merged audit outcome for one post
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub status: PostStatus,
    pub score: u32,
    pub fails: Vec<AuditFinding>,
    pub warns: Vec<AuditFinding>,
    pub fix_suggestions: Vec<String>,
}

impl Decision {
    pub fn verdict(&self) -> Verdict {
        self.status.into()
    }
}

/// Status rule on its own, for callers that already hold counts
///
/// `score` is the raw AI score; rounding only applies to the stored value.
pub fn initial_status(fail_count: usize, warn_count: usize, score: f64, schedule: bool) -> PostStatus {
    if fail_count > 0 || warn_count > MAX_WARNINGS || score < f64::from(MIN_PASSING_SCORE) {
        PostStatus::Draft
    } else if schedule {
        PostStatus::Scheduled
    } else {
        PostStatus::Published
    }
}

/// Merge rule findings (first) with AI findings and decide the status
///
/// The score comes only from the AI audit.
pub fn decide(rules: RuleAuditReport, ai: AiAudit, schedule: bool) -> Decision {
    let score = ai.score();
    let mut fails = rules.fails;
    fails.extend(ai.fail);
    let mut warns = rules.warns;
    warns.extend(ai.warn);

    let status = initial_status(fails.len(), warns.len(), ai.score, schedule);

    Decision {
        status,
        score,
        fails,
        warns,
        fix_suggestions: ai.fix_suggestions,
    }
}
