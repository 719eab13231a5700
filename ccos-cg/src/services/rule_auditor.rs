//! Rule-based compliance and spam-signal audit
//!
//! Deterministic checks over the final article text. Every check runs and
//! yields at most one finding. Positions and lengths are measured in
//! characters, not bytes, so Korean text is handled the same as ASCII.
//!
//! Thresholds are tunable heuristics, not protocol values.

use std::collections::HashSet;

use ccos_common::models::{AuditFinding, DisclosureType};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::PriorPost;
use crate::services::prompt_composer::INTERNAL_LINK_PREFIX;

/// Leading characters of the disclosure header that must appear in the text
pub const DISCLOSURE_PREFIX_CHARS: usize = 10;
/// Leading characters of the personal data that must appear in the text
pub const PERSONAL_DATA_PREFIX_CHARS: usize = 5;
pub const MIN_UNIQUE_PACK_ELEMENTS: usize = 2;
/// Minimum character distance between the ad marker and the first CTA
pub const AD_SAFE_DISTANCE_CHARS: usize = 150;
/// Paragraphs at or below this length are ignored by the duplicate check
pub const MIN_PARAGRAPH_CHARS: usize = 50;
pub const MAX_DUPLICATE_PARAGRAPHS: usize = 2;
/// Prior posts compared by the duplicate check
pub const MAX_PRIOR_POSTS: usize = 2;
pub const MIN_H2_SECTIONS: usize = 3;
pub const MIN_FAQ_MENTIONS: usize = 4;
pub const MAX_KEYWORD_DENSITY: f64 = 0.05;
pub const MAX_LINKS: usize = 5;
pub const MAX_REPEATED_LINKS: usize = 2;

pub const BANNED_PHRASES: [&str; 7] = [
    "무조건",
    "완치",
    "보장",
    "수익 확정",
    "100%",
    "최고의",
    "부작용 없는",
];

const AD_MARKER: &str = "[광고]";
const PURCHASE_MARKER: &str = "구매";
const TRUST_MARKERS: [&str; 2] = ["faq", "주의사항"];

pub const CODE_DISCLOSURE_MISSING: &str = "RULE_DISCLOSURE_MISSING";
pub const CODE_PERSONAL_DATA_MISSING: &str = "RULE_PERSONAL_DATA_MISSING";
pub const CODE_UNIQUE_PACK_LOW: &str = "RULE_UNIQUE_PACK_LOW";
pub const CODE_INTERNAL_LINK_MISSING: &str = "RULE_INTERNAL_LINK_MISSING";
pub const CODE_TRACKING_LINK_MISSING: &str = "RULE_TRACKING_LINK_MISSING";
pub const CODE_CTA_ORDER: &str = "RULE_CTA_ORDER";
pub const CODE_AD_SAFE_ZONE: &str = "RULE_AD_SAFE_ZONE";
pub const CODE_DUPLICATE_PARAGRAPHS: &str = "RULE_DUPLICATE_PARAGRAPHS";
pub const CODE_THIN_STRUCTURE: &str = "RULE_THIN_STRUCTURE";
pub const CODE_FAQ_SHALLOW: &str = "RULE_FAQ_SHALLOW";
pub const CODE_KEYWORD_STUFFING: &str = "RULE_KEYWORD_STUFFING";
pub const CODE_LINK_EXCESS: &str = "RULE_LINK_EXCESS";
pub const CODE_LINK_REPETITION: &str = "RULE_LINK_REPETITION";
pub const CODE_BANNED_PHRASE: &str = "RULE_BANNED_PHRASE";
pub const CODE_PROHIBITED_EXPRESSION: &str = "RULE_PROHIBITED_EXPRESSION";

static H2_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^## ").expect("H2 pattern is a valid regex"));

static FAQ_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)FAQ|자주 묻는 질문").expect("FAQ pattern is a valid regex"));

static MARKDOWN_LINK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[.*?\]\((.*?)\)").expect("markdown link pattern is a valid regex")
});

/// Inputs the checks need besides the article text
#[derive(Debug, Clone, Default)]
pub struct AuditContext<'a> {
    pub topic: &'a str,
    pub disclosure: DisclosureType,
    pub personal_data: Option<&'a str>,
    /// Tracking-rewritten product link, if any
    pub tracking_link: Option<&'a str>,
    /// Whether internal-link candidates were offered to the copywriter
    pub had_link_candidates: bool,
    /// Earlier posts for the same product, newest first
    pub prior_posts: &'a [PriorPost],
    /// Product-specific prohibited expressions
    pub prohibited_expressions: &'a [String],
}

/// Findings from one audit pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleAuditReport {
    pub fails: Vec<AuditFinding>,
    pub warns: Vec<AuditFinding>,
}

impl RuleAuditReport {
    fn fail(&mut self, finding: Option<AuditFinding>) {
        self.fails.extend(finding);
    }

    fn warn(&mut self, finding: Option<AuditFinding>) {
        self.warns.extend(finding);
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.fails.iter().chain(&self.warns).any(|f| f.code == code)
    }
}

/// Run every rule against `content`
pub fn audit(content: &str, ctx: &AuditContext<'_>) -> RuleAuditReport {
    let lowered = content.to_lowercase();
    let mut report = RuleAuditReport::default();

    report.fail(check_disclosure(content, ctx.disclosure));
    report.warn(check_personal_data(content, ctx.personal_data));
    report.warn(check_unique_pack(content));
    report.warn(check_internal_links(content, ctx.had_link_candidates));
    report.warn(check_tracking_link(content, ctx.tracking_link));
    report.warn(check_cta_order(&lowered));
    report.warn(check_ad_safe_zone(&lowered));
    report.fail(check_duplicate_paragraphs(content, ctx.prior_posts));
    report.fail(check_structure(content));
    report.warn(check_faq_depth(content));
    report.fail(check_keyword_density(content, ctx.topic));
    let (excess, repetition) = check_links(content);
    report.fail(excess);
    report.warn(repetition);
    report.fail(check_banned_phrases(content));
    report.fail(check_prohibited_expressions(content, ctx.prohibited_expressions));

    tracing::debug!(
        fails = report.fails.len(),
        warns = report.warns.len(),
        "Rule-based audit complete"
    );
    report
}

fn prefix_chars(text: &str, count: usize) -> &str {
    match text.char_indices().nth(count) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Character (not byte) offset of the first occurrence of `needle`
fn char_position(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .find(needle)
        .map(|byte_idx| haystack[..byte_idx].chars().count())
}

fn check_disclosure(content: &str, disclosure: DisclosureType) -> Option<AuditFinding> {
    let header = disclosure.header();
    if header.is_empty() || content.contains(prefix_chars(header, DISCLOSURE_PREFIX_CHARS)) {
        return None;
    }
    Some(AuditFinding::new(
        CODE_DISCLOSURE_MISSING,
        "경제적 이해관계 표시(광고/협찬 등)가 본문에 누락되었습니다.",
    ))
}

fn check_personal_data(content: &str, personal_data: Option<&str>) -> Option<AuditFinding> {
    let data = personal_data.map(str::trim).filter(|d| !d.is_empty())?;
    if content.contains(prefix_chars(data, PERSONAL_DATA_PREFIX_CHARS)) {
        return None;
    }
    Some(AuditFinding::new(
        CODE_PERSONAL_DATA_MISSING,
        "입력하신 '나만의 데이터'가 본문에 충분히 반영되지 않았을 수 있습니다.",
    ))
}

/// Number of distinct anti-spam elements present
pub fn unique_pack_count(content: &str) -> usize {
    let has_table = content.contains('|') && content.contains("---");
    let has_checklist = ["- [ ]", "체크리스트", "확인사항"]
        .iter()
        .any(|m| content.contains(m));
    let has_faq = content.contains("FAQ") || content.contains("자주 묻는 질문");
    let has_photo = content.contains("[사진:");

    [has_table, has_checklist, has_faq, has_photo]
        .into_iter()
        .filter(|present| *present)
        .count()
}

fn check_unique_pack(content: &str) -> Option<AuditFinding> {
    let count = unique_pack_count(content);
    if count >= MIN_UNIQUE_PACK_ELEMENTS {
        return None;
    }
    Some(AuditFinding::new(
        CODE_UNIQUE_PACK_LOW,
        format!(
            "Unique Pack 요소가 부족합니다 (현재 {}개). 표, 체크리스트, FAQ 등을 추가하는 것이 좋습니다.",
            count
        ),
    ))
}

fn check_internal_links(content: &str, had_candidates: bool) -> Option<AuditFinding> {
    if !had_candidates || content.contains(INTERNAL_LINK_PREFIX) {
        return None;
    }
    Some(AuditFinding::new(
        CODE_INTERNAL_LINK_MISSING,
        "관련 글 내부 링크가 본문에 포함되지 않았습니다.",
    ))
}

fn check_tracking_link(content: &str, tracking_link: Option<&str>) -> Option<AuditFinding> {
    let link = tracking_link.filter(|l| !l.is_empty())?;
    if content.contains(link) {
        return None;
    }
    Some(AuditFinding::new(
        CODE_TRACKING_LINK_MISSING,
        "수익화를 위한 트래킹 링크가 본문에 포함되지 않았거나 변형되었습니다.",
    ))
}

/// Trust content (FAQ / precautions) should come after the first purchase prompt
fn check_cta_order(lowered: &str) -> Option<AuditFinding> {
    let cta = char_position(lowered, PURCHASE_MARKER)?;
    let trust = TRUST_MARKERS
        .iter()
        .filter_map(|m| char_position(lowered, m))
        .min()?;

    if trust >= cta {
        return None;
    }
    Some(AuditFinding::new(
        CODE_CTA_ORDER,
        "CTA(구매 버튼)가 신뢰 섹션(FAQ/주의사항)보다 먼저 배치되었습니다. 우발 클릭 방지를 위해 순서를 조정하세요.",
    ))
}

fn check_ad_safe_zone(lowered: &str) -> Option<AuditFinding> {
    let ad = char_position(lowered, AD_MARKER)?;
    let cta = char_position(lowered, PURCHASE_MARKER)?;

    let distance = ad.abs_diff(cta);
    if distance >= AD_SAFE_DISTANCE_CHARS {
        return None;
    }
    Some(AuditFinding::new(
        CODE_AD_SAFE_ZONE,
        format!(
            "CTA(구매 버튼)와 광고 섹션이 너무 가깝습니다 ({}자). 우발 클릭 방지를 위해 최소 2문단 이상의 여백을 확보하세요.",
            distance
        ),
    ))
}

fn substantial_paragraphs(text: &str) -> impl Iterator<Item = &str> {
    text.split("\n\n")
        .filter(|p| p.chars().count() > MIN_PARAGRAPH_CHARS)
}

fn check_duplicate_paragraphs(content: &str, prior_posts: &[PriorPost]) -> Option<AuditFinding> {
    if prior_posts.is_empty() {
        return None;
    }

    let current: Vec<&str> = substantial_paragraphs(content).map(str::trim).collect();
    let mut duplicates = 0;
    for prior in prior_posts.iter().take(MAX_PRIOR_POSTS) {
        let previous: HashSet<&str> = substantial_paragraphs(&prior.content).map(str::trim).collect();
        duplicates += current.iter().filter(|p| previous.contains(*p)).count();
    }

    if duplicates <= MAX_DUPLICATE_PARAGRAPHS {
        return None;
    }
    Some(AuditFinding::new(
        CODE_DUPLICATE_PARAGRAPHS,
        format!(
            "[유사도 위반] 이전 발행글과 동일한 문단이 {}개 발견되었습니다. (기준: {}개 초과 시 Fail)",
            duplicates, MAX_DUPLICATE_PARAGRAPHS
        ),
    ))
}

fn check_structure(content: &str) -> Option<AuditFinding> {
    let h2_count = H2_PATTERN.find_iter(content).count();
    if h2_count >= MIN_H2_SECTIONS {
        return None;
    }
    Some(AuditFinding::new(
        CODE_THIN_STRUCTURE,
        format!(
            "[Thin Content] H2 소제목이 {}개로 {}개 미만입니다. 더 깊이 있는 정보를 제공하세요.",
            h2_count, MIN_H2_SECTIONS
        ),
    ))
}

fn check_faq_depth(content: &str) -> Option<AuditFinding> {
    let mentions = FAQ_PATTERN.find_iter(content).count();
    if mentions >= MIN_FAQ_MENTIONS {
        return None;
    }
    Some(AuditFinding::new(
        CODE_FAQ_SHALLOW,
        format!(
            "FAQ 섹션의 질문이 {}개 미만입니다. 사용자 이해도를 높이기 위해 보강하세요.",
            MIN_FAQ_MENTIONS
        ),
    ))
}

/// Literal, case-insensitive topic occurrences per whitespace-separated word
pub fn keyword_density(content: &str, topic: &str) -> f64 {
    let topic = topic.trim();
    let words = content.split_whitespace().count();
    if topic.is_empty() || words == 0 {
        return 0.0;
    }

    let occurrences = match Regex::new(&format!("(?i){}", regex::escape(topic))) {
        Ok(pattern) => pattern.find_iter(content).count(),
        Err(e) => {
            tracing::warn!(error = %e, "Topic too large to build a search pattern, skipping density");
            return 0.0;
        }
    };

    occurrences as f64 / words as f64
}

fn check_keyword_density(content: &str, topic: &str) -> Option<AuditFinding> {
    let density = keyword_density(content, topic);
    if density <= MAX_KEYWORD_DENSITY {
        return None;
    }
    Some(AuditFinding::new(
        CODE_KEYWORD_STUFFING,
        format!(
            "[키워드 도배] 타겟 키워드 밀도가 너무 높습니다 ({:.1}%). 자연스럽게 수정하세요.",
            density * 100.0
        ),
    ))
}

fn check_links(content: &str) -> (Option<AuditFinding>, Option<AuditFinding>) {
    let targets: Vec<&str> = MARKDOWN_LINK_PATTERN
        .captures_iter(content)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .filter(|t| !t.is_empty())
        .collect();
    let unique: HashSet<&str> = targets.iter().copied().collect();

    let excess = (targets.len() > MAX_LINKS).then(|| {
        AuditFinding::new(
            CODE_LINK_EXCESS,
            format!(
                "[링크 과다] 링크가 너무 많습니다 ({}개). 스팸으로 간주될 수 있습니다.",
                targets.len()
            ),
        )
    });

    let repeated = targets.len() - unique.len();
    let repetition = (repeated > MAX_REPEATED_LINKS).then(|| {
        AuditFinding::new(
            CODE_LINK_REPETITION,
            format!("[링크 반복] 동일한 링크가 {}회 중복 사용되었습니다.", repeated),
        )
    });

    (excess, repetition)
}

fn check_banned_phrases(content: &str) -> Option<AuditFinding> {
    let found: Vec<&str> = BANNED_PHRASES
        .iter()
        .copied()
        .filter(|phrase| content.contains(phrase))
        .collect();
    if found.is_empty() {
        return None;
    }
    Some(AuditFinding::new(
        CODE_BANNED_PHRASE,
        format!(
            "[YMYL 위반] 금지된 과장/단정 표현이 포함되었습니다: {}",
            found.join(", ")
        ),
    ))
}

fn check_prohibited_expressions(content: &str, expressions: &[String]) -> Option<AuditFinding> {
    let found: Vec<&str> = expressions
        .iter()
        .map(String::as_str)
        .filter(|e| !e.is_empty() && content.contains(e))
        .collect();
    if found.is_empty() {
        return None;
    }
    Some(AuditFinding::new(
        CODE_PROHIBITED_EXPRESSION,
        format!("상품 금지 표현이 포함되었습니다: {}", found.join(", ")),
    ))
}
