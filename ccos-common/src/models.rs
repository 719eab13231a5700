//! Domain models shared by the content generation service and its store
//!
//! Enums serialize as lowercase strings both on the wire and in the
//! database; records use camelCase on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Target blogging platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Wordpress,
    Naver,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Wordpress => "wordpress",
            Platform::Naver => "naver",
        }
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wordpress" => Ok(Platform::Wordpress),
            "naver" => Ok(Platform::Naver),
            other => Err(Error::InvalidInput(format!("Unknown platform: {}", other))),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Economic-relationship disclosure required in the post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisclosureType {
    #[default]
    None,
    Ad,
    Sponsor,
    Affiliate,
}

impl DisclosureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisclosureType::None => "none",
            DisclosureType::Ad => "ad",
            DisclosureType::Sponsor => "sponsor",
            DisclosureType::Affiliate => "affiliate",
        }
    }

    /// Mandated header text; empty for `None`
    pub fn header(&self) -> &'static str {
        match self {
            DisclosureType::None => "",
            DisclosureType::Ad => {
                "[광고] 본 포스팅은 해당 업체로부터 소정의 원고료를 제공받아 작성되었습니다."
            }
            DisclosureType::Sponsor => {
                "[협찬] 본 포스팅은 해당 업체로부터 제품을 무상으로 제공받아 실제 사용 후 작성되었습니다."
            }
            DisclosureType::Affiliate => {
                "[제휴] 본 포스팅은 파트너스 활동의 일환으로, 이에 따른 일정액의 수수료를 제공받을 수 있습니다."
            }
        }
    }
}

impl FromStr for DisclosureType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" | "" => Ok(DisclosureType::None),
            "ad" => Ok(DisclosureType::Ad),
            "sponsor" => Ok(DisclosureType::Sponsor),
            "affiliate" => Ok(DisclosureType::Affiliate),
            other => Err(Error::InvalidInput(format!("Unknown disclosure type: {}", other))),
        }
    }
}

/// Content intent of the post
///
/// Values outside the known set are kept verbatim as `Other` so a request
/// never fails on page type alone; they map to an empty structural template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PageType {
    Info,
    #[default]
    Review,
    Comparison,
    Story,
    Guide,
    Other(String),
}

impl PageType {
    pub fn as_str(&self) -> &str {
        match self {
            PageType::Info => "info",
            PageType::Review => "review",
            PageType::Comparison => "comparison",
            PageType::Story => "story",
            PageType::Guide => "guide",
            PageType::Other(value) => value,
        }
    }
}

impl From<String> for PageType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "info" => PageType::Info,
            "review" => PageType::Review,
            "comparison" => PageType::Comparison,
            "story" => PageType::Story,
            "guide" => PageType::Guide,
            _ => PageType::Other(value),
        }
    }
}

impl From<PageType> for String {
    fn from(value: PageType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Publication status of a stored post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Published,
    Scheduled,
    Draft,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Published => "published",
            PostStatus::Scheduled => "scheduled",
            PostStatus::Draft => "draft",
        }
    }
}

impl FromStr for PostStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "published" => Ok(PostStatus::Published),
            "scheduled" => Ok(PostStatus::Scheduled),
            "draft" => Ok(PostStatus::Draft),
            other => Err(Error::InvalidInput(format!("Unknown post status: {}", other))),
        }
    }
}

/// Lifecycle of a sourced keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordStatus {
    #[default]
    Sourced,
    Planned,
    Generated,
}

impl KeywordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeywordStatus::Sourced => "sourced",
            KeywordStatus::Planned => "planned",
            KeywordStatus::Generated => "generated",
        }
    }
}

impl FromStr for KeywordStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sourced" => Ok(KeywordStatus::Sourced),
            "planned" => Ok(KeywordStatus::Planned),
            "generated" => Ok(KeywordStatus::Generated),
            other => Err(Error::InvalidInput(format!("Unknown keyword status: {}", other))),
        }
    }
}

/// One audit finding, either rule-based (`RULE_*`) or issued by the AI audit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditFinding {
    pub code: String,
    #[serde(default)]
    pub detail: String,
}

impl AuditFinding {
    pub fn new(code: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            detail: detail.into(),
        }
    }
}

/// Product master record (read-only input to generation)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: i64,
    pub sku: String,
    pub name: String,
    pub usp: String,
    pub target: String,
    pub price: i64,
    pub shipping: String,
    pub usage: String,
    pub precautions: String,
    pub faq: String,
    pub product_link: String,
    pub options: Option<String>,
    pub as_info: Option<String>,
    pub prohibited_expressions: Option<String>,
    pub mandatory_disclaimer: Option<String>,
    pub evidence_data: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ProductRecord {
    /// Individual entries of `prohibited_expressions` (comma or newline separated)
    pub fn prohibited_expression_list(&self) -> Vec<String> {
        self.prohibited_expressions
            .as_deref()
            .unwrap_or_default()
            .split([',', '\n'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Writable product fields (create and update)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductInput {
    pub sku: String,
    pub name: String,
    pub usp: String,
    pub target: String,
    pub price: i64,
    pub shipping: String,
    pub usage: String,
    pub precautions: String,
    pub faq: String,
    pub product_link: String,
    pub options: Option<String>,
    pub as_info: Option<String>,
    pub prohibited_expressions: Option<String>,
    pub mandatory_disclaimer: Option<String>,
    pub evidence_data: Option<String>,
}

/// Keyword research record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordRecord {
    pub id: i64,
    pub keyword: String,
    pub volume: Option<i64>,
    pub competition_ratio: Option<f64>,
    pub status: KeywordStatus,
    pub outline: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A generated post as produced by one pipeline run, before it has an id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub topic: String,
    pub content: String,
    pub meta_description: String,
    pub product_link: Option<String>,
    pub product_id: Option<i64>,
    pub platform: Platform,
    pub quality_notes: String,
    pub hashtags: Vec<String>,
    pub disclaimer: String,
    pub audit_score: u32,
    pub audit_fails: Vec<AuditFinding>,
    pub audit_warns: Vec<AuditFinding>,
    pub audit_checklist: Vec<String>,
    pub disclosure_type: DisclosureType,
    pub video_link: Option<String>,
    pub page_type: PageType,
    pub personal_data: Option<String>,
    pub category: String,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
}

/// A persisted post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPost {
    pub id: i64,
    #[serde(flatten)]
    pub post: NewPost,
    pub is_winning_template: bool,
}
