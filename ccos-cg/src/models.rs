//! Request models for the content generation service

use ccos_common::models::{DisclosureType, PageType, Platform};
use serde::{Deserialize, Serialize};

/// One generation request; immutable for the duration of a pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub topic: String,
    #[serde(default)]
    pub product_link: Option<String>,
    #[serde(default)]
    pub product_id: Option<i64>,
    #[serde(default)]
    pub platform: Platform,
    #[serde(default)]
    pub disclosure_type: DisclosureType,
    #[serde(default)]
    pub page_type: PageType,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub video_link: Option<String>,
    #[serde(default)]
    pub personal_data: Option<String>,
    #[serde(default)]
    pub schedule: bool,
}

fn default_category() -> String {
    "General".to_string()
}

impl GenerationRequest {
    /// Request with defaults for everything but the topic
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            product_link: None,
            product_id: None,
            platform: Platform::default(),
            disclosure_type: DisclosureType::default(),
            page_type: PageType::default(),
            category: default_category(),
            video_link: None,
            personal_data: None,
            schedule: false,
        }
    }

    /// Video link, if present and non-blank
    pub fn video_link(&self) -> Option<&str> {
        non_blank(self.video_link.as_deref())
    }

    /// Personal experience data, if present and non-blank
    pub fn personal_data(&self) -> Option<&str> {
        non_blank(self.personal_data.as_deref())
    }

    /// Caller-supplied product link, if present and non-blank
    pub fn product_link(&self) -> Option<&str> {
        non_blank(self.product_link.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Earlier post in the same category, offered as an internal-link target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedPost {
    pub id: i64,
    pub topic: String,
    pub category: String,
}

/// Earlier post written for the same product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorPost {
    pub id: i64,
    pub topic: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_request_gets_defaults() {
        let request: GenerationRequest =
            serde_json::from_str(r#"{"topic": "겨울철 건조 피부"}"#).unwrap();

        assert_eq!(request.platform, Platform::Wordpress);
        assert_eq!(request.disclosure_type, DisclosureType::None);
        assert_eq!(request.page_type, PageType::Review);
        assert_eq!(request.category, "General");
        assert!(!request.schedule);
    }

    #[test]
    fn test_blank_optional_fields_are_absent() {
        let mut request = GenerationRequest::new("topic");
        request.video_link = Some("   ".to_string());
        request.personal_data = Some(String::new());

        assert_eq!(request.video_link(), None);
        assert_eq!(request.personal_data(), None);
    }

    #[test]
    fn test_camel_case_fields() {
        let request: GenerationRequest = serde_json::from_str(
            r#"{"topic": "t", "platform": "naver", "disclosureType": "ad", "pageType": "guide", "productId": 3, "schedule": true}"#,
        )
        .unwrap();

        assert_eq!(request.platform, Platform::Naver);
        assert_eq!(request.disclosure_type, DisclosureType::Ad);
        assert_eq!(request.page_type, PageType::Guide);
        assert_eq!(request.product_id, Some(3));
        assert!(request.schedule);
    }
}
