//! Keyword research calls
//!
//! Two single-call operations over the generative service: sourcing a batch
//! of candidate keywords (JSON mode) and drafting a post outline for one
//! keyword (text mode). Persistence is left to the caller.

use crate::services::genai_client::{generate_structured, GenAiError, GenerativeService, ResponseMode};
use crate::services::prompt_composer;
use crate::services::stages::{SourcedKeyword, StageOutput};

pub struct KeywordPlanner<'a> {
    genai: &'a dyn GenerativeService,
}

impl<'a> KeywordPlanner<'a> {
    pub fn new(genai: &'a dyn GenerativeService) -> Self {
        Self { genai }
    }

    /// Ask for candidate keywords; malformed output is an error
    pub async fn source(&self) -> Result<Vec<SourcedKeyword>, GenAiError> {
        let keywords =
            generate_structured::<Vec<SourcedKeyword>>(self.genai, &prompt_composer::keyword_sourcing_prompt())
                .await?
                .into_result()?;
        keywords.validate().map_err(GenAiError::Malformed)?;

        tracing::info!(count = keywords.len(), model = %self.genai.model(), "Keywords sourced");
        Ok(keywords)
    }

    /// Markdown outline for `keyword`
    pub async fn outline(&self, keyword: &str) -> Result<String, GenAiError> {
        let outline = self
            .genai
            .generate(&prompt_composer::keyword_outline_prompt(keyword), ResponseMode::Text)
            .await?;
        if outline.trim().is_empty() {
            return Err(GenAiError::EmptyResponse);
        }

        tracing::info!(keyword = %keyword, outline_chars = outline.chars().count(), "Keyword outline drafted");
        Ok(outline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FixedService {
        response: String,
        modes: Mutex<Vec<ResponseMode>>,
    }

    impl FixedService {
        fn new(response: &str) -> Self {
            Self {
                response: response.to_string(),
                modes: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl GenerativeService for FixedService {
        fn model(&self) -> &str {
            "fixed"
        }

        async fn generate(&self, _prompt: &str, mode: ResponseMode) -> Result<String, GenAiError> {
            self.modes.lock().unwrap().push(mode);
            Ok(self.response.clone())
        }
    }

    #[tokio::test]
    async fn test_source_parses_keyword_list() {
        let service = FixedService::new(
            r#"[{"keyword": "갱년기 열감 영양제", "volume": 12000, "competition_ratio": 0.4},
                {"keyword": "저분자 콜라겐 펩타이드 추천", "volume": 5400}]"#,
        );

        let keywords = KeywordPlanner::new(&service).source().await.unwrap();
        assert_eq!(keywords.len(), 2);
        assert_eq!(keywords[0].competition_ratio, Some(0.4));
        assert_eq!(keywords[1].competition_ratio, None);
        assert_eq!(service.modes.lock().unwrap().as_slice(), &[ResponseMode::Json]);
    }

    #[tokio::test]
    async fn test_source_rejects_malformed_output() {
        let service = FixedService::new("키워드 목록입니다: 갱년기, 콜라겐");
        let result = KeywordPlanner::new(&service).source().await;
        assert!(matches!(result, Err(GenAiError::Malformed(_))));

        let service = FixedService::new(r#"[{"keyword": " "}]"#);
        let result = KeywordPlanner::new(&service).source().await;
        assert!(matches!(result, Err(GenAiError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_outline_uses_text_mode() {
        let service = FixedService::new("# 제목 후보\n1. ...");
        let outline = KeywordPlanner::new(&service).outline("루테인 추천").await.unwrap();
        assert!(outline.starts_with("# 제목 후보"));
        assert_eq!(service.modes.lock().unwrap().as_slice(), &[ResponseMode::Text]);
    }

    #[tokio::test]
    async fn test_blank_outline_is_empty_response() {
        let service = FixedService::new("  \n");
        let result = KeywordPlanner::new(&service).outline("루테인 추천").await;
        assert!(matches!(result, Err(GenAiError::EmptyResponse)));
    }
}
