//! Prompt assembly for the generation pipeline and keyword research
//!
//! Every function here is pure: the same inputs always yield the same prompt
//! text. Each pipeline prompt opens with the project context and the
//! compliance ruleset, followed by stage instructions and whichever context
//! blocks apply to the request.

use ccos_common::models::{DisclosureType, PageType, Platform, ProductRecord};

use crate::models::{GenerationRequest, PriorPost, RelatedPost};
use crate::services::policies::*;
use crate::services::stages::{PainPointAnalysis, EXPECTED_PAIN_POINTS};

/// Internal-link anchors must point at `#blog-id-<ID>`
pub const INTERNAL_LINK_PREFIX: &str = "#blog-id-";

/// Everything the composer may draw on for one pipeline run
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    pub request: &'a GenerationRequest,
    /// Resolved product record, if the request referenced one
    pub product: Option<&'a ProductRecord>,
    /// Tracking-rewritten product link
    pub tracking_link: Option<&'a str>,
    /// Same-category posts, newest first
    pub related_posts: &'a [RelatedPost],
    /// Earlier posts for the same product, newest first
    pub prior_posts: &'a [PriorPost],
}

impl<'a> PromptContext<'a> {
    /// Context with no product and no prior posts
    pub fn bare(request: &'a GenerationRequest) -> Self {
        Self {
            request,
            product: None,
            tracking_link: None,
            related_posts: &[],
            prior_posts: &[],
        }
    }
}

/// Sections joined by blank lines; empty sections are dropped
struct PromptBuilder {
    sections: Vec<String>,
}

impl PromptBuilder {
    fn with_policy_preamble() -> Self {
        Self {
            sections: vec![PROJECT_CONTEXT.to_string(), COMPLIANCE_RULESET.to_string()],
        }
    }

    fn bare() -> Self {
        Self { sections: Vec::new() }
    }

    fn push(&mut self, section: impl Into<String>) -> &mut Self {
        let section = section.into();
        if !section.trim().is_empty() {
            self.sections.push(section);
        }
        self
    }

    fn push_opt(&mut self, section: Option<String>) -> &mut Self {
        if let Some(section) = section {
            self.push(section);
        }
        self
    }

    fn build(&self) -> String {
        self.sections.join("\n\n")
    }
}

/// Structural template for the page type; empty for unknown types
pub fn page_type_template(page_type: &PageType) -> &'static str {
    match page_type {
        PageType::Info => INFO_TEMPLATE,
        PageType::Review => REVIEW_TEMPLATE,
        PageType::Comparison => COMPARISON_TEMPLATE,
        PageType::Story => STORY_TEMPLATE,
        PageType::Guide => GUIDE_TEMPLATE,
        PageType::Other(_) => "",
    }
}

pub fn platform_style_guide(platform: Platform) -> &'static str {
    match platform {
        Platform::Naver => NAVER_STYLE_GUIDE,
        Platform::Wordpress => WORDPRESS_STYLE_GUIDE,
    }
}

pub fn platform_structure_policy(platform: Platform) -> &'static str {
    match platform {
        Platform::Naver => NAVER_SAFE_STRUCTURE_POLICY,
        Platform::Wordpress => WORDPRESS_TECH_SEO_POLICY,
    }
}

/// Product metadata block (single source of truth for product facts)
pub fn product_metadata_block(product: &ProductRecord) -> String {
    let or_na = |value: &Option<String>| -> String {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or("N/A")
            .to_string()
    };

    format!(
        "[상품 정보 (SSOT)]\n\
         상품명: {}\n\
         SKU: {}\n\
         핵심 USP: {}\n\
         타겟: {}\n\
         가격: {}\n\
         옵션: {}\n\
         배송: {}\n\
         A/S 정보: {}\n\
         사용법: {}\n\
         주의사항: {}\n\
         금지 표현: {}\n\
         필수 면책 문구: {}\n\
         증거 데이터(사용로그/테스트): {}\n\
         FAQ: {}",
        product.name,
        product.sku,
        product.usp,
        product.target,
        product.price,
        or_na(&product.options),
        product.shipping,
        or_na(&product.as_info),
        product.usage,
        product.precautions,
        or_na(&product.prohibited_expressions),
        or_na(&product.mandatory_disclaimer),
        or_na(&product.evidence_data),
        product.faq,
    )
}

fn disclosure_instruction(disclosure: DisclosureType) -> Option<String> {
    match disclosure {
        DisclosureType::None => None,
        other => Some(format!(
            "[필수 고지 사항] 본문 맨 처음에 다음 문구를 반드시 포함하세요: {}",
            other.header()
        )),
    }
}

fn internal_links_block(related: &[RelatedPost]) -> Option<String> {
    if related.is_empty() {
        return None;
    }
    let candidates: Vec<String> = related
        .iter()
        .map(|p| format!("- 주제: {} (ID: {})", p.topic, p.id))
        .collect();
    Some(format!(
        "[내부 링크 후보 (Internal Links)]\n\
         다음은 같은 카테고리의 이전 글들입니다. 본문 하단에 '함께 읽으면 좋은 글' 섹션을 만들고,\n\
         단순 키워드 나열이 아닌 \"다음 행동 유도형(Action-oriented)\" 앵커 텍스트를 사용하여 링크를 생성하세요.\n\
         (링크 형식: [앵커 텍스트]({}ID))\n{}",
        INTERNAL_LINK_PREFIX,
        candidates.join("\n")
    ))
}

fn similarity_block(prior: &[PriorPost]) -> Option<String> {
    if prior.is_empty() {
        return None;
    }
    let topics: Vec<String> = prior
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{}. 주제: {}", i + 1, p.topic))
        .collect();
    Some(format!(
        "[유사도 방지: 다음 내용과 다르게 작성하세요]\n\
         이미 발행된 글의 주제 및 주요 내용입니다. 이와 겹치지 않도록 새로운 각도에서 서술하세요:\n{}",
        topics.join("\n")
    ))
}

fn audience(ctx: &PromptContext<'_>) -> String {
    ctx.product
        .map(|p| p.target.trim())
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TARGET)
        .to_string()
}

/// Stage 1: pain-point analysis (JSON mode)
pub fn pain_point_prompt(ctx: &PromptContext<'_>) -> String {
    let request = ctx.request;
    let mut prompt = PromptBuilder::with_policy_preamble();

    prompt
        .push(format!(
            "상황/문제: \"{}\"\n타겟: {}\n페이지 타입: {} (정보성, 리뷰, 비교, 가이드, 스토리 중 하나)",
            request.topic,
            audience(ctx),
            request.page_type
        ))
        .push_opt(request.video_link().map(|v| format!("참고 영상 링크: {}", v)))
        .push_opt(
            request
                .personal_data()
                .map(|d| format!("나만의 데이터(경험/측정값): {}", d)),
        )
        .push_opt(
            ctx.product
                .map(|p| format!("연관 상품 정보:\n{}", product_metadata_block(p))),
        )
        .push(format!(
            "이 상황에서 타겟이 느끼는 심리적 불안감, 신체적 고통, 그리고 기존 해결책에 대해 느꼈던 불만을 {}가지로 도출해줘.\n\
             또한, 이 문제를 해결하기 위한 '핵심 가치 제안(Value Proposition)'을 하나 만들어줘.",
            EXPECTED_PAIN_POINTS
        ))
        .push(
            "JSON 형식으로 응답해줘:\n\
             {\n  \"pain_points\": [\"...\", \"...\", \"...\"],\n  \"value_prop\": \"...\"\n}",
        );

    prompt.build()
}

/// Stage 2: draft copywriting (text mode)
pub fn copywriting_prompt(ctx: &PromptContext<'_>, analysis: &PainPointAnalysis) -> String {
    let request = ctx.request;
    let mut prompt = PromptBuilder::with_policy_preamble();

    prompt
        .push(format!(
            "상황: {}\n페인포인트: {}\n핵심 가치: {}\n플랫폼: {}\n페이지 타입: {}\n카테고리: {}",
            request.topic,
            analysis.pain_points.join(", "),
            analysis.value_prop,
            request.platform,
            request.page_type,
            request.category
        ))
        .push(page_type_template(&request.page_type))
        .push(UNIQUE_PACK_POLICY)
        .push(AD_LAYOUT_POLICY)
        .push(YMYL_COMPLIANCE_POLICY)
        .push(platform_structure_policy(request.platform))
        .push(SCALED_CONTENT_ABUSE_POLICY)
        .push(REPETITION_PREVENTION_POLICY)
        .push(EXPERIENCE_SIGNAL_POLICY)
        .push(COMMERCIAL_BALANCE_POLICY)
        .push_opt(similarity_block(ctx.prior_posts))
        .push_opt(internal_links_block(ctx.related_posts))
        .push_opt(request.video_link().map(|v| format!("영상 내용 요약 포함 요청: {}", v)))
        .push_opt(request.personal_data().map(|d| {
            format!(
                "[중요] 다음 나만의 데이터를 본문에 자연스럽게 녹여내어 '진짜 경험'처럼 보이게 하세요: {}",
                d
            )
        }))
        .push_opt(
            ctx.product
                .map(|p| format!("상품 상세 정보:\n{}", product_metadata_block(p))),
        )
        .push_opt(disclosure_instruction(request.disclosure_type))
        .push("위 내용을 바탕으로 블로그 포스팅을 작성해줘.")
        .push(platform_style_guide(request.platform))
        .push(RED_LINE_POLICY)
        .push("마크다운 형식으로 작성해줘.");

    prompt.build()
}

/// Stage 3: quality-gate rewrite with the correction checklist (JSON mode)
pub fn quality_gate_prompt(ctx: &PromptContext<'_>, draft: &str) -> String {
    let request = ctx.request;

    let disclosure_item = match request.disclosure_type {
        DisclosureType::None => {
            "1. [경제적 이해관계 표시] 고지 대상 아님 (임의의 광고/협찬 문구를 추가하지 말 것)".to_string()
        }
        other => format!(
            "1. [경제적 이해관계 표시] 본문 맨 앞에 \"{}\" 문구가 명확히 있는지 확인 (없으면 추가)",
            other.header()
        ),
    };
    let personal_item = match request.personal_data() {
        Some(data) => format!(
            "4. [나만의 데이터 검증] \"{}\" 내용이 본문에 구체적이고 진정성 있게 반영되었는가?",
            data
        ),
        None => "4. [나만의 데이터 검증] 근거 없는 경험담을 지어내지 않았는가?".to_string(),
    };
    let link_item = match ctx.tracking_link {
        Some(link) => format!(
            "8. [수익 자동화: 트래킹 링크] 모든 상품 링크는 반드시 다음 트래킹 링크를 사용해야 함: {}",
            link
        ),
        None => "8. [수익 자동화: 트래킹 링크] 상품 링크가 없으므로 임의의 구매 링크를 만들지 말 것".to_string(),
    };

    let checklist = [
        disclosure_item,
        "2. [Unique Pack] 체크리스트, 비교표, 구체적 사용법, FAQ 중 최소 2개 이상이 포함되었는지 확인하고 부족하면 보강".to_string(),
        "3. [이미지 앵커] 사진이 들어갈 위치([사진: ...])가 적절히 배치되었는지 확인".to_string(),
        personal_item,
        "5. [상업성 균형] 정보성 내용이 70% 이상인지 확인하고, 너무 노골적인 판매 유도는 부드럽게 수정".to_string(),
        "6. [심의 준수] 치료/완치 등 금지 단어 재검수".to_string(),
        "7. [SEO] 메타 디스크립션(150자 이내) 및 타겟 키워드 밀도 최적화".to_string(),
        link_item,
        "9. [CTA] 본문 중간과 하단에 자연스러운 구매 유도 문구 삽입. 위 트래킹 링크를 활용한 버튼 문구 포함.".to_string(),
        "10. [경험 신호] \"사용 기간\", \"선택 기준\" 등 진짜 사람의 글처럼 느껴지는 구체적 수치나 근거 보강\n   \
         - 해시태그 5~10개 (플랫폼 성격에 맞게)\n   \
         - 면책 문구 (예: \"본 포스팅은 소정의 수수료를 제공받을 수 있으나 주관적인 견해로 작성되었습니다.\")"
            .to_string(),
    ];

    let mut prompt = PromptBuilder::with_policy_preamble();
    prompt
        .push(format!("본문 초안:\n{}", draft))
        .push(format!(
            "위 본문을 다음 기준(Quality Gate)에 맞춰 최종 검수 및 수정해줘:\n{}",
            checklist.join("\n")
        ))
        .push(
            "JSON 형식으로 응답해줘:\n\
             {\n  \"final_content\": \"최종 마크다운 본문\",\n  \"meta_description\": \"SEO용 메타 설명\",\n  \
             \"quality_notes\": \"품질 검수 결과 요약\",\n  \"hashtags\": [\"#태그1\", \"#태그2\"],\n  \
             \"disclaimer\": \"면책 문구 내용\"\n}",
        );

    prompt.build()
}

/// Stage 4: heuristic reviewer audit of the final text (JSON mode)
pub fn audit_prompt(final_content: &str) -> String {
    let mut prompt = PromptBuilder::with_policy_preamble();
    prompt
        .push(format!("본문:\n{}", final_content))
        .push(
            "위 본문을 전문 리뷰어의 관점에서 평가해줘.\n\
             평가 항목:\n\
             1. 경험 기반 여부: \"이 글은 경험 기반인가, 아니면 뜬구름인가?\"\n\
             2. 반복성: \"같은 말 반복이 많은가?\"\n\
             3. 상업성 톤: \"구매를 강요하는 톤인가?\"\n\
             4. FAQ 자연스러움: \"FAQ가 실제 질문처럼 자연스러운가?\"\n\
             5. 구체성: \"설명이 구체적인가(숫자/조건/사례)?\"",
        )
        .push(
            "JSON 형식으로 응답해줘. 다음 구조를 정확히 지켜줘:\n\
             {\n  \"score\": 0~100 점수,\n  \
             \"fail\": [\n    {\"code\": \"LLM_LACK_EXPERIENCE\", \"detail\": \"경험 기반 내용 부족\"}\n  ],\n  \
             \"warn\": [\n    {\"code\": \"LLM_REPETITIVE\", \"detail\": \"같은 말 반복 발견\"}\n  ],\n  \
             \"fix_suggestions\": [\n    \"직접 촬영/테스트 데이터 1개 이상 추가(사용 기간/환경 포함).\",\n    \
             \"비교 기준표 섹션 추가 + FAQ 4개 보강.\",\n    \
             \"단정 표현을 '개인차' 포함 문장으로 수정.\"\n  ]\n}",
        );

    prompt.build()
}

/// Keyword research: long-tail keyword candidates (JSON mode)
pub fn keyword_sourcing_prompt() -> String {
    let mut prompt = PromptBuilder::bare();
    prompt
        .push(format!(
            "당신은 {}을 타겟으로 하는 건강기식 이커머스 마케터입니다.\n\
             현재 한국 시장 트렌드를 분석하여 '황금 키워드' 5개를 추출해주세요.",
            DEFAULT_TARGET
        ))
        .push(
            "조건:\n\
             1. 카테고리: 식품 > 건강식품\n\
             2. 검색량: 3,000 ~ 50,000 사이의 롱테일 키워드\n\
             3. 경쟁 강도: (문서수/검색량)이 1.0 미만인 블루오션 키워드 위주\n\
             4. 키워드 예시: \"갱년기 열감 영양제\", \"저분자 콜라겐 펩타이드 추천\" 등",
        )
        .push(
            "JSON 형식으로 응답해주세요:\n\
             [\n  {\"keyword\": \"키워드명\", \"volume\": 예상검색량(숫자), \"competition_ratio\": 예상경쟁강도(0.1~0.9 사이 소수)}\n]",
        );
    prompt.build()
}

/// Keyword research: post outline for one keyword (text mode)
pub fn keyword_outline_prompt(keyword: &str) -> String {
    let mut prompt = PromptBuilder::bare();
    prompt
        .push(format!(
            "키워드: \"{}\"\n\
             이 키워드를 바탕으로 {}을 설득하기 위한 블로그 포스팅 목차(Outline)를 작성해줘.\n\
             글로벌 의학 논문(PubMed 등)이나 공신력 있는 정보를 인용하는 섹션을 포함해줘.",
            keyword, DEFAULT_TARGET
        ))
        .push(
            "구조:\n\
             1. 제목 후보 3개\n\
             2. 서론 기획안\n\
             3. 본론 섹션별 핵심 내용 (의학적 근거 포함)\n\
             4. 결론 및 CTA 전략",
        )
        .push("마크다운 형식으로 작성해줘.");
    prompt.build()
}
