//! Static policy documents embedded in every prompt
//!
//! These are process-wide constants; nothing in the pipeline mutates them.

/// Project context shared by every stage
pub const PROJECT_CONTEXT: &str = r#"project:
  name: "Content-Commerce OS"
  goal: ["검색 유입", "블로그→스토어 전환", "영문 구글 유입", "광고 수익(선택)"]
channels:
  naver_blog:
    language: "ko"
    publish_mode: "human_final_click"
    content_types: ["정보형", "스토리형", "리뷰형", "비교형"]
  wordpress:
    language: "en"
    publish_mode: "auto_draft_then_schedule"
commerce:
  naver_smartstore:
    enabled: true
tracking:
  link_params:
    channel_param: "channel"
    sku_param: "sku"
    intent_param: "intent"
policies:
  ymyl_categories: ["건강", "금융", "세금", "법률"]
  disclosure_required: true"#;

/// Compliance ruleset shared by every stage
pub const COMPLIANCE_RULESET: &str = r#"[컴플라이언스 룰셋]
compliance:
  categories: ["뷰티", "리빙", "식품", "건기식"]
  banned_claims:
    ko: ["무조건", "완치", "보장", "부작용 없음", "100%", "특효", "직효"]
    en: ["guaranteed", "cure", "no side effects", "100%", "miracle", "instant fix"]
  required_disclosures:
    ko: ["광고", "협찬", "제휴"]
    en: ["sponsored", "affiliate"]
  required_sections:
    common: ["주의사항", "FAQ"]
    ymyl: ["면책", "기준/가정"]
  product_page_claims_source: ["제조사 공식 설명", "직접 사용기", "성분표/스펙"]"#;

/// Banned absolute claims and their safe substitutes (copywriting stage)
pub const RED_LINE_POLICY: &str = r#"[건기식 심의 방어 정책]
- 질병의 '치료', '예방', '완치', '특효', '직효' 등의 단어 절대 금지.
- 대체 워딩: "증상 완화에 도움을 줄 수 있음", "식약처 기능성 인정 원료", "건강 유지에 필요한", "영양 보충에 도움""#;

pub const UNIQUE_PACK_POLICY: &str = r#"[Unique Pack: 스팸 방지 및 신뢰도 향상 장치]
다음 중 최소 2개 이상을 본문에 반드시 포함하세요:
1. [이미지 가이드] 직접 촬영한 사진이 들어갈 위치를 [사진: 전/후 비교] 또는 [사진: 실제 제형] 형태로 표시
2. [체크리스트] "구매 전 반드시 확인해야 할 5가지" 또는 "이런 분들께 추천합니다" 체크리스트
3. [실제 사용 조건] "하루 2회, 식후 30분, 7일간 꾸준히"와 같은 구체적인 가이드
4. [비교 기준표] 타사 제품이나 기존 방식과의 차별점을 보여주는 마크다운 표(Table)
5. [FAQ] 실제 고객들이 자주 묻는 질문 2~3가지 (상품 정보의 FAQ 활용)"#;

pub const AD_LAYOUT_POLICY: &str = r#"[AdSense 정책 및 UX 레이아웃 엔진]
1. [우발 클릭 방지] 구매 버튼(CTA)이나 주요 링크 주변에는 최소 2줄 이상의 텍스트 여백을 두어 광고와 겹치지 않게 하세요.
2. [신뢰 우선 배치] 본문 하단 CTA 바로 뒤에는 광고가 아닌 '주의사항' 또는 'FAQ' 섹션을 먼저 배치하여 신뢰도를 높인 후, 그 다음에 광고/추천 섹션을 배치하세요.
3. [모바일 최적화] 모바일 가독성을 위해 문단을 짧게 유지하고, 섹션 사이의 여백을 명확히 하세요."#;

pub const YMYL_COMPLIANCE_POLICY: &str = r#"[YMYL 및 컴플라이언스 엔진]
1. [카테고리별 안전 문구]
   - 건강/영양제: "본 정보는 질병의 진단 및 치료를 위한 의학적 정보가 아니며, 개인의 체질에 따라 효과가 다를 수 있습니다."
   - 다이어트: "적절한 운동과 식이조절을 병행해야 하며, 무리한 감량은 건강을 해칠 수 있습니다."
2. [과장 표현 방지] "무조건", "100%", "완치", "최고" 등 검증되지 않은 절대적 표현을 지양하고 "도움을 줄 수 있는", "기대할 수 있는" 등의 완곡한 표현을 사용하세요.
3. [제휴 고지] 본문 하단에 "이 포스팅은 제휴 마케팅 활동의 일환으로 일정액의 수수료를 제공받을 수 있습니다." 문구를 자연스럽게 포함하세요."#;

pub const NAVER_SAFE_STRUCTURE_POLICY: &str = r#"[네이버 세이프 구조 장치]
1. [도입부 (첫 3줄)] "누구에게 / 어떤 상황에 / 무엇을 해결"하는지 명확하게 제시하여 유저의 이탈을 막으세요.
2. [중간부 (유저 효용)] 체크리스트, 비교표, 구체적 사용팁 등 유저가 바로 활용 가능한 실용적 정보를 배치하세요.
3. [하단부 (신뢰/수익)] FAQ -> 주의사항 -> CTA(스토어 링크) 순서로 배치하여 신뢰를 먼저 쌓고 구매를 유도하세요."#;

pub const WORDPRESS_TECH_SEO_POLICY: &str = r#"[워드프레스 기술 SEO 장치 (Google Search Essentials 준수)]
1. [고유 Title/H1] 글의 제목은 반드시 하나만 존재해야 하며, 본문 내에서 H1 태그를 중복 사용하지 마세요. (본문 소제목은 H2, H3 사용)
2. [크롤링 가능한 링크] 모든 내부/외부 링크는 자바스크립트가 아닌 표준 앵커 링크를 사용하세요.
3. [이미지 SEO] 사진 앵커 삽입 시 반드시 대체 텍스트를 포함하세요. (예: [사진: 제품 제형 확인 | alt: 오메가3 캡슐 크기 비교])
4. [모바일 가독성] 문단을 짧게 유지하고, 복잡한 표 형식보다는 심플한 리스트나 마크다운 기본 표를 사용하세요.
5. [구조화 데이터] FAQ는 리치결과 목적보다는 사용자 이해를 돕는 Q&A 구조로 작성하세요."#;

pub const SCALED_CONTENT_ABUSE_POLICY: &str = r#"[Scaled Content Abuse 방지 장치]
1. [원본 데이터 필수] 대량 생성된 스팸으로 간주되지 않도록, 반드시 '나만의 데이터(경험, 테스트 결과, 구체적 비교 기준)'를 본문에 깊이 있게 녹여내세요.
2. [가치 창출] 단순 정보의 나열이 아닌, 독자에게 실질적인 통찰이나 새로운 관점을 제공해야 합니다."#;

pub const REPETITION_PREVENTION_POLICY: &str = r#"[반복 및 유사도 방지 정책]
동일 상품에 대한 중복 발행 시 다음 요소를 강제로 다르게 구성하세요:
- 후킹 문장 (첫 문장)
- 소제목 (H2, H3)
- 활용 예시 및 에피소드
- FAQ 질문과 답변의 구성"#;

pub const EXPERIENCE_SIGNAL_POLICY: &str = r#"[실제 경험 신호 주입 엔진]
1. [구체적 컨텍스트] 단순히 제품 장점을 나열하지 말고, "어떤 상황에서(예: 아침 공복에)", "얼마나(예: 2주간 꾸준히)", "왜(예: 환절기 비염 때문에)" 사용했는지 구체적인 경험 신호를 주입하세요.
2. [선택 기준 제시] 왜 수많은 제품 중 이 제품을 선택했는지에 대한 나만의 기준(예: 성분 함량, 가성비, 브랜드 신뢰도 등)을 논리적으로 설명하세요.
3. [이미지 앵커링] 사진이 들어갈 위치에 [사진: 실제 제형 확인], [사진: 섭취 전후 컨디션 기록] 등 구체적인 캡션을 달아주세요."#;

pub const COMMERCIAL_BALANCE_POLICY: &str = r#"[외부 링크 및 상업성 균형 정책]
1. [7:3 법칙] 본문의 70%는 정보 제공, 경험 공유, 비교 분석으로 채우고, 직접적인 판매 유도(CTA)는 30% 이하로 제한하세요.
2. [링크 피로도 관리] 본문 전체에서 외부 링크(트래킹 링크)는 최대 2~3회만 노출하세요. (중간 1회, 하단 1회 권장)
3. [가치 우선] "사세요"가 아니라 "이런 정보가 있으니 참고하시고, 필요하면 여기서 확인하세요"라는 톤을 유지하세요."#;

pub const NAVER_STYLE_GUIDE: &str = r#"[네이버 블로그 스타일 가이드]
- 친근하고 개인적인 경험담 톤 (블로그 이웃에게 말하듯)
- 이모지 적절히 사용
- 가독성 좋은 짧은 문단
- 정보성 위주로 작성하되 마지막에 자연스러운 추천"#;

pub const WORDPRESS_STYLE_GUIDE: &str = r#"[워드프레스 글로벌 스타일 가이드]
- 전문적이고 신뢰감 있는 톤
- 논리적인 구조 (H2, H3 명확히 사용)
- SEO 최적화된 문장 구조"#;

pub const INFO_TEMPLATE: &str = r#"[구조: 정보형]
1. 문제 정의 (유저가 겪는 상황 공감)
2. 원인 및 해결 기준 제시 (객관적 정보)
3. 다양한 해결 옵션 설명
4. 결론: 제품을 해결 옵션 중 하나로 자연스럽게 제안"#;

pub const REVIEW_TEMPLATE: &str = r#"[구조: 리뷰형]
1. 사용 환경 및 기대치 (왜 이 제품을 찾게 되었나)
2. 첫인상 및 언박싱 느낌
3. 디테일 분석 (실제 사용 로그, 장단점, 증거 데이터 활용)
4. 결론: 어떤 사람에게 이 제품이 맞는지 추천"#;

pub const COMPARISON_TEMPLATE: &str = r#"[구조: 비교형]
1. 비교 기준표 제시 (성분, 가격, 편의성 등)
2. 케이스별 추천 (A상황엔 이거, B상황엔 이거)
3. 최종 결론 및 선택 가이드"#;

pub const STORY_TEMPLATE: &str = r#"[구조: 스토리형]
1. 상황 발생 (강렬한 문제 상황 묘사)
2. 시행착오 과정 (다른 제품 실패담 등)
3. 이 제품을 선택하게 된 결정적 이유
4. 사용 후 변화 및 주의점"#;

pub const GUIDE_TEMPLATE: &str = r#"[구조: 가이드형]
1. 단계별 사용법 (Step-by-Step)
2. 효과를 극대화하는 꿀팁
3. 자주 하는 실수 및 주의사항"#;

/// Audience description used when no product target is known
pub const DEFAULT_TARGET: &str = "4050 여성 (건강/리빙/뷰티 관심층)";
