//! schema.org structured data appended to WordPress review/info posts

use ccos_common::models::{PageType, Platform};
use serde_json::json;

/// Whether a post of this platform and page type carries a JSON-LD block
pub fn wants_structured_data(platform: Platform, page_type: &PageType) -> bool {
    platform == Platform::Wordpress && matches!(page_type, PageType::Review | PageType::Info)
}

/// Schema.org `Product` with a nested `Review`
pub fn product_review_json_ld(product_name: &str, description: &str) -> serde_json::Value {
    json!({
        "@context": "https://schema.org/",
        "@type": "Product",
        "name": product_name,
        "description": description,
        "review": {
            "@type": "Review",
            "reviewRating": {
                "@type": "Rating",
                "ratingValue": "4.8",
                "bestRating": "5"
            },
            "author": {
                "@type": "Person",
                "name": "Expert Reviewer"
            }
        }
    })
}

/// Append the JSON-LD `<script>` block when the post qualifies
///
/// Content is returned unchanged for other platform/page type combinations.
pub fn inject(
    content: String,
    platform: Platform,
    page_type: &PageType,
    product_name: &str,
    description: &str,
) -> String {
    if !wants_structured_data(platform, page_type) {
        return content;
    }

    let schema = product_review_json_ld(product_name, description);
    let rendered = serde_json::to_string_pretty(&schema).unwrap_or_else(|_| schema.to_string());
    format!(
        "{}\n\n<script type=\"application/ld+json\">\n{}\n</script>",
        content, rendered
    )
}
