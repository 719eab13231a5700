//! Tracking link builder
//!
//! Rewrites an outbound product URL with attribution parameters. Managed
//! parameters are replaced, never accumulated, so applying the builder twice
//! with the same inputs yields the same URL.

use ccos_common::models::{PageType, Platform};
use url::Url;

/// Fixed attribution medium tag
pub const UTM_MEDIUM: &str = "automation_os";

/// SKU written when no product record resolved
pub const UNKNOWN_SKU: &str = "N/A";

const MANAGED_PARAMS: [&str; 5] = ["channel", "sku", "intent", "utm_source", "utm_medium"];

fn channel_tag(platform: Platform) -> &'static str {
    match platform {
        Platform::Naver => "naver",
        Platform::Wordpress => "wp",
    }
}

/// Append attribution parameters to `destination`
///
/// Anything that is not an absolute http(s) URL is returned unchanged;
/// rewriting is best-effort.
pub fn build_tracking_link(
    destination: &str,
    platform: Platform,
    sku: &str,
    intent: &PageType,
) -> String {
    let mut url = match Url::parse(destination) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => url,
        Ok(_) | Err(_) => {
            tracing::debug!(destination = %destination, "Product link is not an absolute http(s) URL, leaving as-is");
            return destination.to_string();
        }
    };

    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !MANAGED_PARAMS.contains(&key.as_ref()))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let sku = if sku.trim().is_empty() { UNKNOWN_SKU } else { sku };

    url.query_pairs_mut()
        .clear()
        .extend_pairs(retained.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .append_pair("channel", channel_tag(platform))
        .append_pair("sku", sku)
        .append_pair("intent", intent.as_str())
        .append_pair("utm_source", platform.as_str())
        .append_pair("utm_medium", UTM_MEDIUM);

    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORE_LINK: &str = "https://smartstore.naver.com/example/products/1";

    #[test]
    fn test_appends_attribution_parameters() {
        let link = build_tracking_link(STORE_LINK, Platform::Wordpress, "H-001", &PageType::Review);
        assert_eq!(
            link,
            "https://smartstore.naver.com/example/products/1?channel=wp&sku=H-001&intent=review&utm_source=wordpress&utm_medium=automation_os"
        );
    }

    #[test]
    fn test_naver_channel_tag() {
        let link = build_tracking_link(STORE_LINK, Platform::Naver, "B-002", &PageType::Info);
        assert!(link.contains("channel=naver"));
        assert!(link.contains("utm_source=naver"));
    }

    #[test]
    fn test_reapplication_is_idempotent() {
        let once = build_tracking_link(STORE_LINK, Platform::Naver, "H-004", &PageType::Guide);
        let twice = build_tracking_link(&once, Platform::Naver, "H-004", &PageType::Guide);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_existing_managed_parameters_are_replaced() {
        let link = build_tracking_link(
            "https://shop.example.com/p?sku=OLD&ref=newsletter&intent=story",
            Platform::Wordpress,
            "L-003",
            &PageType::Comparison,
        );
        assert_eq!(
            link,
            "https://shop.example.com/p?ref=newsletter&channel=wp&sku=L-003&intent=comparison&utm_source=wordpress&utm_medium=automation_os"
        );
    }

    #[test]
    fn test_malformed_or_relative_links_are_returned_unchanged() {
        for raw in ["not a url", "/products/1", "smartstore.naver.com/x", "mailto:shop@example.com", ""] {
            assert_eq!(
                build_tracking_link(raw, Platform::Wordpress, "H-001", &PageType::Info),
                raw
            );
        }
    }

    #[test]
    fn test_missing_sku_is_marked_unknown() {
        let link = build_tracking_link(STORE_LINK, Platform::Wordpress, "", &PageType::Info);
        assert!(link.contains("sku=N%2FA"));
    }
}
