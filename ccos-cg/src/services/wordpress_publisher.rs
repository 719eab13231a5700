//! WordPress REST publisher
//!
//! Posts a stored article to `{site}/wp-json/wp/v2/posts` with basic auth.
//! Only HTTP 201 counts as success.

use ccos_common::config::WordPressConfig;
use ccos_common::models::PostStatus;
use chrono::{DateTime, Duration as ChronoDuration, SecondsFormat, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("ccos-cg/", env!("CARGO_PKG_VERSION"));
const GENERIC_FAILURE: &str = "WordPress publishing failed";

/// Scheduled posts go live this many whole hours from now (inclusive range)
pub const SCHEDULE_DELAY_HOURS: std::ops::RangeInclusive<i64> = 1..=3;

/// Publishing errors
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("WordPress credentials are not configured (missing {0})")]
    MissingCredentials(&'static str),

    #[error("WordPress request failed: {0}")]
    Network(String),

    #[error("WordPress rejected the post ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Requested WordPress post status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishMode {
    Publish,
    #[default]
    Future,
    Draft,
}

impl PublishMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublishMode::Publish => "publish",
            PublishMode::Future => "future",
            PublishMode::Draft => "draft",
        }
    }

    /// Local post status after WordPress accepted the post
    pub fn resulting_status(&self) -> PostStatus {
        match self {
            PublishMode::Publish => PostStatus::Published,
            PublishMode::Future => PostStatus::Scheduled,
            PublishMode::Draft => PostStatus::Draft,
        }
    }
}

/// Site URL and application-password credentials
#[derive(Clone)]
pub struct WordPressCredentials {
    pub url: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for WordPressCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordPressCredentials")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl WordPressCredentials {
    /// Request values win field by field; the `[wordpress]` TOML section fills gaps
    pub fn resolve(
        url: Option<&str>,
        username: Option<&str>,
        password: Option<&str>,
        fallback: &WordPressConfig,
    ) -> Result<Self, PublishError> {
        fn pick(
            given: Option<&str>,
            fallback: &Option<String>,
            name: &'static str,
        ) -> Result<String, PublishError> {
            let non_blank = |v: &&str| !v.trim().is_empty();
            given
                .filter(non_blank)
                .or_else(|| fallback.as_deref().filter(non_blank))
                .map(|v| v.trim().to_string())
                .ok_or(PublishError::MissingCredentials(name))
        }

        Ok(Self {
            url: pick(url, &fallback.url, "url")?
                .trim_end_matches('/')
                .to_string(),
            username: pick(username, &fallback.username, "username")?,
            password: pick(password, &fallback.password, "password")?,
        })
    }

    fn posts_endpoint(&self) -> String {
        format!("{}/wp-json/wp/v2/posts", self.url)
    }
}

#[derive(Debug, Serialize)]
struct CreatePostBody<'a> {
    title: &'a str,
    content: &'a str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<String>,
    format: &'static str,
}

#[derive(Debug, Deserialize)]
struct CreatePostResponse {
    link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WordPressErrorBody {
    message: Option<String>,
}

/// What WordPress reported for an accepted post
#[derive(Debug, Clone, PartialEq)]
pub struct PublishReceipt {
    pub link: Option<String>,
    pub scheduled_for: Option<DateTime<Utc>>,
}

/// Publish time for `future` posts: `now` plus 1 to 3 whole hours
pub fn scheduled_publish_time(now: DateTime<Utc>) -> DateTime<Utc> {
    let hours = rand::thread_rng().gen_range(SCHEDULE_DELAY_HOURS);
    now + ChronoDuration::hours(hours)
}

/// WordPress REST client
pub struct WordPressPublisher {
    http_client: reqwest::Client,
}

impl WordPressPublisher {
    pub fn new(timeout: Duration) -> Result<Self, PublishError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| PublishError::Network(e.to_string()))?;

        Ok(Self { http_client })
    }

    pub async fn publish(
        &self,
        credentials: &WordPressCredentials,
        title: &str,
        content: &str,
        mode: PublishMode,
    ) -> Result<PublishReceipt, PublishError> {
        let scheduled_for = match mode {
            PublishMode::Future => Some(scheduled_publish_time(Utc::now())),
            PublishMode::Publish | PublishMode::Draft => None,
        };

        let body = CreatePostBody {
            title,
            content,
            status: mode.as_str(),
            date: scheduled_for.map(|d| d.to_rfc3339_opts(SecondsFormat::Secs, true)),
            format: "standard",
        };

        tracing::info!(
            site = %credentials.url,
            mode = mode.as_str(),
            scheduled_for = ?scheduled_for,
            "Publishing post to WordPress"
        );

        let response = self
            .http_client
            .post(credentials.posts_endpoint())
            .basic_auth(&credentials.username, Some(&credentials.password))
            .json(&body)
            .send()
            .await
            .map_err(|e| PublishError::Network(e.to_string()))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if status != reqwest::StatusCode::CREATED {
            let message = serde_json::from_str::<WordPressErrorBody>(&text)
                .ok()
                .and_then(|b| b.message)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| GENERIC_FAILURE.to_string());
            tracing::error!(status = status.as_u16(), message = %message, "WordPress rejected post");
            return Err(PublishError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let link = serde_json::from_str::<CreatePostResponse>(&text)
            .ok()
            .and_then(|r| r.link);

        Ok(PublishReceipt { link, scheduled_for })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheduled_time_is_one_to_three_hours_out() {
        let now = Utc::now();
        for _ in 0..50 {
            let delay = scheduled_publish_time(now) - now;
            assert!(delay >= ChronoDuration::hours(1));
            assert!(delay <= ChronoDuration::hours(3));
            assert_eq!(delay.num_minutes() % 60, 0);
        }
    }

    #[test]
    fn test_request_credentials_win_over_config() {
        let fallback = WordPressConfig {
            url: Some("https://blog.example.com/".to_string()),
            username: Some("editor".to_string()),
            password: Some("app-pass".to_string()),
        };

        let creds = WordPressCredentials::resolve(Some("https://other.example.com"), None, None, &fallback).unwrap();
        assert_eq!(creds.url, "https://other.example.com");
        assert_eq!(creds.username, "editor");

        let creds = WordPressCredentials::resolve(None, None, None, &fallback).unwrap();
        assert_eq!(creds.url, "https://blog.example.com");
    }

    #[test]
    fn test_missing_credentials_are_reported() {
        let err = WordPressCredentials::resolve(Some("https://blog.example.com"), Some("u"), None, &WordPressConfig::default())
            .unwrap_err();
        assert!(matches!(err, PublishError::MissingCredentials("password")));
    }

    #[test]
    fn test_password_not_in_debug_output() {
        let creds = WordPressCredentials {
            url: "https://blog.example.com".to_string(),
            username: "u".to_string(),
            password: "secret".to_string(),
        };
        assert!(!format!("{:?}", creds).contains("secret"));
    }

    #[test]
    fn test_mode_maps_to_local_status() {
        assert_eq!(PublishMode::default(), PublishMode::Future);
        assert_eq!(PublishMode::Publish.resulting_status(), PostStatus::Published);
        assert_eq!(PublishMode::Future.resulting_status(), PostStatus::Scheduled);
        assert_eq!(PublishMode::Draft.resulting_status(), PostStatus::Draft);
    }
}
