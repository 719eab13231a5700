//! Configuration resolution for ccos-cg
//!
//! Gemini API key resolution with Database → ENV → TOML priority.

use ccos_common::config::TomlConfig;
use ccos_common::{Error, Result};
use sqlx::{Pool, Sqlite};
use tracing::{info, warn};

/// Environment variables checked for the Gemini key, in order
pub const GEMINI_API_KEY_ENV_VARS: [&str; 2] = ["CCOS_GEMINI_API_KEY", "GEMINI_API_KEY"];

/// Resolve the Gemini API key from 3-tier configuration
///
/// **Priority:** Database → ENV → TOML
pub async fn resolve_gemini_api_key(db: &Pool<Sqlite>, toml_config: &TomlConfig) -> Result<String> {
    let mut sources = Vec::new();

    // Tier 1: Database (authoritative)
    let db_key = crate::db::settings::get_gemini_api_key(db)
        .await?
        .filter(|key| is_valid_key(key));
    if db_key.is_some() {
        sources.push("database");
    }

    // Tier 2: Environment variables
    let env_key = GEMINI_API_KEY_ENV_VARS
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|key| is_valid_key(key));
    if env_key.is_some() {
        sources.push("environment");
    }

    // Tier 3: TOML config
    let toml_key = toml_config
        .gemini
        .api_key
        .as_ref()
        .filter(|key| is_valid_key(key));
    if toml_key.is_some() {
        sources.push("TOML");
    }

    if sources.len() > 1 {
        warn!(
            "Gemini API key found in multiple sources: {}. Using {} (highest priority).",
            sources.join(", "),
            sources[0]
        );
    }

    if let Some(key) = db_key {
        info!("Gemini API key loaded from database");
        return Ok(key);
    }

    if let Some(key) = env_key {
        info!("Gemini API key loaded from environment variable");
        return Ok(key);
    }

    if let Some(key) = toml_key {
        info!("Gemini API key loaded from TOML config");
        return Ok(key.clone());
    }

    Err(Error::Config(
        "Gemini API key not configured. Please configure using one of:\n\
         1. API: POST /api/settings/gemini_api_key {\"apiKey\": \"your-key\"}\n\
         2. Environment: CCOS_GEMINI_API_KEY=your-key-here\n\
         3. TOML config: ~/.config/ccos/config.toml ([gemini] api_key = \"your-key\")"
            .to_string(),
    ))
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> Pool<Sqlite> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        ccos_common::db::init_schema(&pool).await.unwrap();
        pool
    }

    fn clear_env() {
        for name in GEMINI_API_KEY_ENV_VARS {
            std::env::remove_var(name);
        }
    }

    fn toml_with_key(key: Option<&str>) -> TomlConfig {
        let mut config = TomlConfig::default();
        config.gemini.api_key = key.map(str::to_string);
        config
    }

    #[test]
    fn test_is_valid_key() {
        assert!(is_valid_key("AIza-test"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("   "));
    }

    #[tokio::test]
    #[serial]
    async fn test_database_key_wins() {
        clear_env();
        let pool = setup_test_db().await;
        crate::db::settings::set_gemini_api_key(&pool, "db-key".to_string())
            .await
            .unwrap();
        std::env::set_var("CCOS_GEMINI_API_KEY", "env-key");

        let key = resolve_gemini_api_key(&pool, &toml_with_key(Some("toml-key")))
            .await
            .unwrap();
        assert_eq!(key, "db-key");
        clear_env();
    }

    #[tokio::test]
    #[serial]
    async fn test_env_key_before_toml() {
        clear_env();
        let pool = setup_test_db().await;
        std::env::set_var("GEMINI_API_KEY", "plain-env-key");

        let key = resolve_gemini_api_key(&pool, &toml_with_key(Some("toml-key")))
            .await
            .unwrap();
        assert_eq!(key, "plain-env-key");
        clear_env();
    }

    #[tokio::test]
    #[serial]
    async fn test_blank_sources_are_skipped() {
        clear_env();
        let pool = setup_test_db().await;
        crate::db::settings::set_gemini_api_key(&pool, "  ".to_string())
            .await
            .unwrap();
        std::env::set_var("CCOS_GEMINI_API_KEY", "");

        let key = resolve_gemini_api_key(&pool, &toml_with_key(Some("toml-key")))
            .await
            .unwrap();
        assert_eq!(key, "toml-key");
        clear_env();
    }

    #[tokio::test]
    #[serial]
    async fn test_missing_key_is_config_error() {
        clear_env();
        let pool = setup_test_db().await;

        let result = resolve_gemini_api_key(&pool, &toml_with_key(None)).await;
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
