//! Settings database operations
//!
//! Key-value accessors over the `settings` table.

use ccos_common::{Error, Result};
use sqlx::{Pool, Sqlite};

/// Settings key holding the Gemini API key
pub const GEMINI_API_KEY_SETTING: &str = "gemini_api_key";

/// Get Gemini API key from database
///
/// **Returns:** Some(key) if set and non-blank, None otherwise
pub async fn get_gemini_api_key(db: &Pool<Sqlite>) -> Result<Option<String>> {
    let key = get_setting::<String>(db, GEMINI_API_KEY_SETTING).await?;
    Ok(key.filter(|k| !k.trim().is_empty()))
}

/// Set Gemini API key in database
pub async fn set_gemini_api_key(db: &Pool<Sqlite>, key: String) -> Result<()> {
    set_setting(db, GEMINI_API_KEY_SETTING, key).await
}

/// Generic setting getter
pub async fn get_setting<T>(db: &Pool<Sqlite>, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let row: Option<(Option<String>,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(db)
        .await
        .map_err(Error::Database)?;

    match row.and_then(|(value,)| value) {
        Some(value) => {
            let parsed = value
                .parse::<T>()
                .map_err(|e| Error::Config(format!("Parse setting {} failed: {}", key, e)))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

/// Generic setting setter (upsert)
pub async fn set_setting<T>(db: &Pool<Sqlite>, key: &str, value: T) -> Result<()>
where
    T: std::fmt::Display,
{
    sqlx::query(
        "INSERT INTO settings (key, value) VALUES (?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(key)
    .bind(value.to_string())
    .execute(db)
    .await
    .map_err(Error::Database)?;

    Ok(())
}
