//! Keyword research database operations

use ccos_common::models::{KeywordRecord, KeywordStatus};
use ccos_common::{Error, Result};
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::posts::parse_timestamp;

fn row_to_keyword(row: &SqliteRow) -> Result<KeywordRecord> {
    let status: String = row.try_get("status")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(KeywordRecord {
        id: row.try_get("id")?,
        keyword: row.try_get("keyword")?,
        volume: row.try_get("volume")?,
        competition_ratio: row.try_get("competition_ratio")?,
        status: status.parse()?,
        outline: row.try_get("outline")?,
        created_at: parse_timestamp(&created_at, "created_at")?,
    })
}

/// All keywords, newest first
pub async fn list_keywords(pool: &SqlitePool) -> Result<Vec<KeywordRecord>> {
    let rows = sqlx::query("SELECT * FROM keywords ORDER BY created_at DESC, id DESC")
        .fetch_all(pool)
        .await?;

    rows.iter().map(row_to_keyword).collect()
}

pub async fn get_keyword(pool: &SqlitePool, id: i64) -> Result<Option<KeywordRecord>> {
    let row = sqlx::query("SELECT * FROM keywords WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(row_to_keyword).transpose()
}

/// Insert a keyword unless it already exists
///
/// **Returns:** true if a row was inserted
pub async fn insert_keyword_if_absent(
    pool: &SqlitePool,
    keyword: &str,
    volume: Option<i64>,
    competition_ratio: Option<f64>,
) -> Result<bool> {
    let result = sqlx::query(
        "INSERT OR IGNORE INTO keywords (keyword, volume, competition_ratio, status, created_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(keyword.trim())
    .bind(volume)
    .bind(competition_ratio)
    .bind(KeywordStatus::Sourced.as_str())
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Manually add a keyword; duplicates are rejected
pub async fn create_keyword(
    pool: &SqlitePool,
    keyword: &str,
    volume: Option<i64>,
    competition_ratio: Option<f64>,
) -> Result<KeywordRecord> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return Err(Error::InvalidInput("keyword must not be empty".to_string()));
    }

    if !insert_keyword_if_absent(pool, keyword, volume, competition_ratio).await? {
        return Err(Error::InvalidInput(format!("Keyword already exists: {}", keyword)));
    }

    let row = sqlx::query("SELECT * FROM keywords WHERE keyword = ?")
        .bind(keyword)
        .fetch_one(pool)
        .await?;
    row_to_keyword(&row)
}

/// Store an outline and mark the keyword planned
///
/// **Returns:** false if no such keyword
pub async fn set_outline(pool: &SqlitePool, id: i64, outline: &str) -> Result<bool> {
    let result = sqlx::query("UPDATE keywords SET outline = ?, status = ? WHERE id = ?")
        .bind(outline)
        .bind(KeywordStatus::Planned.as_str())
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_keyword(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM keywords WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        ccos_common::db::init_schema(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_insert_or_ignore_keeps_first() {
        let pool = setup_test_db().await;

        assert!(insert_keyword_if_absent(&pool, "갱년기 열감 영양제", Some(12000), Some(0.4)).await.unwrap());
        assert!(!insert_keyword_if_absent(&pool, "갱년기 열감 영양제", Some(1), Some(0.9)).await.unwrap());

        let keywords = list_keywords(&pool).await.unwrap();
        assert_eq!(keywords.len(), 1);
        assert_eq!(keywords[0].volume, Some(12000));
        assert_eq!(keywords[0].status, KeywordStatus::Sourced);
    }

    #[tokio::test]
    async fn test_manual_duplicate_is_rejected() {
        let pool = setup_test_db().await;
        create_keyword(&pool, "저분자 콜라겐", None, None).await.unwrap();

        let result = create_keyword(&pool, " 저분자 콜라겐 ", None, None).await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_outline_marks_planned() {
        let pool = setup_test_db().await;
        let keyword = create_keyword(&pool, "루테인 추천", Some(8000), None).await.unwrap();

        assert!(set_outline(&pool, keyword.id, "# 목차").await.unwrap());
        let stored = get_keyword(&pool, keyword.id).await.unwrap().unwrap();
        assert_eq!(stored.status, KeywordStatus::Planned);
        assert_eq!(stored.outline.as_deref(), Some("# 목차"));

        assert!(!set_outline(&pool, keyword.id + 1, "x").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_keyword() {
        let pool = setup_test_db().await;
        let keyword = create_keyword(&pool, "보스웰리아", None, None).await.unwrap();
        assert!(delete_keyword(&pool, keyword.id).await.unwrap());
        assert!(!delete_keyword(&pool, keyword.id).await.unwrap());
    }
}
