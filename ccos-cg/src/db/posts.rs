//! Generated post database operations
//!
//! List-valued fields are stored as JSON text, enums as lowercase text and
//! timestamps as RFC 3339 text.

use ccos_common::models::{AuditFinding, GeneratedPost, NewPost, PostStatus};
use ccos_common::{Error, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::models::{PriorPost, RelatedPost};

const POST_COLUMNS: &str = r#"
    id, topic, content, meta_description, product_link, product_id, platform,
    quality_notes, hashtags, disclaimer, audit_score, audit_fails, audit_warns,
    audit_checklist, disclosure_type, video_link, page_type, personal_data,
    category, status, is_winning_template, created_at
"#;

fn to_json<T: Serialize + ?Sized>(value: &T, column: &str) -> Result<String> {
    serde_json::to_string(value)
        .map_err(|e| Error::Internal(format!("Failed to serialize {}: {}", column, e)))
}

fn from_json<T: DeserializeOwned>(text: &str, column: &str) -> Result<T> {
    serde_json::from_str(text)
        .map_err(|e| Error::Internal(format!("Failed to deserialize {}: {}", column, e)))
}

pub(crate) fn parse_timestamp(text: &str, column: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("Failed to parse {}: {}", column, e)))
}

fn row_to_post(row: &SqliteRow) -> Result<GeneratedPost> {
    let hashtags: String = row.try_get("hashtags")?;
    let audit_fails: String = row.try_get("audit_fails")?;
    let audit_warns: String = row.try_get("audit_warns")?;
    let audit_checklist: String = row.try_get("audit_checklist")?;
    let platform: String = row.try_get("platform")?;
    let disclosure_type: String = row.try_get("disclosure_type")?;
    let page_type: String = row.try_get("page_type")?;
    let status: String = row.try_get("status")?;
    let created_at: String = row.try_get("created_at")?;
    let audit_score: i64 = row.try_get("audit_score")?;
    let is_winning_template: i64 = row.try_get("is_winning_template")?;

    Ok(GeneratedPost {
        id: row.try_get("id")?,
        post: NewPost {
            topic: row.try_get("topic")?,
            content: row.try_get("content")?,
            meta_description: row.try_get("meta_description")?,
            product_link: row.try_get("product_link")?,
            product_id: row.try_get("product_id")?,
            platform: platform.parse()?,
            quality_notes: row.try_get("quality_notes")?,
            hashtags: from_json(&hashtags, "hashtags")?,
            disclaimer: row.try_get("disclaimer")?,
            audit_score: audit_score.clamp(0, 100) as u32,
            audit_fails: from_json::<Vec<AuditFinding>>(&audit_fails, "audit_fails")?,
            audit_warns: from_json::<Vec<AuditFinding>>(&audit_warns, "audit_warns")?,
            audit_checklist: from_json(&audit_checklist, "audit_checklist")?,
            disclosure_type: disclosure_type.parse()?,
            video_link: row.try_get("video_link")?,
            page_type: page_type.into(),
            personal_data: row.try_get("personal_data")?,
            category: row.try_get("category")?,
            status: status.parse()?,
            created_at: parse_timestamp(&created_at, "created_at")?,
        },
        is_winning_template: is_winning_template != 0,
    })
}

/// Insert a generated post and return its id
pub async fn insert_post(pool: &SqlitePool, post: &NewPost) -> Result<i64> {
    // Serialize everything before touching the pool
    let hashtags = to_json(&post.hashtags, "hashtags")?;
    let audit_fails = to_json(&post.audit_fails, "audit_fails")?;
    let audit_warns = to_json(&post.audit_warns, "audit_warns")?;
    let audit_checklist = to_json(&post.audit_checklist, "audit_checklist")?;
    let created_at = post.created_at.to_rfc3339();

    let result = sqlx::query(
        r#"
        INSERT INTO posts (
            topic, content, meta_description, product_link, product_id, platform,
            quality_notes, hashtags, disclaimer, audit_score, audit_fails, audit_warns,
            audit_checklist, disclosure_type, video_link, page_type, personal_data,
            category, status, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&post.topic)
    .bind(&post.content)
    .bind(&post.meta_description)
    .bind(&post.product_link)
    .bind(post.product_id)
    .bind(post.platform.as_str())
    .bind(&post.quality_notes)
    .bind(&hashtags)
    .bind(&post.disclaimer)
    .bind(post.audit_score as i64)
    .bind(&audit_fails)
    .bind(&audit_warns)
    .bind(&audit_checklist)
    .bind(post.disclosure_type.as_str())
    .bind(&post.video_link)
    .bind(post.page_type.as_str())
    .bind(&post.personal_data)
    .bind(&post.category)
    .bind(post.status.as_str())
    .bind(&created_at)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// All posts, newest first
pub async fn list_posts(pool: &SqlitePool) -> Result<Vec<GeneratedPost>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM posts ORDER BY created_at DESC, id DESC",
        POST_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    rows.iter().map(row_to_post).collect()
}

pub async fn get_post(pool: &SqlitePool, id: i64) -> Result<Option<GeneratedPost>> {
    let row = sqlx::query(&format!("SELECT {} FROM posts WHERE id = ?", POST_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(row_to_post).transpose()
}

/// Set the status of a post; false if no such post
pub async fn update_status(pool: &SqlitePool, id: i64, status: PostStatus) -> Result<bool> {
    let result = sqlx::query("UPDATE posts SET status = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Flip the winning-template flag and return the new value
///
/// **Returns:** None if no such post
pub async fn toggle_winning_template(pool: &SqlitePool, id: i64) -> Result<Option<bool>> {
    let mut tx = pool.begin().await?;

    let current: Option<i64> = sqlx::query_scalar("SELECT is_winning_template FROM posts WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

    let Some(current) = current else {
        return Ok(None);
    };
    let new_value = current == 0;

    sqlx::query("UPDATE posts SET is_winning_template = ? WHERE id = ?")
        .bind(new_value as i64)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(Some(new_value))
}

/// Posts in a category, newest first
pub async fn related_in_category(
    pool: &SqlitePool,
    category: &str,
    exclude_id: Option<i64>,
    limit: usize,
) -> Result<Vec<RelatedPost>> {
    let rows = sqlx::query(
        r#"
        SELECT id, topic, category FROM posts
        WHERE category = ? AND id != ?
        ORDER BY created_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(category)
    .bind(exclude_id.unwrap_or(-1))
    .bind(limit as i64)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            Ok(RelatedPost {
                id: row.try_get("id")?,
                topic: row.try_get("topic")?,
                category: row.try_get("category")?,
            })
        })
        .collect()
}

/// Posts generated for a product, newest first
pub async fn prior_for_product(pool: &SqlitePool, product_id: i64, limit: usize) -> Result<Vec<PriorPost>> {
    let rows = sqlx::query(
        r#"
        SELECT id, topic, content FROM posts
        WHERE product_id = ?
        ORDER BY created_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(product_id)
    .bind(limit as i64)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            Ok(PriorPost {
                id: row.try_get("id")?,
                topic: row.try_get("topic")?,
                content: row.try_get("content")?,
            })
        })
        .collect()
}
