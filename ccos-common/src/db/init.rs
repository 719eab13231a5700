//! Database initialization
//!
//! Creates the database file on first run and brings the schema up to date.
//! All table creation is idempotent (`CREATE TABLE IF NOT EXISTS`).

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Open (or create) the database and initialize the schema
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // WAL lets list/read requests proceed while a pipeline run writes its post
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    init_schema(&pool).await?;

    Ok(pool)
}

/// Create all tables on an already-open pool
///
/// Used directly by tests running against in-memory databases.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(pool)
        .await?;

    create_settings_table(pool).await?;
    create_products_table(pool).await?;
    create_posts_table(pool).await?;
    create_keywords_table(pool).await?;

    info!("Database schema initialized (settings, products, posts, keywords)");
    Ok(())
}

pub async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_products_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            sku TEXT NOT NULL DEFAULT '',
            name TEXT NOT NULL DEFAULT '',
            usp TEXT NOT NULL DEFAULT '',
            target TEXT NOT NULL DEFAULT '',
            price INTEGER NOT NULL DEFAULT 0,
            shipping TEXT NOT NULL DEFAULT '',
            usage TEXT NOT NULL DEFAULT '',
            precautions TEXT NOT NULL DEFAULT '',
            faq TEXT NOT NULL DEFAULT '',
            product_link TEXT NOT NULL DEFAULT '',
            options TEXT,
            as_info TEXT,
            prohibited_expressions TEXT,
            mandatory_disclaimer TEXT,
            evidence_data TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_posts_table(pool: &SqlitePool) -> Result<()> {
    // product_id is a plain reference: deleting a product keeps its posts
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS posts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            topic TEXT NOT NULL,
            content TEXT NOT NULL,
            meta_description TEXT NOT NULL DEFAULT '',
            product_link TEXT,
            product_id INTEGER,
            platform TEXT NOT NULL DEFAULT 'wordpress',
            quality_notes TEXT NOT NULL DEFAULT '',
            hashtags TEXT NOT NULL DEFAULT '[]',
            disclaimer TEXT NOT NULL DEFAULT '',
            audit_score INTEGER NOT NULL DEFAULT 0,
            audit_fails TEXT NOT NULL DEFAULT '[]',
            audit_warns TEXT NOT NULL DEFAULT '[]',
            audit_checklist TEXT NOT NULL DEFAULT '[]',
            disclosure_type TEXT NOT NULL DEFAULT 'none',
            video_link TEXT,
            page_type TEXT NOT NULL DEFAULT 'review',
            personal_data TEXT,
            category TEXT NOT NULL DEFAULT 'General',
            status TEXT NOT NULL DEFAULT 'draft',
            is_winning_template INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_posts_category ON posts(category, created_at)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_posts_product ON posts(product_id, created_at)")
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn create_keywords_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS keywords (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            keyword TEXT NOT NULL UNIQUE,
            volume INTEGER,
            competition_ratio REAL,
            status TEXT NOT NULL DEFAULT 'sourced',
            outline TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
