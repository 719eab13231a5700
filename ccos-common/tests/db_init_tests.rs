//! Tests for database creation and schema initialization

use ccos_common::db::{init_database, init_schema};
use sqlx::sqlite::SqlitePoolOptions;

async fn table_names(pool: &sqlx::SqlitePool) -> Vec<String> {
    sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(pool)
    .await
    .unwrap()
}

#[tokio::test]
async fn test_init_database_creates_file_and_tables() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("data").join("ccos.db");

    let pool = init_database(&db_path).await.unwrap();

    assert!(db_path.exists());
    assert_eq!(
        table_names(&pool).await,
        vec!["keywords", "posts", "products", "settings"]
    );
}

#[tokio::test]
async fn test_init_schema_is_idempotent() {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    init_schema(&pool).await.unwrap();
    init_schema(&pool).await.unwrap();

    assert_eq!(table_names(&pool).await.len(), 4);
}

#[tokio::test]
async fn test_reopening_existing_database_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("ccos.db");

    {
        let pool = init_database(&db_path).await.unwrap();
        sqlx::query("INSERT INTO settings (key, value) VALUES ('gemini_api_key', 'abc')")
            .execute(&pool)
            .await
            .unwrap();
        pool.close().await;
    }

    let pool = init_database(&db_path).await.unwrap();
    let value: Option<String> =
        sqlx::query_scalar("SELECT value FROM settings WHERE key = 'gemini_api_key'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(value.as_deref(), Some("abc"));
}
