//! Product master database operations

use ccos_common::models::{ProductInput, ProductRecord};
use ccos_common::Result;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::posts::parse_timestamp;

fn row_to_product(row: &SqliteRow) -> Result<ProductRecord> {
    let created_at: String = row.try_get("created_at")?;

    Ok(ProductRecord {
        id: row.try_get("id")?,
        sku: row.try_get("sku")?,
        name: row.try_get("name")?,
        usp: row.try_get("usp")?,
        target: row.try_get("target")?,
        price: row.try_get("price")?,
        shipping: row.try_get("shipping")?,
        usage: row.try_get("usage")?,
        precautions: row.try_get("precautions")?,
        faq: row.try_get("faq")?,
        product_link: row.try_get("product_link")?,
        options: row.try_get("options")?,
        as_info: row.try_get("as_info")?,
        prohibited_expressions: row.try_get("prohibited_expressions")?,
        mandatory_disclaimer: row.try_get("mandatory_disclaimer")?,
        evidence_data: row.try_get("evidence_data")?,
        created_at: parse_timestamp(&created_at, "created_at")?,
    })
}

/// All products, newest first
pub async fn list_products(pool: &SqlitePool) -> Result<Vec<ProductRecord>> {
    let rows = sqlx::query("SELECT * FROM products ORDER BY created_at DESC, id DESC")
        .fetch_all(pool)
        .await?;

    rows.iter().map(row_to_product).collect()
}

pub async fn get_product(pool: &SqlitePool, id: i64) -> Result<Option<ProductRecord>> {
    let row = sqlx::query("SELECT * FROM products WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(row_to_product).transpose()
}

/// Insert a product and return the stored record
pub async fn create_product(pool: &SqlitePool, input: &ProductInput) -> Result<ProductRecord> {
    let created_at = Utc::now().to_rfc3339();

    let result = sqlx::query(
        r#"
        INSERT INTO products (
            sku, name, usp, target, price, shipping, usage, precautions, faq,
            product_link, options, as_info, prohibited_expressions,
            mandatory_disclaimer, evidence_data, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.sku)
    .bind(&input.name)
    .bind(&input.usp)
    .bind(&input.target)
    .bind(input.price)
    .bind(&input.shipping)
    .bind(&input.usage)
    .bind(&input.precautions)
    .bind(&input.faq)
    .bind(&input.product_link)
    .bind(&input.options)
    .bind(&input.as_info)
    .bind(&input.prohibited_expressions)
    .bind(&input.mandatory_disclaimer)
    .bind(&input.evidence_data)
    .bind(&created_at)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    tracing::info!(product_id = id, sku = %input.sku, "Product created");

    get_product(pool, id)
        .await?
        .ok_or_else(|| ccos_common::Error::Internal(format!("Product {} vanished after insert", id)))
}

/// Replace all writable fields of a product
///
/// **Returns:** None if no such product
pub async fn update_product(pool: &SqlitePool, id: i64, input: &ProductInput) -> Result<Option<ProductRecord>> {
    let result = sqlx::query(
        r#"
        UPDATE products SET
            sku = ?, name = ?, usp = ?, target = ?, price = ?, shipping = ?,
            usage = ?, precautions = ?, faq = ?, product_link = ?, options = ?,
            as_info = ?, prohibited_expressions = ?, mandatory_disclaimer = ?,
            evidence_data = ?
        WHERE id = ?
        "#,
    )
    .bind(&input.sku)
    .bind(&input.name)
    .bind(&input.usp)
    .bind(&input.target)
    .bind(input.price)
    .bind(&input.shipping)
    .bind(&input.usage)
    .bind(&input.precautions)
    .bind(&input.faq)
    .bind(&input.product_link)
    .bind(&input.options)
    .bind(&input.as_info)
    .bind(&input.prohibited_expressions)
    .bind(&input.mandatory_disclaimer)
    .bind(&input.evidence_data)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_product(pool, id).await
}

/// Delete a product; posts that referenced it keep their product_id
pub async fn delete_product(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM products WHERE id = ?")
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

    fn input(sku: &str) -> ProductInput {
        ProductInput {
            sku: sku.to_string(),
            name: "편백나무 경추 베개".to_string(),
            price: 45000,
            product_link: "https://smartstore.naver.com/example/products/7".to_string(),
            prohibited_expressions: Some("불면증 치료".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_get_update_delete() {
        let pool = setup_test_db().await;

        let created = create_product(&pool, &input("L-007")).await.unwrap();
        assert_eq!(created.sku, "L-007");
        assert_eq!(created.prohibited_expressions.as_deref(), Some("불면증 치료"));

        let mut changed = input("L-007");
        changed.price = 39000;
        let updated = update_product(&pool, created.id, &changed).await.unwrap().unwrap();
        assert_eq!(updated.price, 39000);
        assert_eq!(updated.created_at, created.created_at);

        assert!(delete_product(&pool, created.id).await.unwrap());
        assert!(get_product(&pool, created.id).await.unwrap().is_none());
        assert!(!delete_product(&pool, created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_unknown_product() {
        let pool = setup_test_db().await;
        assert!(update_product(&pool, 99, &input("X")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_products() {
        let pool = setup_test_db().await;
        create_product(&pool, &input("A")).await.unwrap();
        create_product(&pool, &input("B")).await.unwrap();

        let skus: Vec<String> = list_products(&pool).await.unwrap().into_iter().map(|p| p.sku).collect();
        assert_eq!(skus, vec!["B", "A"]);
    }
}
