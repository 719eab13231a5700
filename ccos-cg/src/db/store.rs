//! SQLite-backed implementation of the pipeline collaborator traits

use async_trait::async_trait;
use ccos_common::models::{NewPost, ProductRecord};
use ccos_common::Result;
use sqlx::SqlitePool;

use super::{posts, products};
use crate::models::{PriorPost, RelatedPost};
use crate::services::pipeline::{PostRepository, ProductLookup, RelatedPosts};

/// Content store over the shared connection pool
#[derive(Clone)]
pub struct SqliteContentStore {
    pool: SqlitePool,
}

impl SqliteContentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductLookup for SqliteContentStore {
    async fn product(&self, id: i64) -> Result<Option<ProductRecord>> {
        products::get_product(&self.pool, id).await
    }
}

#[async_trait]
impl RelatedPosts for SqliteContentStore {
    async fn in_category(
        &self,
        category: &str,
        exclude_id: Option<i64>,
        limit: usize,
    ) -> Result<Vec<RelatedPost>> {
        posts::related_in_category(&self.pool, category, exclude_id, limit).await
    }

    async fn for_product(&self, product_id: i64, limit: usize) -> Result<Vec<PriorPost>> {
        posts::prior_for_product(&self.pool, product_id, limit).await
    }
}

#[async_trait]
impl PostRepository for SqliteContentStore {
    async fn insert(&self, post: &NewPost) -> Result<i64> {
        posts::insert_post(&self.pool, post).await
    }
}
