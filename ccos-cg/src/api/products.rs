//! Product master CRUD

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use ccos_common::models::{ProductInput, ProductRecord};

use crate::db::products;
use crate::{ApiError, ApiResult, AppState};

fn validate(input: &ProductInput) -> ApiResult<()> {
    if input.sku.trim().is_empty() {
        return Err(ApiError::BadRequest("sku must not be empty".to_string()));
    }
    if input.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".to_string()));
    }
    if input.price < 0 {
        return Err(ApiError::BadRequest("price must not be negative".to_string()));
    }
    Ok(())
}

fn not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("Product {}", id))
}

/// GET /api/products
pub async fn list_products(State(state): State<AppState>) -> ApiResult<Json<Vec<ProductRecord>>> {
    Ok(Json(products::list_products(&state.db).await?))
}

/// POST /api/products
pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> ApiResult<(StatusCode, Json<ProductRecord>)> {
    validate(&input)?;
    let product = products::create_product(&state.db, &input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /api/products/:id
pub async fn get_product(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<ProductRecord>> {
    products::get_product(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// PUT /api/products/:id
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<ProductInput>,
) -> ApiResult<Json<ProductRecord>> {
    validate(&input)?;
    products::update_product(&state.db, id, &input)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// DELETE /api/products/:id
pub async fn delete_product(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    if !products::delete_product(&state.db, id).await? {
        return Err(not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route(
            "/api/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}
