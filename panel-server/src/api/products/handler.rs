//! Product catalogue handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{Product, ProductBulkUpdate, ProductCreate, ProductListQuery, ProductUpdate};
use crate::db::repository::ProductRepository;
use crate::utils::{AppError, AppResult, validation_error_map};

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ProductListQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.db.clone());
    let products = repo.find(&query).await?;
    Ok(Json(products))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))?;
    Ok(Json(product))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    if let Err(errors) = payload.validate() {
        return Err(AppError::validation_fields(validation_error_map(&errors)));
    }
    let repo = ProductRepository::new(state.db.clone());
    let product = repo.create(payload).await?;
    tracing::info!(sku = %product.sku, "Product created");
    Ok(Json(product))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo.update(&id, payload).await?;
    Ok(Json(product))
}

#[derive(Debug, serde::Serialize)]
pub struct BulkUpdateResponse {
    pub updated: u32,
}

pub async fn bulk_update(
    State(state): State<ServerState>,
    Json(payload): Json<ProductBulkUpdate>,
) -> AppResult<Json<BulkUpdateResponse>> {
    if payload.ids.is_empty() {
        return Err(AppError::validation("ids cannot be empty"));
    }
    let repo = ProductRepository::new(state.db.clone());
    let updated = repo.bulk_update(payload).await?;
    Ok(Json(BulkUpdateResponse { updated }))
}

pub async fn delete_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = ProductRepository::new(state.db.clone());
    let deleted = repo.delete(&id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Product {id} not found")));
    }
    Ok(Json(true))
}
