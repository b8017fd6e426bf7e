//! Product model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Product catalogue status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    Active,
    Inactive,
    Discontinued,
}

impl Default for ProductStatus {
    fn default() -> Self {
        Self::Active
    }
}

/// Catalogue product
///
/// `retail_price > wholesale_price` is a form-level validation at create
/// and update time, not a database constraint. Stock is never decremented
/// by order placement; there is no reservation logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub sku: String,
    pub name: String,
    pub category: String,
    pub wholesale_price: f64,
    pub retail_price: f64,
    pub stock: u32,
    pub min_stock: u32,
    pub status: ProductStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create product payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductCreate {
    #[validate(length(min = 1, message = "sku is required"))]
    pub sku: String,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "category is required"))]
    pub category: String,
    #[validate(range(min = 0.0, message = "wholesale price cannot be negative"))]
    pub wholesale_price: f64,
    #[validate(range(min = 0.0, message = "retail price cannot be negative"))]
    pub retail_price: f64,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub min_stock: u32,
    #[serde(default)]
    pub status: ProductStatus,
}

/// Update product payload
#[derive(Debug, Clone, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub wholesale_price: Option<f64>,
    pub retail_price: Option<f64>,
    pub stock: Option<u32>,
    pub min_stock: Option<u32>,
    pub status: Option<ProductStatus>,
}

/// Bulk status / category update payload
#[derive(Debug, Clone, Deserialize)]
pub struct ProductBulkUpdate {
    pub ids: Vec<String>,
    pub status: Option<ProductStatus>,
    pub category: Option<String>,
}

/// List filters, interpreted directly from query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductListQuery {
    pub category: Option<String>,
    pub status: Option<ProductStatus>,
    /// Substring match on name or SKU
    pub search: Option<String>,
}
