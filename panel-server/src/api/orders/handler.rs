//! Order handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use shared::models::{OrderStatus, PaymentStatus};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Order, OrderDraft, OrderListQuery};
use crate::db::repository::{OrderRepository, order::OrderPage};
use crate::orders::OrderBuilder;
use crate::utils::{AppError, AppResponse, AppResult, ok};

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<OrderPage>> {
    let repo = OrderRepository::new(state.db.clone());
    let page = repo.find(&query).await?;
    Ok(Json(page))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;
    Ok(Json(order))
}

/// Create an order from a validated draft. The builder recomputes all
/// totals and assigns the order number.
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(draft): Json<OrderDraft>,
) -> AppResult<Json<Order>> {
    let builder = OrderBuilder::new(state.db.clone());
    let order = builder.build(draft, &user.id).await?;
    tracing::info!(order_number = %order.order_number, total = order.total_amount, "Order created");
    Ok(Json(order))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
}

pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<StatusUpdateRequest>,
) -> AppResult<Json<Order>> {
    if payload.status.is_none() && payload.payment_status.is_none() {
        return Err(AppError::validation(
            "a status or payment status is required",
        ));
    }
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .update_status(&id, payload.status, payload.payment_status)
        .await?;
    Ok(Json(order))
}

#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<String>,
}

#[derive(Debug, serde::Serialize)]
pub struct BulkDeleteResponse {
    pub deleted: u32,
}

pub async fn bulk_delete(
    State(state): State<ServerState>,
    Json(payload): Json<BulkDeleteRequest>,
) -> AppResult<Json<AppResponse<BulkDeleteResponse>>> {
    if payload.ids.is_empty() {
        return Err(AppError::validation("ids cannot be empty"));
    }
    let repo = OrderRepository::new(state.db.clone());
    let deleted = repo.bulk_delete(&payload.ids).await?;
    tracing::info!(deleted, "Orders bulk-deleted");
    Ok(ok(BulkDeleteResponse { deleted }))
}
