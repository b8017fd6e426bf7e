//! User management handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{UserCreate, UserResponse, UserUpdate};
use crate::db::repository::UserRepository;
use crate::utils::{AppError, AppResponse, AppResult, ok_with_message, validation_error_map};

pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<UserResponse>>> {
    let repo = UserRepository::new(state.db.clone());
    let users = repo.find_all().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
    Ok(Json(UserResponse::from(user)))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<UserResponse>> {
    if let Err(errors) = payload.validate() {
        return Err(AppError::validation_fields(validation_error_map(&errors)));
    }
    let repo = UserRepository::new(state.db.clone());
    let user = repo.create(payload).await?;
    tracing::info!(email = %user.email, "User created");
    Ok(Json(UserResponse::from(user)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<UserResponse>> {
    let repo = UserRepository::new(state.db.clone());
    let user = repo.update(&id, payload).await?;
    Ok(Json(UserResponse::from(user)))
}

#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<String>,
}

#[derive(Debug, serde::Serialize)]
pub struct BulkDeleteResponse {
    pub deleted: u32,
}

/// Delete several users in one request. Refused entirely when it would
/// remove the last active admin.
pub async fn bulk_delete(
    State(state): State<ServerState>,
    Json(payload): Json<BulkDeleteRequest>,
) -> AppResult<Json<AppResponse<BulkDeleteResponse>>> {
    if payload.ids.is_empty() {
        return Err(AppError::validation("ids cannot be empty"));
    }
    let repo = UserRepository::new(state.db.clone());
    let deleted = repo.bulk_delete(&payload.ids).await?;
    tracing::info!(deleted, "Users bulk-deleted");
    Ok(ok_with_message(
        BulkDeleteResponse { deleted },
        format!("Deleted {deleted} users"),
    ))
}
