//! Notification handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Notification, NotificationCreate};
use crate::db::repository::NotificationRepository;
use crate::notify::{BatchSummary, CannedTemplate, NotificationDispatcher, canned_templates};
use crate::utils::{AppError, AppResult};

pub async fn list_mine(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Notification>>> {
    let repo = NotificationRepository::new(state.db.clone());
    let items = repo.list_for_user(&user.id).await?;
    Ok(Json(items))
}

pub async fn mark_read(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Notification>> {
    let repo = NotificationRepository::new(state.db.clone());
    let n = repo.mark_read(&id, &user.id).await?;
    Ok(Json(n))
}

pub async fn delete_mine(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = NotificationRepository::new(state.db.clone());
    let deleted = repo.delete(&id, &user.id, user.is_admin()).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Notification {id} not found")));
    }
    Ok(Json(true))
}

pub async fn templates() -> Json<&'static [CannedTemplate]> {
    Json(canned_templates())
}

/// Fan a message out to the requested recipients. Returns the
/// per-recipient outcome; partial failure is a normal result, not an
/// error status.
pub async fn dispatch(
    State(state): State<ServerState>,
    Json(payload): Json<NotificationCreate>,
) -> AppResult<Json<BatchSummary>> {
    let dispatcher = NotificationDispatcher::new(state.db.clone(), state.mailer());
    let summary = dispatcher.dispatch(payload).await?;
    Ok(Json(summary))
}
