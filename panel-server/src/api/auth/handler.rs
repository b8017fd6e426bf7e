//! Authentication handlers

use std::time::Duration;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{User, UserResponse};
use crate::db::repository::UserRepository;
use crate::security_log;
use crate::utils::{AppError, AppResult};

/// Fixed delay for authentication to blunt timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: i64,
    pub user: UserResponse,
}

/// Login handler
///
/// The same error message covers an unknown email and a wrong password
/// so the endpoint cannot be used to enumerate accounts.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let repo = UserRepository::new(state.db.clone());
    let user = repo.find_by_email(&req.email).await?;

    // fixed delay before any outcome is revealed
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let user: User = match user {
        Some(u) => {
            if !u.is_active {
                security_log!("WARN", "login_disabled_account", email = req.email.clone());
                return Err(AppError::forbidden("Account has been disabled"));
            }
            let password_valid = u
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;
            if !password_valid {
                security_log!("WARN", "login_failed", email = req.email.clone());
                return Err(AppError::invalid("Invalid email or password"));
            }
            u
        }
        None => {
            security_log!("WARN", "login_unknown_email", email = req.email.clone());
            return Err(AppError::invalid("Invalid email or password"));
        }
    };

    let user_id = user
        .id
        .as_ref()
        .map(|r| r.key().to_string())
        .ok_or_else(|| AppError::internal("user record without id"))?;

    let jwt = state.jwt_service();
    let token = jwt
        .generate_token(&user_id, &user.email, &user.name, user.role)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    security_log!("INFO", "login_success", email = user.email.clone());
    tracing::info!(email = %user.email, "User logged in");

    Ok(Json(LoginResponse {
        token,
        expires_in: jwt.expires_in_secs(),
        user: UserResponse::from(user),
    }))
}

/// Current-user info from the validated token
pub async fn me(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<UserResponse>> {
    let repo = UserRepository::new(state.db.clone());
    let full = repo
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::not_found("Account no longer exists"))?;
    Ok(Json(UserResponse::from(full)))
}
