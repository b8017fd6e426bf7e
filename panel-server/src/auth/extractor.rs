//! JWT extractor
//!
//! Lets protected handlers take `user: CurrentUser` as an argument. Falls
//! back to validating the Authorization header when the auth middleware
//! has not already populated request extensions.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Already extracted by the middleware
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = match auth_header {
            Some(header) => JwtService::extract_from_header(header)
                .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
            None => {
                security_log!("WARN", "auth_missing", uri = format!("{:?}", parts.uri));
                return Err(AppError::unauthorized());
            }
        };

        match state.jwt_service().validate_token(token) {
            Ok(claims) => {
                let user = CurrentUser::try_from(claims)
                    .map_err(|e| AppError::invalid_token(format!("Malformed JWT claims: {e}")))?;
                parts.extensions.insert(user.clone());
                Ok(user)
            }
            Err(e) => {
                security_log!(
                    "WARN",
                    "auth_failed",
                    error = format!("{}", e),
                    uri = format!("{:?}", parts.uri)
                );

                match e {
                    crate::auth::JwtError::ExpiredToken => Err(AppError::token_expired()),
                    _ => Err(AppError::invalid_token("Invalid token")),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{JwtConfig, PermissionGate};
    use crate::core::Config;
    use crate::db::DbService;
    use crate::notify::MockMailer;
    use axum::http::Request;
    use shared::models::Role;
    use std::sync::Arc;

    async fn test_state() -> ServerState {
        let svc = DbService::memory().await.unwrap();
        ServerState::new(
            Config::with_overrides("/tmp/sp-panel-extractor-test", 0),
            svc.db,
            Arc::new(JwtService::new(JwtConfig::default())),
            Arc::new(PermissionGate::default()),
            Arc::new(MockMailer),
        )
    }

    fn parts_with(builder: Request<()>) -> Parts {
        builder.into_parts().0
    }

    #[tokio::test]
    async fn test_reuses_user_from_request_extensions() {
        let state = test_state().await;
        let mut req = Request::builder().uri("/api/auth/me").body(()).unwrap();
        req.extensions_mut().insert(CurrentUser {
            id: "u1".to_string(),
            email: "ada@example.com".to_string(),
            name: "Ada".to_string(),
            role: Role::Admin,
        });
        let mut parts = parts_with(req);

        let user = CurrentUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(user.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_validates_bearer_token_when_extensions_empty() {
        let state = test_state().await;
        let token = state
            .jwt_service()
            .generate_token("u1", "ada@example.com", "Ada", Role::Manager)
            .unwrap();
        let req = Request::builder()
            .uri("/api/auth/me")
            .header(http::header::AUTHORIZATION, format!("Bearer {token}"))
            .body(())
            .unwrap();
        let mut parts = parts_with(req);

        let user = CurrentUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.role, Role::Manager);
    }

    #[tokio::test]
    async fn test_missing_header_is_rejected() {
        let state = test_state().await;
        let req = Request::builder().uri("/api/auth/me").body(()).unwrap();
        let mut parts = parts_with(req);

        assert!(
            CurrentUser::from_request_parts(&mut parts, &state)
                .await
                .is_err()
        );
    }
}
