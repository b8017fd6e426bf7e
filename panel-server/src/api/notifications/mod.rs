//! Notification API
//!
//! | Path | Method | Permission |
//! |------|--------|------------|
//! | /api/notifications | GET | token (own inbox) |
//! | /api/notifications/{id}/read | PUT | token (own inbox) |
//! | /api/notifications/{id} | DELETE | token (own inbox) |
//! | /api/notifications/templates | GET | notifications:read |
//! | /api/notifications/dispatch | POST | notifications:dispatch |

mod handler;

use axum::{Router, middleware, routing::delete, routing::get, routing::post, routing::put};

use crate::auth::middleware::require_permission;
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    Router::new().nest("/api/notifications", routes(state))
}

fn routes(state: &ServerState) -> Router<ServerState> {
    // inbox routes are scoped to the requester, no grant needed
    let inbox = Router::new()
        .route("/", get(handler::list_mine))
        .route("/{id}/read", put(handler::mark_read))
        .route("/{id}", delete(handler::delete_mine));

    let templates = Router::new()
        .route("/templates", get(handler::templates))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("notifications", "read"),
        ));

    let dispatch = Router::new()
        .route("/dispatch", post(handler::dispatch))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("notifications", "dispatch"),
        ));

    inbox.merge(templates).merge(dispatch)
}
