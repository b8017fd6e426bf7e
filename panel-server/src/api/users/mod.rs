//! User management API
//!
//! | Path | Method | Permission |
//! |------|--------|------------|
//! | /api/users | GET | users:read |
//! | /api/users | POST | users:create |
//! | /api/users/{id} | GET | users:read |
//! | /api/users/{id} | PUT | users:update |
//! | /api/users/bulk-delete | POST | users:delete |

mod handler;

use axum::{Router, middleware, routing::get, routing::post, routing::put};

use crate::auth::middleware::require_permission;
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    Router::new().nest("/api/users", routes(state))
}

fn routes(state: &ServerState) -> Router<ServerState> {
    let read = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("users", "read"),
        ));

    let create = Router::new()
        .route("/", post(handler::create))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("users", "create"),
        ));

    let update = Router::new()
        .route("/{id}", put(handler::update))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("users", "update"),
        ));

    let delete = Router::new()
        .route("/bulk-delete", post(handler::bulk_delete))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("users", "delete"),
        ));

    read.merge(create).merge(update).merge(delete)
}
