//! Order API
//!
//! | Path | Method | Permission |
//! |------|--------|------------|
//! | /api/orders | GET | orders:read |
//! | /api/orders | POST | orders:create |
//! | /api/orders/{id} | GET | orders:read |
//! | /api/orders/{id}/status | PUT | orders:update |
//! | /api/orders/bulk-delete | POST | orders:delete |

mod handler;

use axum::{Router, middleware, routing::get, routing::post, routing::put};

use crate::auth::middleware::require_permission;
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    Router::new().nest("/api/orders", routes(state))
}

fn routes(state: &ServerState) -> Router<ServerState> {
    let read = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("orders", "read"),
        ));

    let create = Router::new()
        .route("/", post(handler::create))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("orders", "create"),
        ));

    let update = Router::new()
        .route("/{id}/status", put(handler::update_status))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("orders", "update"),
        ));

    let delete = Router::new()
        .route("/bulk-delete", post(handler::bulk_delete))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("orders", "delete"),
        ));

    read.merge(create).merge(update).merge(delete)
}
