//! Product catalogue API
//!
//! | Path | Method | Permission |
//! |------|--------|------------|
//! | /api/products | GET | products:read |
//! | /api/products | POST | products:create |
//! | /api/products/{id} | GET | products:read |
//! | /api/products/{id} | PUT | products:update |
//! | /api/products/{id} | DELETE | products:delete |
//! | /api/products/bulk-update | POST | products:update |

mod handler;

use axum::{Router, middleware, routing::delete, routing::get, routing::post, routing::put};

use crate::auth::middleware::require_permission;
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    Router::new().nest("/api/products", routes(state))
}

fn routes(state: &ServerState) -> Router<ServerState> {
    let read = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("products", "read"),
        ));

    let create = Router::new()
        .route("/", post(handler::create))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("products", "create"),
        ));

    let update = Router::new()
        .route("/{id}", put(handler::update))
        .route("/bulk-update", post(handler::bulk_update))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("products", "update"),
        ));

    let remove = Router::new()
        .route("/{id}", delete(handler::delete_by_id))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("products", "delete"),
        ));

    read.merge(create).merge(update).merge(remove)
}
