//! Reporting API
//!
//! | Path | Method | Permission |
//! |------|--------|------------|
//! | /api/reports/monthly-revenue | GET | reports:read |
//! | /api/reports/revenue-by-category | GET | reports:read |
//! | /api/reports/top-products | GET | reports:read |
//! | /api/reports/monthly-growth | GET | reports:read |

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::middleware::require_permission;
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    Router::new().nest("/api/reports", routes(state))
}

fn routes(state: &ServerState) -> Router<ServerState> {
    Router::new()
        .route("/monthly-revenue", get(handler::monthly_revenue))
        .route("/revenue-by-category", get(handler::revenue_by_category))
        .route("/top-products", get(handler::top_products))
        .route("/monthly-growth", get(handler::monthly_growth))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("reports", "read"),
        ))
}
