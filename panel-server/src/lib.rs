//! SP Panel Server - B2B admin panel and storefront backend
//!
//! # Module structure
//!
//! ```text
//! panel-server/src/
//! ├── core/          # Config, state, HTTP server
//! ├── auth/          # JWT authentication, permission gate
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # Embedded SurrealDB models and repositories
//! ├── orders/        # Order aggregate builder, order numbers
//! ├── notify/        # Notification fan-out, mock mailer, schedule worker
//! ├── reports/       # Read-only dashboard aggregation
//! └── utils/         # Errors, logging
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod notify;
pub mod orders;
pub mod reports;
pub mod utils;

pub use auth::{CurrentUser, JwtService, PermissionGate};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - structured tracing with a dedicated target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
