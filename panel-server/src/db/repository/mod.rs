//! Repository module
//!
//! CRUD access to the embedded SurrealDB tables. Each repository wraps a
//! `BaseRepository` holding the database handle; all queries go through
//! bound parameters.

pub mod notification;
pub mod order;
pub mod product;
pub mod sequence;
pub mod user;

pub use notification::NotificationRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;
pub use sequence::OrderSequenceRepository;
pub use user::UserRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Business rule violated: {0}")]
    BusinessRule(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Strip a `table:` prefix from an id when the caller passed the full form
pub(crate) fn strip_table_prefix<'a>(table: &str, id: &'a str) -> &'a str {
    id.strip_prefix(table)
        .and_then(|rest| rest.strip_prefix(':'))
        .unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_only_matching_prefix() {
        assert_eq!(strip_table_prefix("user", "user:abc"), "abc");
        assert_eq!(strip_table_prefix("user", "abc"), "abc");
        assert_eq!(strip_table_prefix("user", "order:abc"), "order:abc");
    }
}
