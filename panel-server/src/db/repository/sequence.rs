//! Per-day order sequence counter

use super::{BaseRepository, RepoError, RepoResult};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// One counter record per calendar day, keyed by the day string
/// (e.g. "260830"). The increment runs as a single statement so two
/// concurrent order creations can never observe the same value.
#[derive(Clone)]
pub struct OrderSequenceRepository {
    base: BaseRepository,
}

impl OrderSequenceRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Atomically increment and return the counter for the given day.
    /// The first call of a day returns 1.
    pub async fn next(&self, day: &str) -> RepoResult<u32> {
        #[derive(serde::Deserialize)]
        struct SeqRow {
            counter: u32,
        }

        let rows: Vec<SeqRow> = self
            .base
            .db()
            .query(
                "UPSERT type::thing('order_seq', $day) \
                 SET counter = (counter OR 0) + 1 RETURN AFTER",
            )
            .bind(("day", day.to_string()))
            .await?
            .take(0)?;

        rows.into_iter()
            .next()
            .map(|r| r.counter)
            .ok_or_else(|| RepoError::Database("order sequence increment returned no row".to_string()))
    }
}
