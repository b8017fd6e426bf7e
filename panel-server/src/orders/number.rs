//! Order number generation

use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::repository::{OrderSequenceRepository, RepoResult};

const ORDER_PREFIX: &str = "SP";

/// Generates unique, human-readable order numbers of the form
/// `SP` + `yymmdd` + zero-padded daily sequence, e.g. `SP2608300001`.
///
/// Uniqueness rests on the atomic per-day counter, not on a
/// read-then-write cycle, so concurrent checkouts each get their own
/// number. The counter resets with the calendar day.
#[derive(Clone)]
pub struct OrderNumberGenerator {
    sequences: OrderSequenceRepository,
}

impl OrderNumberGenerator {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            sequences: OrderSequenceRepository::new(db),
        }
    }

    pub async fn next(&self) -> RepoResult<String> {
        let day = Utc::now().format("%y%m%d").to_string();
        let seq = self.sequences.next(&day).await?;
        Ok(format_order_number(&day, seq))
    }
}

fn format_order_number(day: &str, seq: u32) -> String {
    format!("{ORDER_PREFIX}{day}{seq:04}")
}
