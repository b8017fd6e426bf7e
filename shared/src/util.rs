//! Small shared utilities

use chrono::Utc;

/// Current time as Unix timestamp milliseconds.
///
/// All persisted timestamps in the system are millis, matching what the
/// panel UI expects.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
