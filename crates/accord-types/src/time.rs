//! Wall-clock helper for creation and ballot timestamps.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current unix time in milliseconds.
///
/// Clock regressions saturate to 0 rather than panicking; timestamps are
/// informational and never drive protocol decisions.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
