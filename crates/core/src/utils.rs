//! Small helpers shared across the crate.

use chrono::Local;

/// Format used for every `last_sync` column.
pub const SYNC_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time rendered for a `last_sync` column.
pub fn sync_timestamp() -> String {
    Local::now().format(SYNC_TIMESTAMP_FORMAT).to_string()
}
