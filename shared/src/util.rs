//! Small shared utilities

use chrono::Utc;

/// Current time as unix milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
