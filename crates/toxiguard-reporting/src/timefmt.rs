//! Human-readable relative timestamps for the comment feed

use chrono::{DateTime, Utc};

/// Describe how long before `now` the instant `then` was.
///
/// Whole days take precedence over hours; a month is 30 days and a year
/// 365. Instants in the future read as "just now".
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = (now - then).num_seconds().max(0);
    let days = elapsed / 86_400;
    let seconds = elapsed % 86_400;

    if days > 365 {
        format!("{} years ago", days / 365)
    } else if days > 30 {
        format!("{} months ago", days / 30)
    } else if days > 0 {
        format!("{days} days ago")
    } else if seconds > 3600 {
        format!("{} hours ago", seconds / 3600)
    } else if seconds > 60 {
        format!("{} minutes ago", seconds / 60)
    } else {
        "just now".to_string()
    }
}
