//! Coarse age buckets (`3d4h`, `2h5m`, `7m`) from `metadata.creationTimestamp`.

use chrono::{DateTime, Duration, Utc};
use serde_yaml::Value;

pub const UNKNOWN_AGE: &str = "unknown";

/// Bucket an elapsed duration. Components truncate toward zero and the
/// input is not clamped, so a creation time in the future renders as a
/// negative minute count.
pub fn format_elapsed(elapsed: Duration) -> String {
    let days = elapsed.num_days();
    let hours = elapsed.num_hours();
    let mins = elapsed.num_minutes();
    if days >= 1 {
        format!("{}d{}h", days, hours % 24)
    } else if hours >= 1 {
        format!("{}h{}m", hours, mins % 60)
    } else {
        format!("{}m", mins)
    }
}

/// Age of a `creationTimestamp` value relative to `now`.
/// Anything but an RFC 3339 string yields [`UNKNOWN_AGE`].
pub fn age_label(created: Option<&Value>, now: DateTime<Utc>) -> String {
    let parsed = created
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok());
    match parsed {
        Some(ts) => format_elapsed(now.signed_duration_since(ts.with_timezone(&Utc))),
        None => UNKNOWN_AGE.to_string(),
    }
}

pub fn age_label_now(created: Option<&Value>) -> String {
    age_label(created, Utc::now())
}
