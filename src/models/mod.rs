pub mod contact;
pub mod user;

pub use contact::*;
pub use user::*;

use chrono::{DateTime, SecondsFormat, Utc};
use mongodb::bson::DateTime as BsonDateTime;

/// Formats a BSON timestamp the way the API exposes it, e.g. `2024-08-20T11:13:55.453Z`.
pub fn to_rfc3339(value: BsonDateTime) -> String {
    DateTime::<Utc>::from_timestamp_millis(value.timestamp_millis())
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}
