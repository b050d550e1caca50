//! Domain models: the per-user documents and their mutation rules.
//!
//! Aggregates (inventory, menus) mutate through pure methods taking an
//! explicit `now` timestamp and returning `Result`; persistence is a
//! separate step owned by the repositories. This keeps every invariant
//! (batch numbering, attempt counting, sequence counters) testable without
//! a store.
//!
//! Timestamp conventions: documents owned solely by this service (user
//! accounts, pending registrations) use typed `DateTime<Utc>` fields.
//! Documents shared with the invoice-ingestion pipeline (inventory, menus,
//! recipes) keep their timestamps as ISO-8601 strings, since the pipeline
//! writes naive timestamps that a strict `DateTime` parse would reject.

pub mod inventory;
pub mod menu;
pub mod registration;
pub mod user;

pub use inventory::{InventoryAggregate, InventoryItem, Location, MutationError, NewInventoryItem};
pub use menu::{MenuAggregate, MenuRecipe, NewMenuItem, RecipeData};
pub use registration::PendingRegistration;
pub use user::{Profile, UserAccount};

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a timestamp the way every document field stores it: ISO-8601 UTC.
#[must_use]
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Lenient deserializers for fields the invoice-ingestion pipeline also
/// writes, where strict typing would reject real stored documents.
pub(crate) mod de {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Accept a string or a number as an optional string key.
    ///
    /// Item numbers arrive as strings from this API but as bare numbers from
    /// ingested invoices; both must compare equal for update/delete matching.
    pub fn stringlike<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(other) => Some(other.to_string()),
        })
    }

    /// Accept a missing field, `null`, or `""` as an absent timestamp.
    pub fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.filter(|s| !s.is_empty()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_iso_timestamp_is_utc_with_zulu() {
        let at = Utc.with_ymd_and_hms(2026, 8, 1, 12, 30, 45).unwrap();
        let formatted = iso_timestamp(at);
        assert!(formatted.starts_with("2026-08-01T12:30:45"));
        assert!(formatted.ends_with('Z'));
    }
}
