//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod accounts;
pub mod aggregates;
pub mod debts;
pub mod export;
pub mod incomes;
pub mod records;
pub mod settings;

// Re-export all handlers for use in router
pub use accounts::*;
pub use aggregates::*;
pub use debts::*;
pub use export::*;
pub use incomes::*;
pub use records::*;
pub use settings::*;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

use kapital_core::validation::ValidationErrors;

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`)
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Parse an RFC 3339 timestamp or a plain `YYYY-MM-DD` date (midnight UTC)
pub(crate) fn parse_timestamp(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Some(dt.and_utc());
    }
    errors.add(field, "must be an RFC 3339 timestamp or YYYY-MM-DD");
    None
}
