//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (db path resolution, open_db) and `init`
//! - `accounts` - Account commands (list, add, delete)
//! - `records` - Account record commands (list, add)
//! - `debts` - Debt commands (list, add)
//! - `incomes` - Income commands (list, add)
//! - `settings` - Settings commands (show, set-goal, set)
//! - `status` - Dashboard and affordability summaries
//! - `export` - Record export to CSV/JSON
//! - `serve` - Web server command

pub mod accounts;
pub mod core;
pub mod debts;
pub mod export;
pub mod incomes;
pub mod records;
pub mod serve;
pub mod settings;
pub mod status;

// Re-export command functions for main.rs
pub use accounts::*;
pub use core::*;
pub use debts::*;
pub use export::*;
pub use incomes::*;
pub use records::*;
pub use serve::*;
pub use settings::*;
pub use status::*;

use kapital_core::Money;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format minor units for display, e.g. `1500.50 NOK`
pub fn format_amount(minor: impl Into<Money>, currency: &str) -> String {
    format!("{} {}", minor.into(), currency)
}
