//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `resolve_db_path` - Pick the database path from flag, env and config
//! - `open_db` - Shared utility to open the database
//! - `cmd_init` - Initialize the database

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use kapital_core::{AppConfig, Database};

use super::format_amount;

/// Environment variable overriding the configured database path
pub const DB_PATH_ENV: &str = "KAPITAL_DB";

/// Database path priority: --db flag > KAPITAL_DB > config file > default
pub fn resolve_db_path(flag: Option<&Path>, env: Option<OsString>, config: &AppConfig) -> PathBuf {
    if let Some(path) = flag {
        return path.to_path_buf();
    }
    if let Some(path) = env.filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    config.database.path.clone()
}

/// Open (and migrate) the database
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    Database::new(path_str)
        .with_context(|| format!("Failed to open database at {}", db_path.display()))
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path)?;
    let settings = db.get_settings().context("Failed to read settings")?;
    info!(path = %db_path.display(), "Database ready");

    println!("   Currency: {}", settings.currency);
    println!(
        "   Capital goal: {}",
        format_amount(settings.capital_goal, &settings.currency)
    );
    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Add an account:  kapital accounts add Sparekonto --type SAVINGS");
    println!("  2. Record capital:  kapital records add 1 --type DEPOSIT 25000");
    println!("  3. Start web UI:    kapital serve");

    Ok(())
}
