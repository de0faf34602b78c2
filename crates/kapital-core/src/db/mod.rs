//! Database access layer with connection pooling and schema setup
//!
//! This module is organized by entity:
//! - `accounts` - Capital accounts (balance derived from records)
//! - `records` - Account ledger entries
//! - `debts` - Outstanding debts
//! - `incomes` - Income sources
//! - `settings` - The singleton settings row

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

use crate::error::Result;

mod accounts;
mod debts;
mod incomes;
mod records;
mod settings;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Timestamp layout used for every DATETIME column
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a SQLite datetime string in column `idx` into a DateTime<Utc>
pub(crate) fn parse_datetime(idx: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    // SQLite stores as "YYYY-MM-DD HH:MM:SS" format
    chrono::NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .map(|dt| dt.and_utc())
        .or_else(|_| DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc)))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, e.into())
        })
}

/// Format a timestamp the way SQLite's CURRENT_TIMESTAMP does
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

/// Parse an enum stored as TEXT, surfacing bad values as conversion errors
pub(crate) fn parse_column<T>(idx: usize, value: &str) -> rusqlite::Result<T>
where
    T: FromStr<Err = String>,
{
    value.parse::<T>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, e.into())
    })
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
    /// Directory holding a throwaway database, removed with the last clone
    _temp_dir: Option<Arc<tempfile::TempDir>>,
}

impl Database {
    /// Open (or create) the database at `path` and apply the schema
    pub fn new(path: &str) -> Result<Self> {
        // foreign_keys is per-connection, so set it on every pooled connection
        let manager = SqliteConnectionManager::file(path).with_init(|conn| {
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            Ok(())
        });

        let pool = Pool::builder().max_size(10).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
            _temp_dir: None,
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database (for testing)
    ///
    /// Note: Uses a temporary file rather than `:memory:` so every pooled
    /// connection sees the same data. The file and its WAL/SHM siblings live
    /// in a temp directory that is deleted when the last clone is dropped.
    pub fn in_memory() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("kapital_test_").tempdir()?;
        let path = dir.path().join("kapital.db");

        let mut db = Self::new(&path.to_string_lossy())?;
        db._temp_dir = Some(Arc::new(dir));
        Ok(db)
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- WAL mode: readers don't block writers
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;

            -- Capital accounts. Balance is derived from account_records.
            CREATE TABLE IF NOT EXISTS accounts (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                type TEXT NOT NULL
                    CHECK (type IN ('SAVINGS', 'CHECKING', 'INVESTMENT', 'STOCK_SAVINGS')),
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            -- Ledger entries. amount is a magnitude in minor units; type carries the sign.
            CREATE TABLE IF NOT EXISTS account_records (
                id INTEGER PRIMARY KEY,
                account_id INTEGER NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
                type TEXT NOT NULL
                    CHECK (type IN ('DEPOSIT', 'WITHDRAWAL', 'INTEREST', 'TRANSFER')),
                amount INTEGER NOT NULL CHECK (amount BETWEEN 0 AND 1000000000000000),
                description TEXT,
                date DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_account_records_account ON account_records(account_id);
            CREATE INDEX IF NOT EXISTS idx_account_records_date ON account_records(date);

            -- Debts (outstanding balance in minor units)
            CREATE TABLE IF NOT EXISTS debts (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                type TEXT NOT NULL
                    CHECK (type IN ('STUDENT_LOAN', 'CONSUMER_LOAN', 'MORTGAGE', 'CREDIT_CARD')),
                amount INTEGER NOT NULL CHECK (amount BETWEEN 0 AND 1000000000000000),
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            -- Income sources
            CREATE TABLE IF NOT EXISTS incomes (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                amount INTEGER NOT NULL CHECK (amount BETWEEN 0 AND 1000000000000000),
                frequency TEXT NOT NULL CHECK (frequency IN ('WEEKLY', 'MONTHLY', 'YEARLY')),
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            -- Settings (single row, id = 1). Rates and ratios in basis points.
            CREATE TABLE IF NOT EXISTS settings (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                version INTEGER NOT NULL,
                currency TEXT NOT NULL,
                date_format TEXT NOT NULL,
                number_format TEXT NOT NULL,
                currency_display TEXT NOT NULL
                    CHECK (currency_display IN ('SYMBOL', 'CODE', 'NAME')),
                capital_goal INTEGER NOT NULL,
                sifo_living_expense INTEGER,
                debt_ratio_bp INTEGER NOT NULL,
                ltv_ratio_bp INTEGER NOT NULL,
                stress_test_rate_bp INTEGER NOT NULL,
                loan_term_years INTEGER NOT NULL,
                interest_rate_bp INTEGER NOT NULL,
                down_payment_min_bp INTEGER NOT NULL,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );
            "#,
        )?;

        info!("Database schema initialized");
        Ok(())
    }
}
