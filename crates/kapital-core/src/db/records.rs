//! Account record (ledger entry) operations

use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use tracing::{info, warn};

use super::{format_datetime, parse_column, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{AccountRecord, NewRecord, RecordPatch};
use crate::validation::ValidationErrors;

const RECORD_COLUMNS: &str = "id, account_id, type, amount, description, date, created_at";

fn record_from_row(row: &Row) -> rusqlite::Result<AccountRecord> {
    let type_str: String = row.get(2)?;
    let date_str: String = row.get(5)?;
    let created_at_str: String = row.get(6)?;

    Ok(AccountRecord {
        id: row.get(0)?,
        account_id: row.get(1)?,
        record_type: parse_column(2, &type_str)?,
        amount: row.get(3)?,
        description: row.get(4)?,
        date: parse_datetime(5, &date_str)?,
        created_at: parse_datetime(6, &created_at_str)?,
    })
}

/// Blank descriptions are stored as NULL
fn normalize_description(description: Option<&str>) -> Option<String> {
    description
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl Database {
    fn require_account(&self, account_id: i64) -> Result<()> {
        if self.account_exists(account_id)? {
            return Ok(());
        }
        warn!(account_id, "Record references unknown account");
        let mut errors = ValidationErrors::new();
        errors.add(
            "account_id",
            format!("account {} does not exist", account_id),
        );
        Err(errors.into())
    }

    /// Add a ledger entry to an account
    pub fn create_record(&self, record: &NewRecord) -> Result<AccountRecord> {
        record.validate()?;
        self.require_account(record.account_id)?;

        let date = record.date.unwrap_or_else(Utc::now);
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO account_records (account_id, type, amount, description, date)
             VALUES (?, ?, ?, ?, ?)",
            params![
                record.account_id,
                record.record_type.as_str(),
                record.amount,
                normalize_description(record.description.as_deref()),
                format_datetime(&date),
            ],
        )?;
        let id = conn.last_insert_rowid();
        drop(conn);

        info!(
            id,
            account_id = record.account_id,
            record_type = %record.record_type,
            amount = record.amount,
            "Created record"
        );
        self.get_record(id)?
            .ok_or_else(|| Error::NotFound(format!("record {}", id)))
    }

    /// Replace the record with `id` if it exists, otherwise create a new one
    pub fn upsert_record(&self, id: Option<i64>, record: &NewRecord) -> Result<AccountRecord> {
        let Some(id) = id else {
            return self.create_record(record);
        };

        let patch = RecordPatch {
            account_id: Some(record.account_id),
            record_type: Some(record.record_type),
            amount: Some(record.amount),
            description: Some(record.description.clone()),
            date: record.date,
        };
        match self.update_record(id, &patch)? {
            Some(updated) => Ok(updated),
            None => self.create_record(record),
        }
    }

    /// List records, oldest first, optionally for a single account
    pub fn list_records(&self, account_id: Option<i64>) -> Result<Vec<AccountRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM account_records
             WHERE (?1 IS NULL OR account_id = ?1)
             ORDER BY date, id",
            RECORD_COLUMNS
        ))?;

        let records = stmt
            .query_map(params![account_id], record_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Get a record by ID
    pub fn get_record(&self, id: i64) -> Result<Option<AccountRecord>> {
        let conn = self.conn()?;
        let record = conn
            .query_row(
                &format!("SELECT {} FROM account_records WHERE id = ?", RECORD_COLUMNS),
                params![id],
                record_from_row,
            )
            .optional()?;
        Ok(record)
    }

    /// Apply a partial update. Returns `None` when the record doesn't exist.
    pub fn update_record(&self, id: i64, patch: &RecordPatch) -> Result<Option<AccountRecord>> {
        patch.validate()?;
        if let Some(account_id) = patch.account_id {
            self.require_account(account_id)?;
        }

        let description = patch
            .description
            .as_ref()
            .map(|d| normalize_description(d.as_deref()));
        let set_description = description.is_some();
        let description = description.flatten();

        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE account_records SET
                account_id = COALESCE(?1, account_id),
                type = COALESCE(?2, type),
                amount = COALESCE(?3, amount),
                description = CASE WHEN ?4 THEN ?5 ELSE description END,
                date = COALESCE(?6, date)
             WHERE id = ?7",
            params![
                patch.account_id,
                patch.record_type.map(|t| t.as_str()),
                patch.amount,
                set_description,
                description,
                patch.date.as_ref().map(format_datetime),
                id
            ],
        )?;
        drop(conn);

        if changed == 0 {
            return Ok(None);
        }
        info!(id, "Updated record");
        self.get_record(id)
    }

    /// Delete a record
    pub fn delete_record(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM account_records WHERE id = ?", params![id])?;
        if deleted > 0 {
            info!(id, "Deleted record");
        }
        Ok(deleted > 0)
    }
}
