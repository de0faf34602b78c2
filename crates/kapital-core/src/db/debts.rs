//! Debt operations

use rusqlite::{params, OptionalExtension, Row};
use tracing::info;

use super::{parse_column, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Debt, DebtPatch, NewDebt};

const DEBT_COLUMNS: &str = "id, name, type, amount, created_at, updated_at";

fn debt_from_row(row: &Row) -> rusqlite::Result<Debt> {
    let type_str: String = row.get(2)?;
    let created_at_str: String = row.get(4)?;
    let updated_at_str: String = row.get(5)?;

    Ok(Debt {
        id: row.get(0)?,
        name: row.get(1)?,
        debt_type: parse_column(2, &type_str)?,
        amount: row.get(3)?,
        created_at: parse_datetime(4, &created_at_str)?,
        updated_at: parse_datetime(5, &updated_at_str)?,
    })
}

impl Database {
    /// Create a new debt
    pub fn create_debt(&self, debt: &NewDebt) -> Result<Debt> {
        debt.validate()?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO debts (name, type, amount) VALUES (?, ?, ?)",
            params![debt.name.trim(), debt.debt_type.as_str(), debt.amount],
        )?;
        let id = conn.last_insert_rowid();
        drop(conn);

        info!(id, debt_type = %debt.debt_type, "Created debt");
        self.get_debt(id)?
            .ok_or_else(|| Error::NotFound(format!("debt {}", id)))
    }

    /// Replace the debt with `id` if it exists, otherwise create a new one
    pub fn upsert_debt(&self, id: Option<i64>, debt: &NewDebt) -> Result<Debt> {
        let Some(id) = id else {
            return self.create_debt(debt);
        };

        let patch = DebtPatch {
            name: Some(debt.name.clone()),
            debt_type: Some(debt.debt_type),
            amount: Some(debt.amount),
        };
        match self.update_debt(id, &patch)? {
            Some(updated) => Ok(updated),
            None => self.create_debt(debt),
        }
    }

    /// List all debts, largest first
    pub fn list_debts(&self) -> Result<Vec<Debt>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM debts ORDER BY amount DESC, id",
            DEBT_COLUMNS
        ))?;

        let debts = stmt
            .query_map([], debt_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(debts)
    }

    /// Get a debt by ID
    pub fn get_debt(&self, id: i64) -> Result<Option<Debt>> {
        let conn = self.conn()?;
        let debt = conn
            .query_row(
                &format!("SELECT {} FROM debts WHERE id = ?", DEBT_COLUMNS),
                params![id],
                debt_from_row,
            )
            .optional()?;
        Ok(debt)
    }

    /// Apply a partial update. Returns `None` when the debt doesn't exist.
    pub fn update_debt(&self, id: i64, patch: &DebtPatch) -> Result<Option<Debt>> {
        patch.validate()?;

        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE debts SET
                name = COALESCE(?, name),
                type = COALESCE(?, type),
                amount = COALESCE(?, amount),
                updated_at = CURRENT_TIMESTAMP
             WHERE id = ?",
            params![
                patch.name.as_deref().map(str::trim),
                patch.debt_type.map(|t| t.as_str()),
                patch.amount,
                id
            ],
        )?;
        drop(conn);

        if changed == 0 {
            return Ok(None);
        }
        info!(id, "Updated debt");
        self.get_debt(id)
    }

    /// Delete a debt
    pub fn delete_debt(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM debts WHERE id = ?", params![id])?;
        if deleted > 0 {
            info!(id, "Deleted debt");
        }
        Ok(deleted > 0)
    }
}
