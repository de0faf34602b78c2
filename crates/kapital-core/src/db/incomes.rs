//! Income source operations

use rusqlite::{params, OptionalExtension, Row};
use tracing::info;

use super::{parse_column, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Income, IncomePatch, NewIncome};

const INCOME_COLUMNS: &str = "id, name, amount, frequency, created_at, updated_at";

fn income_from_row(row: &Row) -> rusqlite::Result<Income> {
    let frequency_str: String = row.get(3)?;
    let created_at_str: String = row.get(4)?;
    let updated_at_str: String = row.get(5)?;

    Ok(Income {
        id: row.get(0)?,
        name: row.get(1)?,
        amount: row.get(2)?,
        frequency: parse_column(3, &frequency_str)?,
        created_at: parse_datetime(4, &created_at_str)?,
        updated_at: parse_datetime(5, &updated_at_str)?,
    })
}

impl Database {
    /// Create a new income source
    pub fn create_income(&self, income: &NewIncome) -> Result<Income> {
        income.validate()?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO incomes (name, amount, frequency) VALUES (?, ?, ?)",
            params![income.name.trim(), income.amount, income.frequency.as_str()],
        )?;
        let id = conn.last_insert_rowid();
        drop(conn);

        info!(id, frequency = %income.frequency, "Created income");
        self.get_income(id)?
            .ok_or_else(|| Error::NotFound(format!("income {}", id)))
    }

    /// Replace the income with `id` if it exists, otherwise create a new one
    pub fn upsert_income(&self, id: Option<i64>, income: &NewIncome) -> Result<Income> {
        let Some(id) = id else {
            return self.create_income(income);
        };

        let patch = IncomePatch {
            name: Some(income.name.clone()),
            amount: Some(income.amount),
            frequency: Some(income.frequency),
        };
        match self.update_income(id, &patch)? {
            Some(updated) => Ok(updated),
            None => self.create_income(income),
        }
    }

    /// List all income sources
    pub fn list_incomes(&self) -> Result<Vec<Income>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM incomes ORDER BY name, id",
            INCOME_COLUMNS
        ))?;

        let incomes = stmt
            .query_map([], income_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(incomes)
    }

    /// Get an income source by ID
    pub fn get_income(&self, id: i64) -> Result<Option<Income>> {
        let conn = self.conn()?;
        let income = conn
            .query_row(
                &format!("SELECT {} FROM incomes WHERE id = ?", INCOME_COLUMNS),
                params![id],
                income_from_row,
            )
            .optional()?;
        Ok(income)
    }

    /// Apply a partial update. Returns `None` when the income doesn't exist.
    pub fn update_income(&self, id: i64, patch: &IncomePatch) -> Result<Option<Income>> {
        patch.validate()?;

        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE incomes SET
                name = COALESCE(?, name),
                amount = COALESCE(?, amount),
                frequency = COALESCE(?, frequency),
                updated_at = CURRENT_TIMESTAMP
             WHERE id = ?",
            params![
                patch.name.as_deref().map(str::trim),
                patch.amount,
                patch.frequency.map(|f| f.as_str()),
                id
            ],
        )?;
        drop(conn);

        if changed == 0 {
            return Ok(None);
        }
        info!(id, "Updated income");
        self.get_income(id)
    }

    /// Delete an income source
    pub fn delete_income(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM incomes WHERE id = ?", params![id])?;
        if deleted > 0 {
            info!(id, "Deleted income");
        }
        Ok(deleted > 0)
    }
}
