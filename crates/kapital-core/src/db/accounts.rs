//! Account operations

use rusqlite::{params, OptionalExtension, Row};
use tracing::info;

use super::{parse_column, parse_datetime, Database};
use crate::dashboard::{account_balance, balances_by_account};
use crate::error::{Error, Result};
use crate::models::{Account, AccountPatch, NewAccount};

const ACCOUNT_COLUMNS: &str = "id, name, type, created_at, updated_at";

/// Map a row to an account. `total_amount` is filled in by the caller.
fn account_from_row(row: &Row) -> rusqlite::Result<Account> {
    let type_str: String = row.get(2)?;
    let created_at_str: String = row.get(3)?;
    let updated_at_str: String = row.get(4)?;

    Ok(Account {
        id: row.get(0)?,
        name: row.get(1)?,
        account_type: parse_column(2, &type_str)?,
        total_amount: 0,
        created_at: parse_datetime(3, &created_at_str)?,
        updated_at: parse_datetime(4, &updated_at_str)?,
    })
}

impl Database {
    /// Create a new account
    pub fn create_account(&self, account: &NewAccount) -> Result<Account> {
        account.validate()?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO accounts (name, type) VALUES (?, ?)",
            params![account.name.trim(), account.account_type.as_str()],
        )?;
        let id = conn.last_insert_rowid();
        drop(conn);

        info!(id, name = %account.name.trim(), "Created account");
        self.get_account(id)?
            .ok_or_else(|| Error::NotFound(format!("account {}", id)))
    }

    /// Replace the account with `id` if it exists, otherwise create a new one
    pub fn upsert_account(&self, id: Option<i64>, account: &NewAccount) -> Result<Account> {
        let Some(id) = id else {
            return self.create_account(account);
        };

        let patch = AccountPatch {
            name: Some(account.name.clone()),
            account_type: Some(account.account_type),
        };
        match self.update_account(id, &patch)? {
            Some(updated) => Ok(updated),
            None => self.create_account(account),
        }
    }

    /// List all accounts with their derived balances
    pub fn list_accounts(&self) -> Result<Vec<Account>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM accounts ORDER BY name, id",
            ACCOUNT_COLUMNS
        ))?;

        let mut accounts = stmt
            .query_map([], account_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        drop(stmt);
        drop(conn);

        let balances = balances_by_account(&self.list_records(None)?);
        for account in &mut accounts {
            account.total_amount = balances.get(&account.id).copied().unwrap_or_default().minor();
        }

        Ok(accounts)
    }

    /// Get an account by ID
    pub fn get_account(&self, id: i64) -> Result<Option<Account>> {
        let conn = self.conn()?;
        let account = conn
            .query_row(
                &format!("SELECT {} FROM accounts WHERE id = ?", ACCOUNT_COLUMNS),
                params![id],
                account_from_row,
            )
            .optional()?;
        drop(conn);

        match account {
            Some(mut account) => {
                let records = self.list_records(Some(id))?;
                account.total_amount = account_balance(id, &records).minor();
                Ok(Some(account))
            }
            None => Ok(None),
        }
    }

    /// Whether an account with this ID exists
    pub fn account_exists(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE id = ?)",
            params![id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Apply a partial update. Returns `None` when the account doesn't exist.
    pub fn update_account(&self, id: i64, patch: &AccountPatch) -> Result<Option<Account>> {
        patch.validate()?;

        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE accounts SET
                name = COALESCE(?, name),
                type = COALESCE(?, type),
                updated_at = CURRENT_TIMESTAMP
             WHERE id = ?",
            params![
                patch.name.as_deref().map(str::trim),
                patch.account_type.map(|t| t.as_str()),
                id
            ],
        )?;
        drop(conn);

        if changed == 0 {
            return Ok(None);
        }
        info!(id, "Updated account");
        self.get_account(id)
    }

    /// Delete an account and all of its records
    pub fn delete_account(&self, id: i64) -> Result<bool> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        // Records first; rows are removed even when foreign_keys is off
        tx.execute(
            "DELETE FROM account_records WHERE account_id = ?",
            params![id],
        )?;
        let deleted = tx.execute("DELETE FROM accounts WHERE id = ?", params![id])?;
        tx.commit()?;

        if deleted > 0 {
            info!(id, "Deleted account");
        }
        Ok(deleted > 0)
    }
}
