//! Settings operations (single row, id = 1)

use rusqlite::{params, OptionalExtension, Row};
use tracing::info;

use super::{parse_column, parse_datetime, Database};
use crate::error::Result;
use crate::models::{Settings, SettingsPatch, SETTINGS_VERSION};

fn settings_from_row(row: &Row) -> rusqlite::Result<Settings> {
    let currency_display_str: String = row.get(4)?;
    let updated_at_str: Option<String> = row.get(13)?;

    Ok(Settings {
        version: row.get(0)?,
        currency: row.get(1)?,
        date_format: row.get(2)?,
        number_format: row.get(3)?,
        currency_display: parse_column(4, &currency_display_str)?,
        capital_goal: row.get(5)?,
        sifo_living_expense: row.get(6)?,
        debt_ratio_bp: row.get(7)?,
        ltv_ratio_bp: row.get(8)?,
        stress_test_rate_bp: row.get(9)?,
        loan_term_years: row.get(10)?,
        interest_rate_bp: row.get(11)?,
        down_payment_min_bp: row.get(12)?,
        updated_at: updated_at_str
            .as_deref()
            .map(|s| parse_datetime(13, s))
            .transpose()?,
    })
}

impl Database {
    /// Current settings, or the defaults when none have been saved
    pub fn get_settings(&self) -> Result<Settings> {
        let conn = self.conn()?;
        let settings = conn
            .query_row(
                "SELECT version, currency, date_format, number_format, currency_display,
                        capital_goal, sifo_living_expense, debt_ratio_bp, ltv_ratio_bp,
                        stress_test_rate_bp, loan_term_years, interest_rate_bp,
                        down_payment_min_bp, updated_at
                 FROM settings WHERE id = 1",
                [],
                settings_from_row,
            )
            .optional()?;

        Ok(settings.unwrap_or_default())
    }

    /// Store a full settings record, replacing any existing one
    pub fn save_settings(&self, settings: &Settings) -> Result<Settings> {
        settings.validate()?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO settings (
                id, version, currency, date_format, number_format, currency_display,
                capital_goal, sifo_living_expense, debt_ratio_bp, ltv_ratio_bp,
                stress_test_rate_bp, loan_term_years, interest_rate_bp, down_payment_min_bp,
                updated_at
             ) VALUES (1, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP)
             ON CONFLICT(id) DO UPDATE SET
                version = excluded.version,
                currency = excluded.currency,
                date_format = excluded.date_format,
                number_format = excluded.number_format,
                currency_display = excluded.currency_display,
                capital_goal = excluded.capital_goal,
                sifo_living_expense = excluded.sifo_living_expense,
                debt_ratio_bp = excluded.debt_ratio_bp,
                ltv_ratio_bp = excluded.ltv_ratio_bp,
                stress_test_rate_bp = excluded.stress_test_rate_bp,
                loan_term_years = excluded.loan_term_years,
                interest_rate_bp = excluded.interest_rate_bp,
                down_payment_min_bp = excluded.down_payment_min_bp,
                updated_at = CURRENT_TIMESTAMP",
            params![
                SETTINGS_VERSION,
                settings.currency,
                settings.date_format,
                settings.number_format,
                settings.currency_display.as_str(),
                settings.capital_goal,
                settings.sifo_living_expense,
                settings.debt_ratio_bp,
                settings.ltv_ratio_bp,
                settings.stress_test_rate_bp,
                settings.loan_term_years,
                settings.interest_rate_bp,
                settings.down_payment_min_bp,
            ],
        )?;
        drop(conn);

        info!(currency = %settings.currency, "Saved settings");
        self.get_settings()
    }

    /// Merge a partial update into the current settings and store the result
    pub fn update_settings(&self, patch: &SettingsPatch) -> Result<Settings> {
        let merged = self.get_settings()?.merged(patch);
        self.save_settings(&merged)
    }

    /// Drop stored settings so the defaults apply again
    pub fn reset_settings(&self) -> Result<Settings> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM settings WHERE id = 1", [])?;
        info!("Reset settings to defaults");
        Ok(Settings::default())
    }
}
