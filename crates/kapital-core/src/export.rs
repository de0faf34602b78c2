//! Export of account records
//!
//! Supports CSV (via the `csv` crate) and JSON, filtered by account and an
//! inclusive date range. Amounts are written in major units.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{AccountRecord, RecordType};
use crate::money::Money;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown export format: {}. Valid: csv, json", s)),
        }
    }
}

/// Options for record export
#[derive(Debug, Clone, Default)]
pub struct RecordExportOptions {
    pub account_id: Option<i64>,
    /// Start date filter (inclusive)
    pub from: Option<NaiveDate>,
    /// End date filter (inclusive)
    pub to: Option<NaiveDate>,
}

/// A record with its account name, ready for export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordExport {
    pub id: i64,
    pub date: String,
    pub account_id: i64,
    pub account: String,
    pub record_type: RecordType,
    pub amount: f64,
    pub signed_amount: f64,
    pub description: Option<String>,
}

const CSV_HEADER: [&str; 6] = [
    "date",
    "account",
    "type",
    "amount",
    "signed_amount",
    "description",
];

impl RecordExportOptions {
    fn matches(&self, record: &AccountRecord) -> bool {
        let day = record.date.date_naive();
        self.account_id.map_or(true, |id| record.account_id == id)
            && self.from.map_or(true, |from| day >= from)
            && self.to.map_or(true, |to| day <= to)
    }
}

impl Database {
    /// Records selected by `opts` paired with their account names
    fn records_for_export(
        &self,
        opts: &RecordExportOptions,
    ) -> Result<Vec<(AccountRecord, String)>> {
        let names: HashMap<i64, String> = self
            .list_accounts()?
            .into_iter()
            .map(|a| (a.id, a.name))
            .collect();

        Ok(self
            .list_records(opts.account_id)?
            .into_iter()
            .filter(|r| opts.matches(r))
            .map(|r| {
                let name = names.get(&r.account_id).cloned().unwrap_or_default();
                (r, name)
            })
            .collect())
    }

    /// Records matching `opts`, oldest first
    pub fn export_records(&self, opts: &RecordExportOptions) -> Result<Vec<RecordExport>> {
        let rows = self
            .records_for_export(opts)?
            .into_iter()
            .map(|(r, account)| RecordExport {
                id: r.id,
                date: r.date.format("%Y-%m-%d").to_string(),
                account_id: r.account_id,
                account,
                record_type: r.record_type,
                amount: Money(r.amount).to_major(),
                signed_amount: r.signed_amount().to_major(),
                description: r.description,
            })
            .collect();

        Ok(rows)
    }

    /// Records matching `opts` as CSV text
    pub fn export_records_csv(&self, opts: &RecordExportOptions) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(CSV_HEADER)?;

        let rows = self.records_for_export(opts)?;
        let count = rows.len();
        for (record, account) in rows {
            writer.write_record([
                record.date.format("%Y-%m-%d").to_string(),
                account,
                record.record_type.as_str().to_string(),
                Money(record.amount).to_string(),
                record.signed_amount().to_string(),
                record.description.unwrap_or_default(),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))?;
        info!(records = count, "Exported records to CSV");
        String::from_utf8(bytes).map_err(|e| Error::InvalidData(e.to_string()))
    }
}
