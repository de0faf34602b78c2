//! Account record command implementations

use anyhow::{Context, Result};
use chrono::NaiveDate;

use kapital_core::models::{NewRecord, RecordType};
use kapital_core::Database;

use super::{format_amount, truncate};

pub fn cmd_records_list(db: &Database, account_id: Option<i64>) -> Result<()> {
    let records = db.list_records(account_id)?;
    let currency = db.get_settings()?.currency;

    if records.is_empty() {
        println!("No records found.");
        return Ok(());
    }

    println!();
    println!(
        "   {:>5}  {:<10}  {:>7}  {:<10}  {:>16}  Description",
        "ID", "Date", "Account", "Type", "Amount"
    );
    println!("   ─────────────────────────────────────────────────────────────────────");
    for record in &records {
        println!(
            "   {:>5}  {:<10}  {:>7}  {:<10}  {:>16}  {}",
            record.id,
            record.date.format("%Y-%m-%d"),
            record.account_id,
            record.record_type.as_str(),
            format_amount(record.signed_amount(), &currency),
            truncate(record.description.as_deref().unwrap_or(""), 30)
        );
    }
    println!();
    println!("   {} records", records.len());

    Ok(())
}

pub fn cmd_records_add(
    db: &Database,
    account_id: i64,
    record_type: RecordType,
    amount: i64,
    description: Option<&str>,
    date: Option<NaiveDate>,
) -> Result<()> {
    let date = date
        .map(|d| {
            d.and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc())
                .context("Invalid record date")
        })
        .transpose()?;

    let record = db
        .create_record(&NewRecord {
            account_id,
            record_type,
            amount,
            description: description.map(str::to_string),
            date,
        })
        .context("Failed to add record")?;

    let currency = db.get_settings()?.currency;
    println!(
        "✅ Recorded {} of {} on account {} (record {})",
        record.record_type,
        format_amount(record.amount, &currency),
        record.account_id,
        record.id
    );
    Ok(())
}
