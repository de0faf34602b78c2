//! Income command implementations

use anyhow::{Context, Result};

use kapital_core::models::{Frequency, NewIncome};
use kapital_core::Database;

use super::{format_amount, truncate};

pub fn cmd_incomes_list(db: &Database) -> Result<()> {
    let incomes = db.list_incomes()?;
    let currency = db.get_settings()?.currency;

    if incomes.is_empty() {
        println!("No income sources yet. Add one with: kapital incomes add <name> <amount>");
        return Ok(());
    }

    println!();
    println!("💼 Income");
    println!("   ─────────────────────────────────────────────────────────────");
    for income in &incomes {
        println!(
            "   {:>4}  {:<24} {:>16} {:<8} ({} / year)",
            income.id,
            truncate(&income.name, 24),
            format_amount(income.amount, &currency),
            income.frequency.as_str(),
            format_amount(income.annual_amount(), &currency)
        );
    }
    let annual: i64 = incomes.iter().map(|i| i.annual_amount()).sum();
    println!();
    println!("   Gross annual income: {}", format_amount(annual, &currency));
    println!();

    Ok(())
}

pub fn cmd_incomes_add(db: &Database, name: &str, amount: i64, frequency: Frequency) -> Result<()> {
    let income = db
        .create_income(&NewIncome {
            name: name.to_string(),
            amount,
            frequency,
        })
        .context("Failed to add income")?;

    let currency = db.get_settings()?.currency;
    println!(
        "✅ Added income '{}': {} {}",
        income.name,
        format_amount(income.amount, &currency),
        income.frequency
    );
    Ok(())
}
