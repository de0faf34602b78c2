//! Debt command implementations

use anyhow::{Context, Result};

use kapital_core::models::{DebtType, NewDebt};
use kapital_core::{Database, Money};

use super::{format_amount, truncate};

pub fn cmd_debts_list(db: &Database) -> Result<()> {
    let debts = db.list_debts()?;
    let currency = db.get_settings()?.currency;

    if debts.is_empty() {
        println!("No debts registered. 🎉");
        return Ok(());
    }

    println!();
    println!("💳 Debts");
    println!("   ─────────────────────────────────────────────────────────────");
    for debt in &debts {
        println!(
            "   {:>4}  {:<24} {:<14} {:>16}",
            debt.id,
            truncate(&debt.name, 24),
            debt.debt_type.as_str(),
            format_amount(debt.amount, &currency)
        );
    }
    let total: Money = debts.iter().map(|d| Money(d.amount)).sum();
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   {:<45}{:>16}", "Total", format_amount(total, &currency));
    println!();

    Ok(())
}

pub fn cmd_debts_add(db: &Database, name: &str, debt_type: DebtType, amount: i64) -> Result<()> {
    let debt = db
        .create_debt(&NewDebt {
            name: name.to_string(),
            debt_type,
            amount,
        })
        .context("Failed to add debt")?;

    let currency = db.get_settings()?.currency;
    println!(
        "✅ Added debt '{}' ({}) of {}",
        debt.name,
        debt.debt_type,
        format_amount(debt.amount, &currency)
    );
    Ok(())
}
