//! Account command implementations

use anyhow::{bail, Context, Result};

use kapital_core::models::{AccountType, NewAccount};
use kapital_core::Database;

use super::{format_amount, truncate};

pub fn cmd_accounts_list(db: &Database) -> Result<()> {
    let accounts = db.list_accounts()?;
    let currency = db.get_settings()?.currency;

    if accounts.is_empty() {
        println!("No accounts yet. Add one with: kapital accounts add <name>");
        return Ok(());
    }

    println!();
    println!("🏦 Accounts");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   {:>4}  {:<24} {:<14} {:>16}", "ID", "Name", "Type", "Balance");
    for account in &accounts {
        println!(
            "   {:>4}  {:<24} {:<14} {:>16}",
            account.id,
            truncate(&account.name, 24),
            account.account_type.as_str(),
            format_amount(account.total_amount, &currency)
        );
    }
    println!();

    Ok(())
}

pub fn cmd_accounts_add(db: &Database, name: &str, account_type: AccountType) -> Result<()> {
    let account = db
        .create_account(&NewAccount {
            name: name.to_string(),
            account_type,
        })
        .context("Failed to create account")?;

    println!(
        "✅ Created account '{}' ({}) with ID {}",
        account.name, account.account_type, account.id
    );
    Ok(())
}

pub fn cmd_accounts_delete(db: &Database, id: i64) -> Result<()> {
    let Some(account) = db.get_account(id)? else {
        bail!("Account {} not found", id);
    };

    db.delete_account(id).context("Failed to delete account")?;
    println!("🗑️  Deleted account '{}' and its records", account.name);
    Ok(())
}
