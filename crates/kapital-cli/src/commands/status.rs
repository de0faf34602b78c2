//! Summary command implementations (dashboard, affordability)

use anyhow::{Context, Result};
use chrono::Utc;

use kapital_core::affordability::LimitingFactor;
use kapital_core::{load_affordability, load_dashboard, Database, Money};

use super::format_amount;

pub fn cmd_dashboard(db: &Database) -> Result<()> {
    let view = load_dashboard(db, Utc::now()).context("Failed to compute dashboard")?;
    let currency = db.get_settings()?.currency;
    let amount = |m: Money| format_amount(m, &currency);

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│          💰 Kapital Dashboard           │");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Total capital:   {}", amount(view.total_capital));
    println!("  Total debt:      {}", amount(view.total_debt));
    println!("  Net worth:       {}", amount(view.net_worth));
    println!("  Last 30 days:    {}", amount(view.monthly_growth));

    if !view.accounts.is_empty() {
        println!();
        println!("  Accounts");
        println!("  ─────────────────────────────────────────");
        for account in &view.accounts {
            println!(
                "  {:<24} {:>16}",
                super::truncate(&account.name, 24),
                amount(account.balance)
            );
        }
    }

    println!();
    println!("  Weekly history");
    println!("  ─────────────────────────────────────────");
    for week in &view.weekly_history {
        println!(
            "  {:<8} {:>18} {:>+8.1}%",
            week.label,
            amount(week.running_total),
            week.percentage_change
        );
    }

    let goal = &view.goal;
    println!();
    println!(
        "  🎯 Goal: {} of {} ({}%)",
        amount(goal.current),
        amount(goal.goal),
        goal.progress_percentage
    );
    if goal.progress_percentage < 100 {
        println!("     {} to go", amount(goal.remaining));
    }
    println!();

    Ok(())
}

pub fn cmd_affordability(db: &Database) -> Result<()> {
    let estimate = load_affordability(db).context("Failed to estimate affordability")?;
    let currency = db.get_settings()?.currency;
    let amount = |m: Money| format_amount(m, &currency);

    println!();
    println!("🏠 Loan Affordability");
    println!("   ─────────────────────────────");
    println!("   Annual income:      {}", amount(estimate.annual_income));
    println!("   Existing debt:      {}", amount(estimate.existing_debt));
    println!("   Equity:             {}", amount(estimate.equity));
    println!();
    println!("   Max by income:      {}", amount(estimate.max_by_income));
    if let Some(limit) = estimate.max_by_equity {
        println!("   Max by equity:      {}", amount(limit));
    }
    match estimate.max_by_cashflow {
        Some(limit) => println!("   Max by cashflow:    {}", amount(limit)),
        None => println!("   Max by cashflow:    (set sifo_living_expense to include)"),
    }
    println!();

    let factor = match estimate.limiting_factor {
        LimitingFactor::Income => "income",
        LimitingFactor::Equity => "equity",
        LimitingFactor::Cashflow => "cashflow",
    };
    println!(
        "   Max loan:           {} (limited by {})",
        amount(estimate.max_loan),
        factor
    );
    println!(
        "   Max purchase price: {}",
        amount(estimate.max_purchase_price)
    );
    println!(
        "   Monthly payment:    {} at {:.2}%",
        amount(estimate.monthly_payment),
        estimate.interest_rate_bp as f64 / 100.0
    );
    println!(
        "   Stress tested:      {} at {:.2}%",
        amount(estimate.stressed_monthly_payment),
        estimate.stress_rate_bp as f64 / 100.0
    );
    println!();

    Ok(())
}
