//! Settings command implementations

use anyhow::{anyhow, bail, Context, Result};

use kapital_core::models::{Settings, SettingsPatch};
use kapital_core::money::parse_major;
use kapital_core::Database;

use super::format_amount;

/// Keys accepted by `kapital settings set`
pub const SETTING_KEYS: &[&str] = &[
    "currency",
    "date_format",
    "number_format",
    "currency_display",
    "capital_goal",
    "sifo_living_expense",
    "debt_ratio_bp",
    "ltv_ratio_bp",
    "stress_test_rate_bp",
    "loan_term_years",
    "interest_rate_bp",
    "down_payment_min_bp",
];

fn parse_u32(key: &str, value: &str) -> Result<u32> {
    value
        .trim()
        .parse()
        .with_context(|| format!("{} must be a non-negative integer", key))
}

fn parse_amount(key: &str, value: &str) -> Result<i64> {
    parse_major(value).map_err(|e| anyhow!("{}: {}", key, e))
}

/// Build a single-field patch from a `key value` pair. Amounts are major units.
pub fn settings_patch(key: &str, value: &str) -> Result<SettingsPatch> {
    let mut patch = SettingsPatch::default();
    match key {
        "currency" => patch.currency = Some(value.trim().to_uppercase()),
        "date_format" => patch.date_format = Some(value.to_string()),
        "number_format" => patch.number_format = Some(value.to_string()),
        "currency_display" => {
            patch.currency_display = Some(value.parse().map_err(|e: String| anyhow!(e))?)
        }
        "capital_goal" => patch.capital_goal = Some(parse_amount(key, value)?),
        "sifo_living_expense" => {
            let cleared = value.trim().is_empty() || value.eq_ignore_ascii_case("none");
            patch.sifo_living_expense = Some(if cleared {
                None
            } else {
                Some(parse_amount(key, value)?)
            });
        }
        "debt_ratio_bp" => patch.debt_ratio_bp = Some(parse_u32(key, value)?),
        "ltv_ratio_bp" => patch.ltv_ratio_bp = Some(parse_u32(key, value)?),
        "stress_test_rate_bp" => patch.stress_test_rate_bp = Some(parse_u32(key, value)?),
        "loan_term_years" => patch.loan_term_years = Some(parse_u32(key, value)?),
        "interest_rate_bp" => patch.interest_rate_bp = Some(parse_u32(key, value)?),
        "down_payment_min_bp" => patch.down_payment_min_bp = Some(parse_u32(key, value)?),
        _ => bail!(
            "Unknown setting '{}'. Valid keys: {}",
            key,
            SETTING_KEYS.join(", ")
        ),
    }
    Ok(patch)
}

fn print_settings(settings: &Settings) {
    let amount = |m: i64| format_amount(m, &settings.currency);
    let percent = |bp: u32| format!("{:.2}%", bp as f64 / 100.0);

    println!();
    println!("⚙️  Settings");
    println!("   ─────────────────────────────");
    println!("   currency:            {}", settings.currency);
    println!("   date_format:         {}", settings.date_format);
    println!("   number_format:       {}", settings.number_format);
    println!("   currency_display:    {}", settings.currency_display);
    println!("   capital_goal:        {}", amount(settings.capital_goal));
    match settings.sifo_living_expense {
        Some(sifo) => println!("   sifo_living_expense: {} / month", amount(sifo)),
        None => println!("   sifo_living_expense: (not set)"),
    }
    println!(
        "   debt_ratio_bp:       {} ({:.1}x income)",
        settings.debt_ratio_bp,
        settings.debt_ratio_bp as f64 / 10_000.0
    );
    println!(
        "   ltv_ratio_bp:        {} ({})",
        settings.ltv_ratio_bp,
        percent(settings.ltv_ratio_bp)
    );
    println!(
        "   stress_test_rate_bp: {} (+{})",
        settings.stress_test_rate_bp,
        percent(settings.stress_test_rate_bp)
    );
    println!("   loan_term_years:     {}", settings.loan_term_years);
    println!(
        "   interest_rate_bp:    {} ({})",
        settings.interest_rate_bp,
        percent(settings.interest_rate_bp)
    );
    println!(
        "   down_payment_min_bp: {} ({})",
        settings.down_payment_min_bp,
        percent(settings.down_payment_min_bp)
    );
    if let Some(updated) = settings.updated_at {
        println!("   updated:             {}", updated.format("%Y-%m-%d %H:%M"));
    }
    println!();
}

pub fn cmd_settings_show(db: &Database) -> Result<()> {
    let settings = db.get_settings()?;
    print_settings(&settings);
    Ok(())
}

pub fn cmd_settings_set_goal(db: &Database, amount: i64) -> Result<()> {
    let patch = SettingsPatch {
        capital_goal: Some(amount),
        ..Default::default()
    };
    let settings = db
        .update_settings(&patch)
        .context("Failed to update capital goal")?;

    println!(
        "🎯 Capital goal set to {}",
        format_amount(settings.capital_goal, &settings.currency)
    );
    Ok(())
}

pub fn cmd_settings_set(db: &Database, key: &str, value: &str) -> Result<()> {
    let patch = settings_patch(key, value)?;
    let settings = db
        .update_settings(&patch)
        .with_context(|| format!("Failed to update {}", key))?;

    println!("✅ Updated {}", key);
    print_settings(&settings);
    Ok(())
}
