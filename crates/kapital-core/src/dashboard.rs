//! Dashboard aggregation
//!
//! Pure computation over already-loaded accounts, records and debts:
//! capital per account, net worth, trailing monthly growth, a ten-week
//! running capital history, asset allocation and goal progress.
//!
//! Everything here stays in minor units. [`DashboardResponse`] is the only
//! place amounts become major units.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Account, AccountRecord, AccountType, Debt};
use crate::money::Money;

/// Number of weekly buckets in the capital history
pub const HISTORY_WEEKS: i64 = 10;

/// Length of the trailing window used for monthly growth
pub const MONTHLY_WINDOW_DAYS: i64 = 30;

/// Capital held in one account
#[derive(Debug, Clone, PartialEq)]
pub struct AccountBalance {
    pub account_id: i64,
    pub name: String,
    pub account_type: AccountType,
    pub balance: Money,
}

/// One week of the capital history
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyCapital {
    /// "Uke N" with the ISO week number of `end`
    pub label: String,
    pub week: u32,
    /// Exclusive
    pub start: DateTime<Utc>,
    /// Inclusive
    pub end: DateTime<Utc>,
    pub weekly_change: Money,
    pub running_total: Money,
    /// Change relative to the previous running total, in percent
    pub percentage_change: f64,
}

/// Share of capital vs debt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationSlice {
    pub name: String,
    pub value: Money,
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalProgress {
    pub goal: Money,
    pub current: Money,
    pub remaining: Money,
    /// Clamped to 0..=100
    pub progress_percentage: u32,
}

/// Computed dashboard, minor units
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub total_capital: Money,
    pub total_debt: Money,
    pub net_worth: Money,
    pub monthly_growth: Money,
    pub accounts: Vec<AccountBalance>,
    pub weekly_history: Vec<WeeklyCapital>,
    pub asset_allocation: Vec<AllocationSlice>,
    pub goal: GoalProgress,
}

/// Signed sum of records: deposits and interest add, withdrawals and transfers subtract
pub fn signed_total<'a, I>(records: I) -> Money
where
    I: IntoIterator<Item = &'a AccountRecord>,
{
    records.into_iter().map(AccountRecord::signed_amount).sum()
}

/// Balance of a single account
pub fn account_balance(account_id: i64, records: &[AccountRecord]) -> Money {
    signed_total(records.iter().filter(|r| r.account_id == account_id))
}

/// Balances for every account, keyed by id
pub fn balances_by_account(records: &[AccountRecord]) -> HashMap<i64, Money> {
    let mut balances: HashMap<i64, Money> = HashMap::new();
    for record in records {
        *balances.entry(record.account_id).or_default() += record.signed_amount();
    }
    balances
}

/// Capital across `accounts`, ignoring records of unknown accounts
pub fn total_capital(accounts: &[Account], records: &[AccountRecord]) -> Money {
    let known: HashSet<i64> = accounts.iter().map(|a| a.id).collect();
    signed_total(records.iter().filter(|r| known.contains(&r.account_id)))
}

/// Signed sum of records with `start < date <= end`
fn window_total(records: &[&AccountRecord], start: DateTime<Utc>, end: DateTime<Utc>) -> Money {
    signed_total(
        records
            .iter()
            .copied()
            .filter(|r| r.date > start && r.date <= end),
    )
}

/// `change / |previous| * 100`; a move away from zero counts as 100 %
fn percentage_change(change: Money, previous: Money) -> f64 {
    if previous == Money::ZERO {
        if change == Money::ZERO {
            0.0
        } else {
            100.0
        }
    } else {
        change.minor() as f64 / previous.minor().unsigned_abs() as f64 * 100.0
    }
}

/// `round(part / whole * 100)` with half-up rounding. `part >= 0`, `whole > 0`.
fn round_percent(part: i64, whole: i64) -> i64 {
    let part = part as i128;
    let whole = whole as i128;
    i64::try_from((part * 200 + whole) / (whole * 2)).unwrap_or(i64::MAX)
}

/// Weekly capital history, oldest first
pub fn weekly_history(records: &[&AccountRecord], now: DateTime<Utc>) -> Vec<WeeklyCapital> {
    let oldest_start = now - Duration::days(7 * HISTORY_WEEKS);
    let mut running_total = signed_total(records.iter().copied().filter(|r| r.date <= oldest_start));

    let mut history = Vec::with_capacity(HISTORY_WEEKS as usize);
    for offset in (0..HISTORY_WEEKS).rev() {
        let end = now - Duration::days(7 * offset);
        let start = end - Duration::days(7);
        let weekly_change = window_total(records, start, end);
        let previous = running_total;
        running_total += weekly_change;

        let week = end.iso_week().week();
        history.push(WeeklyCapital {
            label: format!("Uke {}", week),
            week,
            start,
            end,
            weekly_change,
            running_total,
            percentage_change: percentage_change(weekly_change, previous),
        });
    }
    history
}

/// Equity vs debt split. Negative capital counts as no equity.
pub fn asset_allocation(total_capital: Money, total_debt: Money) -> Vec<AllocationSlice> {
    let equity = total_capital.max(Money::ZERO);
    let debt = total_debt.max(Money::ZERO);
    let total = equity.minor() + debt.minor();

    let (equity_pct, debt_pct) = if total == 0 {
        (0, 0)
    } else {
        (
            round_percent(equity.minor(), total),
            round_percent(debt.minor(), total),
        )
    };

    vec![
        AllocationSlice {
            name: "Equity".to_string(),
            value: equity,
            percentage: equity_pct as u32,
        },
        AllocationSlice {
            name: "Debt".to_string(),
            value: debt,
            percentage: debt_pct as u32,
        },
    ]
}

/// Progress toward the capital goal
pub fn goal_progress(total_capital: Money, goal: Money) -> GoalProgress {
    let remaining = (goal - total_capital).max(Money::ZERO);
    let progress_percentage = if goal.minor() <= 0 {
        100
    } else if total_capital.minor() <= 0 {
        0
    } else {
        round_percent(total_capital.minor(), goal.minor()).min(100)
    };

    GoalProgress {
        goal,
        current: total_capital,
        remaining,
        progress_percentage: progress_percentage as u32,
    }
}

/// Compute the full dashboard.
///
/// Records whose `account_id` matches none of `accounts` are ignored by every
/// figure, so the per-account balances always add up to `total_capital`.
pub fn compute_dashboard(
    accounts: &[Account],
    records: &[AccountRecord],
    debts: &[Debt],
    capital_goal: i64,
    now: DateTime<Utc>,
) -> DashboardView {
    let known: HashSet<i64> = accounts.iter().map(|a| a.id).collect();
    let owned: Vec<&AccountRecord> = records
        .iter()
        .filter(|r| known.contains(&r.account_id))
        .collect();

    let balances = balances_by_account(records);
    let account_balances: Vec<AccountBalance> = accounts
        .iter()
        .map(|a| AccountBalance {
            account_id: a.id,
            name: a.name.clone(),
            account_type: a.account_type,
            balance: balances.get(&a.id).copied().unwrap_or_default(),
        })
        .collect();

    let total_capital: Money = account_balances.iter().map(|b| b.balance).sum();
    let total_debt: Money = debts.iter().map(|d| Money(d.amount)).sum();
    let net_worth = total_capital - total_debt;

    let month_start = now - Duration::days(MONTHLY_WINDOW_DAYS);
    let monthly_growth = window_total(&owned, month_start, now);

    DashboardView {
        total_capital,
        total_debt,
        net_worth,
        monthly_growth,
        accounts: account_balances,
        weekly_history: weekly_history(&owned, now),
        asset_allocation: asset_allocation(total_capital, total_debt),
        goal: goal_progress(total_capital, Money(capital_goal)),
    }
}

// ============================================================================
// Response boundary (major units)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBalanceResponse {
    pub account_id: i64,
    pub name: String,
    pub account_type: AccountType,
    pub balance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyCapitalResponse {
    pub label: String,
    pub week: u32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub weekly_change: f64,
    pub running_total: f64,
    pub percentage_change: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationResponse {
    pub name: String,
    pub value: f64,
    pub percentage: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalProgressResponse {
    pub goal: f64,
    pub current: f64,
    pub remaining: f64,
    pub progress_percentage: u32,
}

/// Dashboard as returned by `GET /api/dashboard`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub total_capital: f64,
    pub total_debt: f64,
    pub net_worth: f64,
    pub monthly_growth: f64,
    pub accounts: Vec<AccountBalanceResponse>,
    pub weekly_history: Vec<WeeklyCapitalResponse>,
    pub asset_allocation: Vec<AllocationResponse>,
    pub goal: GoalProgressResponse,
}

impl From<&DashboardView> for DashboardResponse {
    fn from(view: &DashboardView) -> Self {
        Self {
            total_capital: view.total_capital.to_major(),
            total_debt: view.total_debt.to_major(),
            net_worth: view.net_worth.to_major(),
            monthly_growth: view.monthly_growth.to_major(),
            accounts: view
                .accounts
                .iter()
                .map(|a| AccountBalanceResponse {
                    account_id: a.account_id,
                    name: a.name.clone(),
                    account_type: a.account_type,
                    balance: a.balance.to_major(),
                })
                .collect(),
            weekly_history: view
                .weekly_history
                .iter()
                .map(|w| WeeklyCapitalResponse {
                    label: w.label.clone(),
                    week: w.week,
                    start: w.start,
                    end: w.end,
                    weekly_change: w.weekly_change.to_major(),
                    running_total: w.running_total.to_major(),
                    percentage_change: w.percentage_change,
                })
                .collect(),
            asset_allocation: view
                .asset_allocation
                .iter()
                .map(|s| AllocationResponse {
                    name: s.name.clone(),
                    value: s.value.to_major(),
                    percentage: s.percentage,
                })
                .collect(),
            goal: GoalProgressResponse {
                goal: view.goal.goal.to_major(),
                current: view.goal.current.to_major(),
                remaining: view.goal.remaining.to_major(),
                progress_percentage: view.goal.progress_percentage,
            },
        }
    }
}
