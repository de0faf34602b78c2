//! Loan affordability estimate
//!
//! Applies the lending limits configured in [`Settings`] to current income,
//! debt and capital:
//! - total debt may not exceed `debt_ratio_bp` of gross annual income
//! - the loan may not exceed the loan-to-value limit given the equity on hand
//! - when a SIFO living-expense figure is set, payments at the stressed
//!   rate must fit in monthly income after living expenses
//!
//! Amounts stay in minor units. Only the annuity factor uses floating point,
//! and every result is rounded back to whole minor units.

use serde::{Deserialize, Serialize};

use crate::models::{Debt, Income, Settings};
use crate::money::Money;

const BASIS_POINTS: i64 = 10_000;

/// Which limit bounded the maximum loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LimitingFactor {
    Income,
    Equity,
    Cashflow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AffordabilityEstimate {
    pub annual_income: Money,
    pub existing_debt: Money,
    pub equity: Money,
    pub max_by_income: Money,
    /// `None` when no equity is required
    pub max_by_equity: Option<Money>,
    /// `None` when no SIFO figure is configured
    pub max_by_cashflow: Option<Money>,
    pub max_loan: Money,
    pub max_purchase_price: Money,
    pub limiting_factor: LimitingFactor,
    pub interest_rate_bp: u32,
    pub stress_rate_bp: u32,
    pub monthly_payment: Money,
    pub stressed_monthly_payment: Money,
}

/// Monthly payment per unit of principal for an annuity loan
pub fn annuity_factor(rate_bp: u32, term_years: u32) -> f64 {
    let months = (term_years.max(1) * 12) as f64;
    let monthly_rate = rate_bp as f64 / BASIS_POINTS as f64 / 12.0;
    if monthly_rate == 0.0 {
        1.0 / months
    } else {
        monthly_rate / (1.0 - (1.0 + monthly_rate).powf(-months))
    }
}

/// Monthly annuity payment for `principal`
pub fn monthly_payment(principal: Money, rate_bp: u32, term_years: u32) -> Money {
    Money((principal.minor() as f64 * annuity_factor(rate_bp, term_years)).round() as i64)
}

/// Narrow an intermediate result, clamping at the `i64` range
fn clamp_i64(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}

fn scale_bp(amount: i64, bp: i64) -> i64 {
    clamp_i64(amount as i128 * bp as i128 / BASIS_POINTS as i128)
}

/// Estimate how large a loan the household can take on
pub fn compute_affordability(
    incomes: &[Income],
    debts: &[Debt],
    total_capital: Money,
    settings: &Settings,
) -> AffordabilityEstimate {
    let annual_income = Money(incomes.iter().map(Income::annual_amount).sum());
    let existing_debt: Money = debts.iter().map(|d| Money(d.amount)).sum();
    let equity = total_capital.max(Money::ZERO);

    let debt_ceiling = scale_bp(annual_income.minor(), settings.debt_ratio_bp as i64);
    let max_by_income = (Money(debt_ceiling) - existing_debt).max(Money::ZERO);

    let required_equity_bp = (settings.down_payment_min_bp as i64)
        .max(BASIS_POINTS - settings.ltv_ratio_bp as i64)
        .clamp(0, BASIS_POINTS);
    let max_by_equity = if required_equity_bp == 0 {
        None
    } else {
        let loan =
            equity.minor() as i128 * (BASIS_POINTS - required_equity_bp) as i128
                / required_equity_bp as i128;
        Some(Money(clamp_i64(loan)))
    };

    let stress_rate_bp = settings
        .interest_rate_bp
        .saturating_add(settings.stress_test_rate_bp);
    let max_by_cashflow = settings.sifo_living_expense.map(|sifo| {
        let monthly_budget = (annual_income.minor() / 12).saturating_sub(sifo);
        if monthly_budget <= 0 {
            return Money::ZERO;
        }
        let serviceable = monthly_budget as f64
            / annuity_factor(stress_rate_bp, settings.loan_term_years);
        (Money(serviceable.floor() as i64) - existing_debt).max(Money::ZERO)
    });

    let mut limiting_factor = LimitingFactor::Income;
    let mut max_loan = max_by_income;
    for (factor, limit) in [
        (LimitingFactor::Equity, max_by_equity),
        (LimitingFactor::Cashflow, max_by_cashflow),
    ] {
        if let Some(limit) = limit {
            if limit < max_loan {
                max_loan = limit;
                limiting_factor = factor;
            }
        }
    }

    AffordabilityEstimate {
        annual_income,
        existing_debt,
        equity,
        max_by_income,
        max_by_equity,
        max_by_cashflow,
        max_loan,
        max_purchase_price: max_loan + equity,
        limiting_factor,
        interest_rate_bp: settings.interest_rate_bp,
        stress_rate_bp,
        monthly_payment: monthly_payment(
            max_loan,
            settings.interest_rate_bp,
            settings.loan_term_years,
        ),
        stressed_monthly_payment: monthly_payment(
            max_loan,
            stress_rate_bp,
            settings.loan_term_years,
        ),
    }
}

/// Affordability as returned by `GET /api/affordability` (major units)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityResponse {
    pub annual_income: f64,
    pub existing_debt: f64,
    pub equity: f64,
    pub max_by_income: f64,
    pub max_by_equity: Option<f64>,
    pub max_by_cashflow: Option<f64>,
    pub max_loan: f64,
    pub max_purchase_price: f64,
    pub limiting_factor: LimitingFactor,
    pub interest_rate_bp: u32,
    pub stress_rate_bp: u32,
    pub monthly_payment: f64,
    pub stressed_monthly_payment: f64,
}

impl From<&AffordabilityEstimate> for AffordabilityResponse {
    fn from(e: &AffordabilityEstimate) -> Self {
        Self {
            annual_income: e.annual_income.to_major(),
            existing_debt: e.existing_debt.to_major(),
            equity: e.equity.to_major(),
            max_by_income: e.max_by_income.to_major(),
            max_by_equity: e.max_by_equity.map(Money::to_major),
            max_by_cashflow: e.max_by_cashflow.map(Money::to_major),
            max_loan: e.max_loan.to_major(),
            max_purchase_price: e.max_purchase_price.to_major(),
            limiting_factor: e.limiting_factor,
            interest_rate_bp: e.interest_rate_bp,
            stress_rate_bp: e.stress_rate_bp,
            monthly_payment: e.monthly_payment.to_major(),
            stressed_monthly_payment: e.stressed_monthly_payment.to_major(),
        }
    }
}
