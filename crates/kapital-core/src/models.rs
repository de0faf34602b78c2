//! Domain models for Kapital
//!
//! All monetary fields are `i64` minor currency units.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Current version of the [`Settings`] layout
pub const SETTINGS_VERSION: u32 = 1;

/// Kind of capital account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    Savings,
    Checking,
    Investment,
    StockSavings,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Savings => "SAVINGS",
            Self::Checking => "CHECKING",
            Self::Investment => "INVESTMENT",
            Self::StockSavings => "STOCK_SAVINGS",
        }
    }

    pub fn all() -> &'static [AccountType] {
        &[
            Self::Savings,
            Self::Checking,
            Self::Investment,
            Self::StockSavings,
        ]
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SAVINGS" => Ok(Self::Savings),
            "CHECKING" => Ok(Self::Checking),
            "INVESTMENT" => Ok(Self::Investment),
            "STOCK_SAVINGS" | "STOCKSAVINGS" => Ok(Self::StockSavings),
            _ => Err(format!(
                "Unknown account type: {}. Valid: SAVINGS, CHECKING, INVESTMENT, STOCK_SAVINGS",
                s
            )),
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of ledger entry. The stored amount is a magnitude; the type carries the sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordType {
    Deposit,
    Withdrawal,
    Interest,
    Transfer,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "DEPOSIT",
            Self::Withdrawal => "WITHDRAWAL",
            Self::Interest => "INTEREST",
            Self::Transfer => "TRANSFER",
        }
    }

    pub fn all() -> &'static [RecordType] {
        &[
            Self::Deposit,
            Self::Withdrawal,
            Self::Interest,
            Self::Transfer,
        ]
    }

    /// +1 for money coming in, -1 for money going out
    pub fn sign(&self) -> i64 {
        match self {
            Self::Deposit | Self::Interest => 1,
            Self::Withdrawal | Self::Transfer => -1,
        }
    }

    pub fn signed_amount(&self, amount: i64) -> Money {
        Money(self.sign() * amount)
    }
}

impl std::str::FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DEPOSIT" => Ok(Self::Deposit),
            "WITHDRAWAL" => Ok(Self::Withdrawal),
            "INTEREST" => Ok(Self::Interest),
            "TRANSFER" => Ok(Self::Transfer),
            _ => Err(format!(
                "Unknown record type: {}. Valid: DEPOSIT, WITHDRAWAL, INTEREST, TRANSFER",
                s
            )),
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of debt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DebtType {
    StudentLoan,
    ConsumerLoan,
    Mortgage,
    CreditCard,
}

impl DebtType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StudentLoan => "STUDENT_LOAN",
            Self::ConsumerLoan => "CONSUMER_LOAN",
            Self::Mortgage => "MORTGAGE",
            Self::CreditCard => "CREDIT_CARD",
        }
    }
}

impl std::str::FromStr for DebtType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "STUDENT_LOAN" => Ok(Self::StudentLoan),
            "CONSUMER_LOAN" => Ok(Self::ConsumerLoan),
            "MORTGAGE" => Ok(Self::Mortgage),
            "CREDIT_CARD" => Ok(Self::CreditCard),
            _ => Err(format!(
                "Unknown debt type: {}. Valid: STUDENT_LOAN, CONSUMER_LOAN, MORTGAGE, CREDIT_CARD",
                s
            )),
        }
    }
}

impl std::fmt::Display for DebtType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How often an income source pays out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }

    pub fn periods_per_year(&self) -> i64 {
        match self {
            Self::Weekly => 52,
            Self::Monthly => 12,
            Self::Yearly => 1,
        }
    }
}

impl std::str::FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "WEEKLY" => Ok(Self::Weekly),
            "MONTHLY" => Ok(Self::Monthly),
            "YEARLY" => Ok(Self::Yearly),
            _ => Err(format!(
                "Unknown frequency: {}. Valid: WEEKLY, MONTHLY, YEARLY",
                s
            )),
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the UI renders the currency next to amounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CurrencyDisplay {
    #[default]
    Symbol,
    Code,
    Name,
}

impl CurrencyDisplay {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Symbol => "SYMBOL",
            Self::Code => "CODE",
            Self::Name => "NAME",
        }
    }
}

impl std::str::FromStr for CurrencyDisplay {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SYMBOL" => Ok(Self::Symbol),
            "CODE" => Ok(Self::Code),
            "NAME" => Ok(Self::Name),
            _ => Err(format!(
                "Unknown currency display: {}. Valid: SYMBOL, CODE, NAME",
                s
            )),
        }
    }
}

impl std::fmt::Display for CurrencyDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A capital account. `total_amount` is derived from its records, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub account_type: AccountType,
    pub total_amount: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New account for creation
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub account_type: AccountType,
}

/// Partial account update
#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub account_type: Option<AccountType>,
}

/// A ledger entry on an account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: i64,
    pub account_id: i64,
    pub record_type: RecordType,
    /// Non-negative magnitude
    pub amount: i64,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl AccountRecord {
    pub fn signed_amount(&self) -> Money {
        self.record_type.signed_amount(self.amount)
    }
}

/// New ledger entry. `date` defaults to the insertion time.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub account_id: i64,
    pub record_type: RecordType,
    pub amount: i64,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

/// Partial ledger entry update. `description: Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct RecordPatch {
    pub account_id: Option<i64>,
    pub record_type: Option<RecordType>,
    pub amount: Option<i64>,
    pub description: Option<Option<String>>,
    pub date: Option<DateTime<Utc>>,
}

/// An outstanding debt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debt {
    pub id: i64,
    pub name: String,
    pub debt_type: DebtType,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewDebt {
    pub name: String,
    pub debt_type: DebtType,
    pub amount: i64,
}

#[derive(Debug, Clone, Default)]
pub struct DebtPatch {
    pub name: Option<String>,
    pub debt_type: Option<DebtType>,
    pub amount: Option<i64>,
}

/// A recurring income source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Income {
    pub id: i64,
    pub name: String,
    pub amount: i64,
    pub frequency: Frequency,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Income {
    /// Gross yearly amount
    pub fn annual_amount(&self) -> i64 {
        self.amount.saturating_mul(self.frequency.periods_per_year())
    }
}

#[derive(Debug, Clone)]
pub struct NewIncome {
    pub name: String,
    pub amount: i64,
    pub frequency: Frequency,
}

#[derive(Debug, Clone, Default)]
pub struct IncomePatch {
    pub name: Option<String>,
    pub amount: Option<i64>,
    pub frequency: Option<Frequency>,
}

/// Deployment-wide settings, one row. Rates and ratios are basis points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub version: u32,
    pub currency: String,
    pub date_format: String,
    pub number_format: String,
    pub currency_display: CurrencyDisplay,
    /// Capital goal in minor units
    pub capital_goal: i64,
    /// Monthly SIFO living-expense reference for the household, minor units
    pub sifo_living_expense: Option<i64>,
    /// Maximum total debt as basis points of gross annual income (50 000 = 5x)
    pub debt_ratio_bp: u32,
    /// Maximum loan-to-value
    pub ltv_ratio_bp: u32,
    /// Added to the interest rate when stress testing
    pub stress_test_rate_bp: u32,
    pub loan_term_years: u32,
    pub interest_rate_bp: u32,
    /// Minimum equity share of the purchase price
    pub down_payment_min_bp: u32,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            currency: "NOK".to_string(),
            date_format: "dd.MM.yyyy".to_string(),
            number_format: "nb-NO".to_string(),
            currency_display: CurrencyDisplay::Symbol,
            capital_goal: 100_000_000,
            sifo_living_expense: None,
            debt_ratio_bp: 50_000,
            ltv_ratio_bp: 8_500,
            stress_test_rate_bp: 300,
            loan_term_years: 30,
            interest_rate_bp: 550,
            down_payment_min_bp: 1_500,
            updated_at: None,
        }
    }
}

/// Partial settings update. `sifo_living_expense: Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub currency: Option<String>,
    pub date_format: Option<String>,
    pub number_format: Option<String>,
    pub currency_display: Option<CurrencyDisplay>,
    pub capital_goal: Option<i64>,
    pub sifo_living_expense: Option<Option<i64>>,
    pub debt_ratio_bp: Option<u32>,
    pub ltv_ratio_bp: Option<u32>,
    pub stress_test_rate_bp: Option<u32>,
    pub loan_term_years: Option<u32>,
    pub interest_rate_bp: Option<u32>,
    pub down_payment_min_bp: Option<u32>,
}

impl Settings {
    /// Apply a patch, returning the merged settings
    pub fn merged(&self, patch: &SettingsPatch) -> Settings {
        let mut next = self.clone();
        if let Some(ref v) = patch.currency {
            next.currency = v.clone();
        }
        if let Some(ref v) = patch.date_format {
            next.date_format = v.clone();
        }
        if let Some(ref v) = patch.number_format {
            next.number_format = v.clone();
        }
        if let Some(v) = patch.currency_display {
            next.currency_display = v;
        }
        if let Some(v) = patch.capital_goal {
            next.capital_goal = v;
        }
        if let Some(v) = patch.sifo_living_expense {
            next.sifo_living_expense = v;
        }
        if let Some(v) = patch.debt_ratio_bp {
            next.debt_ratio_bp = v;
        }
        if let Some(v) = patch.ltv_ratio_bp {
            next.ltv_ratio_bp = v;
        }
        if let Some(v) = patch.stress_test_rate_bp {
            next.stress_test_rate_bp = v;
        }
        if let Some(v) = patch.loan_term_years {
            next.loan_term_years = v;
        }
        if let Some(v) = patch.interest_rate_bp {
            next.interest_rate_bp = v;
        }
        if let Some(v) = patch.down_payment_min_bp {
            next.down_payment_min_bp = v;
        }
        next
    }
}
