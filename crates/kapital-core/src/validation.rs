//! Field-level validation for incoming entities
//!
//! Handlers and CLI commands collect problems into [`ValidationErrors`] and
//! turn them into a single [`Error::Validation`](crate::Error::Validation),
//! which the server renders as a 400 with one detail entry per field.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::models::{
    AccountPatch, DebtPatch, IncomePatch, NewAccount, NewDebt, NewIncome, NewRecord, RecordPatch,
    Settings,
};
use crate::money::{Money, MAX_AMOUNT};

/// A single invalid field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Collected field errors for one request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Whether any error was recorded for `field`
    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Ok when nothing was recorded
    pub fn check(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Require a present value, recording `is required` otherwise
    pub fn require<T>(&mut self, field: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.add(field, "is required");
        }
        value
    }

    /// Require a non-blank string, returned trimmed
    pub fn require_name(&mut self, field: &str, value: Option<String>) -> Option<String> {
        match value {
            None => {
                self.add(field, "is required");
                None
            }
            Some(s) => self.name(field, s),
        }
    }

    /// Validate an optional name that, when present, must not be blank
    pub fn name(&mut self, field: &str, value: String) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.add(field, "must not be empty");
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Require an enum value given as a string
    pub fn require_enum<T>(&mut self, field: &str, value: Option<String>) -> Option<T>
    where
        T: FromStr<Err = String>,
    {
        match value {
            None => {
                self.add(field, "is required");
                None
            }
            Some(s) => self.parse_enum(field, &s),
        }
    }

    /// Parse an enum value, recording the parser's message on failure
    pub fn parse_enum<T>(&mut self, field: &str, value: &str) -> Option<T>
    where
        T: FromStr<Err = String>,
    {
        match value.parse::<T>() {
            Ok(v) => Some(v),
            Err(e) => {
                self.add(field, e);
                None
            }
        }
    }

    /// Require a non-negative minor-unit amount
    pub fn require_amount(&mut self, field: &str, value: Option<i64>) -> Option<i64> {
        match value {
            None => {
                self.add(field, "is required");
                None
            }
            Some(v) => self.amount(field, v),
        }
    }

    /// Check that an amount lies in `0..=MAX_AMOUNT`
    pub fn amount(&mut self, field: &str, value: i64) -> Option<i64> {
        let before = self.errors.len();
        check_amount(self, field, value);
        (self.errors.len() == before).then_some(value)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

// ========== Entity checks ==========
//
// Invariants the database layer enforces regardless of caller.

/// Upper bound for rates and ratios expressed as a share (100 %)
pub const MAX_RATE_BP: u32 = 10_000;

/// Upper bound for the debt-to-income multiple (10x)
pub const MAX_DEBT_RATIO_BP: u32 = 100_000;

fn check_name(errors: &mut ValidationErrors, field: &str, name: &str) {
    if name.trim().is_empty() {
        errors.add(field, "must not be empty");
    }
}

fn check_amount(errors: &mut ValidationErrors, field: &str, amount: i64) {
    if amount < 0 {
        errors.add(field, "must not be negative");
    } else if amount > MAX_AMOUNT {
        errors.add(field, format!("must be at most {}", Money(MAX_AMOUNT)));
    }
}

fn check_bp(errors: &mut ValidationErrors, field: &str, value: u32, max: u32) {
    if value > max {
        errors.add(field, format!("must be at most {}", max));
    }
}

impl NewAccount {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_name(&mut errors, "name", &self.name);
        errors.check()
    }
}

impl AccountPatch {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(ref name) = self.name {
            check_name(&mut errors, "name", name);
        }
        errors.check()
    }
}

impl NewRecord {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_amount(&mut errors, "amount", self.amount);
        errors.check()
    }
}

impl RecordPatch {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(amount) = self.amount {
            check_amount(&mut errors, "amount", amount);
        }
        errors.check()
    }
}

impl NewDebt {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_name(&mut errors, "name", &self.name);
        check_amount(&mut errors, "amount", self.amount);
        errors.check()
    }
}

impl DebtPatch {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(ref name) = self.name {
            check_name(&mut errors, "name", name);
        }
        if let Some(amount) = self.amount {
            check_amount(&mut errors, "amount", amount);
        }
        errors.check()
    }
}

impl NewIncome {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_name(&mut errors, "name", &self.name);
        check_amount(&mut errors, "amount", self.amount);
        errors.check()
    }
}

impl IncomePatch {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(ref name) = self.name {
            check_name(&mut errors, "name", name);
        }
        if let Some(amount) = self.amount {
            check_amount(&mut errors, "amount", amount);
        }
        errors.check()
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_uppercase()) {
            errors.add("currency", "must be a three-letter ISO 4217 code");
        }
        if self.date_format.trim().is_empty() {
            errors.add("date_format", "must not be empty");
        }
        if self.number_format.trim().is_empty() {
            errors.add("number_format", "must not be empty");
        }
        check_amount(&mut errors, "capital_goal", self.capital_goal);
        if let Some(sifo) = self.sifo_living_expense {
            check_amount(&mut errors, "sifo_living_expense", sifo);
        }
        check_bp(&mut errors, "debt_ratio_bp", self.debt_ratio_bp, MAX_DEBT_RATIO_BP);
        check_bp(&mut errors, "ltv_ratio_bp", self.ltv_ratio_bp, MAX_RATE_BP);
        check_bp(&mut errors, "stress_test_rate_bp", self.stress_test_rate_bp, MAX_RATE_BP);
        check_bp(&mut errors, "interest_rate_bp", self.interest_rate_bp, MAX_RATE_BP);
        check_bp(&mut errors, "down_payment_min_bp", self.down_payment_min_bp, MAX_RATE_BP);
        if !(1..=50).contains(&self.loan_term_years) {
            errors.add("loan_term_years", "must be between 1 and 50");
        }

        errors.check()
    }
}
