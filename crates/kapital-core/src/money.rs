//! Integer minor-unit money
//!
//! Amounts are stored and summed as `i64` minor units (øre, cents). Only the
//! output boundary converts to major units.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};

use serde::{Deserialize, Serialize};

/// Minor units per major unit
pub const MINOR_PER_MAJOR: i64 = 100;

/// Largest accepted single amount (10^13 major units)
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

/// An amount in minor currency units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(pub i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn minor(self) -> i64 {
        self.0
    }

    /// Major units for a response body or chart
    pub fn to_major(self) -> f64 {
        self.0 as f64 / MINOR_PER_MAJOR as f64
    }

    pub fn abs(self) -> Money {
        Money(self.0.saturating_abs())
    }

    pub fn max(self, other: Money) -> Money {
        Money(self.0.max(other.0))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(self.0.saturating_neg())
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl From<i64> for Money {
    fn from(minor: i64) -> Self {
        Money(minor)
    }
}

impl fmt::Display for Money {
    /// `1000.00`, `-12.05`; integer arithmetic only
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per = MINOR_PER_MAJOR as u64;
        write!(f, "{}{}.{:02}", sign, abs / per, abs % per)
    }
}

/// Parse a major-unit amount such as `1500`, `1500.5` or `1 500,50` into
/// minor units without going through floating point.
pub fn parse_major(input: &str) -> Result<i64, String> {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    let (negative, digits) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.as_str()),
    };

    let (whole, fraction) = match digits.split_once('.') {
        Some((w, f)) => (w, f),
        None => (digits, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(format!("Invalid amount: {}", input));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return Err(format!("Invalid amount: {}", input));
    }
    if fraction.len() > 2 {
        return Err(format!("Too many decimals in amount: {}", input));
    }

    let whole_value: i64 = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .map_err(|_| format!("Amount out of range: {}", input))?
    };
    let fraction_value: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().unwrap_or(0) * 10,
        _ => fraction.parse::<i64>().unwrap_or(0),
    };

    let minor = whole_value
        .checked_mul(MINOR_PER_MAJOR)
        .and_then(|v| v.checked_add(fraction_value))
        .ok_or_else(|| format!("Amount out of range: {}", input))?;

    Ok(if negative { -minor } else { minor })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Money(100000).to_string(), "1000.00");
        assert_eq!(Money(5).to_string(), "0.05");
        assert_eq!(Money(-1205).to_string(), "-12.05");
        assert_eq!(Money(0).to_string(), "0.00");
    }

    #[test]
    fn test_to_major() {
        assert_eq!(Money(150050).to_major(), 1500.5);
        assert_eq!(Money(-50000).to_major(), -500.0);
    }

    #[test]
    fn test_sum_and_ops() {
        let total: Money = [Money(150000), -Money(50000)].into_iter().sum();
        assert_eq!(total, Money(100000));
        assert_eq!(Money(3) - Money(5), Money(-2));
        assert_eq!(Money(-7).abs(), Money(7));
    }

    #[test]
    fn test_arithmetic_saturates() {
        let huge = Money(i64::MAX);
        assert_eq!(huge + huge, huge);
        assert_eq!(-huge - huge, Money(i64::MIN));
        assert_eq!(-Money(i64::MIN), huge);

        let mut total = huge;
        total += Money(1);
        assert_eq!(total, huge);
        assert_eq!([huge, huge, Money(5)].into_iter().sum::<Money>(), huge);
    }

    #[test]
    fn test_parse_major() {
        assert_eq!(parse_major("1500"), Ok(150000));
        assert_eq!(parse_major("1500.5"), Ok(150050));
        assert_eq!(parse_major("1 500,50"), Ok(150050));
        assert_eq!(parse_major("0.07"), Ok(7));
        assert_eq!(parse_major(".5"), Ok(50));
        assert_eq!(parse_major("-12.05"), Ok(-1205));
    }

    #[test]
    fn test_parse_major_rejects_garbage() {
        assert!(parse_major("").is_err());
        assert!(parse_major("12.345").is_err());
        assert!(parse_major("abc").is_err());
        assert!(parse_major("1.2.3").is_err());
        assert!(parse_major("99999999999999999999").is_err());
    }
}
