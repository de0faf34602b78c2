//! Property-based tests for the dashboard ledger invariants.
//!
//! Random account/record/debt sets are folded through `compute_dashboard`
//! and checked against the sign rules and the shape of the outputs.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

use kapital_core::dashboard::{asset_allocation, compute_dashboard, goal_progress};
use kapital_core::models::{Account, AccountRecord, AccountType, Debt, DebtType, RecordType};
use kapital_core::money::MAX_AMOUNT;
use kapital_core::Money;

// =============================================================================
// Generators
// =============================================================================

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

fn arb_record_type() -> impl Strategy<Value = RecordType> {
    prop_oneof![
        Just(RecordType::Deposit),
        Just(RecordType::Withdrawal),
        Just(RecordType::Interest),
        Just(RecordType::Transfer),
    ]
}

/// A record on one of accounts 1..=4 (id 4 has no account), up to 200 days old
fn arb_record(max_amount: i64) -> impl Strategy<Value = AccountRecord> {
    (
        1i64..=4,
        arb_record_type(),
        0i64..=max_amount,
        0i64..200 * 24 * 60,
    )
        .prop_map(|(account_id, record_type, amount, minutes_ago)| {
            let date = now() - Duration::minutes(minutes_ago);
            AccountRecord {
                id: 0,
                account_id,
                record_type,
                amount,
                description: None,
                date,
                created_at: date,
            }
        })
}

fn arb_records() -> impl Strategy<Value = Vec<AccountRecord>> {
    arb_records_up_to(10_000_000)
}

fn arb_records_up_to(max_amount: i64) -> impl Strategy<Value = Vec<AccountRecord>> {
    proptest::collection::vec(arb_record(max_amount), 0..60).prop_map(|mut records| {
        for (i, r) in records.iter_mut().enumerate() {
            r.id = i as i64 + 1;
        }
        records
    })
}

fn arb_debts() -> impl Strategy<Value = Vec<Debt>> {
    proptest::collection::vec(0i64..50_000_000, 0..5).prop_map(|amounts| {
        amounts
            .into_iter()
            .enumerate()
            .map(|(i, amount)| Debt {
                id: i as i64 + 1,
                name: format!("Debt {}", i),
                debt_type: DebtType::ConsumerLoan,
                amount,
                created_at: now(),
                updated_at: now(),
            })
            .collect()
    })
}

fn accounts() -> Vec<Account> {
    (1..=3)
        .map(|id| Account {
            id,
            name: format!("Account {}", id),
            account_type: AccountType::Savings,
            total_amount: 0,
            created_at: now(),
            updated_at: now(),
        })
        .collect()
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Per-account balances add up to total capital, and net worth is exact
    #[test]
    fn prop_balances_sum_to_total_capital(records in arb_records(), debts in arb_debts()) {
        let view = compute_dashboard(&accounts(), &records, &debts, 100_000_000, now());

        let sum: Money = view.accounts.iter().map(|a| a.balance).sum();
        prop_assert_eq!(sum, view.total_capital);
        prop_assert_eq!(view.net_worth, view.total_capital - view.total_debt);
        prop_assert_eq!(view.total_debt, Money(debts.iter().map(|d| d.amount).sum()));
    }

    /// Capital is the signed fold of known-account records
    #[test]
    fn prop_capital_follows_sign_rules(records in arb_records()) {
        let view = compute_dashboard(&accounts(), &records, &[], 0, now());

        let expected: i64 = records
            .iter()
            .filter(|r| r.account_id <= 3)
            .map(|r| match r.record_type {
                RecordType::Deposit | RecordType::Interest => r.amount,
                RecordType::Withdrawal | RecordType::Transfer => -r.amount,
            })
            .sum();
        prop_assert_eq!(view.total_capital, Money(expected));
    }

    /// Adding a deposit raises capital by exactly its amount; a withdrawal lowers it
    #[test]
    fn prop_single_record_moves_capital(
        records in arb_records(),
        amount in 0i64..10_000_000,
        record_type in arb_record_type(),
    ) {
        let before = compute_dashboard(&accounts(), &records, &[], 0, now()).total_capital;

        let mut extended = records.clone();
        extended.push(AccountRecord {
            id: 10_000,
            account_id: 1,
            record_type,
            amount,
            description: None,
            date: now() - Duration::days(1),
            created_at: now(),
        });
        let after = compute_dashboard(&accounts(), &extended, &[], 0, now()).total_capital;

        let delta = match record_type {
            RecordType::Deposit | RecordType::Interest => amount,
            RecordType::Withdrawal | RecordType::Transfer => -amount,
        };
        prop_assert_eq!(after - before, Money(delta));
    }

    /// Ten weekly buckets, oldest first, ending at the latest running total
    #[test]
    fn prop_weekly_history_shape(records in arb_records()) {
        let view = compute_dashboard(&accounts(), &records, &[], 0, now());
        let history = &view.weekly_history;

        prop_assert_eq!(history.len(), 10);
        for pair in history.windows(2) {
            prop_assert!(pair[0].end < pair[1].end);
            prop_assert_eq!(pair[1].running_total, pair[0].running_total + pair[1].weekly_change);
        }
        // No generated record is in the future, so the last bucket ends at current capital
        prop_assert_eq!(history[9].running_total, view.total_capital);
    }

    /// Records at the largest accepted amount still fold exactly
    #[test]
    fn prop_max_amounts_fold_exactly(records in arb_records_up_to(MAX_AMOUNT), goal in 0i64..=MAX_AMOUNT) {
        let view = compute_dashboard(&accounts(), &records, &[], goal, now());

        let expected: i128 = records
            .iter()
            .filter(|r| r.account_id <= 3)
            .map(|r| match r.record_type {
                RecordType::Deposit | RecordType::Interest => r.amount as i128,
                RecordType::Withdrawal | RecordType::Transfer => -(r.amount as i128),
            })
            .sum();
        prop_assert_eq!(view.total_capital.minor() as i128, expected);
        prop_assert_eq!(view.weekly_history[9].running_total, view.total_capital);
        prop_assert!(view.goal.progress_percentage <= 100);
    }

    /// Goal progress stays within 0..=100
    #[test]
    fn prop_goal_progress_is_bounded(capital in -1_000_000_000i64..1_000_000_000, goal in -10_000i64..1_000_000_000) {
        let progress = goal_progress(Money(capital), Money(goal));
        prop_assert!(progress.progress_percentage <= 100);
        prop_assert!(progress.remaining >= Money::ZERO);
    }

    /// Allocation percentages never exceed 100 each and sum to 99..=101
    #[test]
    fn prop_allocation_percentages(capital in -1_000_000i64..1_000_000_000, debt in 0i64..1_000_000_000) {
        let slices = asset_allocation(Money(capital), Money(debt));
        prop_assert_eq!(slices.len(), 2);

        let total: u32 = slices.iter().map(|s| s.percentage).sum();
        if capital.max(0) + debt == 0 {
            prop_assert_eq!(total, 0);
        } else {
            prop_assert!((99..=101).contains(&total));
        }
    }
}
