//! Read-side data access used by aggregation
//!
//! The dashboard and affordability loaders only read through these traits,
//! so tests can hand them in-memory data (or a store that fails) instead of
//! a real [`Database`].

use chrono::{DateTime, Utc};

use crate::affordability::{compute_affordability, AffordabilityEstimate};
use crate::dashboard::{compute_dashboard, total_capital, DashboardView};
use crate::db::Database;
use crate::error::Result;
use crate::models::{Account, AccountRecord, Debt, Income, Settings};

pub trait AccountStore {
    fn accounts(&self) -> Result<Vec<Account>>;
}

pub trait RecordStore {
    /// Records, optionally restricted to one account
    fn records(&self, account_id: Option<i64>) -> Result<Vec<AccountRecord>>;
}

pub trait DebtStore {
    fn debts(&self) -> Result<Vec<Debt>>;
}

pub trait IncomeStore {
    fn incomes(&self) -> Result<Vec<Income>>;
}

pub trait SettingsStore {
    fn settings(&self) -> Result<Settings>;
}

impl AccountStore for Database {
    fn accounts(&self) -> Result<Vec<Account>> {
        self.list_accounts()
    }
}

impl RecordStore for Database {
    fn records(&self, account_id: Option<i64>) -> Result<Vec<AccountRecord>> {
        self.list_records(account_id)
    }
}

impl DebtStore for Database {
    fn debts(&self) -> Result<Vec<Debt>> {
        self.list_debts()
    }
}

impl IncomeStore for Database {
    fn incomes(&self) -> Result<Vec<Income>> {
        self.list_incomes()
    }
}

impl SettingsStore for Database {
    fn settings(&self) -> Result<Settings> {
        self.get_settings()
    }
}

/// Load everything the dashboard needs and compute it.
///
/// Any read failure aborts; there is no partial dashboard.
pub fn load_dashboard<S>(store: &S, now: DateTime<Utc>) -> Result<DashboardView>
where
    S: AccountStore + RecordStore + DebtStore + SettingsStore,
{
    let accounts = store.accounts()?;
    let records = store.records(None)?;
    let debts = store.debts()?;
    let settings = store.settings()?;

    Ok(compute_dashboard(
        &accounts,
        &records,
        &debts,
        settings.capital_goal,
        now,
    ))
}

/// Load incomes, debts, capital and settings and estimate loan affordability
pub fn load_affordability<S>(store: &S) -> Result<AffordabilityEstimate>
where
    S: AccountStore + RecordStore + DebtStore + IncomeStore + SettingsStore,
{
    let accounts = store.accounts()?;
    let records = store.records(None)?;
    let incomes = store.incomes()?;
    let debts = store.debts()?;
    let settings = store.settings()?;

    let total_capital = total_capital(&accounts, &records);

    Ok(compute_affordability(
        &incomes,
        &debts,
        total_capital,
        &settings,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::{AccountType, DebtType, Frequency, RecordType};
    use crate::money::Money;
    use chrono::{Duration, TimeZone};

    #[derive(Default)]
    struct FakeStore {
        accounts: Vec<Account>,
        records: Vec<AccountRecord>,
        debts: Vec<Debt>,
        incomes: Vec<Income>,
        settings: Settings,
        fail_debts: bool,
    }

    impl AccountStore for FakeStore {
        fn accounts(&self) -> Result<Vec<Account>> {
            Ok(self.accounts.clone())
        }
    }

    impl RecordStore for FakeStore {
        fn records(&self, account_id: Option<i64>) -> Result<Vec<AccountRecord>> {
            Ok(self
                .records
                .iter()
                .filter(|r| account_id.map_or(true, |id| r.account_id == id))
                .cloned()
                .collect())
        }
    }

    impl DebtStore for FakeStore {
        fn debts(&self) -> Result<Vec<Debt>> {
            if self.fail_debts {
                return Err(Error::InvalidData("debts table unavailable".to_string()));
            }
            Ok(self.debts.clone())
        }
    }

    impl IncomeStore for FakeStore {
        fn incomes(&self) -> Result<Vec<Income>> {
            Ok(self.incomes.clone())
        }
    }

    impl SettingsStore for FakeStore {
        fn settings(&self) -> Result<Settings> {
            Ok(self.settings.clone())
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn fixture() -> FakeStore {
        FakeStore {
            accounts: vec![Account {
                id: 1,
                name: "Sparekonto".to_string(),
                account_type: AccountType::Savings,
                total_amount: 0,
                created_at: now(),
                updated_at: now(),
            }],
            records: vec![AccountRecord {
                id: 1,
                account_id: 1,
                record_type: RecordType::Deposit,
                amount: 25_000_000,
                description: None,
                date: now() - Duration::days(3),
                created_at: now(),
            }],
            debts: vec![Debt {
                id: 1,
                name: "Lånekassen".to_string(),
                debt_type: DebtType::StudentLoan,
                amount: 5_000_000,
                created_at: now(),
                updated_at: now(),
            }],
            incomes: vec![Income {
                id: 1,
                name: "Lønn".to_string(),
                amount: 5_000_000,
                frequency: Frequency::Monthly,
                created_at: now(),
                updated_at: now(),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_load_dashboard_uses_settings_goal() {
        let store = fixture();
        let view = load_dashboard(&store, now()).unwrap();

        assert_eq!(view.total_capital, Money(25_000_000));
        assert_eq!(view.net_worth, Money(20_000_000));
        assert_eq!(view.goal.goal, Money(100_000_000));
        assert_eq!(view.goal.progress_percentage, 25);
        assert_eq!(view.goal.remaining, Money(75_000_000));
    }

    #[test]
    fn test_load_dashboard_propagates_store_error() {
        let store = FakeStore {
            fail_debts: true,
            ..fixture()
        };
        let result = load_dashboard(&store, now());
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_load_affordability_propagates_store_error() {
        let store = FakeStore {
            fail_debts: true,
            ..fixture()
        };
        assert!(load_affordability(&store).is_err());
    }

    #[test]
    fn test_load_affordability_from_store() {
        let store = fixture();
        let estimate = load_affordability(&store).unwrap();

        assert_eq!(estimate.annual_income, Money(60_000_000));
        assert_eq!(estimate.existing_debt, Money(5_000_000));
        assert_eq!(estimate.equity, Money(25_000_000));
    }

    #[test]
    fn test_database_implements_stores() {
        let db = Database::in_memory().unwrap();
        let view = load_dashboard(&db, Utc::now()).unwrap();
        assert_eq!(view.total_capital, Money::ZERO);
        assert_eq!(view.weekly_history.len(), 10);
        assert!(load_affordability(&db).is_ok());
    }
}
