//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use kapital_core::models::{AccountType, DebtType, Frequency, RecordType};
use kapital_core::money::parse_major;
use kapital_core::ExportFormat;

/// Kapital - Track capital, debt and progress towards your savings goal
#[derive(Parser)]
#[command(name = "kapital")]
#[command(about = "Self-hosted personal capital tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path (overrides KAPITAL_DB and the config file)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Config file (default: <config dir>/kapital/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on (default from config, else 3000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (default from config, else 127.0.0.1)
        #[arg(long)]
        host: Option<String>,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Show the capital dashboard
    Dashboard,

    /// Manage accounts
    Accounts {
        #[command(subcommand)]
        action: Option<AccountsAction>,
    },

    /// Manage account records (deposits, withdrawals, interest, transfers)
    Records {
        #[command(subcommand)]
        action: Option<RecordsAction>,
    },

    /// Manage debts
    Debts {
        #[command(subcommand)]
        action: Option<DebtsAction>,
    },

    /// Manage income sources
    Incomes {
        #[command(subcommand)]
        action: Option<IncomesAction>,
    },

    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },

    /// Estimate how large a home loan you can afford
    Affordability,

    /// Export data
    Export {
        #[command(subcommand)]
        target: ExportTarget,
    },
}

#[derive(Subcommand)]
pub enum AccountsAction {
    /// List accounts with balances
    List,

    /// Add an account
    Add {
        /// Account name
        name: String,

        /// SAVINGS, CHECKING, INVESTMENT or STOCK_SAVINGS
        #[arg(short = 't', long = "type", default_value = "SAVINGS")]
        account_type: AccountType,
    },

    /// Delete an account and all of its records
    Delete {
        /// Account ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum RecordsAction {
    /// List records
    List {
        /// Only records for this account ID
        #[arg(short, long)]
        account: Option<i64>,
    },

    /// Add a record to an account
    Add {
        /// Account ID
        account: i64,

        /// DEPOSIT, WITHDRAWAL, INTEREST or TRANSFER
        #[arg(short = 't', long = "type")]
        record_type: RecordType,

        /// Amount in major units (e.g. 1500.50)
        #[arg(value_parser = parse_major)]
        amount: i64,

        /// Free-text description
        #[arg(short, long)]
        description: Option<String>,

        /// Record date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Subcommand)]
pub enum DebtsAction {
    /// List debts
    List,

    /// Add a debt
    Add {
        /// Debt name
        name: String,

        /// STUDENT_LOAN, CONSUMER_LOAN, MORTGAGE or CREDIT_CARD
        #[arg(short = 't', long = "type")]
        debt_type: DebtType,

        /// Outstanding amount in major units
        #[arg(value_parser = parse_major)]
        amount: i64,
    },
}

#[derive(Subcommand)]
pub enum IncomesAction {
    /// List income sources
    List,

    /// Add an income source
    Add {
        /// Income name
        name: String,

        /// Gross amount per period in major units
        #[arg(value_parser = parse_major)]
        amount: i64,

        /// WEEKLY, MONTHLY or YEARLY
        #[arg(short, long, default_value = "MONTHLY")]
        frequency: Frequency,
    },
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show current settings
    Show,

    /// Set the capital goal (major units)
    SetGoal {
        #[arg(value_parser = parse_major)]
        amount: i64,
    },

    /// Set a single setting by key (e.g. `currency SEK`, `interest_rate_bp 525`)
    Set { key: String, value: String },
}

#[derive(Subcommand)]
pub enum ExportTarget {
    /// Export account records
    Records {
        /// csv or json
        #[arg(short, long, default_value = "csv")]
        format: ExportFormat,

        /// Only records for this account ID
        #[arg(short, long)]
        account: Option<i64>,

        /// Start date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// End date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
