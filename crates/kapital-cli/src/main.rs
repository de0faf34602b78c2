//! Kapital CLI - Personal capital tracker
//!
//! Usage:
//!   kapital init                          Initialize database
//!   kapital accounts add Sparekonto       Add an account
//!   kapital records add 1 -t DEPOSIT 1500 Record a deposit
//!   kapital dashboard                     Show capital and goal progress
//!   kapital serve --port 3000             Start web server

mod cli;
mod commands;


use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use kapital_core::{AppConfig, RecordExportOptions};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    let db_path = commands::resolve_db_path(
        cli.db.as_deref(),
        std::env::var_os(commands::DB_PATH_ENV),
        &config,
    );

    match cli.command {
        Commands::Init => commands::cmd_init(&db_path),
        Commands::Serve {
            port,
            host,
            static_dir,
        } => {
            let settings = commands::server_settings(&config, host, port, static_dir);
            commands::cmd_serve(&db_path, &settings).await
        }
        Commands::Dashboard => {
            let db = commands::open_db(&db_path)?;
            commands::cmd_dashboard(&db)
        }
        Commands::Accounts { action } => {
            let db = commands::open_db(&db_path)?;
            match action {
                None | Some(AccountsAction::List) => commands::cmd_accounts_list(&db),
                Some(AccountsAction::Add { name, account_type }) => {
                    commands::cmd_accounts_add(&db, &name, account_type)
                }
                Some(AccountsAction::Delete { id }) => commands::cmd_accounts_delete(&db, id),
            }
        }
        Commands::Records { action } => {
            let db = commands::open_db(&db_path)?;
            match action {
                None => commands::cmd_records_list(&db, None),
                Some(RecordsAction::List { account }) => commands::cmd_records_list(&db, account),
                Some(RecordsAction::Add {
                    account,
                    record_type,
                    amount,
                    description,
                    date,
                }) => commands::cmd_records_add(
                    &db,
                    account,
                    record_type,
                    amount,
                    description.as_deref(),
                    date,
                ),
            }
        }
        Commands::Debts { action } => {
            let db = commands::open_db(&db_path)?;
            match action {
                None | Some(DebtsAction::List) => commands::cmd_debts_list(&db),
                Some(DebtsAction::Add {
                    name,
                    debt_type,
                    amount,
                }) => commands::cmd_debts_add(&db, &name, debt_type, amount),
            }
        }
        Commands::Incomes { action } => {
            let db = commands::open_db(&db_path)?;
            match action {
                None | Some(IncomesAction::List) => commands::cmd_incomes_list(&db),
                Some(IncomesAction::Add {
                    name,
                    amount,
                    frequency,
                }) => commands::cmd_incomes_add(&db, &name, amount, frequency),
            }
        }
        Commands::Settings { action } => {
            let db = commands::open_db(&db_path)?;
            match action {
                None | Some(SettingsAction::Show) => commands::cmd_settings_show(&db),
                Some(SettingsAction::SetGoal { amount }) => {
                    commands::cmd_settings_set_goal(&db, amount)
                }
                Some(SettingsAction::Set { key, value }) => {
                    commands::cmd_settings_set(&db, &key, &value)
                }
            }
        }
        Commands::Affordability => {
            let db = commands::open_db(&db_path)?;
            commands::cmd_affordability(&db)
        }
        Commands::Export { target } => {
            let db = commands::open_db(&db_path)?;
            match target {
                ExportTarget::Records {
                    format,
                    account,
                    from,
                    to,
                    output,
                } => {
                    let opts = RecordExportOptions {
                        account_id: account,
                        from,
                        to,
                    };
                    commands::cmd_export_records(&db, format, &opts, output.as_deref())
                }
            }
        }
    }
}
