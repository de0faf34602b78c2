//! Kapital Core Library
//!
//! Shared functionality for the Kapital personal finance tracker:
//! - Domain models and integer money
//! - Database access and schema setup
//! - Read-side stores for aggregation
//! - Dashboard and loan affordability calculations
//! - Record export and configuration

pub mod affordability;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod money;
pub mod store;
pub mod validation;

pub use affordability::{compute_affordability, AffordabilityEstimate, AffordabilityResponse};
pub use config::AppConfig;
pub use dashboard::{compute_dashboard, DashboardResponse, DashboardView};
pub use db::Database;
pub use error::{Error, Result};
pub use export::{ExportFormat, RecordExport, RecordExportOptions};
pub use money::Money;
pub use store::{load_affordability, load_dashboard};
pub use validation::{FieldError, ValidationErrors};
