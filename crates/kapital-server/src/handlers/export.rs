//! Record export handler

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, Response, StatusCode},
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use crate::{AppError, AppState};
use kapital_core::{ExportFormat, RecordExportOptions};

/// Query parameters for record export
#[derive(Debug, Deserialize)]
pub struct RecordExportQuery {
    /// `csv` (default) or `json`
    pub format: Option<String>,
    pub account_id: Option<i64>,
    /// Start date (YYYY-MM-DD)
    pub from: Option<String>,
    /// End date (YYYY-MM-DD)
    pub to: Option<String>,
}

fn parse_date(value: Option<String>, param: &str) -> Result<Option<NaiveDate>, AppError> {
    value
        .map(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d"))
        .transpose()
        .map_err(|_| {
            AppError::bad_request(&format!("Invalid '{}' date format (use YYYY-MM-DD)", param))
        })
}

/// GET /api/export/records - Export account records to CSV or JSON
pub async fn export_records(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecordExportQuery>,
) -> Result<Response<Body>, AppError> {
    let format: ExportFormat = match params.format.as_deref() {
        Some(f) => f
            .parse()
            .map_err(|_| AppError::bad_request("Invalid format. Use 'csv' or 'json'"))?,
        None => ExportFormat::default(),
    };

    let opts = RecordExportOptions {
        account_id: params.account_id,
        from: parse_date(params.from, "from")?,
        to: parse_date(params.to, "to")?,
    };

    match format {
        ExportFormat::Csv => {
            let csv = state.db.export_records_csv(&opts)?;

            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
                .header(
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"records.csv\"",
                )
                .body(Body::from(csv))
                .map_err(|e| AppError::internal(&e.to_string()))
        }
        ExportFormat::Json => {
            let records = state.db.export_records(&opts)?;
            let json = serde_json::to_string_pretty(&records)
                .map_err(|e| AppError::internal(&e.to_string()))?;
            info!("Exported {} records to JSON", records.len());

            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, "application/json")
                .header(
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"records.json\"",
                )
                .body(Body::from(json))
                .map_err(|e| AppError::internal(&e.to_string()))
        }
    }
}
