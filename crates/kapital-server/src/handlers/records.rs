//! Account record (ledger entry) handlers

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::{double_option, parse_timestamp};
use crate::{parse_json, AppError, AppState, SuccessResponse};
use kapital_core::models::{AccountRecord, NewRecord, RecordPatch, RecordType};
use kapital_core::validation::ValidationErrors;

/// Query parameters for listing records
#[derive(Debug, Deserialize)]
pub struct RecordListQuery {
    pub account_id: Option<i64>,
}

/// Request body for creating or replacing a record
#[derive(Debug, Deserialize)]
pub struct RecordRequest {
    /// Replace this record when it exists
    pub id: Option<i64>,
    pub account_id: Option<i64>,
    #[serde(alias = "type")]
    pub record_type: Option<String>,
    /// Minor units
    pub amount: Option<i64>,
    pub description: Option<String>,
    /// RFC 3339 or YYYY-MM-DD; defaults to now
    pub date: Option<String>,
}

/// Request body for partially updating a record
#[derive(Debug, Deserialize)]
pub struct RecordPatchRequest {
    pub account_id: Option<i64>,
    #[serde(alias = "type")]
    pub record_type: Option<String>,
    pub amount: Option<i64>,
    /// `null` clears the description
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub date: Option<String>,
}

/// GET /api/records - List records, optionally for one account
pub async fn list_records(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecordListQuery>,
) -> Result<Json<Vec<AccountRecord>>, AppError> {
    let records = state.db.list_records(params.account_id)?;
    Ok(Json(records))
}

/// POST /api/records - Create a record, or replace it when `id` exists
pub async fn upsert_record(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<AccountRecord>, AppError> {
    let req: RecordRequest = parse_json(&body)?;

    let mut errors = ValidationErrors::new();
    let account_id = errors.require("account_id", req.account_id);
    let record_type = errors.require_enum::<RecordType>("record_type", req.record_type);
    let amount = errors.require_amount("amount", req.amount);
    let date = req
        .date
        .as_deref()
        .and_then(|d| parse_timestamp(&mut errors, "date", d));

    let (Some(account_id), Some(record_type), Some(amount)) = (account_id, record_type, amount)
    else {
        return Err(errors.into());
    };
    errors.check()?;

    let record = state.db.upsert_record(
        req.id,
        &NewRecord {
            account_id,
            record_type,
            amount,
            description: req.description,
            date,
        },
    )?;

    Ok(Json(record))
}

/// GET /api/records/:id - Get a single record
pub async fn get_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<AccountRecord>, AppError> {
    let record = state
        .db
        .get_record(id)?
        .ok_or_else(|| AppError::not_found(&format!("Record {} not found", id)))?;

    Ok(Json(record))
}

/// PATCH /api/records/:id - Update any subset of fields
pub async fn update_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    body: Bytes,
) -> Result<Json<AccountRecord>, AppError> {
    let req: RecordPatchRequest = parse_json(&body)?;

    let mut errors = ValidationErrors::new();
    let patch = RecordPatch {
        account_id: req.account_id,
        record_type: req
            .record_type
            .and_then(|t| errors.parse_enum("record_type", &t)),
        amount: req.amount.and_then(|a| errors.amount("amount", a)),
        description: req.description,
        date: req
            .date
            .as_deref()
            .and_then(|d| parse_timestamp(&mut errors, "date", d)),
    };
    errors.check()?;

    let record = state
        .db
        .update_record(id, &patch)?
        .ok_or_else(|| AppError::not_found(&format!("Record {} not found", id)))?;

    Ok(Json(record))
}

/// DELETE /api/records/:id - Delete a record
pub async fn delete_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.db.delete_record(id)? {
        return Err(AppError::not_found(&format!("Record {} not found", id)));
    }

    Ok(Json(SuccessResponse { success: true }))
}
