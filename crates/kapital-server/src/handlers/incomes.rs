//! Income source handlers

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::{parse_json, AppError, AppState, SuccessResponse};
use kapital_core::models::{Frequency, Income, IncomePatch, NewIncome};
use kapital_core::validation::ValidationErrors;

/// Request body for creating or replacing an income source
#[derive(Debug, Deserialize)]
pub struct IncomeRequest {
    pub id: Option<i64>,
    pub name: Option<String>,
    /// Minor units per period
    pub amount: Option<i64>,
    pub frequency: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IncomePatchRequest {
    pub name: Option<String>,
    pub amount: Option<i64>,
    pub frequency: Option<String>,
}

/// GET /api/incomes - List all income sources
pub async fn list_incomes(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Income>>, AppError> {
    let incomes = state.db.list_incomes()?;
    Ok(Json(incomes))
}

/// POST /api/incomes - Create an income source, or replace it when `id` exists
pub async fn upsert_income(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Income>, AppError> {
    let req: IncomeRequest = parse_json(&body)?;

    let mut errors = ValidationErrors::new();
    let name = errors.require_name("name", req.name);
    let amount = errors.require_amount("amount", req.amount);
    let frequency = errors.require_enum::<Frequency>("frequency", req.frequency);
    let (Some(name), Some(amount), Some(frequency)) = (name, amount, frequency) else {
        return Err(errors.into());
    };

    let income = state.db.upsert_income(
        req.id,
        &NewIncome {
            name,
            amount,
            frequency,
        },
    )?;

    Ok(Json(income))
}

/// GET /api/incomes/:id - Get a single income source
pub async fn get_income(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Income>, AppError> {
    let income = state
        .db
        .get_income(id)?
        .ok_or_else(|| AppError::not_found(&format!("Income {} not found", id)))?;

    Ok(Json(income))
}

/// PATCH /api/incomes/:id - Update any subset of fields
pub async fn update_income(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    body: Bytes,
) -> Result<Json<Income>, AppError> {
    let req: IncomePatchRequest = parse_json(&body)?;

    let mut errors = ValidationErrors::new();
    let patch = IncomePatch {
        name: req.name.and_then(|n| errors.name("name", n)),
        amount: req.amount.and_then(|a| errors.amount("amount", a)),
        frequency: req
            .frequency
            .and_then(|f| errors.parse_enum("frequency", &f)),
    };
    errors.check()?;

    let income = state
        .db
        .update_income(id, &patch)?
        .ok_or_else(|| AppError::not_found(&format!("Income {} not found", id)))?;

    Ok(Json(income))
}

/// DELETE /api/incomes/:id - Delete an income source
pub async fn delete_income(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.db.delete_income(id)? {
        return Err(AppError::not_found(&format!("Income {} not found", id)));
    }

    Ok(Json(SuccessResponse { success: true }))
}
