//! Debt handlers

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::{parse_json, AppError, AppState, SuccessResponse};
use kapital_core::models::{Debt, DebtPatch, DebtType, NewDebt};
use kapital_core::validation::ValidationErrors;

/// Request body for creating or replacing a debt
#[derive(Debug, Deserialize)]
pub struct DebtRequest {
    pub id: Option<i64>,
    pub name: Option<String>,
    #[serde(alias = "type")]
    pub debt_type: Option<String>,
    /// Outstanding balance in minor units
    pub amount: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct DebtPatchRequest {
    pub name: Option<String>,
    #[serde(alias = "type")]
    pub debt_type: Option<String>,
    pub amount: Option<i64>,
}

/// GET /api/debts - List all debts
pub async fn list_debts(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Debt>>, AppError> {
    let debts = state.db.list_debts()?;
    Ok(Json(debts))
}

/// POST /api/debts - Create a debt, or replace it when `id` exists
pub async fn upsert_debt(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Debt>, AppError> {
    let req: DebtRequest = parse_json(&body)?;

    let mut errors = ValidationErrors::new();
    let name = errors.require_name("name", req.name);
    let debt_type = errors.require_enum::<DebtType>("debt_type", req.debt_type);
    let amount = errors.require_amount("amount", req.amount);
    let (Some(name), Some(debt_type), Some(amount)) = (name, debt_type, amount) else {
        return Err(errors.into());
    };

    let debt = state.db.upsert_debt(
        req.id,
        &NewDebt {
            name,
            debt_type,
            amount,
        },
    )?;

    Ok(Json(debt))
}

/// GET /api/debts/:id - Get a single debt
pub async fn get_debt(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Debt>, AppError> {
    let debt = state
        .db
        .get_debt(id)?
        .ok_or_else(|| AppError::not_found(&format!("Debt {} not found", id)))?;

    Ok(Json(debt))
}

/// PATCH /api/debts/:id - Update any subset of fields
pub async fn update_debt(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    body: Bytes,
) -> Result<Json<Debt>, AppError> {
    let req: DebtPatchRequest = parse_json(&body)?;

    let mut errors = ValidationErrors::new();
    let patch = DebtPatch {
        name: req.name.and_then(|n| errors.name("name", n)),
        debt_type: req
            .debt_type
            .and_then(|t| errors.parse_enum("debt_type", &t)),
        amount: req.amount.and_then(|a| errors.amount("amount", a)),
    };
    errors.check()?;

    let debt = state
        .db
        .update_debt(id, &patch)?
        .ok_or_else(|| AppError::not_found(&format!("Debt {} not found", id)))?;

    Ok(Json(debt))
}

/// DELETE /api/debts/:id - Delete a debt
pub async fn delete_debt(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.db.delete_debt(id)? {
        return Err(AppError::not_found(&format!("Debt {} not found", id)));
    }

    Ok(Json(SuccessResponse { success: true }))
}
