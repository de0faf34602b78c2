//! Account management handlers

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::{parse_json, AppError, AppState, SuccessResponse};
use kapital_core::models::{Account, AccountPatch, AccountType, NewAccount};
use kapital_core::validation::ValidationErrors;

/// Request body for creating or replacing an account
#[derive(Debug, Deserialize)]
pub struct AccountRequest {
    /// Replace this account when it exists
    pub id: Option<i64>,
    pub name: Option<String>,
    #[serde(alias = "type")]
    pub account_type: Option<String>,
}

/// Request body for partially updating an account
#[derive(Debug, Deserialize)]
pub struct AccountPatchRequest {
    pub name: Option<String>,
    #[serde(alias = "type")]
    pub account_type: Option<String>,
}

/// GET /api/accounts - List all accounts with their balances
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Account>>, AppError> {
    let accounts = state.db.list_accounts()?;
    Ok(Json(accounts))
}

/// POST /api/accounts - Create an account, or replace it when `id` exists
pub async fn upsert_account(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Account>, AppError> {
    let req: AccountRequest = parse_json(&body)?;

    let mut errors = ValidationErrors::new();
    let name = errors.require_name("name", req.name);
    let account_type = errors.require_enum::<AccountType>("account_type", req.account_type);
    let (Some(name), Some(account_type)) = (name, account_type) else {
        return Err(errors.into());
    };

    let account = state
        .db
        .upsert_account(req.id, &NewAccount { name, account_type })?;

    Ok(Json(account))
}

/// GET /api/accounts/:id - Get a single account
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Account>, AppError> {
    let account = state
        .db
        .get_account(id)?
        .ok_or_else(|| AppError::not_found(&format!("Account {} not found", id)))?;

    Ok(Json(account))
}

/// PATCH /api/accounts/:id - Update name and/or type
pub async fn update_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    body: Bytes,
) -> Result<Json<Account>, AppError> {
    let req: AccountPatchRequest = parse_json(&body)?;

    let mut errors = ValidationErrors::new();
    let patch = AccountPatch {
        name: req.name.and_then(|n| errors.name("name", n)),
        account_type: req
            .account_type
            .and_then(|t| errors.parse_enum("account_type", &t)),
    };
    errors.check()?;

    let account = state
        .db
        .update_account(id, &patch)?
        .ok_or_else(|| AppError::not_found(&format!("Account {} not found", id)))?;

    Ok(Json(account))
}

/// DELETE /api/accounts/:id - Delete an account and its records
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.db.delete_account(id)? {
        return Err(AppError::not_found(&format!("Account {} not found", id)));
    }

    Ok(Json(SuccessResponse { success: true }))
}
