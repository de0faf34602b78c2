//! Health, dashboard and affordability handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;

use crate::{AppError, AppState};
use kapital_core::{load_affordability, load_dashboard, AffordabilityResponse, DashboardResponse};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /api/health - Liveness check
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// GET /api/dashboard - Capital, debt, weekly history, allocation and goal progress
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardResponse>, AppError> {
    let view = load_dashboard(&state.db, Utc::now())?;
    Ok(Json(DashboardResponse::from(&view)))
}

/// GET /api/affordability - Maximum loan and purchase price under current settings
pub async fn get_affordability(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AffordabilityResponse>, AppError> {
    let estimate = load_affordability(&state.db)?;
    Ok(Json(AffordabilityResponse::from(&estimate)))
}
