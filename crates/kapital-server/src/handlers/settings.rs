//! Settings handlers (single record, no id)

use std::sync::Arc;

use axum::{body::Bytes, extract::State, Json};
use serde::Deserialize;

use super::double_option;
use crate::{parse_json, AppError, AppState, SuccessResponse};
use kapital_core::models::{Settings, SettingsPatch};
use kapital_core::validation::ValidationErrors;

/// Settings fields as sent by clients. Unknown fields such as `version` are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct SettingsRequest {
    pub currency: Option<String>,
    pub date_format: Option<String>,
    pub number_format: Option<String>,
    pub currency_display: Option<String>,
    pub capital_goal: Option<i64>,
    /// `null` clears the SIFO figure
    #[serde(default, deserialize_with = "double_option")]
    pub sifo_living_expense: Option<Option<i64>>,
    pub debt_ratio_bp: Option<u32>,
    pub ltv_ratio_bp: Option<u32>,
    pub stress_test_rate_bp: Option<u32>,
    pub loan_term_years: Option<u32>,
    pub interest_rate_bp: Option<u32>,
    pub down_payment_min_bp: Option<u32>,
}

impl SettingsRequest {
    fn into_patch(self) -> Result<SettingsPatch, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let patch = SettingsPatch {
            currency: self.currency.map(|c| c.trim().to_uppercase()),
            date_format: self.date_format,
            number_format: self.number_format,
            currency_display: self
                .currency_display
                .and_then(|d| errors.parse_enum("currency_display", &d)),
            capital_goal: self.capital_goal,
            sifo_living_expense: self.sifo_living_expense,
            debt_ratio_bp: self.debt_ratio_bp,
            ltv_ratio_bp: self.ltv_ratio_bp,
            stress_test_rate_bp: self.stress_test_rate_bp,
            loan_term_years: self.loan_term_years,
            interest_rate_bp: self.interest_rate_bp,
            down_payment_min_bp: self.down_payment_min_bp,
        };
        errors.check()?;
        Ok(patch)
    }
}

/// GET /api/settings - Current settings (defaults when never saved)
pub async fn get_settings(State(state): State<Arc<AppState>>) -> Result<Json<Settings>, AppError> {
    let settings = state.db.get_settings()?;
    Ok(Json(settings))
}

/// POST /api/settings - Replace all settings; omitted fields take their defaults
pub async fn save_settings(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Settings>, AppError> {
    let req: SettingsRequest = parse_json(&body)?;
    let settings = Settings::default().merged(&req.into_patch()?);

    let saved = state.db.save_settings(&settings)?;
    Ok(Json(saved))
}

/// PATCH /api/settings - Update only the given fields
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Settings>, AppError> {
    let req: SettingsRequest = parse_json(&body)?;

    let updated = state.db.update_settings(&req.into_patch()?)?;
    Ok(Json(updated))
}

/// DELETE /api/settings - Reset to defaults
pub async fn reset_settings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.reset_settings()?;
    Ok(Json(SuccessResponse { success: true }))
}
