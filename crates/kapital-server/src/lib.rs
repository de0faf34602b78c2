//! Kapital Web Server
//!
//! Axum-based REST API for the Kapital personal finance tracker.
//!
//! - Restrictive CORS policy
//! - Field-level validation errors
//! - Sanitized error responses with full errors in the logs

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{de::DeserializeOwned, Serialize};
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, warn};

use kapital_core::config::ServerSettings;
use kapital_core::db::Database;
use kapital_core::validation::ValidationErrors;

mod handlers;

/// Maximum request body size (64 KB)
pub const MAX_BODY_SIZE: usize = 64 * 1024;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

impl From<&ServerSettings> for ServerConfig {
    fn from(settings: &ServerSettings) -> Self {
        Self {
            allowed_origins: settings.allowed_origins.clone(),
        }
    }
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
}

/// Success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create the application router
pub fn create_router(db: Database, static_dir: Option<&str>, config: ServerConfig) -> Router {
    let state = Arc::new(AppState {
        db,
        config: config.clone(),
    });

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        // Aggregates
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/affordability", get(handlers::get_affordability))
        // Accounts
        .route(
            "/accounts",
            get(handlers::list_accounts).post(handlers::upsert_account),
        )
        .route(
            "/accounts/:id",
            get(handlers::get_account)
                .patch(handlers::update_account)
                .delete(handlers::delete_account),
        )
        // Account records
        .route(
            "/records",
            get(handlers::list_records).post(handlers::upsert_record),
        )
        .route(
            "/records/:id",
            get(handlers::get_record)
                .patch(handlers::update_record)
                .delete(handlers::delete_record),
        )
        // Debts
        .route(
            "/debts",
            get(handlers::list_debts).post(handlers::upsert_debt),
        )
        .route(
            "/debts/:id",
            get(handlers::get_debt)
                .patch(handlers::update_debt)
                .delete(handlers::delete_debt),
        )
        // Incomes
        .route(
            "/incomes",
            get(handlers::list_incomes).post(handlers::upsert_income),
        )
        .route(
            "/incomes/:id",
            get(handlers::get_income)
                .patch(handlers::update_income)
                .delete(handlers::delete_income),
        )
        // Settings (singleton)
        .route(
            "/settings",
            get(handlers::get_settings)
                .post(handlers::save_settings)
                .patch(handlers::update_settings)
                .delete(handlers::reset_settings),
        )
        // Export
        .route("/export/records", get(handlers::export_records));

    // Build CORS layer
    let methods = [
        Method::GET,
        Method::POST,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let cors = if state.config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE])
    };

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ));

    // Serve static files if directory provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server with default configuration
pub async fn serve(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
) -> anyhow::Result<()> {
    serve_with_config(db, host, port, static_dir, ServerConfig::default()).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if config.allowed_origins.is_empty() {
        info!("CORS: same-origin only");
    } else {
        info!(origins = ?config.allowed_origins, "CORS: allowing configured origins");
    }

    let app = create_router(db, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Parse a JSON request body, rejecting malformed input with 400 "Invalid JSON"
pub(crate) fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, "Rejected request body");
        AppError::bad_request("Invalid JSON")
    })
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    details: Option<serde_json::Value>,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            details: None,
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            details: None,
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            details: None,
            internal: None,
        }
    }

    /// 400 with one `{field, message}` entry per invalid field
    pub fn validation(errors: ValidationErrors) -> Self {
        warn!(errors = %errors, "Validation failed");
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "Validation failed".to_string(),
            details: serde_json::to_value(&errors).ok(),
            internal: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let mut body = serde_json::Map::new();
        body.insert("error".to_string(), self.message.into());
        if let Some(details) = self.details {
            body.insert("details".to_string(), details);
        }

        (self.status, Json(serde_json::Value::Object(body))).into_response()
    }
}

impl From<kapital_core::Error> for AppError {
    fn from(err: kapital_core::Error) -> Self {
        match err {
            kapital_core::Error::Validation(errors) => Self::validation(errors),
            kapital_core::Error::NotFound(what) => Self::not_found(&format!("{} not found", what)),
            other => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                // Generic message to the client, original error as detail
                message: "An internal error occurred".to_string(),
                details: Some(other.to_string().into()),
                // Keep full error for logging
                internal: Some(other.into()),
            },
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        Self::validation(errors)
    }
}

#[cfg(test)]
mod tests;
