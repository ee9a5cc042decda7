//! API route handlers.
//!
//! All endpoints return JSON. State is shared via `Arc<ApiState>`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, warn};

use crate::report::format_percent;
use crate::scoring::regression::TrendLine;
use crate::service::{Assessment, EligibilityService};
use crate::types::{format_money, EligibilityError, LoanRequest};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct ApiState {
    pub service: EligibilityService,
    pub currency: String,
}

impl ApiState {
    pub fn new(service: EligibilityService, currency: impl Into<String>) -> Self {
        Self {
            service,
            currency: currency.into(),
        }
    }
}

pub type AppState = Arc<ApiState>;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct AssessResponse {
    #[serde(flatten)]
    pub assessment: Assessment,
    pub display: DisplayFields,
}

/// Pre-formatted strings for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct DisplayFields {
    pub trend: String,
    pub probability: String,
    pub requested_amount: String,
    pub average_monthly_inflow: Option<String>,
    pub max_recommended_loan: Option<String>,
    pub trend_legend: Option<String>,
}

impl DisplayFields {
    fn from_assessment(assessment: &Assessment, currency: &str) -> Self {
        let result = &assessment.result;
        Self {
            trend: result.trend_label.display_name().to_string(),
            probability: format_percent(result.probability_of_approval),
            requested_amount: format_money(currency, assessment.request.requested_amount),
            average_monthly_inflow: result
                .average_monthly_inflow
                .map(|v| format_money(currency, v)),
            max_recommended_loan: result.max_recommended_loan.map(|v| format_money(currency, v)),
            trend_legend: assessment.trend_line.as_ref().map(TrendLine::legend),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(err: EligibilityError) -> ApiError {
    let status = match &err {
        EligibilityError::InvalidInput(_) => {
            warn!(error = %err, "Rejected request");
            StatusCode::BAD_REQUEST
        }
        EligibilityError::Store { .. } | EligibilityError::Config(_) => {
            error!(error = %err, "Request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// POST /api/assess
pub async fn assess(
    State(state): State<AppState>,
    Json(request): Json<LoanRequest>,
) -> Result<Json<AssessResponse>, ApiError> {
    let assessment = state.service.assess(&request).await.map_err(api_error)?;
    let display = DisplayFields::from_assessment(&assessment, &state.currency);
    Ok(Json(AssessResponse {
        assessment,
        display,
    }))
}

/// GET /api/customers
pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, ApiError> {
    let customers = state.service.customers().await.map_err(api_error)?;
    Ok(Json(customers))
}

/// GET /api/customers/:id/trend
pub async fn customer_trend(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<Json<TrendLine>, ApiError> {
    match state.service.trend_line(&customer_id).await.map_err(api_error)? {
        Some(line) => Ok(Json(line)),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Customer '{customer_id}' not found"),
            }),
        )),
    }
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
