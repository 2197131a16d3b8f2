// Pricing Dashboard - HTTP API
// Stateless: every request recomputes the chart from its own query string

use crate::chart::{update_chart, ChartDescription, StrategySummary};
use crate::export::to_csv_string;
use crate::params::{ParameterField, PricingParameters};
use crate::strategies::Strategy;
use axum::{
    extract::Query,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// API Response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// One input slot of the dashboard form
#[derive(Serialize)]
pub struct FieldResponse {
    key: &'static str,
    label: &'static str,
    help: &'static str,
    default: f64,
}

impl From<ParameterField> for FieldResponse {
    fn from(field: ParameterField) -> Self {
        Self {
            key: field.key(),
            label: field.label(),
            help: field.help(),
            default: field.default_value(),
        }
    }
}

#[derive(Serialize)]
pub struct ChartResponse {
    parameters: PricingParameters,
    figure: Value,
    summaries: Vec<StrategySummary>,
    best_strategy: Option<Strategy>,
}

impl From<(PricingParameters, ChartDescription)> for ChartResponse {
    fn from((parameters, chart): (PricingParameters, ChartDescription)) -> Self {
        Self {
            parameters,
            figure: chart.to_figure(),
            summaries: chart.summaries(),
            best_strategy: chart.best_strategy(),
        }
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/fields - Input keys, labels and defaults in form order
async fn get_fields() -> impl IntoResponse {
    let fields: Vec<FieldResponse> = ParameterField::ALL.into_iter().map(Into::into).collect();
    Json(ApiResponse::ok(fields))
}

/// Parameters and chart for one request, or the message for a 400
fn compute_chart(inputs: &HashMap<String, String>) -> Result<(PricingParameters, ChartDescription), String> {
    let params = PricingParameters::from_inputs(inputs).map_err(|e| e.to_string())?;
    let chart = update_chart(&params);
    chart.ensure_finite().map_err(|e| e.to_string())?;
    Ok((params, chart))
}

/// GET /api/chart - Recompute all strategies for the query parameters
async fn get_chart(Query(inputs): Query<HashMap<String, String>>) -> Response {
    match compute_chart(&inputs) {
        Ok((params, chart)) => {
            tracing::debug!(?params, "chart recomputed");

            (StatusCode::OK, Json(ApiResponse::ok(ChartResponse::from((params, chart))))).into_response()
        }
        Err(message) => {
            tracing::warn!(error = %message, "rejected chart parameters");
            (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<ChartResponse>::err(message)),
            )
                .into_response()
        }
    }
}

/// GET /api/chart.csv - Same chart as a CSV table
async fn get_chart_csv(Query(inputs): Query<HashMap<String, String>>) -> Response {
    let chart = match compute_chart(&inputs) {
        Ok((_, chart)) => chart,
        Err(message) => {
            tracing::warn!(error = %message, "rejected export parameters");
            return (StatusCode::BAD_REQUEST, message).into_response();
        }
    };

    match to_csv_string(&chart) {
        Ok(csv) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (header::CONTENT_DISPOSITION, "attachment; filename=\"revenue.csv\""),
            ],
            csv,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "CSV export failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "export failed").into_response()
        }
    }
}

/// GET / - Serve the dashboard page
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

// ============================================================================
// Router
// ============================================================================

pub fn router() -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/fields", get(get_fields))
        .route("/chart", get(get_chart))
        .route("/chart.csv", get(get_chart_csv));

    Router::new()
        .route("/", get(serve_index))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
