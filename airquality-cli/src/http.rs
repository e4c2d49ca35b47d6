//! HTTP endpoint for air-quality lookups.
//!
//! `GET /air_quality?lat=..&lon=..&radius=..&limit=..` returns the classified
//! stations as a JSON array, or a `message` object when the provider has no data.

use airquality_core::{
    AirQualityError, AirQualityOutcome, AirQualityQuery, AirQualityService,
    model::{DEFAULT_LIMIT, DEFAULT_RADIUS_METERS},
};
use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info, warn};

pub const NO_DATA_MESSAGE: &str = "No air quality data available.";

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AirQualityService>,
}

/// Query params for `/air_quality`
#[derive(Debug, Deserialize)]
pub struct AirQualityParams {
    pub lat: f64,
    pub lon: f64,
    #[serde(default = "default_radius")]
    pub radius: i64,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_radius() -> i64 {
    DEFAULT_RADIUS_METERS
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

/// Pipeline error rendered as `{"detail": ...}` with the matching status.
pub struct ApiError(AirQualityError);

impl From<AirQualityError> for ApiError {
    fn from(err: AirQualityError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::BAD_GATEWAY);
        warn!(status = status.as_u16(), error = %self.0, "air_quality request failed");

        (status, Json(ErrorResponse { detail: self.0.public_detail() })).into_response()
    }
}

/// GET /air_quality - Classified PM2.5 stations around a point
async fn air_quality(
    State(state): State<AppState>,
    params: Result<Query<AirQualityParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    // Missing or non-numeric params are a client error like an out-of-range radius.
    let Query(params) = params.map_err(|rejection| AirQualityError::Validation {
        message: rejection.body_text(),
    })?;
    debug!(?params, "air_quality request");

    let query = AirQualityQuery::new(params.lat, params.lon)
        .with_radius(params.radius)
        .with_limit(params.limit);

    let response = match state.service.air_quality(&query).await? {
        AirQualityOutcome::Stations(readings) => Json(readings).into_response(),
        AirQualityOutcome::NoData => {
            Json(MessageResponse { message: NO_DATA_MESSAGE }).into_response()
        }
    };

    Ok(response)
}

/// GET /health - Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}

/// Create the HTTP router
pub fn create_router(service: Arc<AirQualityService>) -> Router {
    let state = AppState { service };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/air_quality", get(air_quality))
        .layer(cors)
        .with_state(state)
}

/// Run the HTTP server until Ctrl-C
pub async fn run_http_server(service: Arc<AirQualityService>, bind: &str) -> anyhow::Result<()> {
    let app = create_router(service);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
