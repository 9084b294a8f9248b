//! The health check API.

use crate::infra::{extract::Json, state::AppState};
use axum::{routing::get, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

/// The health API endpoints.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// The health check payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// The service status.
    #[schema(example = "healthy")]
    status: String,
    /// When the check ran, in UTC.
    timestamp: DateTime<Utc>,
}

impl HealthResponse {
    /// The service status.
    pub fn status(&self) -> &str {
        self.status.as_ref()
    }

    /// When the check ran.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Reports service health.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Success", body = HealthResponse),
    )
)]
#[instrument]
pub async fn health() -> Json<HealthResponse> {
    tracing::info!("Health check requested");
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
    })
}
