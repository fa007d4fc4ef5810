// Health HTTP routes: liveness and build metadata, no auth required

use axum::{extract::State, routing::get, Json, Router};

use crate::services::health::{HealthService, Ping, VersionInfo};

pub fn routes(service: HealthService) -> Router {
    Router::new()
        .route("/health/ping", get(ping))
        .route("/health/version", get(version))
        .with_state(service)
}

/// GET /health/ping - Liveness check
#[utoipa::path(
    get,
    path = "/health/ping",
    responses((status = 200, description = "Server is up", body = Ping)),
    tag = "health"
)]
pub async fn ping(State(service): State<HealthService>) -> Json<Ping> {
    Json(service.ping())
}

/// GET /health/version - Build and environment metadata
#[utoipa::path(
    get,
    path = "/health/version",
    responses((status = 200, description = "Version info", body = VersionInfo)),
    tag = "health"
)]
pub async fn version(State(service): State<HealthService>) -> Json<VersionInfo> {
    Json(service.version())
}
