// Calendar API server library
//
// The router is assembled here so the binary and the integration tests
// share the exact same wiring.

pub mod api;
pub mod auth;
pub mod config;
pub mod openapi;
pub mod services;
pub mod storage;

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::{AuthState, JwtService};
use crate::config::AppConfig;
use crate::services::HealthService;
use crate::storage::StorageBackend;

/// Build the full application router from configuration and a storage
/// backend.
pub fn build_router(config: &AppConfig, db: StorageBackend) -> Router {
    let jwt_service = Arc::new(JwtService::new(config.auth.jwt.clone()));
    let auth_state = AuthState::new(jwt_service.clone());

    // Create module-specific states
    let events_state =
        api::events::AppState::new(db.clone(), auth_state.clone(), config.pagination);
    let reminders_state =
        api::reminders::AppState::new(db.clone(), auth_state.clone(), config.pagination);
    let users_state = api::users::AppState::new(db, jwt_service, config.pagination);
    let health_service = HealthService::new(config.environment.clone());

    let api_routes = Router::new()
        .merge(api::events::routes(events_state))
        .merge(api::reminders::routes(reminders_state))
        .merge(api::users::routes(users_state))
        .merge(api::health::routes(health_service));

    let app = build_router_with_prefix(api_routes, &config.http.api_prefix).merge(
        SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", openapi::ApiDoc::openapi()),
    );

    // CORS only when origins are configured; same-origin needs nothing
    let cors_origins: Vec<HeaderValue> = config
        .http
        .cors_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    let app = if cors_origins.is_empty() {
        app
    } else {
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(cors_origins))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
                .allow_credentials(true),
        )
    };

    app.layer(TraceLayer::new_for_http())
}

/// Build router with optional API prefix (extracted for testing)
fn build_router_with_prefix(api_routes: Router, api_prefix: &str) -> Router {
    if api_prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(api_prefix, api_routes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_routes() -> Router {
        Router::new().route("/test", get(|| async { "ok" }))
    }

    #[tokio::test]
    async fn test_api_prefix_empty() {
        let app = build_router_with_prefix(test_routes(), "");

        let response = app
            .oneshot(Request::builder().uri("/test").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_api_prefix_set() {
        let app = build_router_with_prefix(test_routes(), "/api");

        // Route should work with prefix
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);

        // Route should NOT work without prefix
        let response = app
            .oneshot(Request::builder().uri("/test").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn health_ping_is_public() {
        let config = AppConfig::default();
        let app = build_router(&config, StorageBackend::in_memory());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health/ping")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["pong"], true);
    }
}
