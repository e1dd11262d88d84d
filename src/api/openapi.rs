//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{gauges, health, logs, users};

/// Declares the admin bearer scheme referenced by protected endpoints
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gauge Lending API",
        version = "1.0.0",
        description = "Tracks who holds each measurement gauge and verifies returns"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Gauges
        gauges::list_gauges,
        gauges::list_available,
        gauges::list_in_flight,
        gauges::list_pending,
        gauges::list_borrowed,
        gauges::list_categories,
        gauges::list_holders,
        gauges::create_gauge,
        gauges::delete_gauge,
        gauges::borrow_gauge,
        gauges::request_return,
        gauges::confirm_return,
        // Users
        users::list_users,
        users::create_user,
        users::delete_user,
        // Log
        logs::list_logs,
    ),
    components(
        schemas(
            crate::models::Gauge,
            crate::models::GaugeStatus,
            crate::models::GaugeView,
            crate::models::CreateGauge,
            crate::models::User,
            crate::models::CreateUser,
            crate::models::LogEntry,
            crate::models::LogKind,
            gauges::BorrowerRequest,
            gauges::ConfirmReturnRequest,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "gauges", description = "Gauge views and lending lifecycle"),
        (name = "users", description = "User directory"),
        (name = "logs", description = "Transition log")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
