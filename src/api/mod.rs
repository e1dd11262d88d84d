//! API handlers for the gauge lending REST endpoints

pub mod gauges;
pub mod health;
pub mod logs;
pub mod openapi;
pub mod users;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, services::auth::Admin, AppState};

/// Extractor for callers presenting the admin password as a bearer token
pub struct AdminUser(pub Admin);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let password = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        Ok(AdminUser(state.services.auth.admin(password)?))
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Gauges: views
        .route("/gauges", get(gauges::list_gauges).post(gauges::create_gauge))
        .route("/gauges/available", get(gauges::list_available))
        .route("/gauges/in-flight", get(gauges::list_in_flight))
        .route("/gauges/pending", get(gauges::list_pending))
        .route("/gauges/borrowed", get(gauges::list_borrowed))
        .route("/gauges/categories", get(gauges::list_categories))
        .route("/gauges/holders", get(gauges::list_holders))
        // Gauges: lifecycle
        .route("/gauges/:id", delete(gauges::delete_gauge))
        .route("/gauges/:id/borrow", post(gauges::borrow_gauge))
        .route("/gauges/:id/return-request", post(gauges::request_return))
        .route("/gauges/:id/confirm-return", post(gauges::confirm_return))
        // Users
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/:name", delete(users::delete_user))
        // Log
        .route("/logs", get(logs::list_logs))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
