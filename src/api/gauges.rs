//! Gauge endpoints: filtered views and lifecycle commands
//!
//! Commands return the updated gauge; refreshing any list is left to the
//! client.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{timestamp, CreateGauge, Gauge, GaugeView},
};

use super::AdminUser;

fn view(gauge: Gauge) -> Json<GaugeView> {
    Json(GaugeView::new(gauge, timestamp::now()))
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvailableQuery {
    /// Only gauges of this category
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InFlightQuery {
    /// Only gauges held by this user
    pub holder: Option<String>,
}

/// Borrow or return-request body
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BorrowerRequest {
    #[validate(length(min = 1, max = 64, message = "User must be 1 to 64 characters"))]
    pub user: String,
}

/// Return inspection body
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct ConfirmReturnRequest {
    /// Inspection remark, may be empty
    #[serde(default)]
    #[validate(length(max = 500, message = "Note must be at most 500 characters"))]
    pub note: String,
}

/// List every gauge with its status
#[utoipa::path(
    get,
    path = "/gauges",
    tag = "gauges",
    responses(
        (status = 200, description = "All gauges", body = Vec<GaugeView>)
    )
)]
pub async fn list_gauges(State(state): State<crate::AppState>) -> AppResult<Json<Vec<GaugeView>>> {
    Ok(Json(state.services.queries.overview().await?))
}

/// List gauges that can be borrowed
#[utoipa::path(
    get,
    path = "/gauges/available",
    tag = "gauges",
    params(AvailableQuery),
    responses(
        (status = 200, description = "Available gauges", body = Vec<GaugeView>)
    )
)]
pub async fn list_available(
    State(state): State<crate::AppState>,
    Query(query): Query<AvailableQuery>,
) -> AppResult<Json<Vec<GaugeView>>> {
    let gauges = state
        .services
        .queries
        .available(query.category.as_deref())
        .await?;
    Ok(Json(gauges))
}

/// List gauges that are out, including those awaiting verification
#[utoipa::path(
    get,
    path = "/gauges/in-flight",
    tag = "gauges",
    params(InFlightQuery),
    responses(
        (status = 200, description = "Borrowed and pending gauges", body = Vec<GaugeView>)
    )
)]
pub async fn list_in_flight(
    State(state): State<crate::AppState>,
    Query(query): Query<InFlightQuery>,
) -> AppResult<Json<Vec<GaugeView>>> {
    let gauges = state
        .services
        .queries
        .borrowed_or_pending(query.holder.as_deref())
        .await?;
    Ok(Json(gauges))
}

/// Verification queue
#[utoipa::path(
    get,
    path = "/gauges/pending",
    tag = "gauges",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Gauges awaiting return inspection", body = Vec<GaugeView>),
        (status = 401, description = "Not an admin")
    )
)]
pub async fn list_pending(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
) -> AppResult<Json<Vec<GaugeView>>> {
    Ok(Json(state.services.queries.pending_verification().await?))
}

/// Dashboard of gauges currently on loan
#[utoipa::path(
    get,
    path = "/gauges/borrowed",
    tag = "gauges",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Borrowed gauges with loan age", body = Vec<GaugeView>),
        (status = 401, description = "Not an admin")
    )
)]
pub async fn list_borrowed(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
) -> AppResult<Json<Vec<GaugeView>>> {
    Ok(Json(state.services.queries.currently_borrowed().await?))
}

/// Distinct gauge categories
#[utoipa::path(
    get,
    path = "/gauges/categories",
    tag = "gauges",
    responses(
        (status = 200, description = "Categories in first-seen order", body = Vec<String>)
    )
)]
pub async fn list_categories(State(state): State<crate::AppState>) -> AppResult<Json<Vec<String>>> {
    Ok(Json(state.services.queries.categories().await?))
}

/// Distinct holders of gauges that are out
#[utoipa::path(
    get,
    path = "/gauges/holders",
    tag = "gauges",
    responses(
        (status = 200, description = "Holder names", body = Vec<String>)
    )
)]
pub async fn list_holders(State(state): State<crate::AppState>) -> AppResult<Json<Vec<String>>> {
    Ok(Json(state.services.queries.holders().await?))
}

/// Register a gauge
#[utoipa::path(
    post,
    path = "/gauges",
    tag = "gauges",
    security(("bearer_auth" = [])),
    request_body = CreateGauge,
    responses(
        (status = 201, description = "Gauge registered", body = GaugeView),
        (status = 400, description = "Missing id or category"),
        (status = 409, description = "Gauge id already exists")
    )
)]
pub async fn create_gauge(
    State(state): State<crate::AppState>,
    AdminUser(admin): AdminUser,
    Json(data): Json<CreateGauge>,
) -> AppResult<(StatusCode, Json<GaugeView>)> {
    data.validate()?;
    let gauge = state.services.directory.add_gauge(&admin, &data).await?;
    Ok((StatusCode::CREATED, view(gauge)))
}

/// Delete a gauge
#[utoipa::path(
    delete,
    path = "/gauges/{id}",
    tag = "gauges",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Gauge ID")),
    responses(
        (status = 204, description = "Gauge deleted"),
        (status = 404, description = "Gauge not found"),
        (status = 422, description = "Gauge is out on loan")
    )
)]
pub async fn delete_gauge(
    State(state): State<crate::AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.services.directory.delete_gauge(&admin, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Borrow a gauge
#[utoipa::path(
    post,
    path = "/gauges/{id}/borrow",
    tag = "gauges",
    params(("id" = String, Path, description = "Gauge ID")),
    request_body = BorrowerRequest,
    responses(
        (status = 200, description = "Gauge borrowed", body = GaugeView),
        (status = 404, description = "Gauge not found"),
        (status = 422, description = "Gauge is not available")
    )
)]
pub async fn borrow_gauge(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    Json(request): Json<BorrowerRequest>,
) -> AppResult<Json<GaugeView>> {
    request.validate()?;
    let gauge = state.services.lifecycle.borrow(&id, &request.user).await?;
    Ok(view(gauge))
}

/// Ask for a borrowed gauge to be taken back
#[utoipa::path(
    post,
    path = "/gauges/{id}/return-request",
    tag = "gauges",
    params(("id" = String, Path, description = "Gauge ID")),
    request_body = BorrowerRequest,
    responses(
        (status = 200, description = "Return awaiting verification", body = GaugeView),
        (status = 404, description = "Gauge not found"),
        (status = 422, description = "Gauge not borrowed, or held by someone else")
    )
)]
pub async fn request_return(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    Json(request): Json<BorrowerRequest>,
) -> AppResult<Json<GaugeView>> {
    request.validate()?;
    let gauge = state
        .services
        .lifecycle
        .request_return(&id, &request.user)
        .await?;
    Ok(view(gauge))
}

/// Confirm a returned gauge after inspection
#[utoipa::path(
    post,
    path = "/gauges/{id}/confirm-return",
    tag = "gauges",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Gauge ID")),
    request_body = ConfirmReturnRequest,
    responses(
        (status = 200, description = "Gauge back in stock", body = GaugeView),
        (status = 404, description = "Gauge not found"),
        (status = 422, description = "No return pending")
    )
)]
pub async fn confirm_return(
    State(state): State<crate::AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    Json(request): Json<ConfirmReturnRequest>,
) -> AppResult<Json<GaugeView>> {
    request.validate()?;
    let gauge = state
        .services
        .lifecycle
        .confirm_return(&admin, &id, &request.note)
        .await?;
    Ok(view(gauge))
}
