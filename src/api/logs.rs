//! Transition log endpoint

use axum::{extract::State, Json};

use crate::{error::AppResult, models::LogEntry};

use super::AdminUser;

/// List the transition log, newest entry first
#[utoipa::path(
    get,
    path = "/logs",
    tag = "logs",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Log entries, newest first", body = Vec<LogEntry>),
        (status = 401, description = "Not an admin")
    )
)]
pub async fn list_logs(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
) -> AppResult<Json<Vec<LogEntry>>> {
    let entries = state.services.queries.log().await?;
    Ok(Json(entries))
}
