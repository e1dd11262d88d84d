//! User directory endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{CreateUser, User},
};

use super::AdminUser;

/// List users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "Users in directory order", body = Vec<User>)
    )
)]
pub async fn list_users(State(state): State<crate::AppState>) -> AppResult<Json<Vec<User>>> {
    let users = state.services.directory.list_users().await?;
    Ok(Json(users))
}

/// Add a user
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = CreateUser,
    responses(
        (status = 201, description = "User added", body = User),
        (status = 400, description = "Invalid name"),
        (status = 409, description = "Name already taken")
    )
)]
pub async fn create_user(
    State(state): State<crate::AppState>,
    AdminUser(admin): AdminUser,
    Json(data): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    data.validate()?;
    let user = state.services.directory.add_user(&admin, &data).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Remove a user
#[utoipa::path(
    delete,
    path = "/users/{name}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("name" = String, Path, description = "User name")),
    responses(
        (status = 204, description = "User removed"),
        (status = 404, description = "User not found"),
        (status = 422, description = "User still holds gauges")
    )
)]
pub async fn delete_user(
    State(state): State<crate::AppState>,
    AdminUser(admin): AdminUser,
    Path(name): Path<String>,
) -> AppResult<StatusCode> {
    state.services.directory.delete_user(&admin, &name).await?;
    Ok(StatusCode::NO_CONTENT)
}
