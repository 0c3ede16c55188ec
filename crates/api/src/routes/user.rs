use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tripdesk_db::models::{Role, capabilities};
use tripdesk_services::dao::base::PaginationParams;
use validator::Validate;

use crate::routes::auth::UserResponse;
use crate::routes::offer::parse_id;
use crate::{
    error::ApiError,
    extractors::auth::AuthUser,
    response::{ApiResponse, PagedResponse, ok, paged},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<PagedResponse<UserResponse>>, ApiError> {
    auth.require(capabilities::MANAGE_USERS)?;
    let result = state.users.list(&query.pagination).await?;
    Ok(paged(result.map(UserResponse::from)))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub full_name: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub role: Role,
}

/// Admin-created accounts get their role assigned up front, unlike
/// self-registration which always starts at viewer.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    auth.require(capabilities::MANAGE_USERS)?;
    body.validate()?;

    let password_hash = state.auth.hash_password(&body.password)?;
    let user = state
        .users
        .create(body.email, body.full_name, password_hash, body.role)
        .await?;
    Ok((StatusCode::CREATED, ok(user.into())))
}

pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    auth.require(capabilities::MANAGE_USERS)?;
    let id = parse_id(&user_id)?;
    let user = state.users.base.find_by_id(id).await?;
    Ok(ok(user.into()))
}

#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    pub role: Role,
}

pub async fn set_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
    Json(body): Json<SetRoleRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    auth.require(capabilities::MANAGE_USERS)?;
    let id = parse_id(&user_id)?;
    if id == auth.user_id {
        return Err(ApiError::BadRequest(
            "Cannot change your own role".to_string(),
        ));
    }
    state.users.set_role(id, body.role).await?;
    let user = state.users.base.find_by_id(id).await?;
    Ok(ok(user.into()))
}

#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

pub async fn set_active(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
    Json(body): Json<SetActiveRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    auth.require(capabilities::MANAGE_USERS)?;
    let id = parse_id(&user_id)?;
    if id == auth.user_id {
        return Err(ApiError::BadRequest(
            "Cannot deactivate your own account".to_string(),
        ));
    }
    state.users.set_active(id, body.is_active).await?;
    let user = state.users.base.find_by_id(id).await?;
    Ok(ok(user.into()))
}
