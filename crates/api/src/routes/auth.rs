use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tripdesk_db::models::{Role, User};
use validator::Validate;

use crate::{
    error::ApiError,
    extractors::auth::AuthUser,
    response::{ApiResponse, ok},
    state::AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub full_name: String,
    #[validate(length(min = 8))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub is_active: bool,
    pub fcm_tokens: Vec<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            is_active: user.is_active,
            fcm_tokens: user.fcm_tokens,
        }
    }
}

/// The first registered user becomes the super admin; everyone after
/// starts as a viewer until an admin assigns a role.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), ApiError> {
    body.validate()?;

    let role = if state.users.count_all().await? == 0 {
        Role::SuperAdmin
    } else {
        Role::Viewer
    };

    let password_hash = state.auth.hash_password(&body.password)?;
    let user = state
        .users
        .create(body.email, body.full_name, password_hash, role)
        .await?;

    let user_id = user.id.ok_or_else(|| ApiError::Internal("Missing id".to_string()))?;
    let tokens = state.auth.generate_tokens(user_id, &user.email, user.role)?;

    let response = ok(AuthResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        expires_in: tokens.expires_in,
        user: user.into(),
    });
    Ok((StatusCode::CREATED, response))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    let user = state
        .users
        .find_by_email(&body.email)
        .await
        .map_err(|_| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    if !user.is_active {
        return Err(ApiError::Forbidden("Account is deactivated".to_string()));
    }

    let hash = user
        .password_hash
        .as_deref()
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;
    if !state.auth.verify_password(&body.password, hash)? {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let user_id = user.id.ok_or_else(|| ApiError::Internal("Missing id".to_string()))?;
    let tokens = state.auth.generate_tokens(user_id, &user.email, user.role)?;

    Ok(ok(AuthResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        expires_in: tokens.expires_in,
        user: user.into(),
    }))
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    let claims = state.auth.verify_refresh_token(&body.refresh_token)?;
    let user_id = bson::oid::ObjectId::parse_str(&claims.sub)
        .map_err(|_| ApiError::Unauthorized("Invalid user ID in token".to_string()))?;

    // Re-read the user so a role change or deactivation takes effect
    let user = state.users.base.find_by_id(user_id).await?;
    if !user.is_active {
        return Err(ApiError::Forbidden("Account is deactivated".to_string()));
    }

    let tokens = state.auth.generate_tokens(user_id, &user.email, user.role)?;
    Ok(ok(AuthResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        expires_in: tokens.expires_in,
        user: user.into(),
    }))
}

pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = state.users.base.find_by_id(auth.user_id).await?;
    Ok(ok(user.into()))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
}

pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    state
        .users
        .update_profile(auth.user_id, body.full_name, body.phone, body.avatar)
        .await?;
    let user = state.users.base.find_by_id(auth.user_id).await?;
    Ok(ok(user.into()))
}

#[derive(Debug, Deserialize)]
pub struct FcmTokenRequest {
    pub token: String,
}

/// Device opt-in: register a push token for the current user.
pub async fn add_fcm_token(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<FcmTokenRequest>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    if body.token.is_empty() {
        return Err(ApiError::BadRequest("Token must not be empty".to_string()));
    }
    let added = state.users.add_fcm_token(auth.user_id, &body.token).await?;
    Ok(ok(added))
}

pub async fn remove_fcm_token(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<FcmTokenRequest>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    let removed = state
        .users
        .remove_fcm_tokens(auth.user_id, &[body.token])
        .await?;
    Ok(ok(removed))
}
