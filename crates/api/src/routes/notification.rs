use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tripdesk_db::models::{
    Notification, NotificationAction, NotificationPriority, NotificationType, SentVia,
};
use tripdesk_services::dao::base::PaginationParams;

use crate::routes::offer::parse_id;
use crate::{
    error::ApiError,
    extractors::auth::AuthUser,
    response::{ApiResponse, PagedResponse, ok, paged},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub id: String,
    pub notification_type: NotificationType,
    pub priority: NotificationPriority,
    pub category: String,
    pub title: String,
    pub message: String,
    pub action: Option<NotificationAction>,
    pub is_read: bool,
    pub is_pinned: bool,
    pub sent_via: SentVia,
    pub read_at: Option<String>,
    pub created_at: String,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id.map(|id| id.to_hex()).unwrap_or_default(),
            notification_type: notification.notification_type,
            priority: notification.priority,
            category: notification.category,
            title: notification.title,
            message: notification.message,
            action: notification.action,
            is_read: notification.is_read,
            is_pinned: notification.is_pinned,
            sent_via: notification.sent_via,
            read_at: notification
                .read_at
                .and_then(|at| at.try_to_rfc3339_string().ok()),
            created_at: notification
                .created_at
                .try_to_rfc3339_string()
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListNotificationsQuery {
    #[serde(default)]
    pub unread_only: bool,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Users only ever see their own notifications.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListNotificationsQuery>,
) -> Result<Json<PagedResponse<NotificationResponse>>, ApiError> {
    let result = state
        .notifications
        .list_for_user(auth.user_id, query.unread_only, &query.pagination)
        .await?;
    Ok(paged(result.map(NotificationResponse::from)))
}

#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub unread: u64,
}

pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UnreadCountResponse>>, ApiError> {
    let unread = state.notifications.unread_count(auth.user_id).await?;
    Ok(ok(UnreadCountResponse { unread }))
}

pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(notification_id): Path<String>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    let id = parse_id(&notification_id)?;
    let updated = state.notifications.mark_read(auth.user_id, id).await?;
    if !updated {
        return Err(ApiError::NotFound("Notification not found".to_string()));
    }
    Ok(ok(true))
}

#[derive(Debug, Serialize)]
pub struct MarkAllReadResponse {
    pub updated: u64,
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<MarkAllReadResponse>>, ApiError> {
    let updated = state.notifications.mark_all_read(auth.user_id).await?;
    Ok(ok(MarkAllReadResponse { updated }))
}

pub async fn toggle_pin(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(notification_id): Path<String>,
) -> Result<Json<ApiResponse<NotificationResponse>>, ApiError> {
    let id = parse_id(&notification_id)?;
    let notification = state.notifications.toggle_pin(auth.user_id, id).await?;
    Ok(ok(notification.into()))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(notification_id): Path<String>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    let id = parse_id(&notification_id)?;
    state.notifications.delete(auth.user_id, id).await?;
    Ok(ok(true))
}
