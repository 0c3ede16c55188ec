use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub notification_type: NotificationType,
    #[serde(default)]
    pub priority: NotificationPriority,
    pub category: String,
    pub title: String,
    pub message: String,
    pub action: Option<NotificationAction>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default)]
    pub sent_via: SentVia,
    pub read_at: Option<DateTime>,
    pub created_at: DateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Info,
    Success,
    Warning,
    Error,
    Booking,
    Payment,
    System,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPriority {
    Low,
    #[default]
    Normal,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationAction {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SentVia {
    #[serde(default)]
    pub in_app: bool,
    #[serde(default)]
    pub push: bool,
    #[serde(default)]
    pub email: bool,
}

impl Notification {
    pub const COLLECTION: &'static str = "notifications";
}
