pub mod email;
pub mod push;

use std::sync::Arc;

use bson::{DateTime, oid::ObjectId};
use thiserror::Error;
use tracing::{debug, warn};
use tripdesk_db::models::{
    Booking, Notification, NotificationAction, NotificationPriority, NotificationType, SentVia,
};

use crate::dao::base::{DaoError, DaoResult};
use crate::dao::notification::NotificationDao;
use crate::dao::user::UserDao;

pub use email::{EmailMessage, EmailSender, HttpEmailClient, booking_confirmation};
pub use push::{FcmClient, PushOutcome, PushPayload, PushSender, PushStatus};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Provider rejected the message: {0}")]
    Provider(String),
}

/// A semantic event to notify a user about. Constructors render the
/// user-facing title/message/action for each event kind.
#[derive(Debug, Clone)]
pub struct NotifyEvent {
    pub user_id: ObjectId,
    pub notification_type: NotificationType,
    pub priority: NotificationPriority,
    pub category: String,
    pub title: String,
    pub message: String,
    pub action: Option<NotificationAction>,
}

impl NotifyEvent {
    pub fn booking_created(user_id: ObjectId, booking: &Booking) -> Self {
        Self {
            user_id,
            notification_type: NotificationType::Booking,
            priority: NotificationPriority::High,
            category: "booking".to_string(),
            title: format!("New booking {}", booking.booking_number),
            message: format!(
                "{} booked for {:.2} {}",
                booking.offer_name, booking.pricing.total, booking.pricing.currency
            ),
            action: Some(booking_action(booking)),
        }
    }

    pub fn booking_confirmed(user_id: ObjectId, booking: &Booking) -> Self {
        Self {
            user_id,
            notification_type: NotificationType::Success,
            priority: NotificationPriority::Normal,
            category: "booking".to_string(),
            title: format!("Booking {} confirmed", booking.booking_number),
            message: format!("{} is confirmed", booking.offer_name),
            action: Some(booking_action(booking)),
        }
    }

    pub fn booking_cancelled(user_id: ObjectId, booking: &Booking) -> Self {
        Self {
            user_id,
            notification_type: NotificationType::Warning,
            priority: NotificationPriority::Normal,
            category: "booking".to_string(),
            title: format!("Booking {} cancelled", booking.booking_number),
            message: format!("{} was cancelled", booking.offer_name),
            action: Some(booking_action(booking)),
        }
    }

    pub fn payment_received(user_id: ObjectId, booking: &Booking, amount: f64) -> Self {
        Self {
            user_id,
            notification_type: NotificationType::Payment,
            priority: NotificationPriority::Normal,
            category: "payment".to_string(),
            title: format!("Payment received for {}", booking.booking_number),
            message: format!(
                "{:.2} {} received for {}",
                amount, booking.pricing.currency, booking.offer_name
            ),
            action: Some(booking_action(booking)),
        }
    }

    pub fn system(user_id: ObjectId, title: String, message: String) -> Self {
        Self {
            user_id,
            notification_type: NotificationType::System,
            priority: NotificationPriority::Low,
            category: "system".to_string(),
            title,
            message,
            action: None,
        }
    }
}

fn booking_action(booking: &Booking) -> NotificationAction {
    NotificationAction {
        label: "View booking".to_string(),
        url: format!("/bookings/{}", booking.booking_number),
    }
}

/// Writes notification documents and fans out to push/email transports.
/// Delivery is best-effort and never blocks or fails the triggering
/// business operation.
pub struct NotificationService {
    notifications: Arc<NotificationDao>,
    users: Arc<UserDao>,
    push: Arc<dyn PushSender>,
    email: Arc<dyn EmailSender>,
    push_enabled: bool,
    email_enabled: bool,
    base_url: String,
}

impl NotificationService {
    pub fn new(
        notifications: Arc<NotificationDao>,
        users: Arc<UserDao>,
        push: Arc<dyn PushSender>,
        email: Arc<dyn EmailSender>,
        push_enabled: bool,
        email_enabled: bool,
        base_url: String,
    ) -> Self {
        Self {
            notifications,
            users,
            push,
            email,
            push_enabled,
            email_enabled,
            base_url,
        }
    }

    /// Persists the in-app notification, then (optionally) fans out to the
    /// user's push tokens in a detached task. Push failures are logged;
    /// invalid/unregistered tokens are pruned from the user's token list.
    pub async fn dispatch(&self, event: NotifyEvent, send_push: bool) -> DaoResult<Notification> {
        let push_requested = send_push && self.push_enabled;

        let notification = Notification {
            id: None,
            user_id: event.user_id,
            notification_type: event.notification_type,
            priority: event.priority,
            category: event.category,
            title: event.title.clone(),
            message: event.message.clone(),
            action: event.action.clone(),
            is_read: false,
            is_pinned: false,
            sent_via: SentVia {
                in_app: true,
                push: push_requested,
                email: false,
            },
            read_at: None,
            created_at: DateTime::now(),
        };
        let notification = self.notifications.create(&notification).await?;

        if push_requested {
            let users = Arc::clone(&self.users);
            let push = Arc::clone(&self.push);
            let payload = PushPayload {
                title: event.title,
                body: event.message,
                icon: None,
                click_action: event.action.map(|a| a.url),
                data: serde_json::json!({ "category": notification.category }),
            };
            let user_id = event.user_id;
            tokio::spawn(async move {
                if let Err(e) = fan_out_push(users, push, user_id, payload).await {
                    warn!(%user_id, error = %e, "Push fan-out failed");
                }
            });
        }

        Ok(notification)
    }

    /// Synchronous best-effort confirmation email. A send failure is
    /// logged and the booking proceeds regardless.
    pub async fn send_booking_confirmation(&self, booking: &Booking) {
        if !self.email_enabled {
            return;
        }
        let message = booking_confirmation(booking, &self.base_url);
        match self.email.send(&message).await {
            Ok(()) => debug!(booking = %booking.booking_number, "Confirmation email sent"),
            Err(e) => warn!(
                booking = %booking.booking_number,
                error = %e,
                "Confirmation email failed"
            ),
        }
    }
}

/// Deliver to every token of the user, then prune the ones the provider
/// reported as invalid or unregistered.
async fn fan_out_push(
    users: Arc<UserDao>,
    push: Arc<dyn PushSender>,
    user_id: ObjectId,
    payload: PushPayload,
) -> Result<(), DaoError> {
    let user = users.base.find_by_id(user_id).await?;
    if user.fcm_tokens.is_empty() {
        return Ok(());
    }

    let outcomes = match push.send(&user.fcm_tokens, &payload).await {
        Ok(outcomes) => outcomes,
        Err(e) => {
            warn!(%user_id, error = %e, "Push send failed");
            return Ok(());
        }
    };

    let mut stale = Vec::new();
    for outcome in outcomes {
        match outcome.status {
            PushStatus::Delivered => {}
            PushStatus::InvalidToken => stale.push(outcome.token),
            PushStatus::Failed(reason) => {
                warn!(%user_id, token = %outcome.token, %reason, "Push delivery failed");
            }
        }
    }

    if !stale.is_empty() {
        debug!(%user_id, count = stale.len(), "Pruning stale push tokens");
        users.remove_fcm_tokens(user_id, &stale).await?;
    }

    Ok(())
}
