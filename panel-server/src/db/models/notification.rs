//! Notification model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

use shared::models::{NotificationPriority, NotificationStatus, NotificationType, SendType};

/// One delivered (or pending) notification for one recipient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Recipient user id
    pub user_id: String,
    pub kind: NotificationType,
    pub priority: NotificationPriority,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub is_email_sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_sent_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_at: Option<i64>,
    /// Requested dispatch time for scheduled sends, Unix millis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    pub status: NotificationStatus,
    /// Delivery error message for failed sends
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Mailer message id for sent emails
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    pub created_at: i64,
}

/// Dispatch request: one message fanned out to many recipients
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NotificationCreate {
    /// Recipient email addresses, resolved against active users
    #[validate(length(min = 1, message = "at least one recipient is required"))]
    pub recipients: Vec<String>,
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "message is required"))]
    pub message: String,
    #[serde(default)]
    pub kind: NotificationType,
    #[serde(default)]
    pub priority: NotificationPriority,
    #[serde(default)]
    pub send_type: SendType,
    /// Required when `send_type` is scheduled, Unix millis
    pub scheduled_at: Option<i64>,
    pub expires_at: Option<i64>,
}
