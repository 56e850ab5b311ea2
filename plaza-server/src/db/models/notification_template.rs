//! Notification Template Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::{NotificationChannel, NotificationEvent};
use surrealdb::RecordId;
use validator::Validate;

/// Template ID type
pub type NotificationTemplateId = RecordId;

/// Notification template matching SurrealDB schema
///
/// Keyed by (event, channel). A record with `tenant` set overrides the
/// platform default (tenant = none) for that tenant's notifications;
/// built-in fallback text is used when neither exists. Bodies use
/// `{{placeholder}}` substitution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationTemplate {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<NotificationTemplateId>,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub tenant: Option<RecordId>,
    pub event: NotificationEvent,
    pub channel: NotificationChannel,
    pub subject: String,
    pub body: String,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: i64,
}

fn default_true() -> bool {
    true
}

/// Create template payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NotificationTemplateCreate {
    pub event: NotificationEvent,
    pub channel: NotificationChannel,
    #[validate(length(min = 1, max = 200))]
    pub subject: String,
    #[validate(length(min = 1, max = 4000))]
    pub body: String,
}

/// Update template payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NotificationTemplateUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200))]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 4000))]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
