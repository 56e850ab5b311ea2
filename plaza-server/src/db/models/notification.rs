//! Notification Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::{NotificationChannel, NotificationEvent, NotificationStatus};
use surrealdb::RecordId;

/// Notification ID type
pub type NotificationId = RecordId;

/// Notification record matching SurrealDB schema
///
/// One record per (recipient, channel) delivery; subject/body are stored
/// already rendered so the in-app feed and the dispatch worker read the
/// same text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<NotificationId>,
    #[serde(with = "serde_helpers::record_id")]
    pub recipient: RecordId,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub tenant: Option<RecordId>,
    pub event: NotificationEvent,
    pub channel: NotificationChannel,
    pub subject: String,
    pub body: String,
    pub status: NotificationStatus,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub sent_at: Option<i64>,
    /// Last delivery error, for failed notifications
    #[serde(default)]
    pub error: Option<String>,
}
