//! Slot Model
//!
//! Persisted slot records represent tenant-blocked windows (maintenance
//! holds). Bookable windows themselves are generated on demand by the
//! availability module and are not stored.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Slot ID type
pub type SlotId = RecordId;

/// Blocked slot record matching SurrealDB schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<SlotId>,
    #[serde(with = "serde_helpers::record_id")]
    pub listing: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub tenant: RecordId,
    /// Calendar date `YYYY-MM-DD` in the listing's timezone
    pub date: String,
    /// Window start `HH:MM`
    pub start: String,
    /// Window end `HH:MM` (exclusive)
    pub end: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub created_by: Option<RecordId>,
    #[serde(default)]
    pub created_at: i64,
}

/// Block window payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotBlockCreate {
    pub date: String,
    pub start: String,
    pub end: String,
    pub reason: Option<String>,
}
