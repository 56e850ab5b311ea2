//! Listing Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::ListingCategory;
use surrealdb::RecordId;
use validator::Validate;

/// Listing ID type
pub type ListingId = RecordId;

/// Operating hours for one weekday (0 = Sunday .. 6 = Saturday).
///
/// A weekday without an entry is closed. `open`/`close` are wall-clock
/// `HH:MM` strings in the listing's timezone; close must be after open
/// (overnight ranges are rejected at validation).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayHours {
    pub day: u8,
    pub open: String,
    pub close: String,
}

/// Listing model matching SurrealDB schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ListingId>,
    #[serde(with = "serde_helpers::record_id")]
    pub tenant: RecordId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: ListingCategory,
    pub city: String,
    #[serde(default)]
    pub address: Option<String>,
    /// Price of one slot window, in `currency`
    pub price_per_slot: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Concurrent bookings one window can hold (court count, room count)
    #[serde(default = "default_capacity")]
    pub capacity: u32,
    #[serde(default = "default_slot_duration")]
    pub slot_duration_minutes: u32,
    #[serde(default)]
    pub operating_hours: Vec<DayHours>,
    /// IANA timezone name the operating hours are expressed in
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub amenities: Vec<String>,
    /// Photo URLs (upload handling is out of scope; strings only)
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
    /// Platform moderation flag; unapproved listings are not bookable
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_approved: bool,
    #[serde(default)]
    pub created_at: i64,
}

fn default_currency() -> String {
    "EUR".to_string()
}

fn default_capacity() -> u32 {
    1
}

fn default_slot_duration() -> u32 {
    60
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_true() -> bool {
    true
}

/// Create listing payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ListingCreate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    pub category: ListingCategory,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    pub address: Option<String>,
    #[validate(range(min = 0.0))]
    pub price_per_slot: f64,
    pub currency: Option<String>,
    #[validate(range(min = 1, max = 10000))]
    pub capacity: Option<u32>,
    #[validate(range(min = 5, max = 480))]
    pub slot_duration_minutes: Option<u32>,
    pub operating_hours: Vec<DayHours>,
    pub timezone: Option<String>,
    pub amenities: Option<Vec<String>>,
    pub photos: Option<Vec<String>>,
}

/// Update listing payload (all optional)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ListingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ListingCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100))]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub price_per_slot: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 10000))]
    pub capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 5, max = 480))]
    pub slot_duration_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_hours: Option<Vec<DayHours>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amenities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Moderation payload (platform console)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingApprovalUpdate {
    pub is_approved: bool,
}
