//! Booking Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::BookingStatus;
use surrealdb::RecordId;
use validator::Validate;

/// Booking ID type
pub type BookingId = RecordId;

/// Booking model matching SurrealDB schema
///
/// The booked window is embedded (date/start/end) rather than referencing
/// a slot document; availability treats any pending or confirmed booking
/// as occupying its window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<BookingId>,
    /// Human-readable reference, e.g. "PLZ-7K2M9QDX"
    pub reference: String,
    #[serde(with = "serde_helpers::record_id")]
    pub listing: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub tenant: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub customer: RecordId,
    /// Denormalized for dashboards and notifications
    pub listing_name: String,
    pub date: String,
    pub start: String,
    pub end: String,
    #[serde(default = "default_guests")]
    pub guests: u32,
    pub base_amount: f64,
    #[serde(default)]
    pub discount_amount: f64,
    pub total_amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub coupon_code: Option<String>,
    pub status: BookingStatus,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

fn default_guests() -> u32 {
    1
}

fn default_currency() -> String {
    "EUR".to_string()
}

/// Create booking payload (customer API)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BookingCreate {
    pub listing_id: String,
    /// Calendar date `YYYY-MM-DD`
    pub date: String,
    /// Window start `HH:MM`; must land on the listing's slot grid
    pub start: String,
    #[validate(range(min = 1, max = 1000))]
    pub guests: Option<u32>,
    pub coupon_code: Option<String>,
    pub note: Option<String>,
}

/// Status transition payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingStatusUpdate {
    pub status: BookingStatus,
    pub note: Option<String>,
}
