//! Coupon Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::DiscountType;
use surrealdb::RecordId;
use validator::Validate;

/// Coupon ID type
pub type CouponId = RecordId;

/// Coupon entity matching SurrealDB schema
///
/// Codes are stored uppercase and are unique per tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<CouponId>,
    #[serde(with = "serde_helpers::record_id")]
    pub tenant: RecordId,
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    pub discount_type: DiscountType,
    /// Percentage (30 = 30%) or fixed amount in listing currency
    pub value: f64,
    #[serde(default)]
    pub min_order_amount: Option<f64>,
    /// Ceiling for percentage discounts
    #[serde(default)]
    pub max_discount_amount: Option<f64>,
    /// Validity window, milliseconds since epoch
    pub valid_from: i64,
    pub valid_until: i64,
    /// Total redemption cap across all users
    #[serde(default)]
    pub usage_limit: Option<u32>,
    #[serde(default)]
    pub per_user_limit: Option<u32>,
    #[serde(default)]
    pub used_count: u32,
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

/// Create coupon payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CouponCreate {
    #[validate(length(min = 3, max = 32))]
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    #[validate(range(min = 0.01))]
    pub value: f64,
    pub min_order_amount: Option<f64>,
    pub max_discount_amount: Option<f64>,
    pub valid_from: i64,
    pub valid_until: i64,
    pub usage_limit: Option<u32>,
    pub per_user_limit: Option<u32>,
}

/// Update coupon payload (all optional)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CouponUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_type: Option<DiscountType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.01))]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_order_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_discount_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_user_limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Validate-coupon request (public preview endpoint)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponValidateRequest {
    pub listing_id: String,
    pub code: String,
    pub order_amount: f64,
}

/// Validate-coupon response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponValidateResponse {
    pub valid: bool,
    pub discount_amount: f64,
    pub total_amount: f64,
    /// Rejection reason when invalid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
