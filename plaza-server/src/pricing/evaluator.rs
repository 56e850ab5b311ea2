//! Coupon evaluator
//!
//! Logic for turning a coupon and an order amount into a discount.
//! Uses rust_decimal for the arithmetic, stores as f64.
//!
//! Check order: active flag, validity window, usage caps, minimum order,
//! then the discount itself. The discount is clamped twice: by
//! `max_discount_amount` (percentage coupons) and by the order amount
//! (a discount can never exceed what is being paid).

use rust_decimal::prelude::*;

use crate::db::models::Coupon;
use shared::DiscountType;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
#[inline]
fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Why a coupon did not apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CouponRejection {
    Inactive,
    NotStarted,
    Expired,
    UsageLimitReached,
    PerUserLimitReached,
    MinOrderNotMet { required: String },
}

impl CouponRejection {
    /// Customer-facing message
    pub fn message(&self) -> String {
        match self {
            CouponRejection::Inactive => "This coupon is no longer active".to_string(),
            CouponRejection::NotStarted => "This coupon is not valid yet".to_string(),
            CouponRejection::Expired => "This coupon has expired".to_string(),
            CouponRejection::UsageLimitReached => {
                "This coupon has reached its usage limit".to_string()
            }
            CouponRejection::PerUserLimitReached => {
                "You have already used this coupon".to_string()
            }
            CouponRejection::MinOrderNotMet { required } => {
                format!("Order must be at least {} to use this coupon", required)
            }
        }
    }
}

/// Applied discount result
#[derive(Debug, Clone, PartialEq)]
pub struct CouponDiscount {
    pub discount_amount: f64,
    pub total_amount: f64,
}

/// Evaluate a coupon against an order amount.
///
/// `prior_user_uses` is the caller's prior redemption count for this
/// code (per-user cap); `now_ms` the evaluation instant.
pub fn evaluate(
    coupon: &Coupon,
    order_amount: f64,
    prior_user_uses: u32,
    now_ms: i64,
) -> Result<CouponDiscount, CouponRejection> {
    if !coupon.is_active {
        return Err(CouponRejection::Inactive);
    }

    if now_ms < coupon.valid_from {
        return Err(CouponRejection::NotStarted);
    }
    if now_ms > coupon.valid_until {
        return Err(CouponRejection::Expired);
    }

    if let Some(limit) = coupon.usage_limit
        && coupon.used_count >= limit
    {
        return Err(CouponRejection::UsageLimitReached);
    }
    if let Some(limit) = coupon.per_user_limit
        && prior_user_uses >= limit
    {
        return Err(CouponRejection::PerUserLimitReached);
    }

    let amount = to_decimal(order_amount);

    if let Some(min_order) = coupon.min_order_amount
        && amount < to_decimal(min_order)
    {
        return Err(CouponRejection::MinOrderNotMet {
            required: format!("{:.2}", min_order),
        });
    }

    let raw_discount = match coupon.discount_type {
        DiscountType::Percentage => {
            let mut discount = amount * to_decimal(coupon.value) / Decimal::ONE_HUNDRED;
            if let Some(ceiling) = coupon.max_discount_amount {
                discount = discount.min(to_decimal(ceiling));
            }
            discount
        }
        DiscountType::FixedAmount => to_decimal(coupon.value),
    };

    // Never discount more than the order itself, never below zero
    let discount = raw_discount.min(amount).max(Decimal::ZERO);
    let total = amount - discount;

    Ok(CouponDiscount {
        discount_amount: to_f64(discount),
        total_amount: to_f64(total),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::record_id;

    const HOUR_MS: i64 = 3_600_000;

    fn make_coupon(discount_type: DiscountType, value: f64) -> Coupon {
        Coupon {
            id: None,
            tenant: record_id("tenant", "t1"),
            code: "SUMMER20".to_string(),
            description: None,
            discount_type,
            value,
            min_order_amount: None,
            max_discount_amount: None,
            valid_from: 0,
            valid_until: 100 * HOUR_MS,
            usage_limit: None,
            per_user_limit: None,
            used_count: 0,
            is_active: true,
            created_at: 0,
        }
    }

    #[test]
    fn test_percentage_discount() {
        let coupon = make_coupon(DiscountType::Percentage, 20.0);
        let result = evaluate(&coupon, 150.0, 0, HOUR_MS).unwrap();
        assert_eq!(result.discount_amount, 30.0);
        assert_eq!(result.total_amount, 120.0);
    }

    #[test]
    fn test_percentage_clamped_by_max_discount() {
        let mut coupon = make_coupon(DiscountType::Percentage, 50.0);
        coupon.max_discount_amount = Some(25.0);
        let result = evaluate(&coupon, 200.0, 0, HOUR_MS).unwrap();
        // 50% of 200 = 100, clamped to the 25 ceiling
        assert_eq!(result.discount_amount, 25.0);
        assert_eq!(result.total_amount, 175.0);
    }

    #[test]
    fn test_flat_discount_never_exceeds_order() {
        let coupon = make_coupon(DiscountType::FixedAmount, 80.0);
        let result = evaluate(&coupon, 50.0, 0, HOUR_MS).unwrap();
        assert_eq!(result.discount_amount, 50.0);
        assert_eq!(result.total_amount, 0.0);
    }

    #[test]
    fn test_rejects_outside_validity_window() {
        let coupon = make_coupon(DiscountType::Percentage, 10.0);
        assert_eq!(
            evaluate(&coupon, 100.0, 0, -1),
            Err(CouponRejection::NotStarted)
        );
        assert_eq!(
            evaluate(&coupon, 100.0, 0, 101 * HOUR_MS),
            Err(CouponRejection::Expired)
        );
        // Boundary instants are inside the window
        assert!(evaluate(&coupon, 100.0, 0, 0).is_ok());
        assert!(evaluate(&coupon, 100.0, 0, 100 * HOUR_MS).is_ok());
    }

    #[test]
    fn test_rejects_inactive() {
        let mut coupon = make_coupon(DiscountType::Percentage, 10.0);
        coupon.is_active = false;
        assert_eq!(
            evaluate(&coupon, 100.0, 0, HOUR_MS),
            Err(CouponRejection::Inactive)
        );
    }

    #[test]
    fn test_rejects_when_usage_limit_reached() {
        let mut coupon = make_coupon(DiscountType::Percentage, 10.0);
        coupon.usage_limit = Some(5);
        coupon.used_count = 5;
        assert_eq!(
            evaluate(&coupon, 100.0, 0, HOUR_MS),
            Err(CouponRejection::UsageLimitReached)
        );
    }

    #[test]
    fn test_rejects_when_per_user_limit_reached() {
        let mut coupon = make_coupon(DiscountType::Percentage, 10.0);
        coupon.per_user_limit = Some(1);
        assert_eq!(
            evaluate(&coupon, 100.0, 1, HOUR_MS),
            Err(CouponRejection::PerUserLimitReached)
        );
        assert!(evaluate(&coupon, 100.0, 0, HOUR_MS).is_ok());
    }

    #[test]
    fn test_rejects_below_min_order() {
        let mut coupon = make_coupon(DiscountType::FixedAmount, 10.0);
        coupon.min_order_amount = Some(60.0);
        assert!(matches!(
            evaluate(&coupon, 59.99, 0, HOUR_MS),
            Err(CouponRejection::MinOrderNotMet { .. })
        ));
        assert!(evaluate(&coupon, 60.0, 0, HOUR_MS).is_ok());
    }

    #[test]
    fn test_rounding_half_up() {
        // 15% of 33.33 = 4.9995 -> 5.00
        let coupon = make_coupon(DiscountType::Percentage, 15.0);
        let result = evaluate(&coupon, 33.33, 0, HOUR_MS).unwrap();
        assert_eq!(result.discount_amount, 5.0);
        assert_eq!(result.total_amount, 28.33);
    }

    #[test]
    fn test_discount_never_exceeds_max_even_at_scale() {
        let mut coupon = make_coupon(DiscountType::Percentage, 90.0);
        coupon.max_discount_amount = Some(40.0);
        for amount in [1.0_f64, 44.44, 100.0, 9_999.99] {
            let result = evaluate(&coupon, amount, 0, HOUR_MS).unwrap();
            assert!(result.discount_amount <= 40.0);
            assert!(result.discount_amount <= amount);
        }
    }
}
