//! Common enums shared between server and clients
//!
//! Serialized as snake_case strings both in the database documents and on
//! the wire, so the same values appear in API payloads and stored records.

use serde::{Deserialize, Serialize};

/// Tenant account lifecycle
///
/// New tenants register as `Pending` and must be approved from the
/// platform console before their listings become bookable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TenantStatus {
    Pending,
    Approved,
    Suspended,
}

impl TenantStatus {
    /// Valid console transitions: pending -> approved/suspended,
    /// approved <-> suspended. No transition out is ever final.
    pub fn can_transition_to(self, next: TenantStatus) -> bool {
        self != next
    }
}

/// Platform roles
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Platform operator (super-admin console)
    Admin,
    /// Tenant dashboard user
    TenantAdmin,
    /// Booking customer
    Customer,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::TenantAdmin => "tenant_admin",
            UserRole::Customer => "customer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(UserRole::Admin),
            "tenant_admin" => Some(UserRole::TenantAdmin),
            "customer" => Some(UserRole::Customer),
            _ => None,
        }
    }
}

/// Listing categories supported by the marketplace
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ListingCategory {
    Turf,
    Hotel,
    Gym,
    Wellness,
    Event,
}

/// Booking lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl BookingStatus {
    /// Whether a booking in this status still occupies its time window
    pub fn occupies_slot(self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    /// Terminal statuses accept no further transitions
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            BookingStatus::Completed | BookingStatus::Cancelled | BookingStatus::NoShow
        )
    }

    /// Allowed status transitions
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        match self {
            BookingStatus::Pending => {
                matches!(next, BookingStatus::Confirmed | BookingStatus::Cancelled)
            }
            BookingStatus::Confirmed => matches!(
                next,
                BookingStatus::Completed | BookingStatus::Cancelled | BookingStatus::NoShow
            ),
            _ => false,
        }
    }
}

/// Coupon discount type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    Percentage,
    FixedAmount,
}

/// Notification delivery channel
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NotificationChannel {
    Email,
    Sms,
    Push,
}

impl NotificationChannel {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationChannel::Email => "email",
            NotificationChannel::Sms => "sms",
            NotificationChannel::Push => "push",
        }
    }
}

/// Notification delivery status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    Pending,
    Sent,
    Failed,
}

/// Events that trigger notification fan-out
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NotificationEvent {
    BookingCreated,
    BookingConfirmed,
    BookingCancelled,
    TenantApproved,
    TenantSuspended,
}

impl NotificationEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationEvent::BookingCreated => "booking_created",
            NotificationEvent::BookingConfirmed => "booking_confirmed",
            NotificationEvent::BookingCancelled => "booking_cancelled",
            NotificationEvent::TenantApproved => "tenant_approved",
            NotificationEvent::TenantSuspended => "tenant_suspended",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_booking_transitions() {
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Confirmed));
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Cancelled));
        assert!(!BookingStatus::Pending.can_transition_to(BookingStatus::Completed));
        assert!(!BookingStatus::Pending.can_transition_to(BookingStatus::NoShow));
    }

    #[test]
    fn test_confirmed_booking_transitions() {
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::Completed));
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::Cancelled));
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::NoShow));
        assert!(!BookingStatus::Confirmed.can_transition_to(BookingStatus::Pending));
    }

    #[test]
    fn test_terminal_statuses_are_frozen() {
        for terminal in [
            BookingStatus::Completed,
            BookingStatus::Cancelled,
            BookingStatus::NoShow,
        ] {
            assert!(terminal.is_terminal());
            for next in [
                BookingStatus::Pending,
                BookingStatus::Confirmed,
                BookingStatus::Completed,
                BookingStatus::Cancelled,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_slot_occupancy() {
        assert!(BookingStatus::Pending.occupies_slot());
        assert!(BookingStatus::Confirmed.occupies_slot());
        assert!(!BookingStatus::Cancelled.occupies_slot());
        assert!(!BookingStatus::Completed.occupies_slot());
    }

    #[test]
    fn test_role_round_trip() {
        for role in [UserRole::Admin, UserRole::TenantAdmin, UserRole::Customer] {
            assert_eq!(UserRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::parse("manager"), None);
    }

    #[test]
    fn test_enums_serialize_as_snake_case() {
        // Stored documents and API payloads share these exact strings
        assert_eq!(
            serde_json::to_string(&BookingStatus::NoShow).unwrap(),
            "\"no_show\""
        );
        assert_eq!(
            serde_json::to_string(&TenantStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&DiscountType::FixedAmount).unwrap(),
            "\"fixed_amount\""
        );
        assert_eq!(
            serde_json::to_string(&NotificationEvent::BookingCreated).unwrap(),
            "\"booking_created\""
        );
        let status: BookingStatus = serde_json::from_str("\"confirmed\"").unwrap();
        assert_eq!(status, BookingStatus::Confirmed);
    }
}
