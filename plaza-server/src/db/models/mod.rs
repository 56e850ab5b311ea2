//! Database Models

// Serde helpers
pub mod serde_helpers;

// Accounts
pub mod tenant;
pub mod user;

// Inventory
pub mod listing;
pub mod slot;

// Bookings
pub mod booking;
pub mod coupon;

// Notifications
pub mod notification;
pub mod notification_template;

// Re-exports
pub use tenant::{Tenant, TenantId, TenantStatusUpdate};
pub use user::{User, UserCreate, UserId};
pub use listing::{
    DayHours, Listing, ListingApprovalUpdate, ListingCreate, ListingId, ListingUpdate,
};
pub use slot::{Slot, SlotBlockCreate, SlotId};
pub use booking::{Booking, BookingCreate, BookingId, BookingStatusUpdate};
pub use coupon::{
    Coupon, CouponCreate, CouponId, CouponUpdate, CouponValidateRequest, CouponValidateResponse,
};
pub use notification::{Notification, NotificationId};
pub use notification_template::{
    NotificationTemplate, NotificationTemplateCreate, NotificationTemplateId,
    NotificationTemplateUpdate,
};
