//! API route modules
//!
//! # Structure
//!
//! - [`health`] - health checks
//! - [`auth`] - login and registration
//! - [`tenants`] - platform console (tenant moderation, overview)
//! - [`listings`] - public browse + tenant listing management
//! - [`slots`] - blocked-window management
//! - [`bookings`] - booking flow and status transitions
//! - [`coupons`] - coupon management + public validation
//! - [`notifications`] - per-user notification feed
//! - [`templates`] - notification template overrides

pub mod auth;
pub mod health;

pub mod bookings;
pub mod coupons;
pub mod listings;
pub mod notifications;
pub mod slots;
pub mod templates;
pub mod tenants;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};
