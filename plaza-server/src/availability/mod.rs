//! Availability Module
//!
//! Generates bookable time windows for a listing from its weekly
//! operating hours, overlaying occupying bookings and blocked slots.

mod generator;

pub use generator::*;
