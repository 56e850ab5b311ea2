//! Slot window generation
//!
//! Windows are laid out on a fixed grid: consecutive
//! `slot_duration_minutes` windows starting at the weekday's opening
//! time. A trailing partial window is not emitted. A window counts as
//! unavailable when occupying bookings reach the listing's capacity or a
//! blocked slot record overlaps it.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::db::models::{Booking, DayHours, Listing, Slot};
use crate::utils::time::{format_minutes, minutes_of_day, weekday_index};

/// Generation errors (bad stored data; listing validation prevents these
/// for records created through the API)
#[derive(Debug, Error)]
pub enum AvailabilityError {
    #[error("Invalid operating hours: {0}")]
    InvalidHours(String),

    #[error("Invalid slot duration: {0}")]
    InvalidDuration(u32),
}

impl From<AvailabilityError> for crate::utils::AppError {
    fn from(err: AvailabilityError) -> Self {
        crate::utils::AppError::validation(err.to_string())
    }
}

/// One generated window of a listing's daily grid
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SlotWindow {
    /// Window start `HH:MM`
    pub start: String,
    /// Window end `HH:MM` (exclusive)
    pub end: String,
    pub available: bool,
    /// Bookings the window can still accept
    pub remaining_capacity: u32,
}

/// Half-open interval overlap: `[a_start, a_end)` vs `[b_start, b_end)`.
/// Back-to-back windows (a_end == b_start) do not overlap.
pub fn overlaps(a_start: u32, a_end: u32, b_start: u32, b_end: u32) -> bool {
    a_start < b_end && b_start < a_end
}

/// Validate a listing's weekly hours against its slot duration.
///
/// Called from the listing handlers on create/update so that generation
/// never sees malformed data.
pub fn validate_operating_hours(
    hours: &[DayHours],
    slot_duration_minutes: u32,
) -> Result<(), AvailabilityError> {
    if slot_duration_minutes == 0 || slot_duration_minutes > 24 * 60 {
        return Err(AvailabilityError::InvalidDuration(slot_duration_minutes));
    }

    let mut seen_days = [false; 7];
    for entry in hours {
        if entry.day > 6 {
            return Err(AvailabilityError::InvalidHours(format!(
                "day {} out of range (0-6)",
                entry.day
            )));
        }
        if seen_days[entry.day as usize] {
            return Err(AvailabilityError::InvalidHours(format!(
                "duplicate entry for day {}",
                entry.day
            )));
        }
        seen_days[entry.day as usize] = true;

        let open = minutes_of_day(&entry.open).ok_or_else(|| {
            AvailabilityError::InvalidHours(format!("bad open time '{}'", entry.open))
        })?;
        let close = minutes_of_day(&entry.close).ok_or_else(|| {
            AvailabilityError::InvalidHours(format!("bad close time '{}'", entry.close))
        })?;

        // Overnight ranges are rejected rather than mis-generated
        if close <= open {
            return Err(AvailabilityError::InvalidHours(format!(
                "close {} must be after open {}",
                entry.close, entry.open
            )));
        }
        if close - open < slot_duration_minutes {
            return Err(AvailabilityError::InvalidHours(format!(
                "day {} is shorter than one slot",
                entry.day
            )));
        }
    }
    Ok(())
}

/// Operating range for `date`, or `None` when the weekday is closed
fn day_range(listing: &Listing, date: NaiveDate) -> Result<Option<(u32, u32)>, AvailabilityError> {
    let day = weekday_index(date);
    let Some(entry) = listing.operating_hours.iter().find(|h| h.day == day) else {
        return Ok(None);
    };

    let open = minutes_of_day(&entry.open).ok_or_else(|| {
        AvailabilityError::InvalidHours(format!("bad open time '{}'", entry.open))
    })?;
    let close = minutes_of_day(&entry.close).ok_or_else(|| {
        AvailabilityError::InvalidHours(format!("bad close time '{}'", entry.close))
    })?;
    if close <= open {
        return Err(AvailabilityError::InvalidHours(format!(
            "close {} must be after open {}",
            entry.close, entry.open
        )));
    }
    Ok(Some((open, close)))
}

/// Generate the full window list for `listing` on `date`.
///
/// `bookings` must be the occupying (pending/confirmed) bookings for that
/// listing and date; `blocked` the slot records for the same date.
pub fn generate(
    listing: &Listing,
    date: NaiveDate,
    bookings: &[Booking],
    blocked: &[Slot],
) -> Result<Vec<SlotWindow>, AvailabilityError> {
    let duration = listing.slot_duration_minutes;
    if duration == 0 {
        return Err(AvailabilityError::InvalidDuration(duration));
    }

    let Some((open, close)) = day_range(listing, date)? else {
        return Ok(vec![]);
    };

    // Pre-parse occupying intervals; unparseable stored rows are skipped
    let booked: Vec<(u32, u32)> = bookings
        .iter()
        .filter_map(|b| Some((minutes_of_day(&b.start)?, minutes_of_day(&b.end)?)))
        .collect();
    let holds: Vec<(u32, u32)> = blocked
        .iter()
        .filter_map(|s| Some((minutes_of_day(&s.start)?, minutes_of_day(&s.end)?)))
        .collect();

    let mut windows = Vec::new();
    let mut start = open;
    while start + duration <= close {
        let end = start + duration;

        let occupied = booked
            .iter()
            .filter(|(b_start, b_end)| overlaps(start, end, *b_start, *b_end))
            .count() as u32;
        let is_blocked = holds
            .iter()
            .any(|(h_start, h_end)| overlaps(start, end, *h_start, *h_end));

        let remaining = listing.capacity.saturating_sub(occupied);
        windows.push(SlotWindow {
            start: format_minutes(start),
            end: format_minutes(end),
            available: !is_blocked && remaining > 0,
            remaining_capacity: if is_blocked { 0 } else { remaining },
        });

        start = end;
    }

    Ok(windows)
}

/// Look up a generated window by its start time
pub fn find_window<'a>(windows: &'a [SlotWindow], start: &str) -> Option<&'a SlotWindow> {
    windows.iter().find(|w| w.start == start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::record_id;
    use shared::BookingStatus;

    fn make_listing(capacity: u32, duration: u32, hours: Vec<DayHours>) -> Listing {
        Listing {
            id: None,
            tenant: record_id("tenant", "t1"),
            name: "Center Court".to_string(),
            description: None,
            category: shared::ListingCategory::Turf,
            city: "Porto".to_string(),
            address: None,
            price_per_slot: 40.0,
            currency: "EUR".to_string(),
            capacity,
            slot_duration_minutes: duration,
            operating_hours: hours,
            timezone: "UTC".to_string(),
            amenities: vec![],
            photos: vec![],
            is_active: true,
            is_approved: true,
            created_at: 0,
        }
    }

    fn make_booking(start: &str, end: &str) -> Booking {
        Booking {
            id: None,
            reference: "PLZ-TEST".to_string(),
            listing: record_id("listing", "l1"),
            tenant: record_id("tenant", "t1"),
            customer: record_id("user", "u1"),
            listing_name: "Center Court".to_string(),
            date: "2026-08-10".to_string(),
            start: start.to_string(),
            end: end.to_string(),
            guests: 2,
            base_amount: 40.0,
            discount_amount: 0.0,
            total_amount: 40.0,
            currency: "EUR".to_string(),
            coupon_code: None,
            status: BookingStatus::Confirmed,
            note: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn make_blocked(start: &str, end: &str) -> Slot {
        Slot {
            id: None,
            listing: record_id("listing", "l1"),
            tenant: record_id("tenant", "t1"),
            date: "2026-08-10".to_string(),
            start: start.to_string(),
            end: end.to_string(),
            reason: Some("maintenance".to_string()),
            created_by: None,
            created_at: 0,
        }
    }

    // 2026-08-10 is a Monday (day index 1)
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 10).unwrap()
    }

    fn monday_hours(open: &str, close: &str) -> Vec<DayHours> {
        vec![DayHours {
            day: 1,
            open: open.to_string(),
            close: close.to_string(),
        }]
    }

    #[test]
    fn test_grid_layout() {
        let listing = make_listing(1, 60, monday_hours("09:00", "12:00"));
        let windows = generate(&listing, monday(), &[], &[]).unwrap();

        assert_eq!(windows.len(), 3);
        assert_eq!(windows[0].start, "09:00");
        assert_eq!(windows[0].end, "10:00");
        assert_eq!(windows[2].start, "11:00");
        assert!(windows.iter().all(|w| w.available));
    }

    #[test]
    fn test_partial_tail_window_dropped() {
        // 09:00-12:30 with 60-minute slots: the 12:00-12:30 remainder is not emitted
        let listing = make_listing(1, 60, monday_hours("09:00", "12:30"));
        let windows = generate(&listing, monday(), &[], &[]).unwrap();

        assert_eq!(windows.len(), 3);
        assert_eq!(windows.last().unwrap().end, "12:00");
    }

    #[test]
    fn test_closed_day_yields_empty() {
        let listing = make_listing(1, 60, monday_hours("09:00", "12:00"));
        // 2026-08-11 is a Tuesday - no entry
        let tuesday = NaiveDate::from_ymd_opt(2026, 8, 11).unwrap();
        let windows = generate(&listing, tuesday, &[], &[]).unwrap();
        assert!(windows.is_empty());
    }

    #[test]
    fn test_confirmed_booking_excludes_window() {
        let listing = make_listing(1, 60, monday_hours("09:00", "12:00"));
        let bookings = vec![make_booking("10:00", "11:00")];
        let windows = generate(&listing, monday(), &bookings, &[]).unwrap();

        assert!(windows[0].available);
        assert!(!windows[1].available);
        assert_eq!(windows[1].remaining_capacity, 0);
        assert!(windows[2].available);
    }

    #[test]
    fn test_capacity_keeps_window_until_full() {
        let listing = make_listing(2, 60, monday_hours("09:00", "11:00"));
        let bookings = vec![make_booking("09:00", "10:00")];
        let windows = generate(&listing, monday(), &bookings, &[]).unwrap();

        assert!(windows[0].available);
        assert_eq!(windows[0].remaining_capacity, 1);

        let full = vec![make_booking("09:00", "10:00"), make_booking("09:00", "10:00")];
        let windows = generate(&listing, monday(), &full, &[]).unwrap();
        assert!(!windows[0].available);
    }

    #[test]
    fn test_blocked_slot_excludes_window() {
        let listing = make_listing(3, 60, monday_hours("09:00", "12:00"));
        let blocked = vec![make_blocked("09:30", "10:30")];
        let windows = generate(&listing, monday(), &[], &blocked).unwrap();

        // The hold straddles the first two windows
        assert!(!windows[0].available);
        assert!(!windows[1].available);
        assert!(windows[2].available);
    }

    #[test]
    fn test_back_to_back_windows_do_not_collide() {
        let listing = make_listing(1, 60, monday_hours("09:00", "12:00"));
        let bookings = vec![make_booking("09:00", "10:00")];
        let windows = generate(&listing, monday(), &bookings, &[]).unwrap();

        // 10:00 starts exactly where the booking ends
        assert!(!windows[0].available);
        assert!(windows[1].available);
    }

    #[test]
    fn test_validate_rejects_overnight_hours() {
        let hours = monday_hours("22:00", "02:00");
        assert!(validate_operating_hours(&hours, 60).is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_days() {
        let mut hours = monday_hours("09:00", "12:00");
        hours.push(DayHours {
            day: 1,
            open: "14:00".to_string(),
            close: "18:00".to_string(),
        });
        assert!(validate_operating_hours(&hours, 60).is_err());
    }

    #[test]
    fn test_validate_rejects_day_shorter_than_slot() {
        let hours = monday_hours("09:00", "09:30");
        assert!(validate_operating_hours(&hours, 60).is_err());
    }

    #[test]
    fn test_overlap_is_half_open() {
        assert!(!overlaps(540, 600, 600, 660));
        assert!(overlaps(540, 600, 599, 660));
        assert!(overlaps(540, 600, 500, 700));
    }
}
