//! Which booking actions to offer, and when.
//!
//! All checks take `now` explicitly so pages and tests agree on "today".

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::{Booking, BookingStatus};

/// An action a customer may take on their own booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BookingAction {
    Extend,
    Cancel,
    Review,
}

impl BookingAction {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Extend => "Extend Booking",
            Self::Cancel => "Cancel Booking",
            Self::Review => "Review Vehicle",
        }
    }
}

/// Approved, and the return date is after today.
#[must_use]
pub fn can_extend(booking: &Booking, now: DateTime<Utc>) -> bool {
    booking.status == BookingStatus::Approved && booking.return_date.date_naive() > now.date_naive()
}

/// Requested or approved, and pickup has not passed.
#[must_use]
pub fn can_cancel(booking: &Booking, now: DateTime<Utc>) -> bool {
    matches!(
        booking.status,
        BookingStatus::Requested | BookingStatus::Approved
    ) && booking.pickup_date >= now
}

/// Completed, and the return date has passed.
#[must_use]
pub fn can_review(booking: &Booking, now: DateTime<Utc>) -> bool {
    booking.status == BookingStatus::Completed && booking.return_date < now
}

/// Every action available on `booking`, in display order.
#[must_use]
pub fn allowed_actions(booking: &Booking, now: DateTime<Utc>) -> Vec<BookingAction> {
    let mut actions = Vec::new();
    if can_extend(booking, now) {
        actions.push(BookingAction::Extend);
    }
    if can_cancel(booking, now) {
        actions.push(BookingAction::Cancel);
    }
    if can_review(booking, now) {
        actions.push(BookingAction::Review);
    }
    actions
}

/// The extension offered by default: the current return date plus `days`.
#[must_use]
pub fn default_extension(booking: &Booking, days: u32) -> NaiveDate {
    let current = booking.return_date.date_naive();
    current
        .checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(current)
}

/// Check a requested new return date and convert it to the instant sent to
/// the backend (midnight UTC of that day).
///
/// # Errors
///
/// Returns a validation error unless `new_return` is after the booking's
/// current return date.
pub fn validate_extension(booking: &Booking, new_return: NaiveDate) -> Result<DateTime<Utc>> {
    let new_return = new_return
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .ok_or_else(|| Error::internal("midnight is always a valid time"))?;

    if new_return <= booking.return_date {
        return Err(Error::validation(
            "returnDate",
            "New return date must be after current return date",
        ));
    }
    Ok(new_return)
}

/// Status changes the back office may make from `status`.
#[must_use]
pub fn admin_transitions(status: BookingStatus) -> &'static [BookingStatus] {
    match status {
        BookingStatus::Requested => &[BookingStatus::Approved, BookingStatus::Cancelled],
        BookingStatus::Approved => &[BookingStatus::Completed, BookingStatus::Cancelled],
        BookingStatus::Completed | BookingStatus::Cancelled | BookingStatus::Unknown => &[],
    }
}

/// Check a back-office status change before sending it.
///
/// # Errors
///
/// Returns [`Error::NotAllowed`] if `to` is not reachable from `from`.
pub fn check_transition(from: BookingStatus, to: BookingStatus) -> Result<()> {
    if admin_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(Error::not_allowed(format!(
            "a {from} booking cannot be marked {to}"
        )))
    }
}

/// Damage is reported against completed bookings that have no report yet.
#[must_use]
pub fn can_report_damage(booking: &Booking) -> bool {
    booking.status == BookingStatus::Completed && booking.damage_report.is_none()
}
