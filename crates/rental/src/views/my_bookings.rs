//! The customer's own bookings, with extension and cancellation.

use std::fmt::Write as _;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use super::render::{heading, money, Notice, Style, Table, View};
use super::{outcome, AppContext, Page};
use crate::auth::guard::Route;
use crate::error::{Error, Result};
use crate::models::Booking;
use crate::rules::booking::{
    allowed_actions, can_cancel, can_extend, default_extension, validate_extension, BookingAction,
};

const EXTENDED: &str = "Your booking has been successfully extended!";
const EXTEND_FAILED: &str = "Failed to extend booking. Please try again.";
const CANCELLED: &str = "Your booking has been successfully cancelled!";
const CANCEL_FAILED: &str = "Failed to cancel booking. Please try again.";

#[derive(Debug, Clone, Copy, Default)]
pub struct MyBookingsPage;

/// A booking and what the customer may do with it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRow {
    #[serde(flatten)]
    pub booking: Booking,
    pub actions: Vec<BookingAction>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MyBookingsView {
    pub bookings: Vec<BookingRow>,
}

#[async_trait]
impl Page for MyBookingsPage {
    type View = MyBookingsView;

    fn route(&self) -> Route {
        Route::MyBookings
    }

    async fn load(&self, ctx: &AppContext) -> Result<MyBookingsView> {
        let now = ctx.now();
        let bookings = ctx
            .client()
            .bookings()
            .mine()
            .await?
            .into_iter()
            .map(|booking| BookingRow {
                actions: allowed_actions(&booking, now),
                booking,
            })
            .collect();
        Ok(MyBookingsView { bookings })
    }
}

impl View for MyBookingsView {
    fn plain(&self, style: &Style) -> String {
        let mut out = heading("My Bookings");
        if self.bookings.is_empty() {
            out.push_str("You don't have any bookings yet.\n");
        }
        for row in &self.bookings {
            let b = &row.booking;
            let _ = writeln!(
                out,
                "\n#{} {} [{}]\n  {}  {}",
                b.id,
                b.vehicle_title(),
                b.status,
                style.range(b.pickup_date, b.return_date),
                money(b.total_price)
            );
            if let Some(location) = &b.pickup_location {
                let _ = writeln!(out, "  Pickup at {location}");
            }
            if !row.actions.is_empty() {
                let labels: Vec<&str> = row.actions.iter().map(BookingAction::label).collect();
                let _ = writeln!(out, "  Actions: {}", labels.join(", "));
            }
        }
        out
    }

    fn table(&self, style: &Style) -> String {
        let mut table = Table::new(&["ID", "Vehicle", "Dates", "Status", "Total", "Actions"]);
        for row in &self.bookings {
            let b = &row.booking;
            let labels: Vec<&str> = row.actions.iter().map(BookingAction::label).collect();
            table.row(vec![
                b.id.to_string(),
                b.vehicle_title(),
                style.range(b.pickup_date, b.return_date),
                b.status.to_string(),
                money(b.total_price),
                labels.join(", "),
            ]);
        }
        table.render()
    }
}

/// Move a booking's return date; the configured default extension when no
/// date is given.
///
/// # Errors
///
/// Returns an error when not logged in; other failures are reported in the
/// notice.
pub async fn extend(ctx: &AppContext, booking_id: i64, new_return: Option<NaiveDate>) -> Result<Notice> {
    ctx.enter(&Route::MyBookings)?;

    let result = async {
        let booking = ctx.client().bookings().get(booking_id).await?;
        if !can_extend(&booking, ctx.now()) {
            return Err(Error::not_allowed(format!(
                "Booking #{booking_id} cannot be extended"
            )));
        }
        let date = new_return.unwrap_or_else(|| {
            default_extension(&booking, ctx.config().booking.default_extension_days)
        });
        let instant = validate_extension(&booking, date)?;
        info!("Extending booking {} to {}", booking_id, date);
        ctx.client().bookings().extend(booking_id, instant).await
    }
    .await;

    outcome(result, EXTENDED, EXTEND_FAILED)
}

/// Cancel a booking that has not started.
///
/// # Errors
///
/// Returns an error when not logged in; other failures are reported in the
/// notice.
pub async fn cancel(ctx: &AppContext, booking_id: i64) -> Result<Notice> {
    ctx.enter(&Route::MyBookings)?;

    let result = async {
        let booking = ctx.client().bookings().get(booking_id).await?;
        if !can_cancel(&booking, ctx.now()) {
            return Err(Error::not_allowed(format!(
                "Booking #{booking_id} can no longer be cancelled"
            )));
        }
        info!("Cancelling booking {}", booking_id);
        ctx.client().bookings().cancel(booking_id).await
    }
    .await;

    outcome(result, CANCELLED, CANCEL_FAILED)
}
