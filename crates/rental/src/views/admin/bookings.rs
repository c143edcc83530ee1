//! Back-office booking management.

use std::fmt::Write as _;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use crate::auth::guard::Route;
use crate::error::{Error, Result};
use crate::models::{Booking, BookingQuery, BookingStatus, DamageInput, DamageReport, Paged};
use crate::rules::booking::{admin_transitions, can_report_damage, check_transition};
use crate::rules::validation::validate_damage;
use crate::views::render::{heading, money, Notice, Style, Table, View};
use crate::views::{outcome, AppContext, Page};

const FETCH_FAILED: &str = "Failed to fetch bookings. Please try again.";
const STATUS_FAILED: &str = "Failed to update booking status. Please try again.";
const DAMAGE_FAILED: &str = "Failed to add damage report. Please try again.";

/// One page of the booking listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminBookingsPage {
    query: BookingQuery,
}

impl AdminBookingsPage {
    /// The first page, unfiltered.
    #[must_use]
    pub fn first(page_size: u32) -> Self {
        Self::new(BookingQuery {
            page_number: 1,
            page_size,
            ..BookingQuery::default()
        })
    }

    /// A date filter needs both ends; half of one is dropped.
    #[must_use]
    pub fn new(mut query: BookingQuery) -> Self {
        if query.start_date.is_some() != query.end_date.is_some() {
            debug!("Ignoring incomplete date filter");
            query.start_date = None;
            query.end_date = None;
        }
        query.page_number = query.page_number.max(1);
        Self { query }
    }

    #[must_use]
    pub fn query(&self) -> &BookingQuery {
        &self.query
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminBookingsView {
    pub status: Option<BookingStatus>,
    #[serde(flatten)]
    pub page: Paged<Booking>,
}

#[async_trait]
impl Page for AdminBookingsPage {
    type View = AdminBookingsView;

    fn route(&self) -> Route {
        Route::AdminBookings
    }

    async fn load(&self, ctx: &AppContext) -> Result<AdminBookingsView> {
        let page = ctx
            .client()
            .bookings()
            .list(&self.query)
            .await
            .map_err(|e| e.page_load(FETCH_FAILED))?;
        Ok(AdminBookingsView {
            status: self.query.status,
            page,
        })
    }
}

fn customer_name(booking: &Booking) -> String {
    booking
        .user
        .as_ref()
        .map_or_else(|| "Unknown".to_string(), |u| u.full_name())
}

impl View for AdminBookingsView {
    fn plain(&self, style: &Style) -> String {
        let mut out = heading("Manage Bookings");
        if let Some(status) = self.status {
            let _ = writeln!(out, "Status: {status}");
        }
        if self.page.items.is_empty() {
            out.push_str("No bookings found.\n");
            return out;
        }
        out.push_str(&self.table(style));
        let _ = writeln!(out, "Page {} of {}", self.page.page_number, self.page.total_pages);
        out
    }

    fn table(&self, style: &Style) -> String {
        let mut table = Table::new(&["ID", "Customer", "Vehicle", "Dates", "Status", "Total"]);
        for b in &self.page.items {
            table.row(vec![
                b.id.to_string(),
                customer_name(b),
                b.vehicle_title(),
                style.range(b.pickup_date, b.return_date),
                b.status.to_string(),
                money(b.total_price),
            ]);
        }
        table.render()
    }
}

/// A single booking with its damage report and the status changes on offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingDetailsPage {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetailsView {
    pub booking: Booking,
    pub damage_report: Option<DamageReport>,
    pub transitions: Vec<BookingStatus>,
    pub can_report_damage: bool,
}

#[async_trait]
impl Page for BookingDetailsPage {
    type View = BookingDetailsView;

    fn route(&self) -> Route {
        Route::AdminBookings
    }

    async fn load(&self, ctx: &AppContext) -> Result<BookingDetailsView> {
        let client = ctx.client();
        let (booking, fetched) = tokio::try_join!(
            client.bookings().get(self.id),
            client.damages().for_booking(self.id)
        )?;
        let damage_report = booking.damage_report.clone().or(fetched);
        Ok(BookingDetailsView {
            transitions: admin_transitions(booking.status).to_vec(),
            can_report_damage: can_report_damage(&booking) && damage_report.is_none(),
            damage_report,
            booking,
        })
    }
}

impl View for BookingDetailsView {
    fn plain(&self, style: &Style) -> String {
        let b = &self.booking;
        let mut out = heading(&format!("Booking #{}", b.id));
        let _ = writeln!(out, "Status:   {}", b.status);
        let _ = writeln!(out, "Vehicle:  {}", b.vehicle_title());
        if let Some(user) = &b.user {
            let _ = writeln!(out, "Customer: {} <{}>", user.full_name(), user.email);
            if let Some(phone) = &user.phone_number {
                let _ = writeln!(out, "Phone:    {phone}");
            }
        }
        let _ = writeln!(out, "Dates:    {}", style.range(b.pickup_date, b.return_date));
        if let Some(booked) = b.booking_date {
            let _ = writeln!(out, "Booked:   {}", style.datetime(booked));
        }
        let _ = writeln!(
            out,
            "Pickup:   {}\nReturn:   {}",
            b.pickup_location.as_deref().unwrap_or("-"),
            b.return_location.as_deref().unwrap_or("-")
        );
        let _ = write!(out, "Total:    {}", money(b.total_price));
        if let Some(method) = b.payment_method {
            let _ = write!(out, " ({}", method.label());
            match b.payment_status {
                Some(status) => {
                    let _ = write!(out, ", {status})");
                }
                None => out.push(')'),
            }
        }
        out.push('\n');

        if let Some(damage) = &self.damage_report {
            let _ = writeln!(
                out,
                "\nDamage: {}\n  Repair cost {}{}",
                damage.description,
                money(damage.repair_cost),
                if damage.is_customer_responsible {
                    ", customer responsible"
                } else {
                    ""
                }
            );
        }

        if !self.transitions.is_empty() {
            let labels: Vec<&str> = self.transitions.iter().map(BookingStatus::as_str).collect();
            let _ = writeln!(out, "\nCan be marked: {}", labels.join(", "));
        }
        if self.can_report_damage {
            out.push_str("Damage can be reported with `rentctl admin bookings damage`.\n");
        }
        out
    }
}

/// Move a booking to `status`, if the back office may.
///
/// # Errors
///
/// Returns an error when the session may not manage bookings; other failures
/// are reported in the notice.
pub async fn set_status(ctx: &AppContext, booking_id: i64, status: BookingStatus) -> Result<Notice> {
    ctx.enter(&Route::AdminBookings)?;
    let result = async {
        let booking = ctx.client().bookings().get(booking_id).await?;
        check_transition(booking.status, status)?;
        info!("Booking {} {} -> {}", booking_id, booking.status, status);
        ctx.client().bookings().update_status(booking_id, status).await
    }
    .await;
    outcome(
        result,
        &format!("Booking #{booking_id} marked {status}."),
        STATUS_FAILED,
    )
}

/// File a damage report against a completed booking.
///
/// # Errors
///
/// Returns an error when the session may not manage bookings; other failures
/// are reported in the notice.
pub async fn report_damage(ctx: &AppContext, damage: &DamageInput) -> Result<Notice> {
    ctx.enter(&Route::AdminBookings)?;
    let result = async {
        validate_damage(damage).into_result()?;
        let client = ctx.client();
        let booking = client.bookings().get(damage.booking_id).await?;
        if !can_report_damage(&booking) {
            return Err(Error::not_allowed(format!(
                "Damage can only be reported on a completed booking without a report (booking #{} is {})",
                booking.id, booking.status
            )));
        }
        client.damages().create(damage).await
    }
    .await;
    outcome(
        result,
        &format!("Damage report added to booking #{}.", damage.booking_id),
        DAMAGE_FAILED,
    )
}
