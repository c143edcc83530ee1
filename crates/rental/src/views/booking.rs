//! The booking form: price a vehicle for a date range and request it.

use std::fmt::Write as _;

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use super::render::{heading, money, Notice, Style, View};
use super::{outcome, AppContext, DateRange, Page};
use crate::auth::guard::Route;
use crate::error::{Error, Result};
use crate::models::{BookingRequest, Document, DocumentType, Vehicle};
use crate::rules::documents::missing_documents;
use crate::rules::pricing::{quote, PriceQuote};

const BOOKING_CREATED: &str = "Your booking has been successfully created!";
const BOOKING_FAILED: &str = "Failed to create booking. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingFormPage {
    pub vehicle_id: i64,
    pub dates: DateRange,
}

impl BookingFormPage {
    #[must_use]
    pub fn new(vehicle_id: i64, dates: DateRange) -> Self {
        Self { vehicle_id, dates }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingFormView {
    pub vehicle: Vehicle,
    pub dates: DateRange,
    pub quote: PriceQuote,
    pub documents: Vec<Document>,
    /// Required documents that are not on file and verified.
    pub missing_documents: Vec<DocumentType>,
}

impl BookingFormView {
    /// Whether the customer may submit the booking.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.missing_documents.is_empty()
    }
}

#[async_trait]
impl Page for BookingFormPage {
    type View = BookingFormView;

    fn route(&self) -> Route {
        Route::Booking(self.vehicle_id)
    }

    async fn load(&self, ctx: &AppContext) -> Result<BookingFormView> {
        let client = ctx.client();
        let (vehicle, documents) = tokio::try_join!(
            client.vehicles().get(self.vehicle_id),
            client.users().documents()
        )?;
        let quote = quote(vehicle.daily_rate, self.dates.start_date, self.dates.end_date);
        let missing_documents = missing_documents(&documents);

        Ok(BookingFormView {
            vehicle,
            dates: self.dates,
            quote,
            documents,
            missing_documents,
        })
    }
}

impl View for BookingFormView {
    fn plain(&self, style: &Style) -> String {
        let mut out = heading(&format!("Book {}", self.vehicle.title()));
        let _ = writeln!(out, "Pickup:   {}", style.date(self.dates.start_date));
        let _ = writeln!(out, "Return:   {}", style.date(self.dates.end_date));
        let _ = writeln!(
            out,
            "Price:    {} day(s) x {}",
            self.quote.days,
            money(self.quote.daily_rate)
        );
        if self.quote.is_discounted() {
            let _ = writeln!(out, "Discount: -{} (10% off 3+ days)", money(self.quote.discount));
        }
        let _ = writeln!(out, "Total:    {}", money(self.quote.total));

        out.push('\n');
        if self.is_ready() {
            out.push_str("Your documents are verified. You can book this vehicle.\n");
        } else {
            out.push_str(&missing_documents_message(&self.missing_documents));
            out.push('\n');
        }
        out
    }
}

fn missing_documents_message(missing: &[DocumentType]) -> String {
    let labels: Vec<&str> = missing.iter().map(DocumentType::label).collect();
    format!(
        "You'll need to upload the following documents before booking: {}. Use `rentctl documents upload`.",
        labels.join(", ")
    )
}

/// Check the dates of a booking request against `ctx`'s today.
///
/// # Errors
///
/// Returns a validation error for a pickup in the past, a return before the
/// pickup, or a missing pickup location. Same-day returns are allowed.
pub fn validate_request(ctx: &AppContext, request: &BookingRequest) -> Result<()> {
    if request.pickup_date < ctx.today() {
        return Err(Error::validation("pickupDate", "Pickup date cannot be in the past"));
    }
    if request.return_date < request.pickup_date {
        return Err(Error::validation(
            "returnDate",
            "Return date cannot be before pickup date",
        ));
    }
    if request.pickup_location.trim().is_empty() {
        return Err(Error::validation("pickupLocation", "Pickup location is required"));
    }
    Ok(())
}

/// Request a booking. Refused locally when required documents are missing.
///
/// # Errors
///
/// Returns an error when not logged in; other failures are reported in the
/// notice.
pub async fn submit(ctx: &AppContext, request: &BookingRequest) -> Result<Notice> {
    ctx.enter(&Route::Booking(request.vehicle_id))?;
    if let Err(e) = validate_request(ctx, request) {
        return outcome(Err(e), BOOKING_CREATED, BOOKING_FAILED);
    }

    let documents = ctx.client().users().documents().await?;
    let missing = missing_documents(&documents);
    if !missing.is_empty() {
        info!("Booking refused locally; missing {:?}", missing);
        return Ok(Notice::failure(missing_documents_message(&missing)));
    }

    let result = ctx.client().bookings().create(request).await;
    outcome(result, BOOKING_CREATED, BOOKING_FAILED)
}
