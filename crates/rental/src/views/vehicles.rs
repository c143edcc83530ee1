//! Browsing the fleet: the vehicle list, a vehicle's details and its reviews.

use std::fmt::Write as _;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use super::render::{heading, money, stars, Notice, Style, Table, View};
use super::{outcome, AppContext, DateRange, Page};
use crate::auth::guard::Route;
use crate::error::{Error, Result};
use crate::models::{Category, Review, ReviewInput, Vehicle};
use crate::rules::pricing::{quote, PriceQuote};
use crate::rules::validation::validate_review;

const REVIEW_THANKS: &str = "Thank you for your review!";
const REVIEW_FAILED: &str = "Failed to submit review. Please try again.";

/// Rating preselected in the review form.
pub const DEFAULT_RATING: u8 = 5;

/// Which vehicles the list shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "by", rename_all = "camelCase")]
pub enum VehicleFilter {
    /// Free for the whole range.
    Available(DateRange),
    Category { category_id: i64 },
    Search { query: String },
}

/// The vehicle list. A search query wins over a category, which wins over
/// the date range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleListPage {
    pub dates: DateRange,
    pub category_id: Option<i64>,
    pub query: Option<String>,
}

impl VehicleListPage {
    #[must_use]
    pub fn available(dates: DateRange) -> Self {
        Self {
            dates,
            category_id: None,
            query: None,
        }
    }

    #[must_use]
    pub fn filter(&self) -> VehicleFilter {
        match (&self.query, self.category_id) {
            (Some(query), _) if !query.trim().is_empty() => VehicleFilter::Search {
                query: query.trim().to_string(),
            },
            (_, Some(category_id)) => VehicleFilter::Category { category_id },
            _ => VehicleFilter::Available(self.dates),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleListView {
    pub filter: VehicleFilter,
    pub categories: Vec<Category>,
    pub vehicles: Vec<Vehicle>,
}

#[async_trait]
impl Page for VehicleListPage {
    type View = VehicleListView;

    fn route(&self) -> Route {
        Route::Vehicles
    }

    async fn load(&self, ctx: &AppContext) -> Result<VehicleListView> {
        let vehicles = ctx.client().vehicles();
        let filter = self.filter();
        debug!("Listing vehicles by {:?}", filter);

        let listing = async {
            match &filter {
                VehicleFilter::Search { query } => vehicles.search(query).await,
                VehicleFilter::Category { category_id } => vehicles.by_category(*category_id).await,
                VehicleFilter::Available(range) => {
                    vehicles
                        .available(range.start_date, range.end_date, None)
                        .await
                }
            }
        };
        let (categories, vehicles) =
            tokio::try_join!(ctx.client().categories().list(), listing)?;

        Ok(VehicleListView {
            filter,
            categories,
            vehicles,
        })
    }
}

impl View for VehicleListView {
    fn plain(&self, style: &Style) -> String {
        let title = match &self.filter {
            VehicleFilter::Available(range) => format!(
                "Available Vehicles ({} - {})",
                style.date(range.start_date),
                style.date(range.end_date)
            ),
            VehicleFilter::Category { category_id } => {
                let name = self
                    .categories
                    .iter()
                    .find(|c| c.id == *category_id)
                    .map_or_else(|| format!("#{category_id}"), |c| c.name.clone());
                format!("Vehicles in {name}")
            }
            VehicleFilter::Search { query } => format!("Vehicles matching \"{query}\""),
        };

        let mut out = heading(&title);
        if self.vehicles.is_empty() {
            out.push_str("No vehicles found.\n");
        }
        for vehicle in &self.vehicles {
            let _ = writeln!(
                out,
                "  #{:<4} {}  {}/day  {}",
                vehicle.id,
                vehicle.title(),
                money(vehicle.daily_rate),
                vehicle.category_name.as_deref().unwrap_or_default()
            );
        }
        out
    }

    fn table(&self, _style: &Style) -> String {
        let mut table = Table::new(&["ID", "Vehicle", "Category", "Seats", "Daily Rate", "Status"]);
        for vehicle in &self.vehicles {
            table.row(vec![
                vehicle.id.to_string(),
                vehicle.title(),
                vehicle.category_name.clone().unwrap_or_default(),
                vehicle.seats.map(|s| s.to_string()).unwrap_or_default(),
                money(vehicle.daily_rate),
                vehicle.status.to_string(),
            ]);
        }
        table.render()
    }
}

/// One vehicle with its reviews and a price estimate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleDetailsPage {
    pub id: i64,
    /// Range to price; the default rental range when absent.
    pub dates: Option<DateRange>,
}

impl VehicleDetailsPage {
    #[must_use]
    pub fn new(id: i64, dates: Option<DateRange>) -> Self {
        Self { id, dates }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDetailsView {
    pub vehicle: Vehicle,
    pub reviews: Vec<Review>,
    /// Only known for logged-in users.
    pub can_review: Option<bool>,
    pub dates: DateRange,
    pub quote: PriceQuote,
}

#[async_trait]
impl Page for VehicleDetailsPage {
    type View = VehicleDetailsView;

    fn route(&self) -> Route {
        Route::VehicleDetails(self.id)
    }

    async fn load(&self, ctx: &AppContext) -> Result<VehicleDetailsView> {
        let client = ctx.client();
        let (vehicle, reviews) = tokio::try_join!(
            client.vehicles().get(self.id),
            client.vehicles().reviews(self.id)
        )?;

        let can_review = if ctx.session().is_authenticated() {
            match client.reviews().can_review(self.id).await {
                Ok(allowed) => Some(allowed),
                Err(e) if e.is_unauthorized() => return Err(e),
                Err(e) => {
                    warn!("Could not check review eligibility: {}", e);
                    Some(false)
                }
            }
        } else {
            None
        };

        let dates = self.dates.unwrap_or_else(|| ctx.default_range());
        let quote = quote(vehicle.daily_rate, dates.start_date, dates.end_date);

        Ok(VehicleDetailsView {
            vehicle,
            reviews,
            can_review,
            dates,
            quote,
        })
    }
}

impl View for VehicleDetailsView {
    fn plain(&self, style: &Style) -> String {
        let v = &self.vehicle;
        let mut out = heading(&v.title());
        let _ = writeln!(out, "Daily rate:    {}", money(v.daily_rate));
        let _ = writeln!(out, "Status:        {}", v.status);
        if let Some(category) = &v.category_name {
            let _ = writeln!(out, "Category:      {category}");
        }
        if let Some(seats) = v.seats {
            let _ = writeln!(out, "Seats:         {seats}");
        }
        if let Some(transmission) = v.transmission {
            let _ = writeln!(out, "Transmission:  {transmission}");
        }
        if let Some(fuel) = v.fuel_type {
            let _ = writeln!(out, "Fuel:          {fuel}");
        }
        if let Some(rating) = v.average_rating {
            let _ = writeln!(out, "Rating:        {rating:.1} / 5");
        }
        if let Some(description) = v.description.as_deref().filter(|d| !d.is_empty()) {
            let _ = writeln!(out, "\n{description}");
        }

        let q = &self.quote;
        let _ = writeln!(
            out,
            "\n{} - {}: {} day(s) x {} = {}",
            style.date(self.dates.start_date),
            style.date(self.dates.end_date),
            q.days,
            money(q.daily_rate),
            money(q.subtotal)
        );
        if q.is_discounted() {
            let _ = writeln!(out, "Long rental discount: -{}", money(q.discount));
        }
        let _ = writeln!(out, "Total: {}", money(q.total));

        let _ = writeln!(out, "\nReviews ({})", self.reviews.len());
        if self.reviews.is_empty() {
            out.push_str("  No reviews yet.\n");
        }
        for review in &self.reviews {
            out.push_str(&review_line(review, style));
        }
        if self.can_review == Some(true) {
            let _ = writeln!(
                out,
                "\nYou can review this vehicle: rentctl review {} --rating 5",
                v.id
            );
        }
        out
    }
}

fn review_line(review: &Review, style: &Style) -> String {
    let mut line = format!(
        "  {} {}",
        stars(review.rating),
        review.user_name.as_deref().unwrap_or("Anonymous")
    );
    if let Some(date) = review.review_date {
        let _ = write!(line, " ({})", style.datetime(date));
    }
    if let Some(comment) = review.comment.as_deref().filter(|c| !c.is_empty()) {
        let _ = write!(line, "\n    {comment}");
    }
    line.push('\n');
    line
}

/// The reviews of one vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewsPage {
    pub vehicle_id: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewsView {
    pub vehicle_id: i64,
    pub reviews: Vec<Review>,
}

#[async_trait]
impl Page for ReviewsPage {
    type View = ReviewsView;

    fn route(&self) -> Route {
        Route::VehicleDetails(self.vehicle_id)
    }

    async fn load(&self, ctx: &AppContext) -> Result<ReviewsView> {
        let reviews = ctx.client().reviews().for_vehicle(self.vehicle_id).await?;
        Ok(ReviewsView {
            vehicle_id: self.vehicle_id,
            reviews,
        })
    }
}

impl View for ReviewsView {
    fn plain(&self, style: &Style) -> String {
        let mut out = heading(&format!("Reviews for vehicle #{}", self.vehicle_id));
        if self.reviews.is_empty() {
            out.push_str("No reviews yet.\n");
        }
        for review in &self.reviews {
            out.push_str(&review_line(review, style));
        }
        out
    }

    fn table(&self, style: &Style) -> String {
        let mut table = Table::new(&["Rating", "By", "Date", "Comment"]);
        for review in &self.reviews {
            table.row(vec![
                stars(review.rating),
                review.user_name.clone().unwrap_or_default(),
                review.review_date.map(|d| style.datetime(d)).unwrap_or_default(),
                review.comment.clone().unwrap_or_default(),
            ]);
        }
        table.render()
    }
}

/// Post a review of a vehicle the user has rented.
///
/// # Errors
///
/// Returns [`Error::Unauthorized`] when not logged in; other failures are
/// reported in the notice.
pub async fn submit_review(ctx: &AppContext, review: &ReviewInput) -> Result<Notice> {
    if !ctx.session().is_authenticated() {
        return Err(Error::Unauthorized);
    }
    if let Err(e) = validate_review(review).into_result() {
        return outcome(Err(e), REVIEW_THANKS, REVIEW_FAILED);
    }

    let result = ctx.client().reviews().create(review).await;
    outcome(result, REVIEW_THANKS, REVIEW_FAILED)
}
