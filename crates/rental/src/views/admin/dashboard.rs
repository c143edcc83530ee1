//! Back-office overview, computed from the booking and vehicle listings.

use std::collections::HashMap;
use std::fmt::Write as _;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::auth::guard::Route;
use crate::error::Result;
use crate::models::{Booking, BookingQuery, BookingStatus, Vehicle, VehicleQuery, VehicleStatus};
use crate::views::render::{heading, money, Style, Table, View};
use crate::views::{AppContext, Page};

const LOAD_FAILED: &str = "Failed to load dashboard data. Please try again.";
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
/// Page size used to walk every booking.
const BOOKING_PAGE_SIZE: u32 = 1000;
const TOP_VEHICLES: usize = 5;
const RECENT_BOOKINGS: usize = 5;
const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, Copy, Default)]
pub struct DashboardPage;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub name: String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    pub name: &'static str,
    pub bookings: usize,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehiclePerformance {
    pub name: String,
    pub bookings: usize,
    pub revenue: f64,
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentBooking {
    pub id: i64,
    pub customer: String,
    pub vehicle: String,
    pub status: BookingStatus,
    pub pickup_date: DateTime<Utc>,
    pub return_date: DateTime<Utc>,
    pub amount: f64,
}

/// Headline figures and breakdowns for the dashboard.
///
/// Revenue counts approved and completed bookings. A booking belongs to the
/// month it was made in, or its pickup month when the listing omits the
/// booking date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_bookings: usize,
    pub pending_bookings: usize,
    pub active_bookings: usize,
    pub completed_bookings: usize,
    pub total_vehicles: usize,
    pub available_vehicles: usize,
    pub reserved_vehicles: usize,
    pub under_maintenance_vehicles: usize,
    pub total_revenue: f64,
    pub this_month_revenue: f64,
    pub last_month_revenue: f64,
    pub bookings_by_category: Vec<CategoryCount>,
    /// January to December of the current year.
    pub bookings_by_month: Vec<MonthSummary>,
    pub vehicle_performance: Vec<VehiclePerformance>,
    pub recent_bookings: Vec<RecentBooking>,
}

fn earns_revenue(booking: &Booking) -> bool {
    matches!(
        booking.status,
        BookingStatus::Approved | BookingStatus::Completed
    )
}

fn booked_at(booking: &Booking) -> DateTime<Utc> {
    booking.booking_date.unwrap_or(booking.pickup_date)
}

/// The booking's own vehicle, or the fleet entry it refers to.
fn vehicle_of<'a>(booking: &'a Booking, fleet: &HashMap<i64, &'a Vehicle>) -> Option<&'a Vehicle> {
    booking
        .vehicle
        .as_ref()
        .or_else(|| booking.vehicle_id.and_then(|id| fleet.get(&id).copied()))
}

fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

impl DashboardStats {
    #[must_use]
    pub fn compute(bookings: &[Booking], vehicles: &[Vehicle], now: DateTime<Utc>) -> Self {
        let count = |status: BookingStatus| bookings.iter().filter(|b| b.status == status).count();
        let fleet = |status: VehicleStatus| vehicles.iter().filter(|v| v.status == status).count();

        let this_month = (now.year(), now.month());
        let last_month = previous_month(now.year(), now.month());
        let revenue_in = |(year, month): (i32, u32)| -> f64 {
            bookings
                .iter()
                .filter(|b| earns_revenue(b))
                .filter(|b| {
                    let at = booked_at(b);
                    at.year() == year && at.month() == month
                })
                .map(|b| b.total_price)
                .sum()
        };

        let vehicles_by_id: HashMap<i64, &Vehicle> = vehicles.iter().map(|v| (v.id, v)).collect();

        // Categories in first-seen order.
        let mut bookings_by_category: Vec<CategoryCount> = Vec::new();
        for booking in bookings {
            let name = vehicle_of(booking, &vehicles_by_id)
                .and_then(|v| v.category_name.clone())
                .unwrap_or_else(|| UNCATEGORIZED.to_string());
            match bookings_by_category.iter_mut().find(|c| c.name == name) {
                Some(entry) => entry.value += 1,
                None => bookings_by_category.push(CategoryCount { name, value: 1 }),
            }
        }

        let mut bookings_by_month: Vec<MonthSummary> = MONTHS
            .iter()
            .map(|&name| MonthSummary {
                name,
                bookings: 0,
                revenue: 0.0,
            })
            .collect();
        for booking in bookings {
            let at = booked_at(booking);
            if at.year() != now.year() {
                continue;
            }
            if let Some(entry) = bookings_by_month.get_mut(at.month0() as usize) {
                entry.bookings += 1;
                if earns_revenue(booking) {
                    entry.revenue += booking.total_price;
                }
            }
        }

        let mut performance: Vec<(Option<i64>, VehiclePerformance)> = Vec::new();
        for booking in bookings {
            let vehicle = vehicle_of(booking, &vehicles_by_id);
            let key = vehicle.map(|v| v.id).or(booking.vehicle_id);
            let revenue = if earns_revenue(booking) { booking.total_price } else { 0.0 };
            match performance.iter_mut().find(|(k, _)| *k == key) {
                Some((_, entry)) => {
                    entry.bookings += 1;
                    entry.revenue += revenue;
                }
                None => performance.push((
                    key,
                    VehiclePerformance {
                        name: vehicle.map_or_else(|| booking.vehicle_title(), Vehicle::title),
                        bookings: 1,
                        revenue,
                        rating: key
                            .and_then(|id| vehicles_by_id.get(&id))
                            .and_then(|v| v.average_rating),
                    },
                )),
            }
        }
        // Stable sort keeps first-seen order among ties.
        performance.sort_by(|(_, a), (_, b)| b.bookings.cmp(&a.bookings));
        let vehicle_performance = performance
            .into_iter()
            .take(TOP_VEHICLES)
            .map(|(_, entry)| entry)
            .collect();

        let mut recent: Vec<&Booking> = bookings.iter().collect();
        recent.sort_by_key(|b| std::cmp::Reverse(booked_at(b)));
        let recent_bookings = recent
            .into_iter()
            .take(RECENT_BOOKINGS)
            .map(|b| RecentBooking {
                id: b.id,
                customer: b
                    .user
                    .as_ref()
                    .map_or_else(|| "Unknown".to_string(), |u| u.full_name()),
                vehicle: b.vehicle_title(),
                status: b.status,
                pickup_date: b.pickup_date,
                return_date: b.return_date,
                amount: b.total_price,
            })
            .collect();

        Self {
            total_bookings: bookings.len(),
            pending_bookings: count(BookingStatus::Requested),
            active_bookings: count(BookingStatus::Approved),
            completed_bookings: count(BookingStatus::Completed),
            total_vehicles: vehicles.len(),
            available_vehicles: fleet(VehicleStatus::Available),
            reserved_vehicles: fleet(VehicleStatus::Reserved),
            under_maintenance_vehicles: fleet(VehicleStatus::Maintenance),
            total_revenue: bookings
                .iter()
                .filter(|b| earns_revenue(b))
                .map(|b| b.total_price)
                .sum(),
            this_month_revenue: revenue_in(this_month),
            last_month_revenue: revenue_in(last_month),
            bookings_by_category,
            bookings_by_month,
            vehicle_performance,
            recent_bookings,
        }
    }

    /// Change from last month's revenue, as a percentage. `None` when last
    /// month earned nothing.
    #[must_use]
    pub fn revenue_change_percent(&self) -> Option<f64> {
        (self.last_month_revenue > 0.0).then(|| {
            (self.this_month_revenue - self.last_month_revenue) / self.last_month_revenue * 100.0
        })
    }
}

#[async_trait]
impl Page for DashboardPage {
    type View = DashboardStats;

    fn route(&self) -> Route {
        Route::AdminDashboard
    }

    async fn load(&self, ctx: &AppContext) -> Result<DashboardStats> {
        let client = ctx.client();
        let fleet = VehicleQuery::default();
        let (bookings, vehicles) =
            tokio::try_join!(all_bookings(client), client.vehicles().list(&fleet))
                .map_err(|e| e.page_load(LOAD_FAILED))?;

        debug!(
            "Dashboard over {} bookings and {} vehicles",
            bookings.len(),
            vehicles.len()
        );
        Ok(DashboardStats::compute(&bookings, &vehicles, ctx.now()))
    }
}

/// Every booking, walking the listing page by page.
async fn all_bookings(client: &ApiClient) -> Result<Vec<Booking>> {
    let mut query = BookingQuery {
        page_number: 1,
        page_size: BOOKING_PAGE_SIZE,
        ..BookingQuery::default()
    };
    let first = client.bookings().list(&query).await?;
    let (total_pages, total_count) = (first.total_pages, first.total_count);
    let mut bookings = first.items;

    while query.page_number < total_pages {
        query.page_number += 1;
        let page = client.bookings().list(&query).await?;
        if page.items.is_empty() {
            break;
        }
        bookings.extend(page.items);
    }

    if (bookings.len() as u64) < total_count {
        warn!(
            "Backend reported {} bookings but listed {}",
            total_count,
            bookings.len()
        );
    }
    Ok(bookings)
}

impl View for DashboardStats {
    fn plain(&self, style: &Style) -> String {
        let mut out = heading("Dashboard");
        let _ = writeln!(
            out,
            "Bookings: {} total, {} pending, {} active, {} completed",
            self.total_bookings, self.pending_bookings, self.active_bookings, self.completed_bookings
        );
        let _ = writeln!(
            out,
            "Vehicles: {} total, {} available, {} reserved, {} in maintenance",
            self.total_vehicles,
            self.available_vehicles,
            self.reserved_vehicles,
            self.under_maintenance_vehicles
        );
        let _ = write!(
            out,
            "Revenue:  {} total, {} this month",
            money(self.total_revenue),
            money(self.this_month_revenue)
        );
        match self.revenue_change_percent() {
            Some(change) => {
                let _ = writeln!(out, " ({change:+.1}% vs last month)");
            }
            None => out.push('\n'),
        }

        if !self.bookings_by_category.is_empty() {
            out.push_str("\nBookings by category:\n");
            for category in &self.bookings_by_category {
                let _ = writeln!(out, "  {:<16} {}", category.name, category.value);
            }
        }

        if !self.vehicle_performance.is_empty() {
            out.push_str("\nTop vehicles:\n");
            let mut table = Table::new(&["Vehicle", "Bookings", "Revenue", "Rating"]);
            for vehicle in &self.vehicle_performance {
                table.row(vec![
                    vehicle.name.clone(),
                    vehicle.bookings.to_string(),
                    money(vehicle.revenue),
                    vehicle.rating.map(|r| format!("{r:.1}")).unwrap_or_default(),
                ]);
            }
            out.push_str(&table.render());
        }

        if !self.recent_bookings.is_empty() {
            out.push_str("\nRecent bookings:\n");
            out.push_str(&recent_table(&self.recent_bookings, style).render());
        }
        out
    }

    fn table(&self, style: &Style) -> String {
        let mut table = Table::new(&["Month", "Bookings", "Revenue"]);
        for month in &self.bookings_by_month {
            table.row(vec![
                month.name.to_string(),
                month.bookings.to_string(),
                money(month.revenue),
            ]);
        }
        format!(
            "{}\n{}",
            table.render(),
            recent_table(&self.recent_bookings, style).render()
        )
    }
}

fn recent_table(bookings: &[RecentBooking], style: &Style) -> Table {
    let mut table = Table::new(&["ID", "Customer", "Vehicle", "Dates", "Status", "Amount"]);
    for b in bookings {
        table.row(vec![
            b.id.to_string(),
            b.customer.clone(),
            b.vehicle.clone(),
            style.range(b.pickup_date, b.return_date),
            b.status.to_string(),
            money(b.amount),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::error::Error;
    use crate::models::{BookingCustomer, Role};
    use crate::views::testing;

    fn at(month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, month, day, 10, 0, 0).unwrap()
    }

    fn vehicle(id: i64, category: &str, status: VehicleStatus, rating: Option<f64>) -> Vehicle {
        serde_json::from_value(json!({
            "id": id,
            "make": "Make",
            "model": format!("M{id}"),
            "year": 2022,
            "dailyRate": 40.0,
            "status": status.as_str(),
            "categoryName": category,
            "averageRating": rating
        }))
        .unwrap()
    }

    fn booking(id: i64, vehicle_id: i64, status: BookingStatus, booked: DateTime<Utc>, price: f64) -> Booking {
        Booking {
            id,
            vehicle_id: Some(vehicle_id),
            vehicle: None,
            user: Some(BookingCustomer {
                id: None,
                first_name: "Ann".to_string(),
                last_name: "Lee".to_string(),
                email: String::new(),
                phone_number: None,
                address: None,
            }),
            pickup_date: booked,
            return_date: booked,
            booking_date: Some(booked),
            pickup_location: None,
            return_location: None,
            status,
            total_price: price,
            payment_method: None,
            payment_status: None,
            damage_report: None,
        }
    }

    fn fleet() -> Vec<Vehicle> {
        vec![
            vehicle(1, "SUV", VehicleStatus::Available, Some(4.5)),
            vehicle(2, "Sedan", VehicleStatus::Reserved, None),
            vehicle(3, "Sedan", VehicleStatus::Maintenance, None),
        ]
    }

    #[test]
    fn test_compute_counts_and_revenue() {
        let bookings = vec![
            booking(1, 1, BookingStatus::Completed, at(5, 20), 100.0),
            booking(2, 1, BookingStatus::Approved, at(6, 2), 200.0),
            booking(3, 2, BookingStatus::Requested, at(6, 3), 50.0),
            booking(4, 2, BookingStatus::Cancelled, at(6, 4), 75.0),
        ];
        let stats = DashboardStats::compute(&bookings, &fleet(), testing::noon());

        assert_eq!(stats.total_bookings, 4);
        assert_eq!(stats.pending_bookings, 1);
        assert_eq!(stats.active_bookings, 1);
        assert_eq!(stats.completed_bookings, 1);
        assert_eq!(
            (stats.available_vehicles, stats.reserved_vehicles, stats.under_maintenance_vehicles),
            (1, 1, 1)
        );
        assert!((stats.total_revenue - 300.0).abs() < 1e-9);
        assert!((stats.this_month_revenue - 200.0).abs() < 1e-9);
        assert!((stats.last_month_revenue - 100.0).abs() < 1e-9);
        assert!((stats.revenue_change_percent().unwrap() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_compute_breakdowns() {
        let bookings = vec![
            booking(1, 2, BookingStatus::Completed, at(5, 20), 100.0),
            booking(2, 1, BookingStatus::Approved, at(6, 2), 200.0),
            booking(3, 1, BookingStatus::Approved, at(6, 5), 150.0),
        ];
        let stats = DashboardStats::compute(&bookings, &fleet(), testing::noon());

        assert_eq!(
            stats.bookings_by_category,
            vec![
                CategoryCount { name: "Sedan".to_string(), value: 1 },
                CategoryCount { name: "SUV".to_string(), value: 2 },
            ]
        );
        assert_eq!(stats.bookings_by_month.len(), 12);
        assert_eq!(stats.bookings_by_month[5].name, "Jun");
        assert_eq!(stats.bookings_by_month[5].bookings, 2);
        assert!((stats.bookings_by_month[4].revenue - 100.0).abs() < 1e-9);

        let top = &stats.vehicle_performance[0];
        assert_eq!(top.name, "2022 Make M1");
        assert_eq!(top.bookings, 2);
        assert_eq!(top.rating, Some(4.5));

        let recent: Vec<i64> = stats.recent_bookings.iter().map(|b| b.id).collect();
        assert_eq!(recent, vec![3, 2, 1]);
        assert_eq!(stats.recent_bookings[0].customer, "Ann Lee");
    }

    #[test]
    fn test_january_compares_with_december() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let december = Utc.with_ymd_and_hms(2023, 12, 30, 0, 0, 0).unwrap();
        let bookings = vec![booking(1, 1, BookingStatus::Completed, december, 80.0)];
        let stats = DashboardStats::compute(&bookings, &[], now);
        assert!((stats.last_month_revenue - 80.0).abs() < 1e-9);
        assert_eq!(stats.revenue_change_percent(), Some(-100.0));
        // Last year's booking is outside this year's months.
        assert!(stats.bookings_by_month.iter().all(|m| m.bookings == 0));
    }

    #[test]
    fn test_empty_dashboard() {
        let stats = DashboardStats::compute(&[], &[], testing::noon());
        assert_eq!(stats.total_bookings, 0);
        assert_eq!(stats.revenue_change_percent(), None);
        assert!(stats.vehicle_performance.is_empty());
    }

    #[tokio::test]
    async fn test_load_dashboard() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/bookings"))
            .and(query_param("pageSize", "1000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{
                    "id": 9, "vehicleId": 1, "status": "Approved", "totalPrice": 120.0,
                    "pickupDate": "2024-06-12T10:00:00", "returnDate": "2024-06-15T10:00:00"
                }],
                "totalPages": 1
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/vehicles"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 1, "make": "Kia", "model": "Niro", "year": 2023, "dailyRate": 40.0, "status": "Reserved" }
            ])))
            .mount(&server)
            .await;

        let ctx = testing::served(&server, Some(Role::Manager));
        let text = ctx.show(&DashboardPage).await.unwrap();
        assert!(text.contains("Bookings: 1 total, 0 pending, 1 active, 0 completed"));
        assert!(text.contains("$120.00 this month"));
    }

    #[tokio::test]
    async fn test_load_walks_every_booking_page() {
        let server = MockServer::start().await;
        for (page, id) in [("1", 1), ("2", 2), ("3", 3)] {
            Mock::given(method("GET"))
                .and(path("/api/bookings"))
                .and(query_param("pageNumber", page))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "items": [{
                        "id": id, "vehicleId": 1, "status": "Completed", "totalPrice": 100.0,
                        "pickupDate": "2024-06-01T10:00:00", "returnDate": "2024-06-03T10:00:00"
                    }],
                    "totalPages": 3,
                    "totalCount": 3
                })))
                .expect(1)
                .mount(&server)
                .await;
        }
        Mock::given(method("GET"))
            .and(path("/api/vehicles"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let ctx = testing::served(&server, Some(Role::Manager));
        let stats = DashboardPage.load(&ctx).await.unwrap();
        assert_eq!(stats.total_bookings, 3);
        assert_eq!(stats.completed_bookings, 3);
        assert!((stats.total_revenue - 300.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_load_failure_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let ctx = testing::served(&server, Some(Role::Administrator));
        let err = DashboardPage.load(&ctx).await.unwrap_err();
        assert_eq!(err.to_string(), LOAD_FAILED);
    }

    #[tokio::test]
    async fn test_customers_are_turned_away() {
        let ctx = testing::signed_in(Role::Customer);
        assert!(matches!(ctx.show(&DashboardPage).await, Err(Error::Forbidden { .. })));
    }
}
