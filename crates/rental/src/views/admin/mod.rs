//! The back office: dashboard, bookings, vehicles and users.
//!
//! Managers and administrators may open every page here except users, which
//! is for administrators only. Listings page on the server; filters that are
//! incomplete or blank are dropped before the request is made.

pub mod bookings;
pub mod dashboard;
pub mod users;
pub mod vehicles;

pub use bookings::{AdminBookingsPage, BookingDetailsPage};
pub use dashboard::{DashboardPage, DashboardStats};
pub use users::{AdminUsersPage, UserDetailsPage};
pub use vehicles::AdminVehiclesPage;
