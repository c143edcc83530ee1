//! Client for the rental REST API.
//!
//! [`ApiClient`] owns the transport. Endpoints are grouped the way the
//! backend groups its controllers; each group is a borrowed handle:
//!
//! ```no_run
//! # async fn demo(client: &rental::api::ApiClient) -> rental::Result<()> {
//! let vehicle = client.vehicles().get(3).await?;
//! let reviews = client.reviews().for_vehicle(vehicle.id).await?;
//! # Ok(())
//! # }
//! ```

mod auth;
mod bookings;
mod categories;
mod client;
mod damages;
mod files;
mod reviews;
mod users;
mod vehicles;

pub use auth::AuthService;
pub use bookings::BookingService;
pub use categories::CategoryService;
pub use client::ApiClient;
pub use damages::DamageService;
pub use files::{FileService, DEFAULT_UPLOAD_FOLDER};
pub use reviews::ReviewService;
pub use users::UserService;
pub use vehicles::VehicleService;

impl ApiClient {
    /// `/api/auth` endpoints.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService { client: self }
    }

    /// `/api/vehicles` endpoints.
    #[must_use]
    pub fn vehicles(&self) -> VehicleService<'_> {
        VehicleService { client: self }
    }

    /// `/api/bookings` endpoints.
    #[must_use]
    pub fn bookings(&self) -> BookingService<'_> {
        BookingService { client: self }
    }

    /// `/api/users` endpoints, including profile, documents and loyalty.
    #[must_use]
    pub fn users(&self) -> UserService<'_> {
        UserService { client: self }
    }

    /// `/api/categories` endpoints.
    #[must_use]
    pub fn categories(&self) -> CategoryService<'_> {
        CategoryService { client: self }
    }

    /// `/api/reviews` endpoints.
    #[must_use]
    pub fn reviews(&self) -> ReviewService<'_> {
        ReviewService { client: self }
    }

    /// `/api/damages` endpoints.
    #[must_use]
    pub fn damages(&self) -> DamageService<'_> {
        DamageService { client: self }
    }

    /// `/api/files` endpoints.
    #[must_use]
    pub fn files(&self) -> FileService<'_> {
        FileService { client: self }
    }
}
