use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{Booking, BookingQuery, BookingRequest, BookingStatus, MaybePaged, Paged};

use super::ApiClient;

#[derive(Debug, Clone, Copy)]
pub struct BookingService<'a> {
    pub(super) client: &'a ApiClient,
}

impl BookingService<'_> {
    /// Back-office listing with filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list(self, query: &BookingQuery) -> Result<Paged<Booking>> {
        let page: MaybePaged<Booking> = self.client.get_with("/api/bookings", query).await?;
        Ok(page.into_page(query.page_number, query.page_size))
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the booking does not exist.
    pub async fn get(self, id: i64) -> Result<Booking> {
        self.client.get(&format!("/api/bookings/{id}")).await
    }

    /// Bookings of the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn mine(self) -> Result<Vec<Booking>> {
        self.client.get("/api/bookings/my").await
    }

    /// Bookings awaiting approval.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn pending(self) -> Result<Vec<Booking>> {
        self.client.get("/api/bookings/pending").await
    }

    /// # Errors
    ///
    /// Returns the backend's refusal (vehicle taken, documents missing).
    pub async fn create(self, request: &BookingRequest) -> Result<()> {
        self.client.post_unit("/api/bookings", request).await
    }

    /// Set the status. The body is the bare JSON string of the status.
    ///
    /// # Errors
    ///
    /// Returns the backend's refusal.
    pub async fn update_status(self, id: i64, status: BookingStatus) -> Result<()> {
        self.client
            .put_unit(&format!("/api/bookings/{id}/status"), Some(status.as_str()))
            .await
    }

    /// Move the return date. The body is the bare JSON string of the date.
    ///
    /// # Errors
    ///
    /// Returns the backend's refusal.
    pub async fn extend(self, id: i64, new_return_date: DateTime<Utc>) -> Result<()> {
        self.client
            .put_unit(&format!("/api/bookings/{id}/extend"), Some(&new_return_date))
            .await
    }

    /// # Errors
    ///
    /// Returns the backend's refusal.
    pub async fn cancel(self, id: i64) -> Result<()> {
        self.client
            .put_unit::<()>(&format!("/api/bookings/{id}/cancel"), None)
            .await
    }
}
