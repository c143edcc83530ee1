use crate::error::Result;
use crate::models::{DamageInput, DamageReport};

use super::ApiClient;

/// Damage reports filed against bookings.
#[derive(Debug, Clone, Copy)]
pub struct DamageService<'a> {
    pub(super) client: &'a ApiClient,
}

impl DamageService<'_> {
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list(self) -> Result<Vec<DamageReport>> {
        self.client.get("/api/damages").await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the report does not exist.
    pub async fn get(self, id: i64) -> Result<DamageReport> {
        self.client.get(&format!("/api/damages/{id}")).await
    }

    /// The report filed for a booking, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any reason other than the
    /// booking having no report.
    pub async fn for_booking(self, booking_id: i64) -> Result<Option<DamageReport>> {
        match self
            .client
            .get(&format!("/api/damages/booking/{booking_id}"))
            .await
        {
            Ok(report) => Ok(Some(report)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// # Errors
    ///
    /// Returns the backend's refusal.
    pub async fn create(self, damage: &DamageInput) -> Result<()> {
        self.client.post_unit("/api/damages", damage).await
    }

    /// # Errors
    ///
    /// Returns the backend's refusal.
    pub async fn update(self, id: i64, damage: &DamageInput) -> Result<()> {
        self.client
            .put_unit(&format!("/api/damages/{id}"), Some(damage))
            .await
    }

    /// # Errors
    ///
    /// Returns the backend's refusal.
    pub async fn delete(self, id: i64) -> Result<()> {
        self.client.delete(&format!("/api/damages/{id}")).await
    }
}
