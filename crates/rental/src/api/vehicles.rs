use chrono::NaiveDate;
use serde::Serialize;

use crate::error::Result;
use crate::models::{Paged, Review, Vehicle, VehicleInput, VehicleQuery};

use super::ApiClient;

#[derive(Debug, Clone, Copy)]
pub struct VehicleService<'a> {
    pub(super) client: &'a ApiClient,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AvailabilityQuery {
    start_date: NaiveDate,
    end_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    category_id: Option<i64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageQuery {
    page_number: u32,
    page_size: u32,
}

impl VehicleService<'_> {
    /// `GET /api/vehicles`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list(self, query: &VehicleQuery) -> Result<Vec<Vehicle>> {
        self.client.get_with("/api/vehicles", query).await
    }

    /// `GET /api/vehicles/{id}`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the vehicle does not exist.
    pub async fn get(self, id: i64) -> Result<Vehicle> {
        self.client.get(&format!("/api/vehicles/{id}")).await
    }

    /// Vehicles free for the whole date range, optionally in one category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn available(
        self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        category_id: Option<i64>,
    ) -> Result<Vec<Vehicle>> {
        let query = AvailabilityQuery {
            start_date,
            end_date,
            category_id,
        };
        self.client.get_with("/api/vehicles/available", &query).await
    }

    /// Free-text search over make, model and description.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn search(self, query: &str) -> Result<Vec<Vehicle>> {
        self.client
            .get_with("/api/vehicles/search", &[("query", query)])
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn by_category(self, category_id: i64) -> Result<Vec<Vehicle>> {
        self.client
            .get(&format!("/api/vehicles/category/{category_id}"))
            .await
    }

    /// One page of the full fleet, for the back office.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn paginated(self, page_number: u32, page_size: u32) -> Result<Paged<Vehicle>> {
        let query = PageQuery {
            page_number,
            page_size,
        };
        self.client.get_with("/api/vehicles/paginated", &query).await
    }

    /// # Errors
    ///
    /// Returns an error if the backend rejects the vehicle.
    pub async fn create(self, vehicle: &VehicleInput) -> Result<()> {
        self.client.post_unit("/api/vehicles", vehicle).await
    }

    /// # Errors
    ///
    /// Returns an error if the backend rejects the update.
    pub async fn update(self, id: i64, vehicle: &VehicleInput) -> Result<()> {
        self.client
            .put_unit(&format!("/api/vehicles/{id}"), Some(vehicle))
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the backend refuses the deletion.
    pub async fn delete(self, id: i64) -> Result<()> {
        self.client.delete(&format!("/api/vehicles/{id}")).await
    }

    /// `GET /api/vehicles/{id}/reviews`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn reviews(self, id: i64) -> Result<Vec<Review>> {
        self.client.get(&format!("/api/vehicles/{id}/reviews")).await
    }
}
