use crate::error::Result;
use crate::models::{CanReview, Review, ReviewInput};

use super::ApiClient;

#[derive(Debug, Clone, Copy)]
pub struct ReviewService<'a> {
    pub(super) client: &'a ApiClient,
}

impl ReviewService<'_> {
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn for_vehicle(self, vehicle_id: i64) -> Result<Vec<Review>> {
        self.client
            .get(&format!("/api/reviews/vehicle/{vehicle_id}"))
            .await
    }

    /// Reviews written by the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn mine(self) -> Result<Vec<Review>> {
        self.client.get("/api/reviews/user").await
    }

    /// Whether the logged-in user has a completed, unreviewed rental of
    /// this vehicle.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn can_review(self, vehicle_id: i64) -> Result<bool> {
        let answer: CanReview = self
            .client
            .get(&format!("/api/reviews/can-review/{vehicle_id}"))
            .await?;
        Ok(answer.can_review)
    }

    /// # Errors
    ///
    /// Returns the backend's refusal.
    pub async fn create(self, review: &ReviewInput) -> Result<()> {
        self.client.post_unit("/api/reviews", review).await
    }

    /// # Errors
    ///
    /// Returns the backend's refusal.
    pub async fn delete(self, id: i64) -> Result<()> {
        self.client.delete(&format!("/api/reviews/{id}")).await
    }
}
