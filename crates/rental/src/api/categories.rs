use crate::error::Result;
use crate::models::{Category, CategoryInput};

use super::ApiClient;

#[derive(Debug, Clone, Copy)]
pub struct CategoryService<'a> {
    pub(super) client: &'a ApiClient,
}

impl CategoryService<'_> {
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list(self) -> Result<Vec<Category>> {
        self.client.get("/api/categories").await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the category does not exist.
    pub async fn get(self, id: i64) -> Result<Category> {
        self.client.get(&format!("/api/categories/{id}")).await
    }

    /// # Errors
    ///
    /// Returns the backend's refusal.
    pub async fn create(self, category: &CategoryInput) -> Result<()> {
        self.client.post_unit("/api/categories", category).await
    }

    /// # Errors
    ///
    /// Returns the backend's refusal.
    pub async fn update(self, id: i64, category: &CategoryInput) -> Result<()> {
        self.client
            .put_unit(&format!("/api/categories/{id}"), Some(category))
            .await
    }

    /// # Errors
    ///
    /// Returns the backend's refusal.
    pub async fn delete(self, id: i64) -> Result<()> {
        self.client.delete(&format!("/api/categories/{id}")).await
    }
}
