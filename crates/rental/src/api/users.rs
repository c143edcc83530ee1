use crate::error::Result;
use crate::models::{
    Document, DocumentInput, LoyaltyInfo, MaybePaged, Paged, ProfileUpdate, Role, User, UserInput,
    UserQuery,
};

use super::ApiClient;

/// Accounts, the current user's profile, documents and loyalty.
#[derive(Debug, Clone, Copy)]
pub struct UserService<'a> {
    pub(super) client: &'a ApiClient,
}

impl UserService<'_> {
    /// Back-office listing. Older backends return a plain array; it is
    /// paged client-side.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list(self, query: &UserQuery) -> Result<Paged<User>> {
        let page: MaybePaged<User> = self.client.get_with("/api/users", query).await?;
        Ok(page.into_page(query.page_number, query.page_size))
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the user does not exist.
    pub async fn get(self, id: &str) -> Result<User> {
        self.client.get(&format!("/api/users/{id}")).await
    }

    /// # Errors
    ///
    /// Returns the backend's refusal.
    pub async fn create(self, user: &UserInput) -> Result<()> {
        self.client.post_unit("/api/users", user).await
    }

    /// # Errors
    ///
    /// Returns the backend's refusal.
    pub async fn update(self, id: &str, user: &UserInput) -> Result<()> {
        self.client
            .put_unit(&format!("/api/users/{id}"), Some(user))
            .await
    }

    /// # Errors
    ///
    /// Returns the backend's refusal.
    pub async fn update_role(self, id: &str, role: &Role) -> Result<()> {
        self.client
            .put_unit(&format!("/api/users/{id}/role"), Some(role.as_str()))
            .await
    }

    /// The logged-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn profile(self) -> Result<User> {
        self.client.get("/api/users/profile").await
    }

    /// Update the logged-in user's profile; returns the stored profile.
    ///
    /// # Errors
    ///
    /// Returns the backend's refusal.
    pub async fn update_profile(self, update: &ProfileUpdate) -> Result<User> {
        self.client.put("/api/users/profile", update).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn documents(self) -> Result<Vec<Document>> {
        self.client.get("/api/users/documents").await
    }

    /// Record an uploaded document against the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns the backend's refusal.
    pub async fn add_document(self, document: &DocumentInput) -> Result<()> {
        self.client.post_unit("/api/users/documents", document).await
    }

    /// # Errors
    ///
    /// Returns the backend's refusal.
    pub async fn verify_document(self, id: i64) -> Result<()> {
        self.client
            .put_unit::<()>(&format!("/api/users/documents/{id}/verify"), None)
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn loyalty(self) -> Result<LoyaltyInfo> {
        self.client.get("/api/users/loyalty").await
    }
}
