use crate::error::Result;
use crate::models::{AuthResponse, Credentials, GoogleLogin, Registration};

use super::ApiClient;

/// Login and registration.
#[derive(Debug, Clone, Copy)]
pub struct AuthService<'a> {
    pub(super) client: &'a ApiClient,
}

impl AuthService<'_> {
    /// `POST /api/auth/login`
    ///
    /// # Errors
    ///
    /// Returns the backend's refusal as [`crate::Error::Api`].
    pub async fn login(self, credentials: &Credentials) -> Result<AuthResponse> {
        self.client.post("/api/auth/login", credentials).await
    }

    /// `POST /api/auth/register`. The response body is ignored.
    ///
    /// # Errors
    ///
    /// Returns the backend's refusal as [`crate::Error::Api`].
    pub async fn register(self, registration: &Registration) -> Result<()> {
        self.client.post_unit("/api/auth/register", registration).await
    }

    /// `POST /api/auth/google-login`
    ///
    /// # Errors
    ///
    /// Returns the backend's refusal as [`crate::Error::Api`].
    pub async fn google_login(self, login: &GoogleLogin) -> Result<AuthResponse> {
        self.client.post("/api/auth/google-login", login).await
    }
}
