//! The authentication context.
//!
//! A [`Session`] knows who is logged in. It starts in the loading state,
//! [`Session::restore`] settles it from the stored token, and the login
//! operations move it between anonymous and authenticated.

use serde::Serialize;
use tracing::{debug, info, warn};

use super::token::{decode_claims, fingerprint, GoogleProfile};
use crate::api::ApiClient;
use crate::error::{Error, Result};
use crate::models::{AuthResponse, Credentials, GoogleLogin, ProfileUpdate, Registration, Role, User};

const LOGIN_FAILED: &str = "Login failed. Please try again.";
const REGISTRATION_FAILED: &str = "Registration failed. Please try again.";
const GOOGLE_LOGIN_FAILED: &str = "Google login failed. Please try again.";
const PROFILE_UPDATE_FAILED: &str = "Failed to update profile. Please try again.";

/// Result of a login-style action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
#[must_use]
pub enum AuthOutcome {
    Success,
    /// The message to show; the backend's own text when it sent one.
    Failed { message: String },
}

impl AuthOutcome {
    fn failed(err: &Error, fallback: &str) -> Self {
        warn!("Auth action failed: {}", err);
        Self::Failed {
            message: err.user_message(fallback),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Convert to a `Result`, for callers that propagate with `?`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAllowed`] carrying the failure message.
    pub fn into_result(self) -> Result<()> {
        match self {
            Self::Success => Ok(()),
            Self::Failed { message } => Err(Error::not_allowed(message)),
        }
    }
}

/// Who is logged in.
#[derive(Debug, Clone)]
pub struct Session {
    client: ApiClient,
    current_user: Option<User>,
    role: Option<Role>,
    is_authenticated: bool,
    loading: bool,
}

impl Session {
    /// A session that has not yet looked at the stored token.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            current_user: None,
            role: None,
            is_authenticated: false,
            loading: true,
        }
    }

    /// Create a session and restore it from the stored token.
    ///
    /// # Errors
    ///
    /// Returns an error only if the token store cannot be read or written.
    pub async fn restored(client: ApiClient) -> Result<Self> {
        let mut session = Self::new(client);
        session.restore().await?;
        Ok(session)
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    /// Role from the token claims.
    #[must_use]
    pub fn role(&self) -> Option<&Role> {
        self.role.as_ref()
    }

    /// Role from the token claims, falling back to the profile's role.
    #[must_use]
    pub fn effective_role(&self) -> Option<&Role> {
        self.role
            .as_ref()
            .or_else(|| self.current_user.as_ref().and_then(|u| u.role.as_ref()))
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Settle the session from the stored token.
    ///
    /// An undecodable or expired token is discarded. A valid token makes the
    /// session authenticated straight away with the identity in its claims;
    /// the full profile is then fetched, and a failed fetch keeps the
    /// provisional user.
    ///
    /// # Errors
    ///
    /// Returns an error only if the token store cannot be read or written.
    pub async fn restore(&mut self) -> Result<()> {
        let result = self.restore_inner().await;
        self.loading = false;
        result
    }

    async fn restore_inner(&mut self) -> Result<()> {
        let Some(token) = self.client.store().load_token()? else {
            debug!("No stored token; anonymous session");
            return Ok(());
        };

        let claims = match decode_claims(&token) {
            Ok(claims) => claims,
            Err(e) => {
                warn!("Discarding unreadable token {}: {}", fingerprint(&token), e);
                return self.logout();
            }
        };

        if claims.is_expired() {
            info!("Stored token {} has expired", fingerprint(&token));
            return self.logout();
        }

        self.current_user = Some(User::provisional(
            claims.user_id().unwrap_or_default(),
            claims.email.clone().unwrap_or_default(),
        ));
        self.role = claims.role();
        self.is_authenticated = true;

        match self.client.users().profile().await {
            Ok(profile) => self.current_user = Some(profile),
            Err(e) if e.is_unauthorized() => {
                // The backend no longer accepts the token and has cleared it.
                self.forget();
            }
            Err(e) => warn!("Could not fetch profile, keeping token identity: {}", e),
        }

        Ok(())
    }

    /// Log in with email and password.
    pub async fn login(&mut self, credentials: &Credentials) -> AuthOutcome {
        match self.client.auth().login(credentials).await {
            Ok(response) => self.accept(response, LOGIN_FAILED),
            Err(e) => AuthOutcome::failed(&e, LOGIN_FAILED),
        }
    }

    /// Create an account. Does not log in.
    pub async fn register(&mut self, registration: &Registration) -> AuthOutcome {
        match self.client.auth().register(registration).await {
            Ok(()) => {
                info!("Registered {}", registration.email);
                AuthOutcome::Success
            }
            Err(e) => AuthOutcome::failed(&e, REGISTRATION_FAILED),
        }
    }

    /// Log in with a decoded Google credential.
    pub async fn google_login(&mut self, profile: &GoogleProfile) -> AuthOutcome {
        let request = GoogleLogin {
            google_id: profile.sub.clone(),
            email: profile.email.clone(),
            name: profile.name.clone(),
        };
        match self.client.auth().google_login(&request).await {
            Ok(response) => self.accept(response, GOOGLE_LOGIN_FAILED),
            Err(e) => AuthOutcome::failed(&e, GOOGLE_LOGIN_FAILED),
        }
    }

    /// Forget the token and the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the token store cannot be written.
    pub fn logout(&mut self) -> Result<()> {
        self.forget();
        self.client.store().clear_token()
    }

    /// Update the logged-in user's profile.
    pub async fn update_profile(&mut self, update: &ProfileUpdate) -> AuthOutcome {
        match self.client.users().update_profile(update).await {
            Ok(user) => {
                self.current_user = Some(user);
                AuthOutcome::Success
            }
            Err(e) => AuthOutcome::failed(&e, PROFILE_UPDATE_FAILED),
        }
    }

    fn accept(&mut self, response: AuthResponse, fallback: &str) -> AuthOutcome {
        let claims = match decode_claims(&response.token) {
            Ok(claims) => claims,
            Err(e) => return AuthOutcome::failed(&e, fallback),
        };
        if let Err(e) = self.client.store().save_token(&response.token) {
            return AuthOutcome::failed(&e, fallback);
        }

        let user = response.user.unwrap_or_else(|| {
            User::provisional(
                claims.user_id().unwrap_or_default(),
                claims.email.clone().unwrap_or_default(),
            )
        });
        info!("Logged in as {}", user.email);

        self.role = claims.role();
        self.current_user = Some(user);
        self.is_authenticated = true;
        self.loading = false;
        AuthOutcome::Success
    }

    fn forget(&mut self) {
        self.current_user = None;
        self.role = None;
        self.is_authenticated = false;
    }
}

#[cfg(test)]
impl Session {
    fn offline_client() -> ApiClient {
        ApiClient::with_http_client(
            reqwest::Client::new(),
            "http://127.0.0.1:9",
            std::sync::Arc::new(crate::storage::MemoryStore::new()),
        )
    }

    pub(crate) fn loading_for_tests() -> Self {
        Self::new(Self::offline_client())
    }

    pub(crate) fn anonymous_for_tests() -> Self {
        Self::anonymous_with_client_for_tests(Self::offline_client())
    }

    pub(crate) fn anonymous_with_client_for_tests(client: ApiClient) -> Self {
        let mut session = Self::new(client);
        session.loading = false;
        session
    }

    pub(crate) fn signed_in_for_tests(role: Role) -> Self {
        let mut session = Self::anonymous_for_tests();
        let mut user = User::provisional("1", "user@example.com");
        user.role = Some(role.clone());
        session.set_signed_in_for_tests(Some(role), user);
        session
    }

    pub(crate) fn set_signed_in_for_tests(&mut self, role: Option<Role>, user: User) {
        self.role = role;
        self.current_user = Some(user);
        self.is_authenticated = true;
        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::auth::token::encode_test_token;
    use crate::storage::{MemoryStore, SessionStore};

    fn live_token(role: &str) -> String {
        encode_test_token(&json!({
            "nameid": "u-1",
            "email": "ann@example.com",
            "role": role,
            "exp": 4_102_444_800_i64
        }))
    }

    fn session_for(server: &MockServer, store: Arc<MemoryStore>) -> Session {
        Session::new(ApiClient::with_http_client(
            reqwest::Client::new(),
            &server.uri(),
            store,
        ))
    }

    fn profile_json() -> serde_json::Value {
        json!({
            "id": "u-1",
            "email": "ann@example.com",
            "firstName": "Ann",
            "lastName": "Lee",
            "role": "Customer"
        })
    }

    #[tokio::test]
    async fn test_restore_without_token() {
        let server = MockServer::start().await;
        let mut session = session_for(&server, Arc::new(MemoryStore::new()));
        assert!(session.is_loading());

        session.restore().await.unwrap();
        assert!(!session.is_loading());
        assert!(!session.is_authenticated());
        assert!(session.current_user().is_none());
    }

    #[tokio::test]
    async fn test_restore_with_expired_token_logs_out() {
        let server = MockServer::start().await;
        let token = encode_test_token(&json!({ "nameid": "u-1", "exp": 1 }));
        let store = Arc::new(MemoryStore::with_token(token));
        let mut session = session_for(&server, store.clone());

        session.restore().await.unwrap();
        assert!(!session.is_authenticated());
        assert!(!session.is_loading());
        assert_eq!(store.load_token().unwrap(), None);
    }

    #[tokio::test]
    async fn test_restore_with_garbage_token_logs_out() {
        let server = MockServer::start().await;
        let store = Arc::new(MemoryStore::with_token("garbage"));
        let mut session = session_for(&server, store.clone());

        session.restore().await.unwrap();
        assert!(!session.is_authenticated());
        assert_eq!(store.load_token().unwrap(), None);
    }

    #[tokio::test]
    async fn test_restore_fetches_profile() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile_json()))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::with_token(live_token("Manager")));
        let mut session = session_for(&server, store);
        session.restore().await.unwrap();

        assert!(session.is_authenticated());
        assert_eq!(session.role(), Some(&Role::Manager));
        assert_eq!(session.current_user().unwrap().first_name, "Ann");
    }

    #[tokio::test]
    async fn test_restore_keeps_provisional_user_when_profile_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users/profile"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::with_token(live_token("Customer")));
        let mut session = session_for(&server, store);
        session.restore().await.unwrap();

        assert!(session.is_authenticated());
        let user = session.current_user().unwrap();
        assert_eq!(user.id, "u-1");
        assert_eq!(user.email, "ann@example.com");
    }

    #[tokio::test]
    async fn test_restore_rejected_token_ends_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users/profile"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::with_token(live_token("Customer")));
        let mut session = session_for(&server, store.clone());
        session.restore().await.unwrap();

        assert!(!session.is_authenticated());
        assert_eq!(store.load_token().unwrap(), None);
    }

    #[tokio::test]
    async fn test_login_success_stores_token() {
        let server = MockServer::start().await;
        let token = live_token("Administrator");
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(json!({ "email": "ann@example.com", "password": "Secret1" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "token": token, "user": profile_json() })),
            )
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::new());
        let mut session = session_for(&server, store.clone());
        let outcome = session
            .login(&Credentials {
                email: "ann@example.com".to_string(),
                password: "Secret1".to_string(),
            })
            .await;

        assert_eq!(outcome, AuthOutcome::Success);
        assert!(session.is_authenticated());
        assert_eq!(session.role(), Some(&Role::Administrator));
        assert_eq!(store.load_token().unwrap().as_deref(), Some(token.as_str()));
    }

    #[tokio::test]
    async fn test_login_failure_uses_backend_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(400).set_body_string("Invalid credentials"))
            .mount(&server)
            .await;

        let mut session = session_for(&server, Arc::new(MemoryStore::new()));
        let outcome = session
            .login(&Credentials {
                email: "ann@example.com".to_string(),
                password: "wrong".to_string(),
            })
            .await;

        assert_eq!(
            outcome,
            AuthOutcome::Failed {
                message: "Invalid credentials".to_string()
            }
        );
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_failure_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut session = session_for(&server, Arc::new(MemoryStore::new()));
        let outcome = session
            .login(&Credentials {
                email: "a@b.co".to_string(),
                password: "x".to_string(),
            })
            .await;

        assert_eq!(
            outcome,
            AuthOutcome::Failed {
                message: LOGIN_FAILED.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_register_does_not_log_in() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/register"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let mut session = session_for(&server, Arc::new(MemoryStore::new()));
        let outcome = session
            .register(&Registration {
                first_name: "Ann".to_string(),
                last_name: "Lee".to_string(),
                email: "ann@example.com".to_string(),
                password: "Secret1".to_string(),
                ..Registration::default()
            })
            .await;

        assert!(outcome.is_success());
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_google_login_sends_profile() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/google-login"))
            .and(body_json(json!({
                "googleId": "g-123",
                "email": "ann@example.com",
                "name": "Ann Lee"
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "token": live_token("Customer") })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut session = session_for(&server, Arc::new(MemoryStore::new()));
        let outcome = session
            .google_login(&GoogleProfile {
                sub: "g-123".to_string(),
                email: "ann@example.com".to_string(),
                name: "Ann Lee".to_string(),
            })
            .await;

        assert!(outcome.is_success());
        // No user in the response: identity comes from the token.
        assert_eq!(session.current_user().unwrap().id, "u-1");
    }

    #[tokio::test]
    async fn test_update_profile_replaces_user() {
        let server = MockServer::start().await;
        let mut updated = profile_json();
        updated["firstName"] = json!("Annie");
        Mock::given(method("PUT"))
            .and(path("/api/users/profile"))
            .and(header("authorization", format!("Bearer {}", live_token("Customer")).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(updated))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::with_token(live_token("Customer")));
        let mut session = session_for(&server, store);
        let outcome = session
            .update_profile(&ProfileUpdate {
                first_name: "Annie".to_string(),
                last_name: "Lee".to_string(),
                ..ProfileUpdate::default()
            })
            .await;

        assert!(outcome.is_success());
        assert_eq!(session.current_user().unwrap().first_name, "Annie");
    }

    #[tokio::test]
    async fn test_update_profile_failure_message() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/users/profile"))
            .respond_with(ResponseTemplate::new(400).set_body_string("  "))
            .mount(&server)
            .await;

        let mut session = session_for(&server, Arc::new(MemoryStore::with_token("a.b.c")));
        let outcome = session.update_profile(&ProfileUpdate::default()).await;

        assert_eq!(
            outcome,
            AuthOutcome::Failed {
                message: PROFILE_UPDATE_FAILED.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let server = MockServer::start().await;
        let store = Arc::new(MemoryStore::with_token("a.b.c"));
        let mut session = session_for(&server, store.clone());
        session.set_signed_in_for_tests(Some(Role::Customer), User::provisional("1", "x@y.z"));

        session.logout().unwrap();
        assert!(!session.is_authenticated());
        assert!(session.current_user().is_none());
        assert!(session.role().is_none());
        assert_eq!(store.load_token().unwrap(), None);
    }

    #[test]
    fn test_outcome_into_result() {
        assert!(AuthOutcome::Success.into_result().is_ok());
        let err = AuthOutcome::Failed {
            message: "nope".to_string(),
        }
        .into_result()
        .unwrap_err();
        assert_eq!(err.to_string(), "nope");
    }
}
