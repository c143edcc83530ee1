//! HTTP transport shared by every service group.

use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::auth::token::fingerprint;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::storage::SessionStore;

/// Client for the rental REST API.
///
/// Attaches the stored bearer token to every request. A 401 answer to an
/// authenticated request discards the token, mirroring a browser session
/// being sent back to the login page.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    store: Arc<dyn SessionStore>,
}

impl ApiClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &Config, store: Arc<dyn SessionStore>) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(&config.api.user_agent)
            .danger_accept_invalid_certs(config.api.accept_invalid_certs)
            .build()?;

        Ok(Self::with_http_client(http, &config.api.base_url, store))
    }

    /// Build a client around an existing `reqwest::Client`.
    #[must_use]
    pub fn with_http_client(http: Client, base_url: &str, store: Arc<dyn SessionStore>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
        }
    }

    /// The API base URL, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The token store this client reads from.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Start a request, attaching the bearer token when one is stored.
    fn request(&self, method: Method, path: &str) -> Result<(RequestBuilder, bool)> {
        let url = self.url(path);
        trace!("{} {}", method, url);

        let mut builder = self.http.request(method, url);
        let token = self.store.load_token()?;
        let authenticated = token.is_some();
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        Ok((builder, authenticated))
    }

    /// Send a request and turn failure statuses into errors.
    async fn send(&self, builder: RequestBuilder, authenticated: bool) -> Result<Response> {
        let response = builder.send().await?;
        let status = response.status();
        debug!("{} -> {}", response.url().path(), status);

        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED && authenticated {
            if let Some(token) = self.store.load_token()? {
                warn!("Backend rejected token {}; clearing session", fingerprint(&token));
            }
            self.store.clear_token()?;
            return Err(Error::Unauthorized);
        }

        let body = response.text().await.unwrap_or_default();
        Err(Error::api(status.as_u16(), error_message(&body)))
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        configure: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<Response> {
        let (builder, authenticated) = self.request(method, path)?;
        self.send(configure(builder), authenticated).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.execute(Method::GET, path, |b| b).await?;
        Self::decode(response).await
    }

    pub(crate) async fn get_with<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self.execute(Method::GET, path, |b| b.query(query)).await?;
        Self::decode(response).await
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.execute(Method::POST, path, |b| b.json(body)).await?;
        Self::decode(response).await
    }

    /// POST where the response body is not needed.
    pub(crate) async fn post_unit<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<()> {
        self.execute(Method::POST, path, |b| b.json(body)).await?;
        Ok(())
    }

    pub(crate) async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.execute(Method::PUT, path, |b| b.json(body)).await?;
        Self::decode(response).await
    }

    /// PUT where the response body is not needed. `None` sends no body.
    pub(crate) async fn put_unit<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<()> {
        self.execute(Method::PUT, path, |b| match body {
            Some(body) => b.json(body),
            None => b,
        })
        .await?;
        Ok(())
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        self.execute(Method::DELETE, path, |b| b).await?;
        Ok(())
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T> {
        let response = self.execute(Method::POST, path, |b| b.multipart(form)).await?;
        Self::decode(response).await
    }
}

/// Pick a readable message out of an error body.
///
/// ASP.NET answers with a bare JSON string, a problem-details object, or
/// plain text depending on the action. An empty body yields an empty
/// message so callers fall back to their own wording.
fn error_message(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return String::new();
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::String(message)) => message,
        Ok(serde_json::Value::Object(fields)) => ["message", "title", "error"]
            .iter()
            .find_map(|key| fields.get(*key).and_then(|v| v.as_str()))
            .map_or_else(|| body.to_string(), ToString::to_string),
        _ => body.to_string(),
    }
}
