//! Client-side reading of bearer tokens.
//!
//! The client never verifies signatures; it only reads the claims of a token
//! the backend issued to it (or that Google issued for the login handoff).

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};
use crate::models::Role;

/// Claims carried by a backend-issued token.
///
/// ASP.NET backends may emit the long-form claim type URIs instead of the
/// short JWT names; both are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Claims {
    /// User id (`nameid`).
    #[serde(
        default,
        alias = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier"
    )]
    pub nameid: Option<String>,
    /// User name, used as the id when `nameid` is absent.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(
        default,
        alias = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/emailaddress"
    )]
    pub email: Option<String>,
    /// Role claim. Tokens with several roles use the first.
    #[serde(
        default,
        deserialize_with = "first_of_string_or_list",
        alias = "http://schemas.microsoft.com/ws/2008/06/identity/claims/role"
    )]
    pub role: Option<String>,
    /// Expiry as seconds since the Unix epoch.
    #[serde(default)]
    pub exp: Option<i64>,
}

impl Claims {
    /// The user id: `nameid`, falling back to `name`.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.nameid.as_deref().or(self.name.as_deref())
    }

    /// The role claim parsed into a [`Role`].
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.role.as_deref().map(Role::from_wire)
    }

    /// Whether the token had expired at `now`.
    ///
    /// A token without `exp` never expires client-side.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp.is_some_and(|exp| exp < now.timestamp())
    }

    /// Whether the token has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// The parts of a Google ID token passed on to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GoogleProfile {
    /// Google account id.
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
}

/// Decode the claims of a backend token.
///
/// # Errors
///
/// Returns [`Error::TokenDecode`] if the token is not three dot-separated
/// segments or its payload is not base64url-encoded JSON.
pub fn decode_claims(token: &str) -> Result<Claims> {
    decode_payload(token)
}

/// Decode a Google credential into the profile sent to the backend.
///
/// # Errors
///
/// Returns [`Error::TokenDecode`] if the credential is malformed or lacks
/// `sub` or `email`.
pub fn decode_google_credential(credential: &str) -> Result<GoogleProfile> {
    decode_payload(credential)
}

/// A short, stable identifier for a token that is safe to log.
#[must_use]
pub fn fingerprint(token: &str) -> String {
    let hash = blake3::hash(token.as_bytes());
    hash.to_hex()[..12].to_string()
}

fn decode_payload<T: for<'de> Deserialize<'de>>(token: &str) -> Result<T> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 {
        return Err(Error::token_decode(format!(
            "expected 3 segments, found {}",
            segments.len()
        )));
    }

    let payload = segments[1].trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| Error::token_decode(format!("payload is not base64url: {e}")))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| Error::token_decode(format!("payload is not valid claims JSON: {e}")))
}

fn first_of_string_or_list<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(role)) => Some(role),
        Some(OneOrMany::Many(roles)) => roles.into_iter().next(),
        None => None,
    })
}

/// Build an unsigned token around a JSON payload.
#[cfg(test)]
pub(crate) fn encode_test_token(payload: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{body}.signature")
}
