//! Bearer token persistence.

use std::sync::Mutex;

use tracing::debug;

use super::Storage;
use crate::auth::token::fingerprint;
use crate::error::{Error, Result};

/// Local storage key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Where the session keeps its bearer token between requests and runs.
pub trait SessionStore: Send + Sync + std::fmt::Debug {
    /// Read the stored token, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn load_token(&self) -> Result<Option<String>>;

    /// Store a token, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn save_token(&self, token: &str) -> Result<()>;

    /// Forget the stored token. Clearing an empty store is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn clear_token(&self) -> Result<()>;
}

impl SessionStore for Storage {
    fn load_token(&self) -> Result<Option<String>> {
        self.get_item(TOKEN_KEY)
    }

    fn save_token(&self, token: &str) -> Result<()> {
        debug!("Persisting token {}", fingerprint(token));
        self.set_item(TOKEN_KEY, token)
    }

    fn clear_token(&self) -> Result<()> {
        if self.remove_item(TOKEN_KEY)? {
            debug!("Removed stored token");
        }
        Ok(())
    }
}

/// A store that keeps the token in memory only; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    token: Mutex<Option<String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a token.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    fn slot(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>> {
        self.token
            .lock()
            .map_err(|_| Error::internal("token store lock poisoned"))
    }
}

impl SessionStore for MemoryStore {
    fn load_token(&self) -> Result<Option<String>> {
        Ok(self.slot()?.clone())
    }

    fn save_token(&self, token: &str) -> Result<()> {
        *self.slot()? = Some(token.to_string());
        Ok(())
    }

    fn clear_token(&self) -> Result<()> {
        *self.slot()? = None;
        Ok(())
    }
}
