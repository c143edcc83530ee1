//! Configuration management for the rental client.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use chrono::format::{Item, StrftimeItems};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::PaymentMethod;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "rental";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "session.db";

/// Default API base URL (the backend's development address).
pub const DEFAULT_API_URL: &str = "https://localhost:7179";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `RENTAL_`, sections separated by
///    `__`, e.g. `RENTAL_API__BASE_URL`)
/// 2. TOML config file at `~/.config/rental/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend API configuration.
    pub api: ApiConfig,
    /// Local storage configuration.
    pub storage: StorageConfig,
    /// Booking defaults.
    pub booking: BookingConfig,
    /// Output configuration.
    pub display: DisplayConfig,
}

/// Backend API configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the rental API.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Connection timeout in seconds.
    pub connect_timeout_secs: u64,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Accept self-signed certificates (local development backends).
    pub accept_invalid_certs: bool,
}

/// Local storage configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file holding the session.
    /// Defaults to `~/.local/share/rental/session.db`
    pub database_path: Option<PathBuf>,
}

/// Booking defaults used when the user does not supply a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    /// Length of a new rental when no return date is given.
    pub default_rental_days: u32,
    /// Days added to the current return date when proposing an extension.
    pub default_extension_days: u32,
    /// Payment method used when none is given.
    pub default_payment_method: String,
    /// Folder name sent with document uploads.
    pub upload_folder: String,
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Page size for paginated admin lists.
    pub page_size: u32,
    /// `strftime` format used for dates in plain and table output.
    pub date_format: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: format!("rentctl/{}", env!("CARGO_PKG_VERSION")),
            accept_invalid_certs: false,
        }
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            default_rental_days: 7,
            default_extension_days: 3,
            default_payment_method: "PayNow".to_string(),
            upload_folder: "documents".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            date_format: "%b %-d, %Y".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("RENTAL_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.api.base_url).map_err(|e| Error::ConfigValidation {
            message: format!("invalid api.base_url '{}': {e}", self.api.base_url),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::ConfigValidation {
                message: format!("api.base_url must use http or https, got '{}'", url.scheme()),
            });
        }

        if self.api.timeout_secs == 0 || self.api.connect_timeout_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "api timeouts must be greater than 0".to_string(),
            });
        }

        if self.booking.default_rental_days == 0 {
            return Err(Error::ConfigValidation {
                message: "booking.default_rental_days must be greater than 0".to_string(),
            });
        }

        if self.booking.default_payment_method.parse::<PaymentMethod>().is_err() {
            return Err(Error::ConfigValidation {
                message: format!(
                    "unknown booking.default_payment_method '{}'",
                    self.booking.default_payment_method
                ),
            });
        }

        if self.display.page_size == 0 {
            return Err(Error::ConfigValidation {
                message: "display.page_size must be greater than 0".to_string(),
            });
        }

        if StrftimeItems::new(&self.display.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(Error::ConfigValidation {
                message: format!("invalid date format: {}", self.display.date_format),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// The payment method preselected on the booking form.
    #[must_use]
    pub fn default_payment_method(&self) -> PaymentMethod {
        self.booking
            .default_payment_method
            .parse()
            .unwrap_or(PaymentMethod::PayNow)
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Get the connect timeout as a Duration.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.api.connect_timeout_secs)
    }
}
