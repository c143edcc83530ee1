//! `rental` - Client for a vehicle rental service
//!
//! This library provides the pages, business rules and API bindings behind
//! the `rentctl` binary: browsing and booking vehicles, managing a customer's
//! documents and loyalty standing, and the back office for staff.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod rules;
pub mod storage;
pub mod views;

pub use api::ApiClient;
pub use auth::Session;
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use storage::{MemoryStore, SessionStore, Storage};
pub use views::AppContext;
