//! Decisions the client makes on its own before calling the API.
//!
//! The backend remains the authority: these rules only decide which actions
//! to offer and reject input that would certainly be refused.

pub mod booking;
pub mod documents;
pub mod loyalty;
pub mod pricing;
pub mod validation;

pub use booking::{allowed_actions, BookingAction};
pub use documents::{missing_documents, REQUIRED_DOCUMENTS};
pub use pricing::{quote, PriceQuote};
pub use validation::FieldErrors;
