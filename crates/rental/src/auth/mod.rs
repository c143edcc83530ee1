//! Authentication: token claims, the session context and page guards.

pub mod guard;
pub mod session;
pub mod token;

pub use guard::{guard, nav_links, Access, GuardDecision, NavLink, Route};
pub use session::{AuthOutcome, Session};
pub use token::{decode_claims, decode_google_credential, Claims, GoogleProfile};
