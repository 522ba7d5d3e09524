//! Session management
//!
//! Connection targets, login negotiation and the authenticated session.

pub mod credentials;
pub mod negotiator;
pub mod state;

pub use credentials::{ANONYMOUS_USERNAME, ConnectionTarget, Credentials, DEFAULT_CONTROL_PORT};
pub use negotiator::negotiate;
pub use state::Session;
