//! Authentication: the login/refresh lifecycle and the request guard.

pub mod guard;
pub mod service;

pub use guard::{evaluate, GuardOutcome};
pub use service::{AuthService, Credentials, LoginSession};
