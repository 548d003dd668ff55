//! Domain core for the warden account service.
//!
//! Everything transport- and storage-agnostic lives here: the user and
//! session models, the credential hasher, the token signer, the store
//! traits, and the auth service plus its request guard. The `warden-db`
//! and `warden-api` crates plug concrete stores and an HTTP surface into
//! these seams.

pub mod auth;
pub mod clock;
pub mod error;
pub mod password;
pub mod session;
pub mod store;
pub mod token;
pub mod types;
pub mod user;
