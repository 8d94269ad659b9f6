//! HTTP client module for the wg-easy administration API.
//!
//! This module provides the `WgEasyClient` for managing peer identities
//! (create, delete, enable, disable, list, look up) and the transport
//! adapter that classifies raw HTTP outcomes into `ApiError`.
//!
//! Authentication uses a `connect.sid` session cookie obtained through
//! the `/api/session` login exchange; see the `auth` module.

pub mod client;
pub mod error;
pub mod transport;

pub use client::WgEasyClient;
pub use error::ApiError;
