//! Session management for the wg-easy API.
//!
//! This module provides `SessionManager`, which owns the session cookie,
//! performs the login exchange, and wraps operations so that an expired
//! session triggers exactly one transparent re-authentication.

pub mod session;

pub use session::SessionManager;
