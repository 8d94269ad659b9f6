//! Data models for wg-easy entities.

pub mod peer;

pub use peer::Peer;
