//! # Tienda Shared Library
//!
//! This crate contains the record store, authentication primitives, and
//! common types used by the Tienda API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures (the record store)
//! - `auth`: Password hashing and session token utilities
//! - `db`: Connection pool and migration runner
//! - `error`: Store error taxonomy
//! - `notify`: Categorized status messages surfaced to clients

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod notify;

/// Current version of the Tienda shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
