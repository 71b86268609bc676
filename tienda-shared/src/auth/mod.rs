/// Authentication primitives
///
/// This module provides the pieces the session-based login flow is built on:
///
/// - `password`: Argon2id hashing and verification, plus the registration
///   password rules (pair must match, minimum length)
/// - `token`: session token generation and SHA-256 storage hashing
/// - `context`: the authenticated-request context injected by the session
///   middleware, and the error taxonomy for failed authentication

pub mod context;
pub mod password;
pub mod token;
