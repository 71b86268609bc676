/// Authenticated-request context
///
/// After the session middleware validates a bearer token, it inserts an
/// `AuthContext` into the request extensions. Handlers extract it with
/// Axum's `Extension` extractor to learn who is performing the action.
///
/// # Example
///
/// ```text
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("Hello, {}!", auth.username)
/// }
/// ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Context describing the authenticated user behind a request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Username, surfaced in "registered by" notices
    pub username: String,

    /// The session backing this request
    pub session_id: Uuid,
}

/// Authentication failure taxonomy
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header was present
    #[error("missing credentials")]
    MissingCredentials,

    /// The Authorization header was not a Bearer token
    #[error("invalid credential format: {0}")]
    InvalidFormat(String),

    /// The token does not correspond to an active session
    #[error("invalid or expired session")]
    InvalidSession,

    /// The session store could not be queried
    #[error("session store error: {0}")]
    StoreError(String),
}
