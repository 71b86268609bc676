/// HTTP middleware
///
/// - `security`: security response headers (OWASP recommendations)
///
/// The session authentication layer lives in `crate::app` next to the
/// router that applies it.

pub mod security;
