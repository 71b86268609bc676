/// Categorized status messages
///
/// Every mutating or querying operation surfaces its outcome to the client
/// as a list of categorized messages alongside the structured payload:
/// success confirmations, informational notes (who performed the action,
/// VIP detection), warnings (inactive product, empty search), and errors.
///
/// # Example
///
/// ```
/// use tienda_shared::notify::{Level, Notice};
///
/// let notices = vec![
///     Notice::success("Customer \"Ana\" created"),
///     Notice::info("Registered by: admin"),
/// ];
/// assert_eq!(notices[0].level, Level::Success);
/// ```

use serde::{Deserialize, Serialize};

/// Message category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// The operation completed as requested
    Success,

    /// Supplementary information about the outcome
    Info,

    /// The operation completed but something deserves attention
    Warning,

    /// The operation failed
    Error,
}

/// A single status message attached to a response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Message category
    pub level: Level,

    /// Human-readable message text
    pub text: String,
}

impl Notice {
    /// Creates a success message
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            text: text.into(),
        }
    }

    /// Creates an informational message
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            text: text.into(),
        }
    }

    /// Creates a warning message
    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: Level::Warning,
            text: text.into(),
        }
    }

    /// Creates an error message
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_level() {
        assert_eq!(Notice::success("ok").level, Level::Success);
        assert_eq!(Notice::info("fyi").level, Level::Info);
        assert_eq!(Notice::warning("careful").level, Level::Warning);
        assert_eq!(Notice::error("boom").level, Level::Error);
    }

    #[test]
    fn test_level_serializes_lowercase() {
        let json = serde_json::to_string(&Notice::warning("w")).unwrap();
        assert_eq!(json, r#"{"level":"warning","text":"w"}"#);
    }
}
