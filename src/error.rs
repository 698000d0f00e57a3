//! Huginn error types

use std::time::Duration;

/// Huginn error types
#[derive(Debug, thiserror::Error)]
pub enum HuginnError {
    // Collaborator errors
    /// The embedding collaborator errored or returned malformed data.
    ///
    /// Fatal for the current request. Never downgraded to zero scores —
    /// a silently-zeroed score map is indistinguishable from "nothing
    /// matches" and corrupts the resolver's floor logic.
    #[error("embedding failure: {0}")]
    Embedding(String),

    /// An input vector was produced by a different model or dimensionality
    /// than the seed cache. Comparing across vector spaces corrupts
    /// similarity scores, so this is rejected loudly.
    #[error("vector space mismatch: cache built with '{expected}' ({expected_dims} dims), got '{got}' ({got_dims} dims)")]
    VectorSpaceMismatch {
        expected: String,
        expected_dims: usize,
        got: String,
        got_dims: usize,
    },

    /// Entity extraction failed. Non-fatal: callers degrade to an empty
    /// entity list and log, since entities only refine scoring.
    #[error("entity extraction failure: {0}")]
    EntityExtraction(String),

    /// A collaborator did not respond within the configured timeout.
    #[error("{operation} timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },

    // Network errors (HTTP collaborator clients)
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("authentication failed")]
    AuthenticationFailed,

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Lifecycle errors
    /// A classifier implementation could not complete startup.
    ///
    /// The selector treats this as a fallback trigger and tries the next
    /// implementation in the preference order.
    #[error("initialization of '{implementation}' failed: {reason}")]
    Initialization {
        implementation: String,
        reason: String,
    },

    /// Every implementation in the fallback chain failed to construct.
    #[error("no classifier implementation available")]
    NoClassifier,

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl HuginnError {
    /// Whether this error should make the selector fall through to the
    /// next implementation in the preference order.
    ///
    /// Only construction-time failures trigger fallback; request-time
    /// errors are terminal for the request and propagate to the caller.
    pub fn is_fallback_trigger(&self) -> bool {
        matches!(self, HuginnError::Initialization { .. })
    }
}

/// Result type alias for Huginn operations
pub type Result<T> = std::result::Result<T, HuginnError>;
