//! Core IntentClassifier trait

use async_trait::async_trait;

use crate::Result;
use crate::types::{ClassificationResult, ParseOptions};

/// The core classifier trait all implementations provide.
///
/// Implementations are stateless per call: the only shared state is the
/// read-only seed-embedding cache built at construction. `parse` called
/// twice with the same text (and no conversation history) returns the
/// same intent and confidence.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    /// Implementation name for logging and selection (e.g. "accurate").
    fn name(&self) -> &str;

    /// Classify an utterance into an intent with extracted entities.
    ///
    /// Returns either a complete [`ClassificationResult`] (possibly
    /// low-confidence) or a typed error — never a partially-populated
    /// result.
    async fn parse(&self, text: &str, options: &ParseOptions) -> Result<ClassificationResult>;
}
