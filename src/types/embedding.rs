//! Embedding vector type shared by collaborator providers and the scorer.

use serde::{Deserialize, Serialize};

/// A fixed-length embedding vector tagged with its producing model.
///
/// Two vectors are comparable only if produced by the same model and
/// dimensionality. The scorer enforces this; the tag exists so a mixed
/// vector space fails loudly instead of silently corrupting similarities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingVector {
    /// The vector components.
    pub values: Vec<f32>,
    /// Identifier of the producing model.
    pub model: String,
    /// Number of dimensions (== `values.len()`).
    pub dimensions: usize,
}

impl EmbeddingVector {
    /// Construct a vector, deriving `dimensions` from the values.
    pub fn new(values: Vec<f32>, model: impl Into<String>) -> Self {
        let dimensions = values.len();
        Self {
            values,
            model: model.into(),
            dimensions,
        }
    }

    /// Whether every component is a finite number.
    ///
    /// Embedding backends occasionally emit NaN/Inf on degenerate input;
    /// those vectors must be rejected as [`HuginnError::Embedding`](crate::HuginnError::Embedding),
    /// never scored.
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }
}
