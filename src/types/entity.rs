//! Entity spans produced by the external NER collaborator.

use serde::{Deserialize, Serialize};

/// A typed span extracted from the input text.
///
/// Produced externally and consumed read-only by the heuristic booster.
/// Spans may overlap — the extractor may merge adjacent same-type
/// entities, and the booster must not assume disjoint ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Extractor-defined type tag (e.g. "person", "datetime", "organization").
    #[serde(rename = "type")]
    pub entity_type: String,
    /// The matched surface text.
    pub value: String,
    /// Byte offset of the span start in the original text.
    pub start: usize,
    /// Byte offset one past the span end.
    pub end: usize,
    /// Extractor confidence in [0, 1].
    pub confidence: f32,
}

impl Entity {
    /// Convenience constructor.
    pub fn new(
        entity_type: impl Into<String>,
        value: impl Into<String>,
        start: usize,
        end: usize,
        confidence: f32,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            value: value.into(),
            start,
            end,
            confidence,
        }
    }

    /// Case-insensitive type check.
    pub fn is_type(&self, entity_type: &str) -> bool {
        self.entity_type.eq_ignore_ascii_case(entity_type)
    }
}
