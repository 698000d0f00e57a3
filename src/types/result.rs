//! Score map and classification result types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::intent::Intent;

/// Per-intent scores for one request.
///
/// Starts as raw cosine similarities, is multiplicatively adjusted by the
/// heuristic rules, then max-normalized so every value lands in [0, 1].
/// Scores are not a probability distribution and do not sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreMap {
    scores: HashMap<Intent, f32>,
}

impl ScoreMap {
    /// A map with every intent present at score zero.
    ///
    /// Starting from the full intent set keeps the resolver invariant
    /// cheap: any intent it returns is already a key of the map.
    pub fn zeroed() -> Self {
        Self {
            scores: Intent::ALL.iter().map(|i| (*i, 0.0)).collect(),
        }
    }

    /// Build from explicit entries; intents not listed are present at zero.
    pub fn from_entries(entries: impl IntoIterator<Item = (Intent, f32)>) -> Self {
        let mut map = Self::zeroed();
        for (intent, score) in entries {
            map.scores.insert(intent, score);
        }
        map
    }

    /// Score for an intent (zero if absent).
    pub fn get(&self, intent: Intent) -> f32 {
        self.scores.get(&intent).copied().unwrap_or(0.0)
    }

    /// Set an intent's score.
    pub fn set(&mut self, intent: Intent, score: f32) {
        self.scores.insert(intent, score);
    }

    /// Multiply one intent's score by a factor, returning the new map.
    ///
    /// Consuming style so heuristic rules compose as a pure fold.
    #[must_use]
    pub fn scaled(mut self, intent: Intent, factor: f32) -> Self {
        let score = self.get(intent) * factor;
        self.scores.insert(intent, score);
        self
    }

    /// The highest score in the map.
    pub fn max_score(&self) -> f32 {
        self.scores.values().copied().fold(0.0, f32::max)
    }

    /// Divide every score by the max when the max exceeds 1.
    ///
    /// Keeps scores comparable across requests with differing numbers of
    /// triggered boosts. Applying this to an already-normalized map is a
    /// no-op, which is what makes the boost pass idempotent as a whole.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let max = self.max_score();
        if max > 1.0 {
            for score in self.scores.values_mut() {
                *score /= max;
            }
        }
        self
    }

    /// Intents sorted by score descending.
    ///
    /// Exact ties order by declaration ordinal so ranking is deterministic
    /// regardless of hash-map iteration order.
    pub fn ranked(&self) -> Vec<(Intent, f32)> {
        let mut entries: Vec<(Intent, f32)> = self.scores.iter().map(|(i, s)| (*i, *s)).collect();
        entries.sort_by(|(ia, sa), (ib, sb)| {
            sb.partial_cmp(sa)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| ia.ordinal().cmp(&ib.ordinal()))
        });
        entries
    }

    /// Iterate over (intent, score) pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (Intent, f32)> + '_ {
        self.scores.iter().map(|(i, s)| (*i, *s))
    }
}

/// The outcome of classifying one utterance.
///
/// Created fresh per request and never mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// The resolved intent.
    pub intent: Intent,
    /// Confidence in the resolved intent, in [0, 1].
    pub confidence: f32,
    /// Full per-intent score map, for diagnostics and downstream ranking.
    pub scores: ScoreMap,
    /// Entities extracted from the text (empty if extraction was skipped
    /// or degraded).
    pub entities: Vec<Entity>,
    /// Wall-clock processing time for this request.
    pub processing_time_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroed_contains_every_intent() {
        let map = ScoreMap::zeroed();
        for intent in Intent::ALL {
            assert_eq!(map.get(intent), 0.0);
        }
    }

    #[test]
    fn scaled_multiplies_only_the_target() {
        let map = ScoreMap::from_entries([(Intent::WebSearch, 0.5), (Intent::Question, 0.4)])
            .scaled(Intent::WebSearch, 1.5);
        assert!((map.get(Intent::WebSearch) - 0.75).abs() < 1e-6);
        assert!((map.get(Intent::Question) - 0.4).abs() < 1e-6);
    }

    #[test]
    fn normalized_divides_by_max_above_one() {
        let map = ScoreMap::from_entries([(Intent::WebSearch, 1.6), (Intent::Question, 0.8)])
            .normalized();
        assert!((map.get(Intent::WebSearch) - 1.0).abs() < 1e-6);
        assert!((map.get(Intent::Question) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn normalized_is_identity_at_or_below_one() {
        let map = ScoreMap::from_entries([(Intent::WebSearch, 0.9)]);
        let normalized = map.clone().normalized();
        assert_eq!(map, normalized);
        // And a second application changes nothing either
        assert_eq!(normalized.clone().normalized(), normalized);
    }

    #[test]
    fn ranked_breaks_exact_ties_by_declaration_order() {
        let map = ScoreMap::from_entries([
            (Intent::Question, 0.7),
            (Intent::MemoryStore, 0.7),
            (Intent::Greeting, 0.2),
        ]);
        let ranked = map.ranked();
        // MemoryStore is declared before Question
        assert_eq!(ranked[0].0, Intent::MemoryStore);
        assert_eq!(ranked[1].0, Intent::Question);
    }

    #[test]
    fn serializes_with_label_keys() {
        let map = ScoreMap::from_entries([(Intent::WebSearch, 1.0)]);
        let json = serde_json::to_string(&map).unwrap();
        assert!(json.contains("\"web_search\""));
    }
}
