//! Final intent resolution: confidence floor and priority tie-breaking.
//!
//! A small state-free decision procedure, re-run independently per
//! request:
//!
//! 1. Rank intents by score, descending (deterministic secondary order).
//! 2. Top score below the floor → return the configured default intent.
//!    This is the "we don't trust any signal" circuit breaker; callers
//!    must treat the result as valid, if uncertain.
//! 3. Top-two gap inside epsilon → consult the priority table; a strictly
//!    higher-priority runner-up wins.
//! 4. Otherwise the top-scoring intent wins.

use tracing::debug;

use crate::config::ResolverConfig;
use crate::telemetry;
use crate::types::{Intent, PriorityTable, ScoreMap};

/// Resolves a boosted score map into (intent, confidence).
#[derive(Debug, Clone)]
pub struct DecisionResolver {
    config: ResolverConfig,
    priorities: PriorityTable,
}

impl DecisionResolver {
    /// Build a resolver from config and a tie-break table.
    pub fn new(config: ResolverConfig, priorities: PriorityTable) -> Self {
        Self { config, priorities }
    }

    /// Resolve the final intent and its confidence.
    ///
    /// The returned intent is always a key of `scores` (every map carries
    /// the full intent set) or the configured default intent.
    pub fn resolve(&self, scores: &ScoreMap) -> (Intent, f32) {
        let ranked = scores.ranked();

        let Some(&(top_intent, top_score)) = ranked.first() else {
            // Degenerate empty map: the floor fires by definition.
            metrics::counter!(telemetry::LOW_CONFIDENCE_TOTAL).increment(1);
            return (self.config.default_intent, 0.0);
        };

        if top_score < self.config.floor {
            debug!(
                top = %top_intent,
                score = top_score,
                floor = self.config.floor,
                "all scores below confidence floor"
            );
            metrics::counter!(telemetry::LOW_CONFIDENCE_TOTAL).increment(1);
            return (self.config.default_intent, top_score);
        }

        if let Some(&(second_intent, second_score)) = ranked.get(1) {
            let gap = top_score - second_score;
            if gap < self.config.epsilon
                && self.priorities.priority(second_intent) > self.priorities.priority(top_intent)
            {
                debug!(
                    top = %top_intent,
                    second = %second_intent,
                    gap,
                    "near-tie resolved by priority table"
                );
                return (second_intent, second_score);
            }
        }

        (top_intent, top_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> DecisionResolver {
        DecisionResolver::new(ResolverConfig::default(), PriorityTable::default())
    }

    #[test]
    fn floor_returns_default_intent() {
        let scores = ScoreMap::from_entries([
            (Intent::WebSearch, 0.12),
            (Intent::Greeting, 0.04),
        ]);
        let (intent, confidence) = resolver().resolve(&scores);
        assert_eq!(intent, Intent::Question);
        assert!(confidence < 0.15);
    }

    #[test]
    fn clear_winner_is_returned() {
        let scores = ScoreMap::from_entries([
            (Intent::Greeting, 0.9),
            (Intent::Question, 0.3),
        ]);
        let (intent, confidence) = resolver().resolve(&scores);
        assert_eq!(intent, Intent::Greeting);
        assert!((confidence - 0.9).abs() < 1e-6);
    }

    #[test]
    fn near_tie_resolves_by_priority() {
        // question scores higher, web_search is within epsilon and has
        // strictly higher priority
        let scores = ScoreMap::from_entries([
            (Intent::Question, 0.80),
            (Intent::WebSearch, 0.75),
        ]);
        let (intent, confidence) = resolver().resolve(&scores);
        assert_eq!(intent, Intent::WebSearch);
        assert!((confidence - 0.75).abs() < 1e-6);
    }

    #[test]
    fn near_tie_keeps_winner_when_priority_lower() {
        // web_search wins on score; question is near-tied but lower
        // priority, so no swap
        let scores = ScoreMap::from_entries([
            (Intent::WebSearch, 0.80),
            (Intent::Question, 0.75),
        ]);
        let (intent, _) = resolver().resolve(&scores);
        assert_eq!(intent, Intent::WebSearch);
    }

    #[test]
    fn gap_wider_than_epsilon_skips_tie_break() {
        let scores = ScoreMap::from_entries([
            (Intent::Question, 0.80),
            (Intent::WebSearch, 0.55),
        ]);
        let (intent, _) = resolver().resolve(&scores);
        assert_eq!(intent, Intent::Question);
    }

    #[test]
    fn custom_floor_and_default_intent() {
        let config = ResolverConfig {
            floor: 0.5,
            epsilon: 0.1,
            default_intent: Intent::GeneralKnowledge,
        };
        let resolver = DecisionResolver::new(config, PriorityTable::default());
        let scores = ScoreMap::from_entries([(Intent::Greeting, 0.45)]);
        let (intent, _) = resolver.resolve(&scores);
        assert_eq!(intent, Intent::GeneralKnowledge);
    }

    #[test]
    fn resolution_is_deterministic_on_exact_ties() {
        let scores = ScoreMap::from_entries([
            (Intent::MemoryStore, 0.6),
            (Intent::Question, 0.6),
        ]);
        let first = resolver().resolve(&scores);
        for _ in 0..10 {
            assert_eq!(resolver().resolve(&scores), first);
        }
    }
}
