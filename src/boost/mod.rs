//! Heuristic score boosting.
//!
//! A booster is a finite, ordered list of independent rules. Each rule is
//! a pure predicate over (case-folded text, entities) plus a multiplicative
//! adjustment to one or more intent scores. The chain runs as a fold —
//! `rules.fold(scores, |s, rule| rule.adjust(s, ctx))` — so every rule is
//! unit-testable without running the rest of the chain, and the whole pass
//! is a deterministic function of its inputs.
//!
//! # Ordering
//!
//! Rules affecting different intents may run in any relative order; rules
//! affecting the *same* intent compound multiplicatively, so their order
//! (documented in [`rules::default_rules`]) is part of the contract.
//!
//! # Bounds
//!
//! Ordinary penalties are fractional multipliers (never below ×0.3), so a
//! wrongly-triggered rule cannot eliminate a candidate from a close race.
//! The single exception is the highlight override in [`rules`], which is
//! explicitly allowed to force the screen intent to near-zero.
//!
//! # Normalization
//!
//! After all rules run, the map is max-normalized (divide by max when max
//! exceeds 1). The booster runs exactly once per request; normalization is
//! idempotent, so the pass as a whole is a one-shot transform.

pub mod rules;

use tracing::trace;

use crate::types::{Entity, ScoreMap};

/// Read-only context a rule may inspect.
///
/// Always carries the original request text — never the history-augmented
/// text used for embedding.
pub struct BoostContext<'a> {
    /// Original text, untouched.
    pub text: &'a str,
    /// Case-folded copy, computed once for the whole chain.
    pub folded: String,
    /// Entities from the external extractor (possibly empty).
    pub entities: &'a [Entity],
}

impl<'a> BoostContext<'a> {
    /// Build a context, folding the text once.
    pub fn new(text: &'a str, entities: &'a [Entity]) -> Self {
        Self {
            text,
            folded: text.to_lowercase(),
            entities,
        }
    }
}

/// One heuristic rule: a pure trigger predicate and a score adjustment.
pub trait BoostRule: Send + Sync {
    /// Rule name for logging and diagnostics.
    fn name(&self) -> &'static str;

    /// Whether the rule fires for this context. Pure; no side effects,
    /// no randomness.
    fn triggers(&self, ctx: &BoostContext<'_>) -> bool;

    /// The adjustment applied when the rule fires.
    fn adjust(&self, scores: ScoreMap, ctx: &BoostContext<'_>) -> ScoreMap;
}

/// An ordered chain of boost rules applied as a pure fold.
pub struct Booster {
    rules: Vec<Box<dyn BoostRule>>,
}

impl Booster {
    /// Build a booster from an explicit rule chain.
    pub fn new(rules: Vec<Box<dyn BoostRule>>) -> Self {
        Self { rules }
    }

    /// The standard rule chain in its documented order.
    pub fn with_default_rules() -> Self {
        Self::new(rules::default_rules())
    }

    /// Run the chain over the scores and max-normalize the result.
    #[must_use]
    pub fn boost(&self, scores: ScoreMap, ctx: &BoostContext<'_>) -> ScoreMap {
        let boosted = self.rules.iter().fold(scores, |acc, rule| {
            if rule.triggers(ctx) {
                trace!(rule = rule.name(), "boost rule fired");
                rule.adjust(acc, ctx)
            } else {
                acc
            }
        });
        boosted.normalized()
    }

    /// Rule names in chain order, for diagnostics.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }
}
