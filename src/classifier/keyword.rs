//! Regex-lexicon emergency classifier.
//!
//! No collaborators, no model warm-up: construction cannot fail, which is
//! what makes it the always-available end of the selector's fallback
//! chain. Scoring is pattern match-ratio weighted per intent, resolved
//! through the same floor/tie-break procedure as the semantic tiers.

use std::sync::LazyLock;
use std::time::Instant;

use async_trait::async_trait;
use regex::Regex;

use crate::config::ResolverConfig;
use crate::error::{HuginnError, Result};
use crate::resolver::DecisionResolver;
use crate::telemetry;
use crate::traits::IntentClassifier;
use crate::types::{ClassificationResult, Intent, ParseOptions, PriorityTable, ScoreMap};

/// Patterns for one intent with a base weight.
struct PatternGroup {
    intent: Intent,
    weight: f32,
    patterns: Vec<Regex>,
}

fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("keyword classifier pattern")
}

static PATTERN_GROUPS: LazyLock<Vec<PatternGroup>> = LazyLock::new(|| {
    vec![
        PatternGroup {
            intent: Intent::Greeting,
            weight: 1.0,
            patterns: vec![
                pattern(r"^(hello|hi|hey|howdy|greetings|yo|hiya)\b"),
                pattern(r"^good (morning|afternoon|evening)\b"),
                pattern(r"^(what's up|sup|morning)\b"),
            ],
        },
        PatternGroup {
            intent: Intent::MemoryStore,
            weight: 0.95,
            patterns: vec![
                pattern(r"\b(remember|remind me to|set a reminder)\b"),
                pattern(r"\b(don't forget|keep in mind|make a note|note (that|down))\b"),
                pattern(r"\b(save this|store this|keep track)\b"),
            ],
        },
        PatternGroup {
            intent: Intent::MemoryRetrieve,
            weight: 0.95,
            patterns: vec![
                pattern(r"\b(what did i|do you remember|did i tell)\b"),
                pattern(r"\b(recall|what was (my|the)|where did i)\b"),
                pattern(r"\bwhat (notes|reminders) do i have\b"),
            ],
        },
        PatternGroup {
            intent: Intent::ScreenIntelligence,
            weight: 0.9,
            patterns: vec![
                pattern(r"\b(my screen|on screen)\b"),
                pattern(r"\bthis (page|window|dialog|error|form|document)\b"),
                pattern(r"\b(highlighted|selected (text|paragraph))\b"),
            ],
        },
        PatternGroup {
            intent: Intent::WebSearch,
            weight: 0.85,
            patterns: vec![
                pattern(r"\b(weather|forecast|temperature)\b"),
                pattern(r"\b(news|headlines|breaking)\b"),
                pattern(r"\b(latest|current|today|tonight|right now)\b"),
                pattern(r"\b(price|stock|exchange rate)\b"),
            ],
        },
        PatternGroup {
            intent: Intent::CommandGuide,
            weight: 0.8,
            patterns: vec![
                pattern(r"\bhow (do|can|to) i?\b"),
                pattern(r"\b(tutorial|walk me through|guide me|show me how|teach me)\b"),
                pattern(r"\b(set up|install|configure)\b"),
            ],
        },
        PatternGroup {
            intent: Intent::CommandExecute,
            weight: 0.75,
            patterns: vec![
                pattern(r"^(open|run|launch|close|restart|start|stop|execute|kill)\b"),
                pattern(r"^(play|pause|mute|delete|create|lock|send)\b"),
                pattern(r"^(turn (on|off)|switch|take)\b"),
            ],
        },
        PatternGroup {
            intent: Intent::GeneralKnowledge,
            weight: 0.65,
            patterns: vec![
                pattern(r"^(what|who|when|where) (is|are|was|were)\b"),
                pattern(r"\b(capital of|invented|discovered|stand for)\b"),
                pattern(r"\bhow (many|tall|far|old)\b"),
            ],
        },
        PatternGroup {
            intent: Intent::Question,
            weight: 0.6,
            patterns: vec![
                pattern(r"\?"),
                pattern(r"^(why|how|what|should i)\b"),
                pattern(r"^(can|could|would) you\b"),
            ],
        },
    ]
});

/// The minimal-dependency fallback classifier.
pub struct KeywordClassifier {
    resolver: DecisionResolver,
}

impl KeywordClassifier {
    /// Construction is infallible — this implementation must always be
    /// available when everything else in the chain has failed.
    pub fn new(resolver_config: ResolverConfig, priorities: PriorityTable) -> Self {
        Self {
            resolver: DecisionResolver::new(resolver_config, priorities),
        }
    }

    fn score_text(&self, folded: &str) -> ScoreMap {
        let mut scores = ScoreMap::zeroed();
        for group in PATTERN_GROUPS.iter() {
            let matched = group
                .patterns
                .iter()
                .filter(|p| p.is_match(folded))
                .count();
            if matched > 0 {
                let ratio = matched as f32 / group.patterns.len() as f32;
                // Any hit counts for half the weight; full coverage earns
                // the whole weight. A single matched pattern out of four
                // is already a real signal here, unlike in similarity
                // space.
                let score = group.weight * (0.5 + 0.5 * ratio);
                scores.set(group.intent, score.min(1.0));
            }
        }
        scores
    }
}

#[async_trait]
impl IntentClassifier for KeywordClassifier {
    fn name(&self) -> &str {
        "keyword"
    }

    async fn parse(&self, text: &str, _options: &ParseOptions) -> Result<ClassificationResult> {
        let start = Instant::now();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(HuginnError::InvalidInput("empty input text".to_string()));
        }

        let scores = self.score_text(&trimmed.to_lowercase());
        let (intent, confidence) = self.resolver.resolve(&scores);

        metrics::counter!(telemetry::INTENTS_TOTAL, "intent" => intent.label()).increment(1);

        Ok(ClassificationResult {
            intent,
            confidence,
            scores,
            entities: Vec::new(),
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}
