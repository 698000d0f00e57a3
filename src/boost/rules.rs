//! The standard heuristic rule chain.
//!
//! Lexical rules are compiled once into `LazyLock` regex statics. Factors
//! were tuned against the seed corpus; rules that target the same intent
//! compound multiplicatively, so the chain order in [`default_rules`] is
//! part of the contract.

use std::sync::LazyLock;

use regex::Regex;

use super::{BoostContext, BoostRule};
use crate::types::{Intent, ScoreMap};

/// Ordinary penalties never drop below this factor, so one wrong trigger
/// cannot knock an intent out of a close race. Override rules are exempt.
pub const PENALTY_FLOOR: f32 = 0.3;

static STORAGE_VERBS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(remember|remind me to|don't forget|dont forget|keep in mind|make a note|note that|note down|save this|store this|set a reminder|keep track)\b",
    )
    .expect("storage verb pattern")
});

static RECALL_PHRASES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(what did i|do you remember|did i tell|recall|what was (my|the|that)|where did i|when did i say|what (notes|reminders) do i have|show me what i stored|list everything i told)\b",
    )
    .expect("recall phrase pattern")
});

static WH_QUESTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(what|why|how|when|where|who|which|whose)\b").expect("wh-question pattern")
});

static AUX_QUESTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(can you|could you|do you|did i|is (it|there)|are (there|you)|should i|would you)\b")
        .expect("aux-question pattern")
});

static TIME_SENSITIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(current|currently|latest|today|tonight|right now|this (week|weekend|month|morning)|recently|breaking|so far)\b",
    )
    .expect("time-sensitivity pattern")
});

static WEATHER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(weather|forecast|temperature|rain|raining|snow|sunny|humidity)\b")
        .expect("weather pattern")
});

static NEWS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(news|headline|headlines|happening in|happened (today|yesterday))\b")
        .expect("news pattern")
});

static PRICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(price|prices|cost|costs|worth|exchange rate|stock|mortgage rate)\b")
        .expect("price pattern")
});

static HOWTO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(how (do|can|to) i?|tutorial|walk me through|guide me|show me how|teach me|set up|install|configure|step[- ]by[- ]step)\b",
    )
    .expect("how-to pattern")
});

static ACTION_VERB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(open|run|launch|close|restart|start|stop|execute|kill|play|pause|mute|delete|create|turn (on|off)|switch|take|lock|send|search)\b",
    )
    .expect("action verb pattern")
});

static GREETING_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(hello|hi|hey|howdy|greetings|yo|hiya|good (morning|afternoon|evening)|morning|what's up|sup)\b")
        .expect("greeting pattern")
});

static SCREEN_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(my screen|on screen|this (page|window|dialog|error|form|table|document)|highlighted|selected (text|paragraph)|what i'm looking at)\b",
    )
    .expect("screen reference pattern")
});

/// Whether the folded text reads as a question.
///
/// Used to gate rules whose signal flips meaning inside a question
/// ("remember..." stores; "do you remember..." retrieves).
pub(crate) fn is_question(folded: &str) -> bool {
    folded.contains('?') || WH_QUESTION.is_match(folded) || AUX_QUESTION.is_match(folded)
}

/// Extra gates a lexicon rule can require beyond its pattern.
#[derive(Clone, Copy, PartialEq)]
enum Gate {
    /// Pattern match alone is enough.
    None,
    /// Fire only when the message is not phrased as a question.
    NotQuestion,
    /// Fire only for short messages (folded length in chars).
    MaxLength(usize),
}

/// A regex-triggered rule applying fixed multiplicative adjustments.
struct LexiconRule {
    name: &'static str,
    pattern: &'static LazyLock<Regex>,
    gate: Gate,
    adjustments: &'static [(Intent, f32)],
}

impl BoostRule for LexiconRule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn triggers(&self, ctx: &BoostContext<'_>) -> bool {
        let gate_open = match self.gate {
            Gate::None => true,
            Gate::NotQuestion => !is_question(&ctx.folded),
            Gate::MaxLength(max) => ctx.folded.chars().count() <= max,
        };
        gate_open && self.pattern.is_match(&ctx.folded)
    }

    fn adjust(&self, scores: ScoreMap, _ctx: &BoostContext<'_>) -> ScoreMap {
        self.adjustments
            .iter()
            .fold(scores, |acc, (intent, factor)| acc.scaled(*intent, *factor))
    }
}

/// Boosts memory intents when the extractor found a datetime span.
struct DatetimeEntityRule;

impl BoostRule for DatetimeEntityRule {
    fn name(&self) -> &'static str {
        "datetime_entity"
    }

    fn triggers(&self, ctx: &BoostContext<'_>) -> bool {
        ctx.entities.iter().any(|e| e.is_type("datetime"))
    }

    fn adjust(&self, scores: ScoreMap, _ctx: &BoostContext<'_>) -> ScoreMap {
        scores
            .scaled(Intent::MemoryStore, 1.15)
            .scaled(Intent::WebSearch, 1.05)
    }
}

/// Boosts memory storage when a person is named in a storage phrasing.
struct PersonEntityRule;

impl BoostRule for PersonEntityRule {
    fn name(&self) -> &'static str {
        "person_entity"
    }

    fn triggers(&self, ctx: &BoostContext<'_>) -> bool {
        ctx.entities.iter().any(|e| e.is_type("person")) && STORAGE_VERBS.is_match(&ctx.folded)
    }

    fn adjust(&self, scores: ScoreMap, _ctx: &BoostContext<'_>) -> ScoreMap {
        scores.scaled(Intent::MemoryStore, 1.2)
    }
}

/// Override: highlighted text arrives through a dedicated channel, so the
/// screen intent must not also win the routing race for the same request.
///
/// The only rule permitted to push a score below [`PENALTY_FLOOR`].
struct HighlightOverrideRule;

impl BoostRule for HighlightOverrideRule {
    fn name(&self) -> &'static str {
        "highlight_override"
    }

    fn triggers(&self, ctx: &BoostContext<'_>) -> bool {
        ctx.entities.iter().any(|e| e.is_type("highlight"))
    }

    fn adjust(&self, scores: ScoreMap, _ctx: &BoostContext<'_>) -> ScoreMap {
        scores.scaled(Intent::ScreenIntelligence, 0.05)
    }
}

/// The standard chain, in its documented order:
///
/// 1. `short_greeting` — greeting word, gated on message length
/// 2. `storage_verb` — storage phrasing, gated on not-a-question
/// 3. `memory_recall` — retrieval phrasing
/// 4. `wh_question` — question-word / question-mark signals
/// 5. `time_sensitive` — freshness lexicon, web over stable knowledge
/// 6. `weather` 7. `news` 8. `price` — time-sensitive topic lexicons
/// 9. `howto_tutorial` — guide/tutorial phrasing
/// 10. `action_verb` — leading imperative, gated on not-a-question
/// 11. `screen_reference` — on-screen content phrasing
/// 12. `datetime_entity` 13. `person_entity` — extractor signals
/// 14. `exclamation` — imperative/greeting punctuation
/// 15. `highlight_override` — screen-intent override (last word)
///
/// Within the chain, rules 5–8 all touch `web_search` and compound; their
/// relative order is load-bearing and locked by tests.
pub fn default_rules() -> Vec<Box<dyn BoostRule>> {
    static EXCLAMATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!").expect("! pattern"));

    vec![
        Box::new(LexiconRule {
            name: "short_greeting",
            pattern: &GREETING_WORD,
            gate: Gate::MaxLength(20),
            adjustments: &[(Intent::Greeting, 1.8)],
        }),
        Box::new(LexiconRule {
            name: "storage_verb",
            pattern: &STORAGE_VERBS,
            gate: Gate::NotQuestion,
            adjustments: &[(Intent::MemoryStore, 1.5)],
        }),
        Box::new(LexiconRule {
            name: "memory_recall",
            pattern: &RECALL_PHRASES,
            gate: Gate::None,
            adjustments: &[(Intent::MemoryRetrieve, 1.5), (Intent::MemoryStore, 0.7)],
        }),
        Box::new(WhQuestionRule),
        Box::new(LexiconRule {
            name: "time_sensitive",
            pattern: &TIME_SENSITIVE,
            gate: Gate::None,
            adjustments: &[(Intent::WebSearch, 1.5), (Intent::GeneralKnowledge, 0.6)],
        }),
        Box::new(LexiconRule {
            name: "weather",
            pattern: &WEATHER,
            gate: Gate::None,
            adjustments: &[(Intent::WebSearch, 1.6), (Intent::GeneralKnowledge, 0.7)],
        }),
        Box::new(LexiconRule {
            name: "news",
            pattern: &NEWS,
            gate: Gate::None,
            adjustments: &[(Intent::WebSearch, 1.5)],
        }),
        Box::new(LexiconRule {
            name: "price",
            pattern: &PRICE,
            gate: Gate::None,
            adjustments: &[(Intent::WebSearch, 1.3)],
        }),
        Box::new(LexiconRule {
            name: "howto_tutorial",
            pattern: &HOWTO,
            gate: Gate::None,
            adjustments: &[
                (Intent::CommandGuide, 1.4),
                (Intent::WebSearch, 1.15),
                (Intent::CommandExecute, 0.7),
                (Intent::Question, 0.85),
            ],
        }),
        Box::new(LexiconRule {
            name: "action_verb",
            pattern: &ACTION_VERB,
            gate: Gate::NotQuestion,
            adjustments: &[(Intent::CommandExecute, 1.4)],
        }),
        Box::new(LexiconRule {
            name: "screen_reference",
            pattern: &SCREEN_REFERENCE,
            gate: Gate::None,
            adjustments: &[(Intent::ScreenIntelligence, 1.6)],
        }),
        Box::new(DatetimeEntityRule),
        Box::new(PersonEntityRule),
        Box::new(LexiconRule {
            name: "exclamation",
            pattern: &EXCLAMATION,
            gate: Gate::None,
            adjustments: &[(Intent::CommandExecute, 1.1), (Intent::Greeting, 1.1)],
        }),
        Box::new(HighlightOverrideRule),
    ]
}

/// Question-signal rule. Bespoke because its trigger combines the
/// question-mark check with leading question words, not one regex.
struct WhQuestionRule;

impl BoostRule for WhQuestionRule {
    fn name(&self) -> &'static str {
        "wh_question"
    }

    fn triggers(&self, ctx: &BoostContext<'_>) -> bool {
        is_question(&ctx.folded)
    }

    fn adjust(&self, scores: ScoreMap, _ctx: &BoostContext<'_>) -> ScoreMap {
        scores
            .scaled(Intent::Question, 1.2)
            .scaled(Intent::GeneralKnowledge, 1.2)
            .scaled(Intent::WebSearch, 1.15)
            .scaled(Intent::MemoryRetrieve, 1.1)
            .scaled(Intent::CommandExecute, 0.8)
    }
}
