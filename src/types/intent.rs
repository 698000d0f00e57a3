//! Intent labels and tie-break priorities.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of intents an utterance can resolve to.
///
/// The enum is the single source of truth for the label set — match
/// exhaustiveness catches a missing arm when an intent is added. Seed
/// examples and tie-break priorities live in the corpus configuration,
/// so updating those needs no recompile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Store a fact, note, or reminder for later ("remember that...").
    MemoryStore,
    /// Recall something previously stored ("what did I tell you about...").
    MemoryRetrieve,
    /// Run a concrete action or command ("open the terminal").
    CommandExecute,
    /// Ask how to perform an action ("how do I set up...").
    CommandGuide,
    /// Time-sensitive lookup that needs fresh external data.
    WebSearch,
    /// Stable factual knowledge ("what is the capital of France").
    GeneralKnowledge,
    /// Generic question that fits no sharper category. Also the
    /// conventional low-confidence fallback.
    Question,
    /// Salutation or small-talk opener.
    Greeting,
    /// Question about on-screen content.
    ScreenIntelligence,
}

impl Intent {
    /// Every intent, in declaration order. Declaration order doubles as
    /// the deterministic secondary sort key when scores tie exactly.
    pub const ALL: [Intent; 9] = [
        Intent::MemoryStore,
        Intent::MemoryRetrieve,
        Intent::CommandExecute,
        Intent::CommandGuide,
        Intent::WebSearch,
        Intent::GeneralKnowledge,
        Intent::Question,
        Intent::Greeting,
        Intent::ScreenIntelligence,
    ];

    /// Snake_case label, matching the serde representation.
    pub fn label(&self) -> &'static str {
        match self {
            Intent::MemoryStore => "memory_store",
            Intent::MemoryRetrieve => "memory_retrieve",
            Intent::CommandExecute => "command_execute",
            Intent::CommandGuide => "command_guide",
            Intent::WebSearch => "web_search",
            Intent::GeneralKnowledge => "general_knowledge",
            Intent::Question => "question",
            Intent::Greeting => "greeting",
            Intent::ScreenIntelligence => "screen_intelligence",
        }
    }

    /// Parse a snake_case label back into an intent.
    pub fn from_label(label: &str) -> Option<Intent> {
        Intent::ALL.iter().copied().find(|i| i.label() == label)
    }

    /// Position in [`Intent::ALL`], used as a stable tie-break ordinal.
    pub(crate) fn ordinal(&self) -> usize {
        Intent::ALL
            .iter()
            .position(|i| i == self)
            .expect("intent is in ALL")
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Static tie-break ranking consulted when the top two scores are within
/// epsilon of each other. Higher value = preferred.
///
/// Near-ties are common between generically-similar intents (question vs
/// web_search); a fixed preference order produces more consistent routing
/// than noise-sensitive score ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct PriorityTable {
    priorities: HashMap<Intent, u8>,
}

impl Default for PriorityTable {
    /// Specific intents outrank generic ones, so a near-tie resolves
    /// toward the more actionable interpretation.
    fn default() -> Self {
        let priorities = HashMap::from([
            (Intent::MemoryStore, 90),
            (Intent::MemoryRetrieve, 85),
            (Intent::CommandExecute, 80),
            (Intent::CommandGuide, 75),
            (Intent::WebSearch, 70),
            (Intent::ScreenIntelligence, 65),
            (Intent::Greeting, 60),
            (Intent::GeneralKnowledge, 50),
            (Intent::Question, 40),
        ]);
        Self { priorities }
    }
}

impl PriorityTable {
    /// Build a table from explicit (intent, priority) pairs. Intents not
    /// listed keep their default priority.
    pub fn with_overrides(overrides: impl IntoIterator<Item = (Intent, u8)>) -> Self {
        let mut table = Self::default();
        for (intent, priority) in overrides {
            table.priorities.insert(intent, priority);
        }
        table
    }

    /// Tie-break priority for an intent (0 if somehow absent).
    pub fn priority(&self, intent: Intent) -> u8 {
        self.priorities.get(&intent).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_round_trips() {
        for intent in Intent::ALL {
            assert_eq!(Intent::from_label(intent.label()), Some(intent));
        }
    }

    #[test]
    fn from_label_rejects_unknown() {
        assert_eq!(Intent::from_label("telepathy"), None);
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&Intent::MemoryStore).unwrap();
        assert_eq!(json, "\"memory_store\"");
        let back: Intent = serde_json::from_str("\"web_search\"").unwrap();
        assert_eq!(back, Intent::WebSearch);
    }

    #[test]
    fn default_priorities_prefer_web_search_over_question() {
        let table = PriorityTable::default();
        assert!(table.priority(Intent::WebSearch) > table.priority(Intent::Question));
    }

    #[test]
    fn overrides_replace_defaults() {
        let table = PriorityTable::with_overrides([(Intent::Question, 99)]);
        assert_eq!(table.priority(Intent::Question), 99);
        // Untouched entries keep defaults
        assert_eq!(table.priority(Intent::Greeting), 60);
    }
}
