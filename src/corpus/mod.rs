//! Seed corpus loading and validation.
//!
//! The corpus is a versioned TOML resource mapping each intent to a
//! curated list of representative utterances, plus the tie-break priority
//! table. It ships with an embedded default and can be replaced at load
//! time (engine config `corpus_path`), so tuning routing never requires a
//! recompile.
//!
//! Intent labels in a corpus file must match the [`Intent`] enum exactly;
//! an unknown label is a configuration error, not a silent skip.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::error::{HuginnError, Result};
use crate::types::{Intent, PriorityTable};

/// Embedded default corpus, compiled into the binary.
const DEFAULT_CORPUS: &str = include_str!("default.toml");

/// Curation guideline: intents with fewer seeds than this get a warning.
const SEED_COUNT_MIN: usize = 15;
/// Curation guideline: intents with more seeds than this get a warning.
const SEED_COUNT_MAX: usize = 80;

/// Raw TOML shape of a corpus file.
#[derive(Debug, Deserialize)]
struct RawCorpus {
    version: String,
    #[serde(default)]
    priorities: HashMap<String, u8>,
    seeds: Vec<RawSeedGroup>,
}

/// One `[[seeds]]` table: an intent label with its example list.
#[derive(Debug, Deserialize)]
struct RawSeedGroup {
    intent: String,
    examples: Vec<String>,
}

/// A validated, immutable seed corpus.
///
/// Loaded once at startup. The scorer depends on an injected corpus
/// reference; nothing in the crate hard-codes example text.
#[derive(Debug, Clone)]
pub struct SeedCorpus {
    version: String,
    priorities: PriorityTable,
    examples: HashMap<Intent, Vec<String>>,
}

impl SeedCorpus {
    /// The corpus compiled into the crate.
    pub fn embedded_default() -> Self {
        // The embedded file is validated by unit tests; a parse failure
        // here is a packaging bug, not a runtime condition.
        Self::from_toml_str(DEFAULT_CORPUS).expect("embedded default corpus is valid")
    }

    /// Parse and validate a corpus from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: RawCorpus = toml::from_str(content)
            .map_err(|e| HuginnError::Configuration(format!("failed to parse corpus: {e}")))?;
        Self::validate(raw)
    }

    /// Load and validate a corpus from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            HuginnError::Configuration(format!("failed to read corpus file {path:?}: {e}"))
        })?;
        Self::from_toml_str(&content)
    }

    fn validate(raw: RawCorpus) -> Result<Self> {
        let mut examples: HashMap<Intent, Vec<String>> = HashMap::new();

        for group in raw.seeds {
            let intent = Intent::from_label(&group.intent).ok_or_else(|| {
                HuginnError::Configuration(format!("unknown intent label '{}'", group.intent))
            })?;
            if group.examples.is_empty() {
                return Err(HuginnError::Configuration(format!(
                    "intent '{intent}' has no seed examples"
                )));
            }
            if examples.contains_key(&intent) {
                return Err(HuginnError::Configuration(format!(
                    "intent '{intent}' appears in more than one seeds table"
                )));
            }
            let count = group.examples.len();
            if !(SEED_COUNT_MIN..=SEED_COUNT_MAX).contains(&count) {
                warn!(
                    intent = %intent,
                    count,
                    "seed count outside curation guideline ({SEED_COUNT_MIN}-{SEED_COUNT_MAX})"
                );
            }
            examples.insert(intent, group.examples);
        }

        for intent in Intent::ALL {
            if !examples.contains_key(&intent) {
                return Err(HuginnError::Configuration(format!(
                    "corpus is missing seeds for intent '{intent}'"
                )));
            }
        }

        let mut overrides = Vec::with_capacity(raw.priorities.len());
        for (label, priority) in raw.priorities {
            let intent = Intent::from_label(&label).ok_or_else(|| {
                HuginnError::Configuration(format!("unknown intent label '{label}' in priorities"))
            })?;
            overrides.push((intent, priority));
        }

        Ok(Self {
            version: raw.version,
            priorities: PriorityTable::with_overrides(overrides),
            examples,
        })
    }

    /// Corpus version string, for diagnostics.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Tie-break priorities declared by this corpus.
    pub fn priorities(&self) -> &PriorityTable {
        &self.priorities
    }

    /// Seed examples for one intent.
    pub fn seeds_for(&self, intent: Intent) -> &[String] {
        self.examples
            .get(&intent)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Total seed example count across all intents.
    pub fn seed_count(&self) -> usize {
        self.examples.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_default_parses_and_covers_all_intents() {
        let corpus = SeedCorpus::embedded_default();
        assert_eq!(corpus.version(), "2026.03");
        for intent in Intent::ALL {
            assert!(
                !corpus.seeds_for(intent).is_empty(),
                "no seeds for {intent}"
            );
        }
        assert!(corpus.seed_count() > 100);
    }

    #[test]
    fn embedded_default_priorities_match_table() {
        let corpus = SeedCorpus::embedded_default();
        assert_eq!(corpus.priorities().priority(Intent::MemoryStore), 90);
        assert_eq!(corpus.priorities().priority(Intent::Question), 40);
    }

    #[test]
    fn unknown_intent_label_is_rejected() {
        let toml = r#"
            version = "test"
            [[seeds]]
            intent = "mind_reading"
            examples = ["guess what I want"]
        "#;
        let err = SeedCorpus::from_toml_str(toml).unwrap_err();
        assert!(err.to_string().contains("mind_reading"));
    }

    #[test]
    fn missing_intent_is_rejected() {
        let toml = r#"
            version = "test"
            [[seeds]]
            intent = "greeting"
            examples = ["hello"]
        "#;
        let err = SeedCorpus::from_toml_str(toml).unwrap_err();
        assert!(err.to_string().contains("missing seeds"));
    }

    #[test]
    fn duplicate_intent_table_is_rejected() {
        let toml = r#"
            version = "test"
            [[seeds]]
            intent = "greeting"
            examples = ["hello"]
            [[seeds]]
            intent = "greeting"
            examples = ["hi"]
        "#;
        let err = SeedCorpus::from_toml_str(toml).unwrap_err();
        assert!(err.to_string().contains("more than one"));
    }

    #[test]
    fn load_reads_from_disk() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DEFAULT_CORPUS.as_bytes()).unwrap();
        let corpus = SeedCorpus::load(file.path()).unwrap();
        assert_eq!(corpus.version(), "2026.03");
    }

    #[test]
    fn load_missing_file_is_configuration_error() {
        let err = SeedCorpus::load(Path::new("/nonexistent/corpus.toml")).unwrap_err();
        assert!(matches!(err, HuginnError::Configuration(_)));
    }
}
