//! Classifier selection with fallback chain semantics.
//!
//! The selector owns every classifier implementation, constructs each one
//! lazily (at most once — double-checked against the slot table, with an
//! async init lock serialising builds), and falls through a static
//! preference order when construction fails:
//!
//! ```text
//! accurate ──► balanced ──► fast ──► keyword
//! ```
//!
//! `accurate`/`balanced`/`fast` are [`SemanticClassifier`] tiers differing
//! in seed cap and entity enrichment; `keyword` is the minimal-dependency
//! emergency implementation whose construction cannot fail. A slot that
//! failed to initialize stays failed for the selector's lifetime —
//! recovering means constructing a new engine, the same contract as the
//! read-only seed cache.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, warn};

use crate::classifier::{KeywordClassifier, SemanticClassifier};
use crate::config::EngineConfig;
use crate::corpus::SeedCorpus;
use crate::error::{HuginnError, Result};
use crate::providers::{EmbeddingProvider, EntityProvider};
use crate::telemetry;
use crate::traits::IntentClassifier;
use crate::types::{ClassificationResult, ParseOptions};

/// The available classifier implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImplementationKind {
    /// Full seed corpus + entity enrichment. Best accuracy, slowest.
    Accurate,
    /// Capped seed corpus + entity enrichment.
    Balanced,
    /// Small seed cap, no entity extraction.
    Fast,
    /// Regex lexicons only; no collaborators. Emergency fallback.
    Keyword,
}

impl ImplementationKind {
    /// Static fallback preference, highest first.
    pub const PREFERENCE_ORDER: [ImplementationKind; 4] = [
        ImplementationKind::Accurate,
        ImplementationKind::Balanced,
        ImplementationKind::Fast,
        ImplementationKind::Keyword,
    ];

    /// Implementation name as used in selection and introspection.
    pub fn name(&self) -> &'static str {
        match self {
            ImplementationKind::Accurate => "accurate",
            ImplementationKind::Balanced => "balanced",
            ImplementationKind::Fast => "fast",
            ImplementationKind::Keyword => "keyword",
        }
    }

    /// Parse an implementation name.
    pub fn from_name(name: &str) -> Option<ImplementationKind> {
        Self::PREFERENCE_ORDER
            .iter()
            .copied()
            .find(|k| k.name() == name)
    }

    /// Nominal accuracy estimate, for introspection.
    pub fn accuracy(&self) -> f32 {
        match self {
            ImplementationKind::Accurate => 0.92,
            ImplementationKind::Balanced => 0.88,
            ImplementationKind::Fast => 0.82,
            ImplementationKind::Keyword => 0.60,
        }
    }

    /// Nominal request latency estimate in milliseconds, for introspection.
    pub fn avg_latency_ms(&self) -> u64 {
        match self {
            ImplementationKind::Accurate => 120,
            ImplementationKind::Balanced => 80,
            ImplementationKind::Fast => 45,
            ImplementationKind::Keyword => 1,
        }
    }

    /// Per-intent seed cap for the semantic tiers.
    fn seed_cap(&self) -> Option<usize> {
        match self {
            ImplementationKind::Accurate => None,
            ImplementationKind::Balanced => Some(24),
            ImplementationKind::Fast => Some(8),
            ImplementationKind::Keyword => None,
        }
    }

    /// Whether this tier runs entity extraction.
    fn with_entities(&self) -> bool {
        matches!(
            self,
            ImplementationKind::Accurate | ImplementationKind::Balanced
        )
    }
}

/// Lifecycle state of one implementation slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImplementationStatus {
    NotStarted,
    Initializing,
    Ready,
    Failed,
}

/// Introspection record for one implementation.
#[derive(Debug, Clone, Serialize)]
pub struct ImplementationInfo {
    pub name: &'static str,
    pub status: ImplementationStatus,
    pub accuracy: f32,
    pub avg_latency_ms: u64,
}

/// One slot in the selector table.
struct Slot {
    status: ImplementationStatus,
    instance: Option<Arc<dyn IntentClassifier>>,
}

/// Owns and lazily constructs classifier implementations.
pub struct ClassifierSelector {
    embedding: Option<Arc<dyn EmbeddingProvider>>,
    entities: Option<Arc<dyn EntityProvider>>,
    corpus: SeedCorpus,
    config: EngineConfig,
    slots: Mutex<HashMap<ImplementationKind, Slot>>,
    init_lock: tokio::sync::Mutex<()>,
}

impl ClassifierSelector {
    /// Create a selector over the given collaborators, corpus, and config.
    ///
    /// Nothing is constructed yet; call [`warmup`](Self::warmup) to avoid
    /// cold-start latency on the first request.
    pub fn new(
        embedding: Option<Arc<dyn EmbeddingProvider>>,
        entities: Option<Arc<dyn EntityProvider>>,
        corpus: SeedCorpus,
        config: EngineConfig,
    ) -> Self {
        Self {
            embedding,
            entities,
            corpus,
            config,
            slots: Mutex::new(HashMap::new()),
            init_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Get a classifier, preferring `name` when given, falling through the
    /// preference order on construction failure.
    ///
    /// An unknown name is a configuration error. With `None`, the chain
    /// starts at the highest-preference implementation.
    pub async fn get(&self, name: Option<&str>) -> Result<Arc<dyn IntentClassifier>> {
        let chain = self.chain_from(name)?;

        let mut failed_from: Option<ImplementationKind> = None;
        for kind in chain {
            match self.get_or_init(kind).await {
                Ok(classifier) => {
                    if let Some(from) = failed_from {
                        warn!(
                            from = from.name(),
                            to = kind.name(),
                            "fell back to lower-preference implementation"
                        );
                        metrics::counter!(telemetry::FALLBACKS_TOTAL,
                            "from" => from.name(),
                            "to" => kind.name(),
                        )
                        .increment(1);
                    }
                    return Ok(classifier);
                }
                Err(e) if e.is_fallback_trigger() => {
                    debug!(implementation = kind.name(), error = %e, "construction failed");
                    failed_from.get_or_insert(kind);
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        Err(HuginnError::NoClassifier)
    }

    /// Classify with the best available implementation.
    pub async fn parse(&self, text: &str, options: &ParseOptions) -> Result<ClassificationResult> {
        let start = Instant::now();
        let classifier = self.get(None).await?;
        let result = classifier.parse(text, options).await;

        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::REQUESTS_TOTAL,
            "implementation" => classifier.name().to_owned(),
            "status" => status,
        )
        .increment(1);
        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS,
            "implementation" => classifier.name().to_owned(),
        )
        .record(start.elapsed().as_secs_f64());

        result
    }

    /// Eagerly construct every implementation.
    ///
    /// Intended to be called once at process startup. Construction
    /// failures are logged and left to the fallback chain; warmup itself
    /// never fails.
    pub async fn warmup(&self) {
        for kind in ImplementationKind::PREFERENCE_ORDER {
            if let Err(e) = self.get_or_init(kind).await {
                warn!(implementation = kind.name(), error = %e, "warmup failed");
            }
        }
    }

    /// Status and metadata for every implementation, in preference order.
    pub fn list_implementations(&self) -> Vec<ImplementationInfo> {
        let slots = self.slots.lock().expect("selector slot lock");
        ImplementationKind::PREFERENCE_ORDER
            .iter()
            .map(|kind| ImplementationInfo {
                name: kind.name(),
                status: slots
                    .get(kind)
                    .map(|s| s.status)
                    .unwrap_or(ImplementationStatus::NotStarted),
                accuracy: kind.accuracy(),
                avg_latency_ms: kind.avg_latency_ms(),
            })
            .collect()
    }

    /// The fallback chain starting from the requested implementation.
    fn chain_from(&self, name: Option<&str>) -> Result<Vec<ImplementationKind>> {
        let start = match name {
            Some(name) => ImplementationKind::from_name(name).ok_or_else(|| {
                HuginnError::Configuration(format!("unknown implementation '{name}'"))
            })?,
            None => ImplementationKind::PREFERENCE_ORDER[0],
        };

        let mut chain = vec![start];
        chain.extend(
            ImplementationKind::PREFERENCE_ORDER
                .iter()
                .copied()
                .filter(|k| *k != start),
        );
        Ok(chain)
    }

    /// Get the cached instance for a kind, or construct it.
    ///
    /// Construction is idempotent: the second caller finds the cached
    /// instance and no re-initialization happens. A failed slot stays
    /// failed.
    async fn get_or_init(&self, kind: ImplementationKind) -> Result<Arc<dyn IntentClassifier>> {
        // Fast path: already resolved (no await while holding the lock)
        if let Some(outcome) = self.resolved(kind) {
            return outcome;
        }

        // Serialise builds; re-check after acquiring
        let _guard = self.init_lock.lock().await;
        if let Some(outcome) = self.resolved(kind) {
            return outcome;
        }

        self.set_status(kind, ImplementationStatus::Initializing);
        match self.build(kind).await {
            Ok(instance) => {
                let mut slots = self.slots.lock().expect("selector slot lock");
                slots.insert(
                    kind,
                    Slot {
                        status: ImplementationStatus::Ready,
                        instance: Some(instance.clone()),
                    },
                );
                Ok(instance)
            }
            Err(e) => {
                self.set_status(kind, ImplementationStatus::Failed);
                Err(e)
            }
        }
    }

    /// Terminal outcome for a slot, if it has one.
    fn resolved(&self, kind: ImplementationKind) -> Option<Result<Arc<dyn IntentClassifier>>> {
        let slots = self.slots.lock().expect("selector slot lock");
        match slots.get(&kind) {
            Some(Slot {
                status: ImplementationStatus::Ready,
                instance: Some(instance),
            }) => Some(Ok(instance.clone())),
            Some(Slot {
                status: ImplementationStatus::Failed,
                ..
            }) => Some(Err(HuginnError::Initialization {
                implementation: kind.name().to_string(),
                reason: "previous initialization failed".to_string(),
            })),
            _ => None,
        }
    }

    fn set_status(&self, kind: ImplementationKind, status: ImplementationStatus) {
        let mut slots = self.slots.lock().expect("selector slot lock");
        let slot = slots.entry(kind).or_insert(Slot {
            status,
            instance: None,
        });
        slot.status = status;
    }

    async fn build(&self, kind: ImplementationKind) -> Result<Arc<dyn IntentClassifier>> {
        match kind {
            ImplementationKind::Keyword => Ok(Arc::new(KeywordClassifier::new(
                self.config.resolver,
                self.corpus.priorities().clone(),
            ))),
            semantic => {
                let embedding =
                    self.embedding
                        .clone()
                        .ok_or_else(|| HuginnError::Initialization {
                            implementation: semantic.name().to_string(),
                            reason: "no embedding provider configured".to_string(),
                        })?;
                let entities = semantic
                    .with_entities()
                    .then(|| self.entities.clone())
                    .flatten();

                let classifier = SemanticClassifier::initialize(
                    semantic.name(),
                    embedding,
                    entities,
                    &self.corpus,
                    semantic.seed_cap(),
                    self.config.resolver,
                    self.config.limits,
                    self.config.cache,
                )
                .await?;
                Ok(Arc::new(classifier))
            }
        }
    }
}
