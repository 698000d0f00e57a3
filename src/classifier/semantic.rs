//! Embedding-similarity classifier: the full scoring pipeline.
//!
//! Per request: embed the input (and extract entities concurrently — the
//! two collaborators are independent), score against the seed cache,
//! run the boost chain, resolve. The three pipeline stages are strictly
//! ordered within one request; requests are independent of each other.

use std::borrow::Cow;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{instrument, warn};

use crate::boost::{BoostContext, Booster};
use crate::cache::{EmbeddingMemo, SeedEmbeddingCache};
use crate::config::{CacheConfig, LimitsConfig, ResolverConfig};
use crate::corpus::SeedCorpus;
use crate::error::{HuginnError, Result};
use crate::providers::{EmbeddingProvider, EntityProvider};
use crate::resolver::DecisionResolver;
use crate::scorer;
use crate::telemetry;
use crate::traits::IntentClassifier;
use crate::types::{ClassificationResult, EmbeddingVector, Entity, ParseOptions};

/// Inputs under this many characters are checked against the
/// acknowledgement set for context augmentation.
const ACK_MAX_LEN: usize = 15;

/// How much of the prior assistant turn is prepended, in characters.
const ACK_CONTEXT_MAX: usize = 120;

/// Bare acknowledgements that carry no classifiable content on their own.
const ACKNOWLEDGEMENTS: &[&str] = &[
    "yes", "no", "ok", "okay", "sure", "yeah", "yep", "nope", "nah", "thanks", "thank you",
    "got it", "alright", "fine", "cool",
];

/// The embedding-similarity classifier.
pub struct SemanticClassifier {
    name: &'static str,
    embedding: Arc<dyn EmbeddingProvider>,
    entities: Option<Arc<dyn EntityProvider>>,
    seeds: SeedEmbeddingCache,
    booster: Booster,
    resolver: DecisionResolver,
    memo: Option<EmbeddingMemo>,
    collaborator_timeout: Duration,
}

impl SemanticClassifier {
    /// Build the classifier, embedding the corpus into the seed cache.
    ///
    /// `seed_cap` limits seeds per intent (the balanced/fast tiers);
    /// `entities = None` skips extraction entirely (the fast tier).
    /// A collaborator failure here surfaces as
    /// [`HuginnError::Initialization`] so the selector can fall through.
    #[allow(clippy::too_many_arguments)]
    pub(crate) async fn initialize(
        name: &'static str,
        embedding: Arc<dyn EmbeddingProvider>,
        entities: Option<Arc<dyn EntityProvider>>,
        corpus: &SeedCorpus,
        seed_cap: Option<usize>,
        resolver_config: ResolverConfig,
        limits: LimitsConfig,
        cache_config: CacheConfig,
    ) -> Result<Self> {
        let seeds = SeedEmbeddingCache::build(embedding.as_ref(), corpus, seed_cap)
            .await
            .map_err(|e| HuginnError::Initialization {
                implementation: name.to_string(),
                reason: e.to_string(),
            })?;

        let memo = cache_config
            .enabled
            .then(|| EmbeddingMemo::new(&cache_config, seeds.model()));

        Ok(Self {
            name,
            embedding,
            entities,
            seeds,
            booster: Booster::with_default_rules(),
            resolver: DecisionResolver::new(resolver_config, corpus.priorities().clone()),
            memo,
            collaborator_timeout: limits.collaborator_timeout(),
        })
    }

    /// Embed the (possibly context-augmented) input, memoized and
    /// timeout-bounded. Embedding failures are fatal for the request.
    async fn embed_input(&self, text: &str) -> Result<EmbeddingVector> {
        if let Some(memo) = &self.memo {
            if let Some(hit) = memo.get(text).await {
                return Ok(hit);
            }
        }

        let vector = tokio::time::timeout(self.collaborator_timeout, self.embedding.embed(text))
            .await
            .map_err(|_| HuginnError::Timeout {
                operation: "embed",
                timeout: self.collaborator_timeout,
            })??;

        if !vector.is_finite() {
            return Err(HuginnError::Embedding(
                "embedding collaborator returned non-finite values".to_string(),
            ));
        }

        if let Some(memo) = &self.memo {
            memo.insert(text, &vector).await;
        }
        Ok(vector)
    }

    /// Extract entities, degrading to an empty list on any failure.
    ///
    /// Entities are an enrichment signal, not a requirement for
    /// classification to proceed.
    async fn extract(&self, text: &str) -> Vec<Entity> {
        let Some(provider) = &self.entities else {
            return Vec::new();
        };

        let outcome =
            tokio::time::timeout(self.collaborator_timeout, provider.extract_entities(text)).await;

        match outcome {
            Ok(Ok(entities)) => entities,
            Ok(Err(e)) => {
                warn!(provider = provider.name(), error = %e, "entity extraction failed");
                metrics::counter!(telemetry::ENTITY_FAILURES_TOTAL, "operation" => "extract")
                    .increment(1);
                Vec::new()
            }
            Err(_) => {
                warn!(provider = provider.name(), "entity extraction timed out");
                metrics::counter!(telemetry::ENTITY_FAILURES_TOTAL, "operation" => "timeout")
                    .increment(1);
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl IntentClassifier for SemanticClassifier {
    fn name(&self) -> &str {
        self.name
    }

    #[instrument(skip_all, fields(implementation = self.name))]
    async fn parse(&self, text: &str, options: &ParseOptions) -> Result<ClassificationResult> {
        let start = Instant::now();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(HuginnError::InvalidInput("empty input text".to_string()));
        }

        let embed_text = contextualize(trimmed, options);

        // Embedding and entity extraction are independent of each other;
        // run them concurrently. The booster needs both.
        let (vector, entities) = if options.include_entities {
            tokio::join!(self.embed_input(&embed_text), self.extract(trimmed))
        } else {
            (self.embed_input(&embed_text).await, Vec::new())
        };
        let vector = vector?;

        let raw = scorer::score(&vector, &self.seeds)?;
        // The booster always sees the original text, never the
        // history-augmented embedding text.
        let ctx = BoostContext::new(trimmed, &entities);
        let scores = self.booster.boost(raw, &ctx);
        let (intent, confidence) = self.resolver.resolve(&scores);

        metrics::counter!(telemetry::INTENTS_TOTAL, "intent" => intent.label()).increment(1);

        Ok(ClassificationResult {
            intent,
            confidence,
            scores,
            entities,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// Prepend a truncated excerpt of the last assistant turn when the input
/// is a bare acknowledgement.
///
/// This is the only place conversation history influences classification,
/// and it affects only the text that gets embedded.
fn contextualize<'a>(text: &'a str, options: &ParseOptions) -> Cow<'a, str> {
    if text.chars().count() >= ACK_MAX_LEN {
        return Cow::Borrowed(text);
    }

    let folded = text.to_lowercase();
    let bare = folded.trim_end_matches(['.', '!', '?', ',']);
    if !ACKNOWLEDGEMENTS.contains(&bare) {
        return Cow::Borrowed(text);
    }

    match options.last_assistant_turn() {
        Some(turn) => {
            let excerpt: String = turn.chars().take(ACK_CONTEXT_MAX).collect();
            Cow::Owned(format!("{excerpt} {text}"))
        }
        None => Cow::Borrowed(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boost::BoostRule;
    use crate::types::{Intent, Message, ScoreMap};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Bag-of-words stub: hashes words into buckets so overlapping texts
    /// get high cosine similarity. Deterministic.
    struct BagOfWordsProvider;

    fn bucket(word: &str) -> usize {
        use std::hash::{Hash, Hasher};
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        word.hash(&mut hasher);
        (hasher.finish() % 64) as usize
    }

    #[async_trait]
    impl EmbeddingProvider for BagOfWordsProvider {
        fn name(&self) -> &str {
            "bag-of-words"
        }
        fn model(&self) -> &str {
            "bow-64"
        }
        async fn embed(&self, text: &str) -> Result<EmbeddingVector> {
            let mut values = vec![0.0f32; 64];
            for word in text.to_lowercase().split_whitespace() {
                let word = word.trim_matches(|c: char| !c.is_alphanumeric());
                if !word.is_empty() {
                    values[bucket(word)] += 1.0;
                }
            }
            Ok(EmbeddingVector::new(values, "bow-64"))
        }
    }

    async fn classifier() -> SemanticClassifier {
        SemanticClassifier::initialize(
            "test",
            Arc::new(BagOfWordsProvider),
            None,
            &SeedCorpus::embedded_default(),
            None,
            ResolverConfig::default(),
            LimitsConfig::default(),
            CacheConfig::default(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn empty_input_is_invalid() {
        let classifier = classifier().await;
        let result = classifier.parse("   ", &ParseOptions::default()).await;
        assert!(matches!(result, Err(HuginnError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn booster_runs_exactly_once_per_parse() {
        struct CountingRule {
            calls: Arc<AtomicUsize>,
        }
        impl BoostRule for CountingRule {
            fn name(&self) -> &'static str {
                "counting"
            }
            fn triggers(&self, _ctx: &BoostContext<'_>) -> bool {
                true
            }
            fn adjust(&self, scores: ScoreMap, _ctx: &BoostContext<'_>) -> ScoreMap {
                self.calls.fetch_add(1, Ordering::SeqCst);
                scores
            }
        }

        let calls = Arc::new(AtomicUsize::new(0));
        let mut classifier = classifier().await;
        classifier.booster = Booster::new(vec![Box::new(CountingRule {
            calls: calls.clone(),
        })]);

        classifier
            .parse("hello", &ParseOptions::default())
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        classifier
            .parse("hello", &ParseOptions::default())
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn embed_timeout_is_typed() {
        struct SlowProvider;

        #[async_trait]
        impl EmbeddingProvider for SlowProvider {
            fn name(&self) -> &str {
                "slow"
            }
            fn model(&self) -> &str {
                "slow-model"
            }
            async fn embed(&self, text: &str) -> Result<EmbeddingVector> {
                // Seed-cache builds answer instantly; only single-text
                // requests (the live path) stall.
                if !text.contains(' ') {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                }
                Ok(EmbeddingVector::new(vec![1.0, 0.0], "slow-model"))
            }
            async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>> {
                Ok(texts
                    .iter()
                    .map(|_| EmbeddingVector::new(vec![1.0, 0.0], "slow-model"))
                    .collect())
            }
        }

        let limits = LimitsConfig {
            collaborator_timeout_secs: 1,
        };
        let classifier = SemanticClassifier::initialize(
            "test",
            Arc::new(SlowProvider),
            None,
            &SeedCorpus::embedded_default(),
            Some(2),
            ResolverConfig::default(),
            limits,
            CacheConfig::default(),
        )
        .await
        .unwrap();

        tokio::time::pause();
        let options = ParseOptions::default();
        let parse = classifier.parse("stall", &options);
        tokio::pin!(parse);
        tokio::time::advance(Duration::from_secs(2)).await;
        let result = parse.await;
        assert!(matches!(
            result,
            Err(HuginnError::Timeout {
                operation: "embed",
                ..
            })
        ));
    }

    #[test]
    fn contextualize_prepends_assistant_turn_for_bare_ack() {
        let options = ParseOptions::default().conversation_history(vec![Message::assistant(
            "Should I schedule the dentist appointment for Tuesday?",
        )]);
        let augmented = contextualize("yes", &options);
        assert!(augmented.contains("dentist"));
        assert!(augmented.ends_with("yes"));
    }

    #[test]
    fn contextualize_leaves_ordinary_text_alone() {
        let options = ParseOptions::default()
            .conversation_history(vec![Message::assistant("anything")]);
        assert_eq!(contextualize("what is the capital of France", &options), Cow::<str>::Borrowed("what is the capital of France"));
        // Short but not an acknowledgement
        assert_eq!(contextualize("weather?", &options), Cow::<str>::Borrowed("weather?"));
    }

    #[test]
    fn contextualize_without_history_is_identity() {
        assert_eq!(
            contextualize("ok", &ParseOptions::default()),
            Cow::<str>::Borrowed("ok")
        );
    }

    #[test]
    fn contextualize_truncates_long_turns() {
        let long_turn = "x".repeat(500);
        let options =
            ParseOptions::default().conversation_history(vec![Message::assistant(long_turn)]);
        let augmented = contextualize("ok", &options);
        assert!(augmented.chars().count() <= ACK_CONTEXT_MAX + " ok".len());
    }
}
