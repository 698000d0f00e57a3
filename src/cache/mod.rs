//! Caching subsystem.
//!
//! Two independent caches:
//!
//! - [`SeedEmbeddingCache`] — one vector per seed example, keyed by
//!   intent. Built once when a classifier initializes and read-only for
//!   the rest of the process lifetime; adding intents means building a
//!   new classifier, never mutating the cache in place. This keeps
//!   request handling lock-free.
//!
//! - [`EmbeddingMemo`] — opt-in LRU + TTL cache for input-text
//!   embeddings. Embedding generation is deterministic (same input →
//!   same output), so memoizing per (model, text) is safe. Activated via
//!   the engine cache config.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use moka::future::Cache;

use crate::config::CacheConfig;
use crate::corpus::SeedCorpus;
use crate::error::{HuginnError, Result};
use crate::providers::EmbeddingProvider;
use crate::telemetry;
use crate::types::{EmbeddingVector, Intent};

/// Precomputed seed vectors for every intent, in one fixed vector space.
#[derive(Debug, Clone)]
pub struct SeedEmbeddingCache {
    model: String,
    dimensions: usize,
    vectors: HashMap<Intent, Vec<Vec<f32>>>,
}

impl SeedEmbeddingCache {
    /// Embed the corpus through the provider and build the cache.
    ///
    /// `seed_cap` limits how many examples per intent are embedded —
    /// lighter implementations trade recall for startup time and per-request
    /// comparisons. `None` embeds everything.
    ///
    /// Every returned vector must be finite and share one dimensionality;
    /// anything else is an [`HuginnError::Embedding`] — a half-built cache
    /// is never returned.
    pub async fn build(
        provider: &dyn EmbeddingProvider,
        corpus: &SeedCorpus,
        seed_cap: Option<usize>,
    ) -> Result<Self> {
        let model = provider.model().to_string();
        let mut dimensions = 0usize;
        let mut vectors: HashMap<Intent, Vec<Vec<f32>>> = HashMap::new();

        for intent in Intent::ALL {
            let seeds = corpus.seeds_for(intent);
            let capped = match seed_cap {
                Some(cap) => &seeds[..seeds.len().min(cap)],
                None => seeds,
            };
            let texts: Vec<&str> = capped.iter().map(String::as_str).collect();

            let embedded = provider.embed_batch(&texts).await?;
            if embedded.len() != texts.len() {
                return Err(HuginnError::Embedding(format!(
                    "provider returned {} vectors for {} seeds of '{intent}'",
                    embedded.len(),
                    texts.len()
                )));
            }

            let mut intent_vectors = Vec::with_capacity(embedded.len());
            for vector in embedded {
                if !vector.is_finite() {
                    return Err(HuginnError::Embedding(format!(
                        "non-finite seed vector for intent '{intent}'"
                    )));
                }
                if dimensions == 0 {
                    dimensions = vector.dimensions;
                } else if vector.dimensions != dimensions {
                    return Err(HuginnError::Embedding(format!(
                        "inconsistent seed dimensions for intent '{intent}': {} vs {dimensions}",
                        vector.dimensions
                    )));
                }
                intent_vectors.push(vector.values);
            }
            vectors.insert(intent, intent_vectors);
        }

        Ok(Self {
            model,
            dimensions,
            vectors,
        })
    }

    /// Identifier of the model whose vector space this cache lives in.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Dimensionality of every cached vector.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Seed vectors for one intent.
    pub fn vectors_for(&self, intent: Intent) -> &[Vec<f32>] {
        self.vectors
            .get(&intent)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Total number of cached seed vectors.
    pub fn len(&self) -> usize {
        self.vectors.values().map(Vec::len).sum()
    }

    /// Whether the cache holds no vectors.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reject input vectors from a different model or dimensionality.
    ///
    /// Mixing vector spaces silently corrupts similarity scores, so the
    /// mismatch is surfaced as a typed error instead.
    pub fn check_compatible(&self, input: &EmbeddingVector) -> Result<()> {
        if input.model != self.model || input.dimensions != self.dimensions {
            return Err(HuginnError::VectorSpaceMismatch {
                expected: self.model.clone(),
                expected_dims: self.dimensions,
                got: input.model.clone(),
                got_dims: input.dimensions,
            });
        }
        Ok(())
    }
}

/// In-memory memoization of input-text embeddings.
///
/// Uses moka's async-friendly LRU + TTL cache, keyed on a content hash of
/// (model, text). Emits cache hit/miss metrics.
pub struct EmbeddingMemo {
    cache: Cache<u64, Vec<f32>>,
    model: String,
}

impl EmbeddingMemo {
    /// Create a memo cache for one model's vector space.
    pub fn new(config: &CacheConfig, model: impl Into<String>) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(config.ttl())
            .build();
        Self {
            cache,
            model: model.into(),
        }
    }

    /// Look up a memoized embedding for the text.
    pub async fn get(&self, text: &str) -> Option<EmbeddingVector> {
        let key = cache_key(&self.model, text);
        match self.cache.get(&key).await {
            Some(values) => {
                metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
                Some(EmbeddingVector::new(values, &self.model))
            }
            None => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                None
            }
        }
    }

    /// Memoize an embedding for the text.
    pub async fn insert(&self, text: &str, vector: &EmbeddingVector) {
        let key = cache_key(&self.model, text);
        self.cache.insert(key, vector.values.clone()).await;
    }
}

/// Compute a cache key from model and input text.
///
/// `DefaultHasher` (SipHash) is deterministic within a process lifetime,
/// which is sufficient for an in-memory cache.
fn cache_key(model: &str, text: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    model.hash(&mut hasher);
    text.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Deterministic provider: unit vector rotated by text length.
    struct StubProvider {
        model: &'static str,
        dims: usize,
    }

    #[async_trait]
    impl EmbeddingProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        fn model(&self) -> &str {
            self.model
        }

        async fn embed(&self, text: &str) -> Result<EmbeddingVector> {
            let mut values = vec![0.0; self.dims];
            values[text.len() % self.dims] = 1.0;
            Ok(EmbeddingVector::new(values, self.model))
        }
    }

    #[tokio::test]
    async fn build_covers_every_intent() {
        let provider = StubProvider {
            model: "stub-model",
            dims: 8,
        };
        let corpus = SeedCorpus::embedded_default();
        let cache = SeedEmbeddingCache::build(&provider, &corpus, None)
            .await
            .unwrap();

        assert_eq!(cache.model(), "stub-model");
        assert_eq!(cache.dimensions(), 8);
        assert_eq!(cache.len(), corpus.seed_count());
        for intent in Intent::ALL {
            assert!(!cache.vectors_for(intent).is_empty());
        }
    }

    #[tokio::test]
    async fn seed_cap_limits_per_intent_vectors() {
        let provider = StubProvider {
            model: "stub-model",
            dims: 8,
        };
        let corpus = SeedCorpus::embedded_default();
        let cache = SeedEmbeddingCache::build(&provider, &corpus, Some(4))
            .await
            .unwrap();

        for intent in Intent::ALL {
            assert!(cache.vectors_for(intent).len() <= 4);
        }
    }

    #[tokio::test]
    async fn mismatched_vector_space_is_rejected() {
        let provider = StubProvider {
            model: "stub-model",
            dims: 8,
        };
        let corpus = SeedCorpus::embedded_default();
        let cache = SeedEmbeddingCache::build(&provider, &corpus, Some(2))
            .await
            .unwrap();

        let other = EmbeddingVector::new(vec![1.0; 8], "other-model");
        assert!(matches!(
            cache.check_compatible(&other),
            Err(HuginnError::VectorSpaceMismatch { .. })
        ));

        let wrong_dims = EmbeddingVector::new(vec![1.0; 4], "stub-model");
        assert!(cache.check_compatible(&wrong_dims).is_err());

        let ok = EmbeddingVector::new(vec![1.0; 8], "stub-model");
        assert!(cache.check_compatible(&ok).is_ok());
    }

    #[tokio::test]
    async fn non_finite_seed_vector_fails_build() {
        struct NanProvider;

        #[async_trait]
        impl EmbeddingProvider for NanProvider {
            fn name(&self) -> &str {
                "nan"
            }
            fn model(&self) -> &str {
                "nan-model"
            }
            async fn embed(&self, _text: &str) -> Result<EmbeddingVector> {
                Ok(EmbeddingVector::new(vec![f32::NAN, 0.0], "nan-model"))
            }
        }

        let corpus = SeedCorpus::embedded_default();
        let result = SeedEmbeddingCache::build(&NanProvider, &corpus, Some(1)).await;
        assert!(matches!(result, Err(HuginnError::Embedding(_))));
    }

    #[tokio::test]
    async fn memo_round_trips_and_keys_on_text() {
        let memo = EmbeddingMemo::new(&CacheConfig::default(), "stub-model");
        let vector = EmbeddingVector::new(vec![0.1, 0.2], "stub-model");

        assert!(memo.get("hello").await.is_none());
        memo.insert("hello", &vector).await;

        let hit = memo.get("hello").await.unwrap();
        assert_eq!(hit.values, vector.values);
        assert!(memo.get("world").await.is_none());
    }

    #[test]
    fn cache_key_differs_on_model_and_text() {
        let base = cache_key("model-a", "hello");
        assert_eq!(base, cache_key("model-a", "hello"));
        assert_ne!(base, cache_key("model-b", "hello"));
        assert_ne!(base, cache_key("model-a", "world"));
    }
}
