//! Builder for configuring engine instances

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{CacheConfig, EngineConfig, LimitsConfig, ResolverConfig};
use crate::corpus::SeedCorpus;
use crate::error::Result;
use crate::providers::{EmbeddingProvider, EntityProvider};
use crate::selector::{ClassifierSelector, ImplementationInfo};
use crate::traits::IntentClassifier;
use crate::types::{ClassificationResult, ParseOptions};

#[cfg(feature = "local-embeddings")]
use crate::providers::{FastEmbedProvider, LocalEmbeddingModel};

/// The intent classification engine.
///
/// Owns the classifier selector and passes collaborator instances down
/// explicitly — there is no ambient global registry. Cheap to clone-share
/// via `Arc` at the call site; one engine per embedding vector space.
pub struct Huginn {
    selector: Arc<ClassifierSelector>,
}

impl Huginn {
    /// Create a new builder for configuring the engine.
    pub fn builder() -> HuginnBuilder {
        HuginnBuilder::new()
    }

    /// Classify an utterance with the best available implementation.
    pub async fn parse(&self, text: &str, options: &ParseOptions) -> Result<ClassificationResult> {
        self.selector.parse(text, options).await
    }

    /// Get a specific implementation (or the best available with `None`),
    /// falling through the preference order on construction failure.
    pub async fn classifier(&self, name: Option<&str>) -> Result<Arc<dyn IntentClassifier>> {
        self.selector.get(name).await
    }

    /// Eagerly construct all implementations. Call once at startup to
    /// avoid cold-start latency on the first real request.
    pub async fn warmup(&self) {
        self.selector.warmup().await;
    }

    /// Status and metadata for every implementation.
    pub fn list_implementations(&self) -> Vec<ImplementationInfo> {
        self.selector.list_implementations()
    }
}

/// Builder for configuring engine instances.
#[derive(Default)]
pub struct HuginnBuilder {
    embedding: Option<Arc<dyn EmbeddingProvider>>,
    entities: Option<Arc<dyn EntityProvider>>,
    corpus: Option<SeedCorpus>,
    corpus_path: Option<PathBuf>,
    config: Option<EngineConfig>,
    resolver: Option<ResolverConfig>,
    limits: Option<LimitsConfig>,
    cache: Option<CacheConfig>,
}

impl HuginnBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the embedding collaborator.
    ///
    /// Without one, only the keyword implementation is constructible and
    /// every request routes there.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding = Some(provider);
        self
    }

    /// Set the entity-extraction collaborator (optional enrichment).
    pub fn entity_provider(mut self, provider: Arc<dyn EntityProvider>) -> Self {
        self.entities = Some(provider);
        self
    }

    /// Use local embeddings via fastembed.
    #[cfg(feature = "local-embeddings")]
    pub fn local_embeddings(self, model: LocalEmbeddingModel) -> Result<Self> {
        let provider = FastEmbedProvider::new(model)?;
        Ok(self.embedding_provider(Arc::new(provider)))
    }

    /// Use an explicit, already-loaded corpus.
    pub fn corpus(mut self, corpus: SeedCorpus) -> Self {
        self.corpus = Some(corpus);
        self
    }

    /// Load the corpus from a TOML file at build time.
    pub fn corpus_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.corpus_path = Some(path.into());
        self
    }

    /// Provide a full engine configuration (e.g. from
    /// [`EngineConfig::load`]). Field-level setters below override it.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Override the resolver parameters.
    pub fn resolver(mut self, resolver: ResolverConfig) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Override the collaborator limits.
    pub fn limits(mut self, limits: LimitsConfig) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Override the input-embedding cache settings.
    pub fn embedding_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Build the engine.
    ///
    /// Classifier construction stays lazy; this only resolves the corpus
    /// and configuration, so build failures are configuration problems.
    pub fn build(self) -> Result<Huginn> {
        let mut config = self.config.unwrap_or_default();
        if let Some(resolver) = self.resolver {
            config.resolver = resolver;
        }
        if let Some(limits) = self.limits {
            config.limits = limits;
        }
        if let Some(cache) = self.cache {
            config.cache = cache;
        }

        let corpus = match (self.corpus, self.corpus_path.or(config.corpus_path.take())) {
            (Some(corpus), _) => corpus,
            (None, Some(path)) => SeedCorpus::load(&path)?,
            (None, None) => SeedCorpus::embedded_default(),
        };

        let selector = ClassifierSelector::new(self.embedding, self.entities, corpus, config);
        Ok(Huginn {
            selector: Arc::new(selector),
        })
    }
}
