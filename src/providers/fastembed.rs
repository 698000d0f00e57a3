//! Local embeddings via fastembed-rs (`local-embeddings` feature).

use std::sync::Mutex;

use async_trait::async_trait;

use super::EmbeddingProvider;
use crate::error::{HuginnError, Result};
use crate::types::EmbeddingVector;

/// Supported local embedding models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocalEmbeddingModel {
    /// all-MiniLM-L6-v2 (384 dims, fast, good quality).
    AllMiniLmL6V2,
    /// all-MiniLM-L12-v2 (384 dims, slightly better).
    AllMiniLmL12V2,
    /// BGE-small-en (384 dims, strong retrieval).
    BgeSmallEn,
}

impl LocalEmbeddingModel {
    /// Get the model name for display and vector-space tagging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AllMiniLmL6V2 => "all-MiniLM-L6-v2",
            Self::AllMiniLmL12V2 => "all-MiniLM-L12-v2",
            Self::BgeSmallEn => "BGE-small-en",
        }
    }

    /// Get the embedding dimensions.
    pub fn dimensions(&self) -> usize {
        384
    }
}

impl From<LocalEmbeddingModel> for fastembed::EmbeddingModel {
    fn from(model: LocalEmbeddingModel) -> Self {
        match model {
            LocalEmbeddingModel::AllMiniLmL6V2 => fastembed::EmbeddingModel::AllMiniLML6V2,
            LocalEmbeddingModel::AllMiniLmL12V2 => fastembed::EmbeddingModel::AllMiniLML12V2,
            LocalEmbeddingModel::BgeSmallEn => fastembed::EmbeddingModel::BGESmallENV15,
        }
    }
}

/// Local embedding provider using fastembed-rs.
///
/// Inference needs `&mut` access to the underlying model, so it sits
/// behind a mutex; calls are CPU-bound and short for classification-sized
/// inputs.
pub struct FastEmbedProvider {
    model: Mutex<fastembed::TextEmbedding>,
    model_name: &'static str,
}

impl FastEmbedProvider {
    /// Create a new provider with the specified model.
    ///
    /// Downloads the model if not cached locally.
    pub fn new(model: LocalEmbeddingModel) -> Result<Self> {
        let cache_dir = std::env::var("HUGINN_CACHE_DIR")
            .map(std::path::PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::cache_dir()
                    .unwrap_or_else(|| std::path::PathBuf::from(".cache"))
                    .join("huginn")
                    .join("models")
            });

        let options = fastembed::InitOptions::new(model.into())
            .with_show_download_progress(false)
            .with_cache_dir(cache_dir);

        let model_instance = fastembed::TextEmbedding::try_new(options).map_err(|e| {
            HuginnError::Configuration(format!("failed to load embedding model: {e}"))
        })?;

        Ok(Self {
            model: Mutex::new(model_instance),
            model_name: model.name(),
        })
    }

    fn embed_texts(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let mut model = self
            .model
            .lock()
            .map_err(|e| HuginnError::Configuration(format!("failed to acquire model lock: {e}")))?;
        model
            .embed(texts, None)
            .map_err(|e| HuginnError::Embedding(format!("local embedding failed: {e}")))
    }
}

#[async_trait]
impl EmbeddingProvider for FastEmbedProvider {
    fn name(&self) -> &str {
        "fastembed"
    }

    fn model(&self) -> &str {
        self.model_name
    }

    async fn embed(&self, text: &str) -> Result<EmbeddingVector> {
        let values = self
            .embed_texts(vec![text.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| HuginnError::Embedding("no embedding returned".to_string()))?;
        Ok(EmbeddingVector::new(values, self.model_name))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>> {
        let owned: Vec<String> = texts.iter().map(|s| s.to_string()).collect();
        let vectors = self.embed_texts(owned)?;
        Ok(vectors
            .into_iter()
            .map(|values| EmbeddingVector::new(values, self.model_name))
            .collect())
    }
}
