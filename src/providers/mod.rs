//! Collaborator traits for the external embedding and NER services.
//!
//! The classification core never talks to a model directly; it consumes
//! these capability traits and stays agnostic about whether the backing
//! implementation is an HTTP service, a local model, or a test double.
//!
//! # Contracts
//!
//! - [`EmbeddingProvider`] must be deterministic for identical input and
//!   produce vectors from one fixed model/dimensionality for the lifetime
//!   of the provider instance. Errors are fatal for the request.
//! - [`EntityProvider`] is best-effort: callers degrade to an empty entity
//!   list on failure, since entities refine scoring but do not gate it.

pub mod http;

#[cfg(feature = "local-embeddings")]
pub mod fastembed;

pub use http::{HttpEmbeddingClient, HttpEntityClient};

#[cfg(feature = "local-embeddings")]
pub use fastembed::{FastEmbedProvider, LocalEmbeddingModel};

use async_trait::async_trait;

use crate::Result;
use crate::types::{EmbeddingVector, Entity};

/// Provider for text embeddings.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// Identifier of the fixed embedding model this provider serves.
    ///
    /// The seed cache records this tag at build time and rejects vectors
    /// carrying a different one.
    fn model(&self) -> &str;

    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<EmbeddingVector>;

    /// Generate embeddings for multiple texts (batch).
    ///
    /// Default implementation calls `embed` sequentially.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }
}

/// Provider for named-entity extraction.
#[async_trait]
pub trait EntityProvider: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// Extract typed spans from the text.
    ///
    /// Spans may overlap; the extractor may merge adjacent same-type
    /// entities.
    async fn extract_entities(&self, text: &str) -> Result<Vec<Entity>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProvider;

    #[async_trait]
    impl EmbeddingProvider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        fn model(&self) -> &str {
            "fixed-model"
        }

        async fn embed(&self, text: &str) -> Result<EmbeddingVector> {
            Ok(EmbeddingVector::new(
                vec![text.len() as f32, 1.0],
                self.model(),
            ))
        }
    }

    #[tokio::test]
    async fn default_embed_batch_preserves_order() {
        let provider = FixedProvider;
        let vectors = provider.embed_batch(&["a", "abc"]).await.unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0].values[0], 1.0);
        assert_eq!(vectors[1].values[0], 3.0);
    }
}
