//! Huginn - Intent classification engine for assistant pipelines
//!
//! This crate classifies a free-text utterance into one of a fixed set of
//! intents and attaches lightweight structured entities. Classification
//! combines embedding similarity against curated seed examples, a chain
//! of lexical/entity heuristics, and a confidence-floor + priority
//! tie-break resolution step. Interchangeable implementations sit behind
//! a selector with a deterministic fallback chain.
//!
//! The embedding generator and entity extractor are external
//! collaborators consumed through the [`providers`] traits.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use huginn::{Huginn, ParseOptions};
//! use huginn::providers::{HttpEmbeddingClient, HttpEntityClient};
//!
//! #[tokio::main]
//! async fn main() -> huginn::Result<()> {
//!     let engine = Huginn::builder()
//!         .embedding_provider(Arc::new(HttpEmbeddingClient::new(
//!             "http://localhost:9900",
//!             "all-MiniLM-L6-v2",
//!         )))
//!         .entity_provider(Arc::new(HttpEntityClient::new("http://localhost:9901")))
//!         .build()?;
//!
//!     engine.warmup().await;
//!
//!     let result = engine
//!         .parse("What's the weather today?", &ParseOptions::default())
//!         .await?;
//!
//!     println!("{} ({:.2})", result.intent, result.confidence);
//!     Ok(())
//! }
//! ```

pub mod boost;
mod builder;
pub mod cache;
pub mod classifier;
pub mod config;
pub mod corpus;
pub mod error;
pub mod providers;
mod resolver;
mod scorer;
pub mod selector;
pub mod telemetry;
pub mod traits;
pub mod types;

// Re-export main types at crate root
pub use builder::{Huginn, HuginnBuilder};
pub use config::{CacheConfig, EngineConfig, LimitsConfig, ResolverConfig};
pub use corpus::SeedCorpus;
pub use error::{HuginnError, Result};
pub use resolver::DecisionResolver;
pub use selector::{
    ClassifierSelector, ImplementationInfo, ImplementationKind, ImplementationStatus,
};
pub use traits::IntentClassifier;

// Re-export all types
pub use types::{
    ClassificationResult, EmbeddingVector, Entity, Intent, Message, ParseOptions, PriorityTable,
    Role, ScoreMap,
};
