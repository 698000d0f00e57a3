//! Public types for the Huginn API.

mod embedding;
mod entity;
mod intent;
mod options;
mod result;

pub use embedding::EmbeddingVector;
pub use entity::Entity;
pub use intent::{Intent, PriorityTable};
pub use options::{Message, ParseOptions, Role};
pub use result::{ClassificationResult, ScoreMap};
