//! Similarity scoring against the seed-embedding cache.
//!
//! Each intent's score is the **maximum** cosine similarity between the
//! input vector and that intent's seed vectors — not the average. An
//! utterance needs to resemble only one good exemplar; taking the max
//! tolerates multi-modal intents whose seeds are lexically distinct
//! (e.g. "remember X" and "set a reminder for X" both seeding
//! memory_store).

use crate::cache::SeedEmbeddingCache;
use crate::error::{HuginnError, Result};
use crate::types::{EmbeddingVector, Intent, ScoreMap};

/// Score the input vector against every intent's cached seeds.
///
/// Raw cosine lands in [-1, 1]; negative similarities clamp to zero so the
/// map holds non-negative values throughout the pipeline. A malformed
/// input vector (non-finite components, wrong vector space) is a typed
/// error — never a silently-zeroed map, which would masquerade as "none of
/// the intents match".
pub fn score(input: &EmbeddingVector, seeds: &SeedEmbeddingCache) -> Result<ScoreMap> {
    if !input.is_finite() {
        return Err(HuginnError::Embedding(
            "input vector contains non-finite components".to_string(),
        ));
    }
    seeds.check_compatible(input)?;

    let mut scores = ScoreMap::zeroed();
    for intent in Intent::ALL {
        let best = seeds
            .vectors_for(intent)
            .iter()
            .map(|seed| cosine_similarity(&input.values, seed))
            .fold(0.0f32, f32::max);
        scores.set(intent, best.max(0.0));
    }
    Ok(scores)
}

/// Cosine similarity between two vectors.
///
/// Zero-norm vectors are defined to have similarity 0, guarding against
/// degenerate embeddings.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
