//! Engine configuration loading.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. explicit path (builder / CLI flag)
//! 2. `~/.huginn/config.toml` (user)
//! 3. built-in defaults
//!
//! Every field has a default, so a missing file is not an error — the
//! engine runs on defaults plus the embedded corpus.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{HuginnError, Result};
use crate::types::Intent;

/// Engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    /// Path to a corpus TOML file replacing the embedded default.
    #[serde(default)]
    pub corpus_path: Option<PathBuf>,
}

/// Decision-resolver parameters.
///
/// The floor and epsilon defaults are empirically chosen; they are kept
/// as configuration rather than constants so deployments can tune them
/// against real traffic.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ResolverConfig {
    /// Minimum top score required to trust any intent signal. Below this
    /// the resolver returns `default_intent` (default: 0.15).
    #[serde(default = "default_floor")]
    pub floor: f32,
    /// Maximum top-two gap treated as a near-tie (default: 0.10).
    #[serde(default = "default_epsilon")]
    pub epsilon: f32,
    /// Intent returned when the floor check fires (default: question).
    #[serde(default = "default_intent")]
    pub default_intent: Intent,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            floor: default_floor(),
            epsilon: default_epsilon(),
            default_intent: default_intent(),
        }
    }
}

fn default_floor() -> f32 {
    0.15
}

fn default_epsilon() -> f32 {
    0.10
}

fn default_intent() -> Intent {
    Intent::Question
}

/// Collaborator call limits.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LimitsConfig {
    /// Per-call timeout for the embedding and entity-extraction
    /// collaborators, in seconds (default: 10). The engine does not
    /// retry; retry policy belongs to the caller.
    #[serde(default = "default_collaborator_timeout")]
    pub collaborator_timeout_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            collaborator_timeout_secs: default_collaborator_timeout(),
        }
    }
}

impl LimitsConfig {
    /// The collaborator timeout as a `Duration`.
    pub fn collaborator_timeout(&self) -> Duration {
        Duration::from_secs(self.collaborator_timeout_secs)
    }
}

fn default_collaborator_timeout() -> u64 {
    10
}

/// Input-embedding memoization settings.
///
/// Embedding generation is deterministic for identical input, so results
/// can be cached per (model, text). Disabled entries cost nothing.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CacheConfig {
    /// Enable the input-embedding cache (default: true).
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    /// Maximum number of cached entries (default: 10,000).
    #[serde(default = "default_cache_max_entries")]
    pub max_entries: u64,
    /// Time-to-live for cached entries in seconds (default: 1 hour).
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            max_entries: default_cache_max_entries(),
            ttl_secs: default_cache_ttl(),
        }
    }
}

impl CacheConfig {
    /// The entry TTL as a `Duration`.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_max_entries() -> u64 {
    10_000
}

fn default_cache_ttl() -> u64 {
    3600
}

impl EngineConfig {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided; missing file is an error)
    /// 2. `~/.huginn/config.toml` (if present)
    /// 3. Defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::load_from_file(path);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".huginn").join("config.toml");
            if user_config.exists() {
                return Self::load_from_file(&user_config);
            }
        }

        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            HuginnError::Configuration(format!("failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            HuginnError::Configuration(format!("failed to parse config file {path:?}: {e}"))
        })
    }
}
