//! Telemetry metric name constants.
//!
//! Centralised metric names for huginn operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `huginn_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `implementation` — classifier implementation name (e.g. "accurate", "keyword")
//! - `intent` — resolved intent label (e.g. "web_search")
//! - `status` — outcome: "ok" or "error"
//! - `operation` — collaborator call (e.g. "embed", "extract_entities")

/// Total parse requests dispatched.
///
/// Labels: `implementation`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "huginn_requests_total";

/// Parse request duration in seconds.
///
/// Labels: `implementation`.
pub const REQUEST_DURATION_SECONDS: &str = "huginn_request_duration_seconds";

/// Total resolved intents, by label.
///
/// Labels: `intent`.
pub const INTENTS_TOTAL: &str = "huginn_intents_total";

/// Total requests resolved by the confidence-floor circuit breaker.
pub const LOW_CONFIDENCE_TOTAL: &str = "huginn_low_confidence_total";

/// Total input-embedding cache hits.
pub const CACHE_HITS_TOTAL: &str = "huginn_cache_hits_total";

/// Total input-embedding cache misses.
pub const CACHE_MISSES_TOTAL: &str = "huginn_cache_misses_total";

/// Total selector fall-throughs to a lower-preference implementation.
///
/// Labels: `from`, `to`.
pub const FALLBACKS_TOTAL: &str = "huginn_selector_fallbacks_total";

/// Total entity-extraction failures degraded to an empty entity list.
///
/// Labels: `operation`.
pub const ENTITY_FAILURES_TOTAL: &str = "huginn_entity_failures_total";
