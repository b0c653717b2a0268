//! Library-wide default constants.
//!
//! Centralises the tunables consumed by the session store, the healing
//! engine, and the orchestrator. Grouped by subsystem for easy discovery.

// ============================================================================
// Session Store
// ============================================================================

/// Namespace prefix applied to every persisted key.
///
/// The version tag in the prefix lets a future schema change use a fresh
/// keyspace instead of migrating records in place.
pub const DEFAULT_STORAGE_PREFIX: &str = "lynk_v1_";

/// Key (under the prefix) holding the session record.
pub const SESSION_KEY: &str = "session";

/// Schema version written into every session record.
pub const SESSION_SCHEMA_VERSION: &str = "1.0";

// ============================================================================
// Healing Engine
// ============================================================================

/// Default maximum healing attempts per run.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default delay before the first connect attempt (milliseconds).
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 100;

/// Default multiplier applied to the delay after each failed attempt.
pub const DEFAULT_BACKOFF_FACTOR: f64 = 2.0;

/// Hard ceiling on the backoff delay (milliseconds).
pub const MAX_BACKOFF_DELAY_MS: u64 = 5_000;

// ============================================================================
// Auto-Connect
// ============================================================================

/// Default auto-connect timeout (milliseconds).
///
/// Declared for configuration compatibility; not yet consulted by the
/// healing algorithm.
pub const DEFAULT_AUTO_CONNECT_TIMEOUT_MS: u64 = 10_000;
