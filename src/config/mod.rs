//! Library Configuration
//!
//! All healing and persistence tunables as one serde-loaded struct, so
//! deployments can override them from a TOML file without recompiling.
//!
//! ## Loading Order
//!
//! 1. `LYNK_CONFIG` environment variable (path to TOML file)
//! 2. `lynk.toml` in the current working directory
//! 3. Built-in defaults
//!
//! A malformed file is logged and ignored in favour of defaults — a broken
//! config must never keep the resilience layer from starting.

pub mod defaults;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::path::Path;
use tracing::{info, warn};

// ============================================================================
// Retry Policy
// ============================================================================

/// Bounds and pacing for one healing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum connect attempts per healing run (minimum 1).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first connect attempt (milliseconds).
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Multiplier applied to the delay after each failed attempt
    /// (minimum 1.0). The running delay is capped at
    /// [`defaults::MAX_BACKOFF_DELAY_MS`].
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,
}

fn default_max_attempts() -> u32 {
    defaults::DEFAULT_MAX_ATTEMPTS
}

fn default_initial_delay_ms() -> u64 {
    defaults::DEFAULT_INITIAL_DELAY_MS
}

fn default_backoff_factor() -> f64 {
    defaults::DEFAULT_BACKOFF_FACTOR
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            backoff_factor: default_backoff_factor(),
        }
    }
}

impl RetryPolicy {
    /// Copy of this policy with out-of-range values pulled back into range.
    ///
    /// `max_attempts` is raised to at least 1 and `backoff_factor` to at
    /// least 1.0, so a mistyped config degrades to a sane policy instead of
    /// a zero-attempt or shrinking-delay run.
    pub fn normalized(&self) -> Self {
        Self {
            max_attempts: self.max_attempts.max(1),
            initial_delay_ms: self.initial_delay_ms,
            backoff_factor: if self.backoff_factor < 1.0 {
                1.0
            } else {
                self.backoff_factor
            },
        }
    }
}

// ============================================================================
// Auto-Connect
// ============================================================================

/// How aggressively to probe for the wallet on startup.
///
/// Declared-but-unconsumed extension point: the value is parsed and carried
/// but the healing algorithm does not yet branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconnectStrategy {
    /// Only check storage, no active probing.
    Lazy,
    /// Check storage and basic wallet readiness.
    #[default]
    Standard,
    /// Actively poll for wallet availability.
    Aggressive,
}

/// Whether the orchestrator starts a healing run on initialization.
///
/// An explicit tagged variant rather than a `bool`-or-table union; the
/// legacy boolean form is still accepted on deserialization and normalized
/// here.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "AutoConnectRepr")]
pub enum AutoConnect {
    /// Never auto-connect; healing only runs on explicit request.
    Disabled,
    /// Auto-connect when a stored session exists.
    Enabled {
        strategy: ReconnectStrategy,
        /// Give-up timeout in milliseconds. Declared-but-unconsumed; see
        /// [`defaults::DEFAULT_AUTO_CONNECT_TIMEOUT_MS`] for the documented
        /// default once it is wired in.
        timeout_ms: Option<u64>,
    },
}

impl AutoConnect {
    /// Enabled with the default strategy and no timeout.
    pub const fn enabled() -> Self {
        Self::Enabled {
            strategy: ReconnectStrategy::Standard,
            timeout_ms: None,
        }
    }

    pub const fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled { .. })
    }
}

impl Default for AutoConnect {
    fn default() -> Self {
        Self::enabled()
    }
}

/// Wire shape accepted for `auto_connect`: legacy boolean or detailed table.
#[derive(Deserialize)]
#[serde(untagged)]
enum AutoConnectRepr {
    Flag(bool),
    Detailed {
        #[serde(default)]
        strategy: ReconnectStrategy,
        #[serde(default)]
        timeout_ms: Option<u64>,
    },
}

impl From<AutoConnectRepr> for AutoConnect {
    fn from(repr: AutoConnectRepr) -> Self {
        match repr {
            AutoConnectRepr::Flag(false) => Self::Disabled,
            AutoConnectRepr::Flag(true) => Self::enabled(),
            AutoConnectRepr::Detailed {
                strategy,
                timeout_ms,
            } => Self::Enabled {
                strategy,
                timeout_ms,
            },
        }
    }
}

impl Serialize for AutoConnect {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Disabled => serializer.serialize_bool(false),
            Self::Enabled {
                strategy,
                timeout_ms,
            } => {
                let mut s = serializer.serialize_struct("AutoConnect", 2)?;
                s.serialize_field("strategy", strategy)?;
                s.serialize_field("timeout_ms", timeout_ms)?;
                s.end()
            }
        }
    }
}

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for the resilience layer.
///
/// Load with [`LynkConfig::load`] which searches:
/// 1. `$LYNK_CONFIG` env var
/// 2. `./lynk.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LynkConfig {
    /// Auto-connect behaviour on startup.
    #[serde(default)]
    pub auto_connect: AutoConnect,

    /// Namespace prefix for persisted keys, to avoid collisions when
    /// several deployments share one storage medium.
    #[serde(default = "default_storage_prefix")]
    pub storage_prefix: String,

    /// Retry bounds for healing runs.
    #[serde(default)]
    pub retry: RetryPolicy,
}

fn default_storage_prefix() -> String {
    defaults::DEFAULT_STORAGE_PREFIX.to_string()
}

impl Default for LynkConfig {
    fn default() -> Self {
        Self {
            auto_connect: AutoConnect::default(),
            storage_prefix: default_storage_prefix(),
            retry: RetryPolicy::default(),
        }
    }
}

impl LynkConfig {
    /// Load configuration using the standard search order.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("LYNK_CONFIG") {
            info!(path = %path, "Loading config from LYNK_CONFIG");
            return Self::load_from_file(Path::new(&path));
        }

        let local = Path::new("lynk.toml");
        if local.exists() {
            return Self::load_from_file(local);
        }

        info!("No config file found — using built-in defaults");
        Self::default()
    }

    /// Load configuration from a specific TOML file, falling back to
    /// defaults (with a warning) if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read config file — using defaults");
                return Self::default();
            }
        };

        match toml::from_str::<Self>(&contents) {
            Ok(config) => {
                info!(path = %path.display(), "Config loaded");
                config
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not parse config file — using defaults");
                Self::default()
            }
        }
    }
}
