//! LYNK: Connection Resilience for Wallet Transports
//!
//! Re-establishes a previously authenticated wallet session after a process
//! restart, transient transport unavailability, or a dropped connection,
//! without manual user action.
//!
//! ## Architecture
//!
//! - **Session Store**: durable record of the last connected identity,
//!   behind a pluggable key-value capability (sled or in-memory)
//! - **Healing Engine**: bounded retry with exponential backoff and a
//!   satisfaction check
//! - **Orchestrator**: sequences the two over a wallet transport, enforcing
//!   at-most-one healing run and keeping the store consistent
//!
//! ## Usage
//!
//! ```ignore
//! let backend = Arc::new(SledStore::open("./lynk-data")?);
//! let config = LynkConfig::load();
//! let store = SessionStore::new(backend, &config.storage_prefix);
//! let orchestrator = Arc::new(Orchestrator::new(transport.clone(), store, config));
//!
//! tokio::spawn(orchestrator.clone().run_observer(transport.subscribe()));
//! orchestrator.initialize().await?;
//! ```

pub mod config;
pub mod error;
pub mod healing;
pub mod session;
pub mod transport;

// Re-export configuration
pub use config::{AutoConnect, LynkConfig, ReconnectStrategy, RetryPolicy};

// Re-export error taxonomy
pub use error::LynkError;

// Re-export session persistence
pub use session::{KeyValueStore, MemoryStore, Session, SessionStore, SledStore};

// Re-export healing components
pub use healing::{LynkStatus, Orchestrator};

// Re-export the transport boundary
pub use transport::{ConnectionEvent, WalletTransport};
