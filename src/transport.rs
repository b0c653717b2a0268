//! Wallet transport boundary.
//!
//! The resilience layer treats the underlying wallet connection as an opaque
//! capability: an async connect/disconnect pair, a queryable connected
//! predicate, provider selection, and a channel of connection transitions.
//! Implementations adapt a concrete wallet transport to this trait; the
//! orchestrator never sees anything else.

use crate::error::LynkError;
use async_trait::async_trait;
use tokio::sync::broadcast;

/// A connection-state transition reported by the transport.
#[derive(Debug, Clone)]
pub struct ConnectionEvent {
    /// Whether the transport is now connected.
    pub connected: bool,

    /// Provider identifier, when known.
    pub wallet_name: Option<String>,

    /// Authenticated account, when known.
    pub public_key: Option<String>,
}

/// Opaque connection capability required from the wallet transport.
///
/// Implementations handle the wire protocol, signing prompts, and extension
/// discovery internally; this layer only drives connect attempts and
/// observes the outcome.
#[async_trait]
pub trait WalletTransport: Send + Sync {
    /// Attempt to establish the connection. May fail; each failure is one
    /// healing attempt.
    async fn connect(&self) -> Result<(), LynkError>;

    /// Tear down the connection.
    async fn disconnect(&self) -> Result<(), LynkError>;

    /// Whether the transport currently reports an established connection.
    fn is_connected(&self) -> bool;

    /// Choose which provider subsequent connects should target.
    fn select(&self, wallet_name: &str);

    /// Subscribe to connection-state transitions.
    fn subscribe(&self) -> broadcast::Receiver<ConnectionEvent>;
}
