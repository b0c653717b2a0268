//! Healing orchestrator.
//!
//! Sequences the session store and the healing engine over a wallet
//! transport: auto-connects from a stored session on startup, enforces
//! at-most-one healing run, re-persists the session on every connected
//! transition, and keeps the store consistent on disconnect and on
//! definitive healing failure.
//!
//! Constructed by explicit dependency injection — build one instance from a
//! transport, a store, and a config, then share it behind an `Arc`.

use crate::config::LynkConfig;
use crate::error::LynkError;
use crate::healing::engine;
use crate::session::SessionStore;
use crate::transport::{ConnectionEvent, WalletTransport};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Callback invoked with the terminal error when healing is exhausted.
pub type ErrorCallback = Box<dyn Fn(&LynkError) + Send + Sync>;

/// Snapshot of the orchestrator's connection state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LynkStatus {
    /// Whether the transport reports an established connection.
    pub connected: bool,

    /// Whether a healing run is in flight.
    pub connecting: bool,

    /// Public key of the stored session, if any.
    pub session_public_key: Option<String>,
}

/// Orchestrates session persistence and healing over a wallet transport.
pub struct Orchestrator {
    transport: Arc<dyn WalletTransport>,
    store: SessionStore,
    config: LynkConfig,
    /// Mutual exclusion for healing runs: set on entry, cleared on every
    /// exit path, consulted at the start of each heal request.
    healing: AtomicBool,
    /// Cleared by [`shutdown`](Self::shutdown); in-flight runs check it
    /// before any post-await state mutation.
    alive: AtomicBool,
    on_error: Option<ErrorCallback>,
}

/// Clears the healing flag when the run exits, normally or not.
struct HealingGuard<'a>(&'a AtomicBool);

impl Drop for HealingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Orchestrator {
    pub fn new(
        transport: Arc<dyn WalletTransport>,
        store: SessionStore,
        config: LynkConfig,
    ) -> Self {
        Self {
            transport,
            store,
            config,
            healing: AtomicBool::new(false),
            alive: AtomicBool::new(true),
            on_error: None,
        }
    }

    /// Register the callback invoked with the terminal error when a healing
    /// run exhausts its budget.
    #[must_use]
    pub fn with_error_callback(mut self, callback: ErrorCallback) -> Self {
        self.on_error = Some(callback);
        self
    }

    /// Startup path: if not already connected, a valid session exists, and
    /// auto-connect is enabled, select the stored provider and start a
    /// healing run.
    pub async fn initialize(&self) -> Result<(), LynkError> {
        if self.transport.is_connected() {
            debug!("Already connected — skipping auto-connect");
            return Ok(());
        }

        if !self.config.auto_connect.is_enabled() {
            debug!("Auto-connect disabled — waiting for explicit heal request");
            return Ok(());
        }

        let Some(session) = self.store.get_session() else {
            debug!("No stored session — nothing to heal");
            return Ok(());
        };

        info!(
            wallet = %session.wallet_name,
            "Found stored session — initiating healing"
        );
        self.transport.select(&session.wallet_name);
        self.heal().await
    }

    /// Run one healing attempt sequence.
    ///
    /// Idempotent under concurrent triggers: if a run is already in flight
    /// the request is dropped, not queued. On success, session persistence
    /// is left to the connection-observer path. On exhaustion the session
    /// is cleared, `on_error` fires once, and the error is returned.
    pub async fn heal(&self) -> Result<(), LynkError> {
        if self
            .healing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Healing already in progress — request dropped");
            return Ok(());
        }
        let _guard = HealingGuard(&self.healing);

        let transport = self.transport.clone();
        let probe = self.transport.clone();
        let healed = engine::heal(
            move || {
                let transport = transport.clone();
                async move { transport.connect().await }
            },
            move || probe.is_connected(),
            &self.config.retry,
        )
        .await;

        // Torn down mid-run: suppress all orchestrator-owned mutation.
        if !self.alive.load(Ordering::SeqCst) {
            debug!("Orchestrator shut down during healing — outcome discarded");
            return Ok(());
        }

        if healed {
            return Ok(());
        }

        // Definitive failure: the stored identity can no longer be trusted.
        warn!("Healing failed definitively — clearing stored session");
        self.store.clear_session();

        let error = LynkError::HealingExhausted {
            attempts: self.config.retry.normalized().max_attempts,
        };
        if let Some(callback) = &self.on_error {
            callback(&error);
        }
        Err(error)
    }

    /// Observer loop: re-persist the session on every connected transition
    /// that carries an identifier and account, whether caused by healing or
    /// by a fresh user-initiated connect. Spawn with `tokio::spawn`.
    pub async fn run_observer(self: Arc<Self>, mut events: broadcast::Receiver<ConnectionEvent>) {
        info!("Connection observer started");

        loop {
            match events.recv().await {
                Ok(event) => {
                    if !self.alive.load(Ordering::SeqCst) {
                        break;
                    }
                    if !event.connected {
                        continue;
                    }
                    if let (Some(wallet), Some(key)) = (&event.wallet_name, &event.public_key) {
                        self.store.set_session(wallet, key);
                    } else {
                        debug!("Connected transition without full identity — not persisted");
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Connection observer lagged — events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }

        info!("Connection observer stopped");
    }

    /// Disconnect and forget the session.
    ///
    /// The session is cleared before the transport call so a transport
    /// failure never leaves a stale session behind.
    pub async fn disconnect(&self) -> Result<(), LynkError> {
        self.store.clear_session();
        self.transport.disconnect().await
    }

    /// Stop mutating state from in-flight work. An in-flight healing run
    /// finishes its current attempt but discards the outcome.
    pub fn shutdown(&self) {
        self.alive.store(false, Ordering::SeqCst);
        info!("Orchestrator shut down");
    }

    /// Current connection snapshot.
    pub fn status(&self) -> LynkStatus {
        LynkStatus {
            connected: self.transport.is_connected(),
            connecting: self.healing.load(Ordering::SeqCst),
            session_public_key: self.store.get_session().map(|s| s.public_key),
        }
    }
}
