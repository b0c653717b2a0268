//! KeyValueStore trait — pluggable storage backend
//!
//! Abstracts the persistence medium behind a minimal string key-value
//! capability so the session store can be tested with an in-memory double
//! and shipped with a durable embedded backend:
//! - `MemoryStore`: in-memory map for tests and ephemeral deployments
//! - `SledStore`: durable sled-backed store for process-restart survival

use crate::error::LynkError;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

/// Trait for pluggable key-value backends.
///
/// Implementations must be thread-safe (Send + Sync) for shared access
/// across async tasks. All values are UTF-8 strings; the session store
/// layers its own serialization on top.
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` if the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, LynkError>;

    /// Write a value, overwriting any existing one.
    fn set(&self, key: &str, value: &str) -> Result<(), LynkError>;

    /// Delete a key. Deleting an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), LynkError>;

    /// Backend name for logging.
    fn backend_name(&self) -> &'static str;
}

// ============================================================================
// In-Memory Backend
// ============================================================================

/// In-memory store for tests and ephemeral deployments.
///
/// Thread-safe via `RwLock`. Not durable — data lost on restart. The
/// `unavailable` switch simulates a disabled medium (every operation fails
/// with [`LynkError::StorageUnavailable`]) for always-empty-store tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle the simulated-outage switch.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), LynkError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(LynkError::StorageUnavailable(
                "memory store marked unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, LynkError> {
        self.check_available()?;
        let entries = self
            .entries
            .read()
            .map_err(|e| LynkError::StorageUnavailable(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), LynkError> {
        self.check_available()?;
        let mut entries = self
            .entries
            .write()
            .map_err(|e| LynkError::StorageUnavailable(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), LynkError> {
        self.check_available()?;
        let mut entries = self
            .entries
            .write()
            .map_err(|e| LynkError::StorageUnavailable(e.to_string()))?;
        entries.remove(key);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "InMemory"
    }
}

// ============================================================================
// Sled Backend
// ============================================================================

/// Durable key-value store backed by sled.
///
/// Survives process restarts; writes are flushed immediately so a crash
/// right after a successful connect still leaves the session on disk.
#[derive(Clone)]
pub struct SledStore {
    db: Arc<sled::Db>,
}

impl SledStore {
    /// Open or create the backing database.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let db = sled::open(path_ref).context("Failed to open sled database")?;

        tracing::info!("Session storage opened at {:?}", path_ref);

        Ok(Self { db: Arc::new(db) })
    }
}

impl KeyValueStore for SledStore {
    fn get(&self, key: &str) -> Result<Option<String>, LynkError> {
        match self
            .db
            .get(key.as_bytes())
            .map_err(|e| LynkError::StorageUnavailable(e.to_string()))?
        {
            Some(bytes) => {
                let value = String::from_utf8(bytes.to_vec())
                    .map_err(|e| LynkError::SessionCorrupt(e.to_string()))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), LynkError> {
        self.db
            .insert(key.as_bytes(), value.as_bytes())
            .map_err(|e| LynkError::StorageUnavailable(e.to_string()))?;
        self.db
            .flush()
            .map_err(|e| LynkError::StorageUnavailable(e.to_string()))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), LynkError> {
        self.db
            .remove(key.as_bytes())
            .map_err(|e| LynkError::StorageUnavailable(e.to_string()))?;
        self.db
            .flush()
            .map_err(|e| LynkError::StorageUnavailable(e.to_string()))?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "Sled"
    }
}
