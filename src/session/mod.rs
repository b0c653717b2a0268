//! Session Persistence
//!
//! Durable record of the last successfully connected wallet/account pair,
//! used to decide whether healing is attempted after a restart. Storage is
//! advisory: a write failure is logged and swallowed, a corrupt or invalid
//! record reads as "no session", and nothing here is ever a user-visible
//! error.

pub mod kv;

pub use kv::{KeyValueStore, MemoryStore, SledStore};

use crate::config::defaults::{SESSION_KEY, SESSION_SCHEMA_VERSION};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Persisted record of the last connected identity.
///
/// Wire names are camelCase for compatibility with records written by
/// earlier deployments of this layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Which connection provider was last used.
    pub wallet_name: String,

    /// The authenticated account.
    pub public_key: String,

    /// Epoch milliseconds of the last successful connection.
    pub last_active: i64,

    /// Record schema version, for forward-compatible migration.
    pub version: String,
}

impl Session {
    /// A session is valid only if both identity fields are non-empty.
    fn is_valid(&self) -> bool {
        !self.wallet_name.is_empty() && !self.public_key.is_empty()
    }
}

/// Store for the session record, namespaced under a configurable prefix.
///
/// Cheap to clone; clones share the same backend.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn KeyValueStore>,
    prefix: String,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn KeyValueStore>, prefix: impl Into<String>) -> Self {
        Self {
            backend,
            prefix: prefix.into(),
        }
    }

    fn session_key(&self) -> String {
        format!("{}{}", self.prefix, SESSION_KEY)
    }

    /// Persist the connected wallet/account pair with a fresh timestamp.
    ///
    /// Storage failures are logged and swallowed: persistence is advisory,
    /// never a source of user-visible failure.
    pub fn set_session(&self, wallet_name: &str, public_key: &str) {
        let session = Session {
            wallet_name: wallet_name.to_string(),
            public_key: public_key.to_string(),
            last_active: chrono::Utc::now().timestamp_millis(),
            version: SESSION_SCHEMA_VERSION.to_string(),
        };

        let raw = match serde_json::to_string(&session) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Failed to serialize session — not persisted");
                return;
            }
        };

        match self.backend.set(&self.session_key(), &raw) {
            Ok(()) => {
                debug!(
                    backend = self.backend.backend_name(),
                    wallet = wallet_name,
                    "Session persisted"
                );
            }
            Err(e) => {
                warn!(
                    backend = self.backend.backend_name(),
                    error = %e,
                    "Failed to save session — continuing without persistence"
                );
            }
        }
    }

    /// Read the stored session, if present and valid.
    ///
    /// Any failure — unavailable medium, unparsable record, invariant
    /// violation — collapses to `None`. Invalid records are not deleted
    /// eagerly; they are simply never surfaced and get overwritten by the
    /// next successful connect.
    pub fn get_session(&self) -> Option<Session> {
        let raw = match self.backend.get(&self.session_key()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                debug!(error = %e, "Session read failed — treating as absent");
                return None;
            }
        };

        match serde_json::from_str::<Session>(&raw) {
            Ok(session) if session.is_valid() => Some(session),
            Ok(_) => {
                debug!("Stored session missing identity fields — treating as absent");
                None
            }
            Err(e) => {
                debug!(error = %e, "Stored session unparsable — treating as absent");
                None
            }
        }
    }

    /// Delete the stored session. No-op if storage is unavailable or the
    /// key does not exist.
    pub fn clear_session(&self) {
        if let Err(e) = self.backend.remove(&self.session_key()) {
            warn!(
                backend = self.backend.backend_name(),
                error = %e,
                "Failed to clear session"
            );
        }
    }

    /// Whether a valid session is currently stored.
    pub fn has_session(&self) -> bool {
        self.get_session().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_store() -> (Arc<MemoryStore>, SessionStore) {
        let backend = Arc::new(MemoryStore::new());
        let store = SessionStore::new(backend.clone(), "lynk_v1_");
        (backend, store)
    }

    #[test]
    fn test_set_get_round_trip() {
        let (_, store) = memory_store();
        store.set_session("Phantom", "Addr1");

        let session = store.get_session().unwrap();
        assert_eq!(session.wallet_name, "Phantom");
        assert_eq!(session.public_key, "Addr1");
        assert_eq!(session.version, "1.0");
        assert!(session.last_active > 0);
        assert!(store.has_session());
    }

    #[test]
    fn test_clear_session() {
        let (_, store) = memory_store();
        store.set_session("Phantom", "Addr1");
        store.clear_session();
        assert!(store.get_session().is_none());

        // Clearing again is a quiet no-op
        store.clear_session();
    }

    #[test]
    fn test_wire_field_names_are_camel_case() {
        let (backend, store) = memory_store();
        store.set_session("Phantom", "Addr1");

        let raw = backend.get("lynk_v1_session").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["walletName"], "Phantom");
        assert_eq!(value["publicKey"], "Addr1");
        assert!(value["lastActive"].is_i64());
        assert_eq!(value["version"], "1.0");
    }

    #[test]
    fn test_record_missing_public_key_reads_absent() {
        let (backend, store) = memory_store();
        backend
            .set(
                "lynk_v1_session",
                r#"{"walletName":"Phantom","lastActive":1700000000000,"version":"1.0"}"#,
            )
            .unwrap();

        assert!(store.get_session().is_none());
        // Lazy discard: the raw record is left in place, not deleted
        assert!(backend.get("lynk_v1_session").unwrap().is_some());
    }

    #[test]
    fn test_empty_identity_fields_read_absent() {
        let (backend, store) = memory_store();
        backend
            .set(
                "lynk_v1_session",
                r#"{"walletName":"","publicKey":"Addr1","lastActive":1,"version":"1.0"}"#,
            )
            .unwrap();
        assert!(store.get_session().is_none());
    }

    #[test]
    fn test_unparsable_record_reads_absent() {
        let (backend, store) = memory_store();
        backend.set("lynk_v1_session", "not json {{{").unwrap();
        assert!(store.get_session().is_none());
        assert!(!store.has_session());
    }

    #[test]
    fn test_unavailable_medium_behaves_as_empty() {
        let (backend, store) = memory_store();
        backend.set_unavailable(true);

        // None of these may panic or surface an error
        store.set_session("Phantom", "Addr1");
        assert!(store.get_session().is_none());
        store.clear_session();

        // Nothing was written while unavailable
        backend.set_unavailable(false);
        assert!(store.get_session().is_none());
    }

    #[test]
    fn test_prefix_namespacing() {
        let backend = Arc::new(MemoryStore::new());
        let store_a = SessionStore::new(backend.clone(), "app_a_");
        let store_b = SessionStore::new(backend.clone(), "app_b_");

        store_a.set_session("Phantom", "Addr1");
        assert!(store_a.has_session());
        assert!(!store_b.has_session());
    }

    #[test]
    fn test_sled_backend_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();

        {
            let backend = Arc::new(SledStore::open(dir.path()).unwrap());
            let store = SessionStore::new(backend, "lynk_v1_");
            store.set_session("Solflare", "Addr9");
        }

        let backend = Arc::new(SledStore::open(dir.path()).unwrap());
        let store = SessionStore::new(backend, "lynk_v1_");
        let session = store.get_session().unwrap();
        assert_eq!(session.wallet_name, "Solflare");
        assert_eq!(session.public_key, "Addr9");
    }
}
