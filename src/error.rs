//! Error taxonomy for the healing and session layers.
//!
//! Storage problems and individual connect failures are absorbed close to
//! where they happen; the only error that reaches callers is
//! [`LynkError::HealingExhausted`], reported when the full retry budget is
//! spent without restoring the connection.

use thiserror::Error;

/// Errors produced by the session store, transport boundary, and healer.
#[derive(Debug, Error)]
pub enum LynkError {
    /// Persistence medium absent, disabled, or refusing writes.
    ///
    /// Non-fatal: the session store behaves as permanently empty.
    #[error("session storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Stored session record unparsable or invariant-violating.
    ///
    /// Non-fatal: treated as "no session"; the record is discarded lazily on
    /// the next read rather than deleted eagerly.
    #[error("stored session corrupt: {0}")]
    SessionCorrupt(String),

    /// A single connect attempt failed. Transient — absorbed into backoff
    /// and retried until the attempt budget runs out.
    #[error("connect attempt failed: {0}")]
    ConnectFailure(String),

    /// All healing attempts failed. Fatal to the stored session (it is
    /// cleared) but recoverable at the application layer via `on_error`
    /// and a manual re-trigger.
    #[error("healing exhausted after {attempts} attempts")]
    HealingExhausted { attempts: u32 },
}

impl LynkError {
    /// Whether this error terminates a healing run (vs. being retried).
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::HealingExhausted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let e = LynkError::HealingExhausted { attempts: 4 };
        assert_eq!(e.to_string(), "healing exhausted after 4 attempts");

        let e = LynkError::ConnectFailure("wallet locked".to_string());
        assert_eq!(e.to_string(), "connect attempt failed: wallet locked");
    }

    #[test]
    fn test_terminal_classification() {
        assert!(LynkError::HealingExhausted { attempts: 1 }.is_terminal());
        assert!(!LynkError::ConnectFailure("x".to_string()).is_terminal());
        assert!(!LynkError::StorageUnavailable("x".to_string()).is_terminal());
    }
}
