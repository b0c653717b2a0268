//! Healing engine — bounded retry with exponential backoff.
//!
//! Generic over the connect action and the satisfaction check so it carries
//! no transport dependency: the orchestrator hands it closures over the real
//! transport, tests hand it scripted ones.

use crate::config::defaults::MAX_BACKOFF_DELAY_MS;
use crate::config::RetryPolicy;
use crate::error::LynkError;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Drive `connect` until it succeeds, `is_satisfied` reports the connection
/// healed, or the attempt budget runs out. Returns whether healing
/// succeeded.
///
/// Per attempt:
/// 1. `is_satisfied()` true — success immediately, no wait, no connect.
///    On the very first attempt this makes the whole call a pure no-op.
/// 2. Otherwise wait the current delay, then run `connect`.
/// 3. `Ok(())` — success immediately. Completion of the action is itself
///    treated as success; the predicate is not re-checked.
/// 4. `Err(_)` — scale the delay by the backoff factor (capped at
///    [`MAX_BACKOFF_DELAY_MS`]) and move to the next attempt.
///
/// The engine never errors; failure is the `false` return. Attempt-level
/// outcomes are visible through tracing only.
pub async fn heal<C, Fut, S>(mut connect: C, is_satisfied: S, policy: &RetryPolicy) -> bool
where
    C: FnMut() -> Fut,
    Fut: Future<Output = Result<(), LynkError>>,
    S: Fn() -> bool,
{
    let policy = policy.normalized();
    let mut delay_ms = policy.initial_delay_ms;

    for attempt in 1..=policy.max_attempts {
        if is_satisfied() {
            info!(attempt, "Healing check passed — connection already satisfied");
            return true;
        }

        debug!(
            attempt,
            max_attempts = policy.max_attempts,
            delay_ms,
            "Healing attempt — waiting before connect"
        );
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;

        match connect().await {
            Ok(()) => {
                info!(attempt, "Healing connect succeeded");
                return true;
            }
            Err(e) => {
                warn!(attempt, error = %e, "Healing attempt failed");
                delay_ms = next_delay(delay_ms, policy.backoff_factor);
            }
        }
    }

    warn!(
        max_attempts = policy.max_attempts,
        "Healing exhausted — all attempts failed"
    );
    false
}

/// Next backoff delay: scale by `factor`, clamp to the hard ceiling.
fn next_delay(current_ms: u64, factor: f64) -> u64 {
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let scaled = (current_ms as f64 * factor).round() as u64;
    scaled.min(MAX_BACKOFF_DELAY_MS)
}
