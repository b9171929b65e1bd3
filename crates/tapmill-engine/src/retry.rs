//! Backoff executor: uniform fixed-delay fault absorption
//!
//! Every remote call the worker makes goes through [`absorb`]. A transient
//! fault is logged and followed by a fixed cool-down, then reported as
//! "no data this cycle" rather than an error. There is no retry counting
//! and no exponential growth: each caller already re-polls on its own
//! cadence, so a flat pause is all the pacing needed.
//!
//! The one exception is the fatal invalid-session fault, which passes
//! through unmodified to terminate the identity's whole run.

use std::future::Future;
use std::time::Duration;
use tapmill_core::Result;
use tracing::warn;

/// Run a remote operation, absorbing everything except a fatal fault.
///
/// - `Ok(v)` → `Ok(Some(v))`
/// - fatal error (invalid session) → propagated unchanged
/// - any other error → logged, `cooldown` sleep, `Ok(None)`
pub async fn absorb<T, F>(
    identity: &str,
    operation: &str,
    cooldown: Duration,
    fut: F,
) -> Result<Option<T>>
where
    F: Future<Output = Result<T>>,
{
    match fut.await {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_fatal() => Err(err),
        Err(err) => {
            warn!("{} | {} failed: {}", identity, operation, err);
            tokio::time::sleep(cooldown).await;
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapmill_core::TapError;
    use tokio::time::Instant;

    const COOLDOWN: Duration = Duration::from_secs(3);

    #[tokio::test(start_paused = true)]
    async fn test_success_passes_through_without_delay() {
        let start = Instant::now();
        let result = absorb("acct1", "balance", COOLDOWN, async { Ok(42u64) }).await;
        assert_eq!(result.unwrap(), Some(42));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_fault_cools_down_and_yields_none() {
        let start = Instant::now();
        let result = absorb("acct1", "tap", COOLDOWN, async {
            Err::<(), _>(TapError::Backend("connection reset".to_string()))
        })
        .await;
        assert!(result.unwrap().is_none());
        assert_eq!(start.elapsed(), COOLDOWN);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_session_propagates_immediately() {
        let start = Instant::now();
        let result = absorb("acct1", "login", COOLDOWN, async {
            Err::<(), _>(TapError::InvalidSession("acct1".to_string()))
        })
        .await;
        assert!(matches!(result, Err(TapError::InvalidSession(_))));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
