//! Blocking filesystem work off the async runtime, under a timeout.

use std::time::Duration;

/// Runs `work` on the blocking pool. Returns a human-readable reason if it
/// panicked or did not finish within `timeout`; the work itself is not
/// interrupted in that case, only abandoned.
pub(crate) async fn blocking<T, F>(what: &str, timeout: Duration, work: F) -> Result<T, String>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    match tokio::time::timeout(timeout, tokio::task::spawn_blocking(work)).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(join)) => Err(format!("{what} failed: {join}")),
        Err(_) => Err(format!("{what} timed out after {timeout:?}")),
    }
}
