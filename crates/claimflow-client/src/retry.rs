//! Backoff for suggest-codes, the one idempotent lookup the workflow waits
//! on. Derive-form-fields, uploads, renders, and claim generation are sent
//! exactly once.
//!
//! Only failures where no response arrived (connect errors, timeouts) are
//! retried. Any HTTP response, whatever its status, is handed back to the
//! caller.

use std::future::Future;
use std::time::Duration;

/// Attempts after the first one.
const MAX_RETRIES: u32 = 3;

/// Wait before retry `n` (0-based): 200ms, 400ms, 800ms.
fn backoff(n: u32) -> Duration {
    Duration::from_millis(200 << n)
}

fn is_transient(e: &reqwest::Error) -> bool {
    e.is_connect() || e.is_timeout() || e.is_request()
}

/// Run `send` until it yields a response, a non-transient error, or the
/// retries are spent.
pub(crate) async fn retry_send<F, Fut>(
    endpoint: &str,
    send: F,
) -> Result<reqwest::Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    let mut retry = 0;
    loop {
        match send().await {
            Err(e) if retry < MAX_RETRIES && is_transient(&e) => {
                let wait = backoff(retry);
                retry += 1;
                tracing::warn!(endpoint, retry, "no response, retrying in {wait:?}: {e}");
                tokio::time::sleep(wait).await;
            }
            outcome => return outcome,
        }
    }
}
