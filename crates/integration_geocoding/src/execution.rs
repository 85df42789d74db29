//! Bounded-latency execution of vendor calls
//!
//! The vendor request runs on its own task and reports through a single-slot
//! oneshot channel. The caller waits on the receiver until the context
//! deadline. When the deadline wins, the task is left running detached; its
//! result is dropped by the closed channel. There is no cooperative
//! cancellation beyond that, so a timeout means the vendor-side outcome is
//! unknown.

use std::future::Future;

use tokio::sync::oneshot;
use tracing::debug;

use crate::{context::CallContext, error::GeocodingError};

/// Run `operation` on a detached task and wait for it no longer than the context allows
///
/// # Errors
///
/// Returns [`GeocodingError::Timeout`] if the deadline passes first, or has
/// already passed before the call starts. Otherwise the operation's own error.
pub async fn run_with_deadline<T, F>(
    ctx: &CallContext,
    operation: &'static str,
    future: F,
) -> Result<T, GeocodingError>
where
    T: Send + 'static,
    F: Future<Output = Result<T, GeocodingError>> + Send + 'static,
{
    if ctx.is_expired() {
        debug!(operation, "Deadline already passed, request not sent");
        return Err(GeocodingError::Timeout {
            timeout_ms: ctx.budget_ms(),
        });
    }

    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let outcome = future.await;
        // A closed receiver means the caller stopped waiting
        if tx.send(outcome).is_err() {
            debug!(operation, "Discarding late vendor response");
        }
    });

    match tokio::time::timeout_at(ctx.deadline(), rx).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(_)) => Err(GeocodingError::RequestFailed(format!(
            "{operation} task ended without a result"
        ))),
        Err(_) => {
            debug!(operation, timeout_ms = ctx.budget_ms(), "Deadline elapsed");
            Err(GeocodingError::Timeout {
                timeout_ms: ctx.budget_ms(),
            })
        },
    }
}
