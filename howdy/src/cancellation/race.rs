//! Racing a unit of work against a cancellation signal.

use super::CancellationSignal;
use crate::errors::RaceError;
use std::future::Future;
use tokio::task::AbortHandle;
use tracing::debug;

/// Aborts the worker when the race is dropped or lost.
struct AbortOnDrop(AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Runs `work` on a dedicated task and waits for it or for `signal`,
/// whichever settles first.
///
/// The signal is checked first on every wakeup, so a signal that has already
/// settled always wins. The losing worker is aborted and its output dropped.
/// Dropping the returned future also aborts the worker.
///
/// Must be called from within a tokio runtime.
pub async fn run_until_settled<F, T>(signal: &CancellationSignal, work: F) -> Result<T, RaceError>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let mut worker = tokio::spawn(work);
    let _guard = AbortOnDrop(worker.abort_handle());

    tokio::select! {
        biased;
        reason = signal.settled() => {
            debug!(reason = %reason, "Signal settled before worker finished");
            Err(RaceError::Settled(reason))
        }
        joined = &mut worker => joined.map_err(RaceError::from),
    }
}
