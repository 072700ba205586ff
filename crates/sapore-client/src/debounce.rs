//! # Debounced Search
//!
//! Typing "leite condensado" should send one search, not sixteen. Each call
//! restarts a timer; only the call that survives the full delay runs.
//!
//! ## Timeline (400 ms)
//! ```text
//!   t=0    "le"      ──► timer A
//!   t=150  "leit"    ──► cancel A, timer B
//!   t=300  "leite"   ──► cancel B, timer C
//!   t=700             ──► C fires ──► search("leite") spawned
//! ```
//!
//! Only the waiting phase is cancelled. A search that already started runs
//! to completion, so a slow older response can still land after a newer one.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Default delay between the last keystroke and the request.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(400);

/// Runs at most one pending action, restarting its delay on every call.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Debouncer::new(DEFAULT_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Debouncer {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules `action` after the delay, cancelling any still-waiting one.
    ///
    /// Must be called from within a tokio runtime.
    pub fn call<F, Fut>(&self, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Detached so a later call cannot abort a request in flight
            tokio::spawn(action());
        });

        let mut pending = match self.pending.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(previous) = pending.replace(timer) {
            if !previous.is_finished() {
                debug!("Debounced call superseded");
            }
            previous.abort();
        }
    }

    /// Drops a waiting action, if any.
    pub fn cancel(&self) {
        let mut pending = match self.pending.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(previous) = pending.take() {
            previous.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::Mutex as AsyncMutex;

    async fn settle(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        tokio::task::yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_last_call_runs() {
        let seen = Arc::new(AsyncMutex::new(Vec::new()));
        let debouncer = Debouncer::default();

        for query in ["le", "leit", "leite"] {
            let seen = Arc::clone(&seen);
            debouncer.call(move || async move {
                seen.lock().await.push(query);
            });
            settle(150).await;
        }

        settle(400).await;
        assert_eq!(*seen.lock().await, vec!["leite"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spaced_calls_all_run() {
        let seen = Arc::new(AsyncMutex::new(Vec::new()));
        let debouncer = Debouncer::new(Duration::from_millis(100));

        for query in ["açúcar", "farinha"] {
            let seen = Arc::clone(&seen);
            debouncer.call(move || async move {
                seen.lock().await.push(query);
            });
            settle(150).await;
        }

        assert_eq!(*seen.lock().await, vec!["açúcar", "farinha"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_action_is_not_cancelled() {
        let seen = Arc::new(AsyncMutex::new(Vec::new()));
        let debouncer = Debouncer::new(Duration::from_millis(100));

        let slow = Arc::clone(&seen);
        debouncer.call(move || async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            slow.lock().await.push("slow");
        });
        settle(150).await;

        let fast = Arc::clone(&seen);
        debouncer.call(move || async move {
            fast.lock().await.push("fast");
        });

        settle(1000).await;
        assert_eq!(*seen.lock().await, vec!["fast", "slow"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel() {
        let seen = Arc::new(AsyncMutex::new(Vec::<&str>::new()));
        let debouncer = Debouncer::new(Duration::from_millis(100));

        let s = Arc::clone(&seen);
        debouncer.call(move || async move {
            s.lock().await.push("x");
        });
        debouncer.cancel();

        settle(300).await;
        assert!(seen.lock().await.is_empty());
    }
}
