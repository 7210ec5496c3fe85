//! Debounce timer
//!
//! At most one pending invocation. Scheduling again cancels the pending
//! timer; a task whose timer already fired runs to completion on its own.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::shared::logging::log_debounce_armed;

#[derive(Debug, Default)]
pub struct Debouncer {
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` after `delay` unless another call supersedes it first.
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        let superseded = Self::abort(pending.take());
        log_debounce_armed(delay.as_millis(), superseded);

        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Detach so a later cancel only ever hits the timer
            tokio::spawn(task);
        }));
    }

    /// Drop the pending invocation, if any. Returns whether one was pending.
    pub fn cancel(&self) -> bool {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        Self::abort(pending.take())
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    fn abort(handle: Option<JoinHandle<()>>) -> bool {
        match handle {
            Some(handle) => {
                let was_pending = !handle.is_finished();
                handle.abort();
                was_pending
            }
            None => false,
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        let pending = self.pending.get_mut().unwrap_or_else(|e| e.into_inner());
        Self::abort(pending.take());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex as AsyncMutex;

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_schedules_collapse_to_last() {
        let debouncer = Debouncer::new();
        let fired = Arc::new(AsyncMutex::new(Vec::new()));

        for word in ["m", "me", "mee", "meeting"] {
            let fired = fired.clone();
            debouncer.schedule(Duration::from_millis(500), async move {
                fired.lock().await.push(word);
            });
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        tokio::time::sleep(Duration::from_millis(600)).await;
        settle().await;

        assert_eq!(*fired.lock().await, vec!["meeting"]);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_fires_before_delay() {
        let debouncer = Debouncer::new();
        let count = Arc::new(AtomicUsize::new(0));

        let c = count.clone();
        debouncer.schedule(Duration::from_millis(300), async move {
            c.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(299)).await;
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(2)).await;
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_and_drop() {
        let count = Arc::new(AtomicUsize::new(0));

        let debouncer = Debouncer::new();
        let c = count.clone();
        debouncer.schedule(Duration::from_millis(100), async move {
            c.fetch_add(1, Ordering::SeqCst);
        });
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());

        let dropped = Debouncer::new();
        let c = count.clone();
        dropped.schedule(Duration::from_millis(100), async move {
            c.fetch_add(1, Ordering::SeqCst);
        });
        drop(dropped);

        tokio::time::sleep(Duration::from_millis(200)).await;
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_does_not_cancel_started_task() {
        let debouncer = Debouncer::new();
        let finished = Arc::new(AtomicUsize::new(0));

        let f = finished.clone();
        debouncer.schedule(Duration::from_millis(100), async move {
            tokio::time::sleep(Duration::from_millis(1000)).await;
            f.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(150)).await;
        settle().await;
        debouncer.schedule(Duration::from_millis(100), async {});

        tokio::time::sleep(Duration::from_millis(1100)).await;
        settle().await;
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }
}
