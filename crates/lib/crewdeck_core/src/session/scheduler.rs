//! Reference-counted token refresh scheduling.
//!
//! One repeating refresh task per process, owned by the session service.
//! Guards retain it when they establish a valid session and release it on
//! teardown; the task is only live while at least one guard holds it, so
//! overlapping guards can never start duplicate timers.

use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Access token lifetime the backend issues (15 minutes).
pub const TOKEN_LIFETIME_SECS: u64 = 15 * 60;

/// Refresh this long before the token would expire.
pub const REFRESH_SAFETY_BUFFER_SECS: u64 = 60;

/// Default interval between refresh attempts (14 minutes).
pub fn default_refresh_interval() -> Duration {
    Duration::from_secs(TOKEN_LIFETIME_SECS - REFRESH_SAFETY_BUFFER_SECS)
}

#[derive(Debug, Default)]
struct SchedulerInner {
    guards: usize,
    handle: Option<JoinHandle<()>>,
}

/// Refcounted owner of the background refresh task.
#[derive(Debug)]
pub(crate) struct RefreshScheduler {
    interval: Duration,
    inner: Mutex<SchedulerInner>,
}

impl RefreshScheduler {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            interval,
            inner: Mutex::new(SchedulerInner::default()),
        }
    }

    pub(crate) fn interval(&self) -> Duration {
        self.interval
    }

    /// Increment the guard count, spawning the task on the first retain.
    pub(crate) fn retain<F>(&self, spawn: F)
    where
        F: FnOnce() -> JoinHandle<()>,
    {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.guards += 1;
        if inner.handle.is_none() {
            inner.handle = Some(spawn());
        }
    }

    /// Decrement the guard count, aborting the task when it reaches zero.
    pub(crate) fn release(&self) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.guards = inner.guards.saturating_sub(1);
        if inner.guards == 0
            && let Some(handle) = inner.handle.take()
        {
            handle.abort();
        }
    }

    /// Abort unconditionally (logout), dropping all retains.
    pub(crate) fn shutdown(&self) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.guards = 0;
        if let Some(handle) = inner.handle.take() {
            handle.abort();
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .handle
            .is_some()
    }

    pub(crate) fn guard_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .guards
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop_task() -> JoinHandle<()> {
        tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        })
    }

    #[tokio::test]
    async fn single_task_across_overlapping_retains() {
        let scheduler = RefreshScheduler::new(default_refresh_interval());
        let mut spawned = 0;
        for _ in 0..3 {
            scheduler.retain(|| {
                spawned += 1;
                noop_task()
            });
        }
        assert_eq!(spawned, 1);
        assert_eq!(scheduler.guard_count(), 3);
        assert!(scheduler.is_running());
    }

    #[tokio::test]
    async fn last_release_aborts_the_task() {
        let scheduler = RefreshScheduler::new(default_refresh_interval());
        scheduler.retain(noop_task);
        scheduler.retain(noop_task);
        scheduler.release();
        assert!(scheduler.is_running());
        scheduler.release();
        assert!(!scheduler.is_running());
        // Releasing below zero is a no-op.
        scheduler.release();
        assert_eq!(scheduler.guard_count(), 0);
    }

    #[tokio::test]
    async fn shutdown_ignores_outstanding_retains() {
        let scheduler = RefreshScheduler::new(default_refresh_interval());
        scheduler.retain(noop_task);
        scheduler.retain(noop_task);
        scheduler.shutdown();
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.guard_count(), 0);
    }

    #[test]
    fn interval_leaves_a_safety_buffer() {
        assert!(default_refresh_interval() < Duration::from_secs(TOKEN_LIFETIME_SECS));
        assert_eq!(default_refresh_interval(), Duration::from_secs(14 * 60));
    }
}
