//! Periodic timers for clipboard polling

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::MissedTickBehavior;

pub type TimerCallback = Arc<dyn Fn() + Send + Sync>;

/// Starts repeating timers
pub trait Scheduler: Send + Sync {
    /// Run `callback` every `interval` until the returned handle is cancelled or dropped
    fn schedule(&self, interval: Duration, callback: TimerCallback) -> TimerHandle;
}

/// Cancels its timer when cancelled or dropped
pub struct TimerHandle {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl TimerHandle {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self { cancel: Some(Box::new(cancel)) }
    }

    pub fn cancel(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle").field("active", &self.cancel.is_some()).finish()
    }
}

/// [`Scheduler`] running each timer as a task on a tokio runtime
///
/// Callbacks may block (a capture can wait up to a second for an icon), so
/// each tick runs on the blocking pool and the next tick waits for it.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    runtime: Handle,
}

impl TokioScheduler {
    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }

    /// Use the runtime of the calling task
    ///
    /// Panics outside a tokio runtime, like [`Handle::current`].
    pub fn current() -> Self {
        Self::new(Handle::current())
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, interval: Duration, callback: TimerCallback) -> TimerHandle {
        let task = self.runtime.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick fires immediately; start polling one interval from now.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let callback = Arc::clone(&callback);
                if let Err(e) = tokio::task::spawn_blocking(move || callback()).await {
                    tracing::warn!("Timer callback failed: {}", e);
                }
            }
        });

        TimerHandle::new(move || task.abort())
    }
}
