//! The history handler: owns the history and serializes all access to it
//!
//! Two kinds of callers race for the clipboard and the history: the poll
//! timer and manual triggers (a hotkey, the CLI). One mutex covers every
//! `read`/`write`/`clear`, including the clipboard I/O and the file write
//! they perform, so neither caller ever sees a half-applied capture.
//!
//! The timer handle sits behind its own lock. Rescheduling after a settings
//! change therefore never waits for a capture that is in progress.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use super::persistence;
use super::store::HistoryStore;
use crate::clipboard::CaptureEngine;
use crate::config::{ConfigProvider, HistoryConfig};
use crate::error::HistoryError;
use crate::models::Snapshot;
use crate::scheduler::{Scheduler, TimerHandle};

/// Shared handle to the clipboard history
///
/// Cloning is cheap and every clone refers to the same history.
#[derive(Clone)]
pub struct HistoryHandler {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<State>,
    timer: Mutex<PollTimer>,
    scheduler: Arc<dyn Scheduler>,
    history_path: PathBuf,
}

struct State {
    store: HistoryStore,
    engine: CaptureEngine,
}

#[derive(Default)]
struct PollTimer {
    interval: Option<Duration>,
    handle: Option<TimerHandle>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panic mid-capture must not stop every later tick.
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl HistoryHandler {
    /// Load persisted history, start polling and follow settings changes
    ///
    /// The history is written one last time when the final clone is dropped.
    /// A process that exits without dropping it (e.g. `std::process::exit`)
    /// should call [`shutdown`](Self::shutdown) first.
    pub fn new(
        engine: CaptureEngine,
        config: &dyn ConfigProvider,
        scheduler: Arc<dyn Scheduler>,
        history_path: impl Into<PathBuf>,
    ) -> Self {
        let history_path = history_path.into();
        let settings = config.current();

        let entries = persistence::load(&history_path);
        let store = HistoryStore::with_entries(entries, settings.capacity);
        tracing::info!(
            entries = store.len(),
            capacity = store.capacity(),
            "Loaded clipboard history from {}",
            history_path.display()
        );

        let inner = Arc::new(Inner {
            state: Mutex::new(State { store, engine }),
            timer: Mutex::new(PollTimer::default()),
            scheduler,
            history_path,
        });
        inner.reschedule(settings.poll_interval());

        let weak = Arc::downgrade(&inner);
        config.subscribe(Box::new(move |settings: &HistoryConfig| {
            if let Some(inner) = weak.upgrade() {
                inner.apply_config(settings);
            }
        }));

        Self { inner }
    }

    /// Capture the clipboard if it changed; see [`CaptureEngine::capture`]
    pub fn read(&self) -> Snapshot {
        self.inner.read()
    }

    /// Put `snapshot` back on the clipboard
    pub fn write(&self, snapshot: &Snapshot) {
        lock(&self.inner.state).engine.restore(snapshot);
    }

    /// Put the history entry at `index` back on the clipboard
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::OutOfRange`] if `index` is not a position in the
    /// current history. The history is not modified.
    pub fn write_index(&self, index: usize) -> Result<(), HistoryError> {
        let mut state = lock(&self.inner.state);
        let State { store, engine } = &mut *state;
        engine.restore_index(store, index)
    }

    /// Drop every entry and persist the empty history
    pub fn clear(&self) {
        let mut state = lock(&self.inner.state);
        state.store.clear();
        persistence::persist(&self.inner.history_path, &state.store);
        tracing::info!("Cleared clipboard history");
    }

    /// Snapshot of the current history, newest first
    pub fn entries(&self) -> Vec<Snapshot> {
        lock(&self.inner.state).store.entries().to_vec()
    }

    pub fn len(&self) -> usize {
        lock(&self.inner.state).store.len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.inner.state).store.is_empty()
    }

    pub fn capacity(&self) -> usize {
        lock(&self.inner.state).store.capacity()
    }

    /// Interval of the active poll timer, `None` if polling is disabled
    pub fn poll_interval(&self) -> Option<Duration> {
        lock(&self.inner.timer).interval
    }

    pub fn history_path(&self) -> &Path {
        &self.inner.history_path
    }

    /// Stop polling and write the history one last time
    ///
    /// Call before the process exits. Write failures are logged and ignored.
    pub fn shutdown(&self) {
        self.inner.reschedule(None);
        let state = lock(&self.inner.state);
        persistence::persist(&self.inner.history_path, &state.store);
        tracing::info!(entries = state.store.len(), "Saved clipboard history on shutdown");
    }
}

impl Inner {
    fn read(&self) -> Snapshot {
        let mut state = lock(&self.state);
        let State { store, engine } = &mut *state;
        engine.capture(store, &self.history_path)
    }

    fn apply_config(self: &Arc<Self>, settings: &HistoryConfig) {
        {
            let mut state = lock(&self.state);
            let dropped = state.store.set_capacity(settings.capacity);
            if dropped > 0 {
                tracing::info!(dropped, capacity = settings.capacity, "History capacity reduced");
                persistence::persist(&self.history_path, &state.store);
            }
        }

        self.reschedule(settings.poll_interval());
    }

    /// Replace the poll timer if the interval changed
    fn reschedule(self: &Arc<Self>, interval: Option<Duration>) {
        let mut timer = lock(&self.timer);
        if timer.interval == interval {
            return;
        }

        if let Some(handle) = timer.handle.take() {
            handle.cancel();
        }
        timer.interval = interval;

        let Some(interval) = interval else {
            tracing::info!("Periodic clipboard polling disabled");
            return;
        };

        let weak = Arc::downgrade(self);
        timer.handle = Some(self.scheduler.schedule(
            interval,
            Arc::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.read();
                }
            }),
        ));
        tracing::info!(interval_ms = interval.as_millis() as u64, "Polling clipboard");
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(|poisoned| poisoned.into_inner());
        persistence::persist(&self.history_path, &state.store);
        tracing::debug!(entries = state.store.len(), "Saved clipboard history on drop");
    }
}
