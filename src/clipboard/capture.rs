//! Change detection, capture and restore
//!
//! # Capture algorithm
//!
//! 1. Compare the clipboard change count with the last observed value. An
//!    unchanged clipboard returns the newest history entry untouched.
//! 2. Read every advertised type plus [`EXTRA_TYPES`], minus [`EXCLUDED_TYPES`].
//! 3. Fill in the source application from the frontmost app when missing.
//! 4. For file copies, wait a bounded time for [`DEFERRED_TYPES`] (the icon)
//!    which some apps publish after the file reference.
//! 5. Replace the icon with a small PNG thumbnail.
//! 6. Prepend to history, truncate to capacity, persist.
//!
//! [`EXTRA_TYPES`]: super::content_type::EXTRA_TYPES
//! [`EXCLUDED_TYPES`]: super::content_type::EXCLUDED_TYPES

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::thread;
use std::time::Duration;

use super::ClipboardService;
use super::content_type::{
    DEFERRED_TYPES, EXTRA_TYPES, FILE_TYPES, FILE_URL, ICON, SOURCE_APPLICATION, is_excluded,
};
use super::icon::{ImageResizer, compress_icon};
use crate::error::HistoryError;
use crate::history::{HistoryStore, persistence};
use crate::models::{NO_PREVIEW, Snapshot};

/// Bounds for waiting on a representation that arrives after the file reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconWait {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for IconWait {
    /// 5ms × 200 attempts, roughly one second
    fn default() -> Self {
        Self { interval: Duration::from_millis(5), max_attempts: 200 }
    }
}

/// Reads snapshots from and writes them back to a [`ClipboardService`]
///
/// Not synchronized; the history handler serializes every call.
pub struct CaptureEngine {
    clipboard: Box<dyn ClipboardService>,
    resizer: Box<dyn ImageResizer>,
    observed_change_count: i64,
    icon_wait: IconWait,
}

impl CaptureEngine {
    /// Create an engine that treats the current clipboard contents as already seen
    pub fn new(mut clipboard: Box<dyn ClipboardService>, resizer: Box<dyn ImageResizer>) -> Self {
        let observed_change_count = clipboard.change_count();
        Self { clipboard, resizer, observed_change_count, icon_wait: IconWait::default() }
    }

    pub fn with_icon_wait(mut self, icon_wait: IconWait) -> Self {
        self.icon_wait = icon_wait;
        self
    }

    pub fn observed_change_count(&self) -> i64 {
        self.observed_change_count
    }

    fn has_changed(&mut self) -> bool {
        self.clipboard.change_count() != self.observed_change_count
    }

    /// Record the current change count, returning whether it moved
    fn update_change_count(&mut self) -> bool {
        let current = self.clipboard.change_count();
        if current == self.observed_change_count {
            return false;
        }
        self.observed_change_count = current;
        true
    }

    /// Capture the clipboard into `store` if it changed since the last look
    ///
    /// Returns the new snapshot, or the newest existing one (an empty
    /// placeholder for an empty history) when nothing changed.
    pub fn capture(&mut self, store: &mut HistoryStore, history_path: &Path) -> Snapshot {
        if !self.update_change_count() {
            return store.first().cloned().unwrap_or_else(Snapshot::empty);
        }

        let snapshot = self.read_snapshot();
        tracing::debug!(
            change_count = self.observed_change_count,
            types = snapshot.content().len(),
            is_file = snapshot.is_file(),
            "Captured clipboard snapshot"
        );

        // push truncates first, so the file never holds capacity + 1 entries
        store.push(snapshot.clone());
        persistence::persist(history_path, store);
        snapshot
    }

    fn read_snapshot(&mut self) -> Snapshot {
        let mut content = self.read_representations();

        if !content.contains_key(SOURCE_APPLICATION) {
            let source = self.clipboard.frontmost_application_id().unwrap_or_default();
            content.insert(SOURCE_APPLICATION.to_string(), source.into_bytes());
        }

        let is_file = FILE_TYPES.iter().any(|ty| content.contains_key(*ty));
        let display_text = self.clipboard.read_text().unwrap_or_else(|| NO_PREVIEW.to_string());

        if content.contains_key(FILE_URL) {
            for ty in DEFERRED_TYPES {
                if !content.contains_key(*ty)
                    && let Some(bytes) = self.wait_for(ty)
                {
                    content.insert(ty.to_string(), bytes);
                }
            }
        }

        if let Some(raw) = content.remove(ICON)
            && let Some(thumbnail) = compress_icon(self.resizer.as_ref(), &raw)
        {
            content.insert(ICON.to_string(), thumbnail);
        }

        Snapshot::new(display_text, is_file, content)
    }

    fn read_representations(&mut self) -> BTreeMap<String, Vec<u8>> {
        let mut types: BTreeSet<String> = self.clipboard.available_types().into_iter().collect();
        types.extend(EXTRA_TYPES.iter().map(|ty| ty.to_string()));

        let mut content = BTreeMap::new();
        for ty in types.into_iter().filter(|ty| !is_excluded(ty)) {
            if let Some(bytes) = self.clipboard.read_bytes(&ty) {
                content.insert(ty, bytes);
            }
        }
        content
    }

    /// Poll for a late representation
    ///
    /// Gives up after `icon_wait.max_attempts`, or immediately once the
    /// clipboard changes again, since the data would belong to a newer copy.
    fn wait_for(&mut self, content_type: &str) -> Option<Vec<u8>> {
        for _ in 0..self.icon_wait.max_attempts {
            if let Some(bytes) = self.clipboard.read_bytes(content_type) {
                return Some(bytes);
            }
            if self.has_changed() {
                tracing::debug!(content_type, "Clipboard changed while waiting, giving up");
                return None;
            }
            thread::sleep(self.icon_wait.interval);
        }

        let last_try = self.clipboard.read_bytes(content_type);
        if last_try.is_none() {
            tracing::debug!(content_type, "Representation never arrived, capturing without it");
        }
        last_try
    }

    /// Replace the clipboard contents with every representation in `snapshot`
    pub fn restore(&mut self, snapshot: &Snapshot) {
        if let Err(e) = self.clipboard.clear() {
            tracing::warn!("Failed to clear clipboard before restore: {:#}", e);
        }

        for (ty, bytes) in snapshot.content() {
            if let Err(e) = self.clipboard.write_bytes(ty, bytes) {
                tracing::warn!(content_type = %ty, "Failed to restore representation: {:#}", e);
            }
        }

        // Our own write bumped the counter; do not capture it as a new copy.
        self.observed_change_count = self.clipboard.change_count();
        tracing::debug!(change_count = self.observed_change_count, "Restored snapshot");
    }

    /// Restore the entry at `index` in `store`
    pub fn restore_index(
        &mut self,
        store: &HistoryStore,
        index: usize,
    ) -> Result<(), HistoryError> {
        let snapshot =
            store.get(index).cloned().ok_or(HistoryError::OutOfRange { index, len: store.len() })?;
        self.restore(&snapshot);
        Ok(())
    }
}
