//! In-memory clipboard
//!
//! Used in tests and anywhere a real pasteboard is unavailable. Clones share
//! the same state, so a test can hold one handle and mutate the clipboard
//! "externally" while the engine owns another.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Result;

use super::ClipboardService;
use super::content_type::PLAIN_TEXT;

#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    state: Arc<Mutex<State>>,
}

#[derive(Debug, Default)]
struct State {
    change_count: i64,
    items: BTreeMap<String, Vec<u8>>,
    frontmost: Option<String>,
    pending: Option<Pending>,
}

/// Something that happens after a type has been read a number of times
#[derive(Debug)]
struct Pending {
    content_type: String,
    reads_left: u32,
    action: PendingAction,
}

#[derive(Debug)]
enum PendingAction {
    Publish(Vec<u8>),
    ExternalChange,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replace the contents as another application would, bumping the change count
    pub fn copy<I, K>(&self, items: I)
    where
        I: IntoIterator<Item = (K, Vec<u8>)>,
        K: Into<String>,
    {
        let mut state = self.state();
        state.items = items.into_iter().map(|(k, v)| (k.into(), v)).collect();
        state.pending = None;
        state.change_count += 1;
    }

    /// Copy a plain-text string
    pub fn copy_text(&self, text: &str) {
        self.copy([(PLAIN_TEXT, text.as_bytes().to_vec())]);
    }

    /// Make `content_type` readable only after it has been read `after_reads` times
    ///
    /// The late data does not bump the change count, like a lazily provided
    /// pasteboard representation.
    pub fn publish_later(&self, content_type: &str, bytes: Vec<u8>, after_reads: u32) {
        self.state().pending = Some(Pending {
            content_type: content_type.to_string(),
            reads_left: after_reads,
            action: PendingAction::Publish(bytes),
        });
    }

    /// Bump the change count once `content_type` has been read `after_reads` times
    pub fn change_after_reads(&self, content_type: &str, after_reads: u32) {
        self.state().pending = Some(Pending {
            content_type: content_type.to_string(),
            reads_left: after_reads,
            action: PendingAction::ExternalChange,
        });
    }

    pub fn set_frontmost_application(&self, id: Option<&str>) {
        self.state().frontmost = id.map(str::to_string);
    }

    /// Current contents, without triggering pending actions
    pub fn contents(&self) -> BTreeMap<String, Vec<u8>> {
        self.state().items.clone()
    }

    pub fn current_change_count(&self) -> i64 {
        self.state().change_count
    }
}

impl State {
    fn note_read(&mut self, content_type: &str) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        if pending.content_type != content_type {
            return;
        }

        pending.reads_left = pending.reads_left.saturating_sub(1);
        if pending.reads_left > 0 {
            return;
        }

        if let Some(pending) = self.pending.take() {
            match pending.action {
                PendingAction::Publish(bytes) => {
                    self.items.insert(pending.content_type, bytes);
                }
                PendingAction::ExternalChange => self.change_count += 1,
            }
        }
    }
}

impl ClipboardService for MemoryClipboard {
    fn change_count(&mut self) -> i64 {
        self.state().change_count
    }

    fn available_types(&mut self) -> Vec<String> {
        self.state().items.keys().cloned().collect()
    }

    fn read_bytes(&mut self, content_type: &str) -> Option<Vec<u8>> {
        let mut state = self.state();
        if !state.items.contains_key(content_type) {
            state.note_read(content_type);
        }
        state.items.get(content_type).cloned()
    }

    fn read_text(&mut self) -> Option<String> {
        let state = self.state();
        state.items.get(PLAIN_TEXT).map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    fn clear(&mut self) -> Result<()> {
        let mut state = self.state();
        state.items.clear();
        state.pending = None;
        state.change_count += 1;
        Ok(())
    }

    fn write_bytes(&mut self, content_type: &str, bytes: &[u8]) -> Result<()> {
        let mut state = self.state();
        state.items.insert(content_type.to_string(), bytes.to_vec());
        state.change_count += 1;
        Ok(())
    }

    fn frontmost_application_id(&mut self) -> Option<String> {
        self.state().frontmost.clone()
    }
}
