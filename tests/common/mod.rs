//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clip_history::clipboard::content_type::PLAIN_TEXT;
use clip_history::clipboard::{CaptureEngine, IconWait, ImageCrateResizer, MemoryClipboard};
use clip_history::scheduler::{Scheduler, TimerCallback, TimerHandle};
use clip_history::{HistoryStore, Snapshot};
use image::{ImageFormat, Rgba, RgbaImage};
use tempfile::TempDir;

/// Scheduler that only ticks when the test says so
#[derive(Clone, Default)]
pub struct ManualScheduler {
    timers: Arc<Mutex<Vec<ManualTimer>>>,
}

struct ManualTimer {
    interval: Duration,
    callback: TimerCallback,
    active: Arc<AtomicBool>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intervals of timers that have not been cancelled
    pub fn active_intervals(&self) -> Vec<Duration> {
        let timers = self.timers.lock().unwrap();
        timers.iter().filter(|t| t.active.load(Ordering::SeqCst)).map(|t| t.interval).collect()
    }

    /// Number of timers ever scheduled
    pub fn scheduled_count(&self) -> usize {
        self.timers.lock().unwrap().len()
    }

    /// Run one tick of every active timer
    pub fn fire(&self) {
        let callbacks: Vec<TimerCallback> = {
            let timers = self.timers.lock().unwrap();
            timers
                .iter()
                .filter(|t| t.active.load(Ordering::SeqCst))
                .map(|t| Arc::clone(&t.callback))
                .collect()
        };
        for callback in callbacks {
            callback();
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, interval: Duration, callback: TimerCallback) -> TimerHandle {
        let active = Arc::new(AtomicBool::new(true));
        self.timers.lock().unwrap().push(ManualTimer {
            interval,
            callback,
            active: Arc::clone(&active),
        });
        TimerHandle::new(move || active.store(false, Ordering::SeqCst))
    }
}

/// Temp directory holding a history file that does not exist yet
pub struct TestDir {
    temp_dir: TempDir,
}

impl TestDir {
    pub fn new() -> Self {
        Self { temp_dir: TempDir::new().expect("Failed to create temp dir") }
    }

    pub fn history_path(&self) -> PathBuf {
        self.temp_dir.path().join("history.json")
    }

    /// Write `content` as the history file
    pub fn with_history(self, content: &str) -> Self {
        std::fs::write(self.history_path(), content).expect("Failed to write history.json");
        self
    }

    pub fn read_history(&self) -> String {
        std::fs::read_to_string(self.history_path()).expect("Failed to read history.json")
    }

    /// Entries currently on disk
    pub fn stored_entries(&self) -> Vec<Snapshot> {
        HistoryStore::deserialize(&self.read_history())
    }
}

/// Icon wait short enough that timeouts do not slow the suite down
pub fn fast_icon_wait() -> IconWait {
    IconWait { interval: Duration::from_millis(1), max_attempts: 20 }
}

/// Capture engine over an in-memory clipboard
pub fn memory_engine(clipboard: &MemoryClipboard) -> CaptureEngine {
    CaptureEngine::new(Box::new(clipboard.clone()), Box::new(ImageCrateResizer))
        .with_icon_wait(fast_icon_wait())
}

/// Snapshot holding a plain-text representation
pub fn text_snapshot(text: &str) -> Snapshot {
    let mut content = BTreeMap::new();
    content.insert(PLAIN_TEXT.to_string(), text.as_bytes().to_vec());
    Snapshot::new(text, false, content)
}

/// Solid-colour PNG of the given size
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, Rgba([200, 30, 30, 255]));
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).expect("Failed to encode PNG");
    bytes
}

/// Dimensions of encoded image bytes
pub fn image_dimensions(bytes: &[u8]) -> (u32, u32) {
    let image = image::load_from_memory(bytes).expect("Failed to decode image");
    (image.width(), image.height())
}
