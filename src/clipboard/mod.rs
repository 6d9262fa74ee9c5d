//! Clipboard access and snapshot capture
//!
//! The engine never talks to the OS directly. Everything goes through
//! [`ClipboardService`], which keeps capture logic testable with an in-memory
//! clipboard and lets [`system::SystemClipboard`] stay a thin adapter.

pub mod capture;
pub mod content_type;
pub mod icon;
pub mod memory;
pub mod system;

use anyhow::Result;
pub use capture::{CaptureEngine, IconWait};
pub use icon::{ImageCrateResizer, ImageResizer};
pub use memory::MemoryClipboard;
pub use system::SystemClipboard;

/// Narrow view of the host clipboard used by the capture engine
///
/// Implementations report failures on reads as absent data. The change count
/// must increase on every mutation, including writes made through this trait,
/// so callers resync it after writing.
pub trait ClipboardService: Send {
    /// Counter bumped on every clipboard mutation
    fn change_count(&mut self) -> i64;

    /// Content-type identifiers the clipboard currently advertises
    fn available_types(&mut self) -> Vec<String>;

    /// Raw bytes for one content type
    fn read_bytes(&mut self, content_type: &str) -> Option<Vec<u8>>;

    /// Best-effort plain-text representation
    fn read_text(&mut self) -> Option<String>;

    /// Remove every representation
    fn clear(&mut self) -> Result<()>;

    /// Add one representation
    fn write_bytes(&mut self, content_type: &str, bytes: &[u8]) -> Result<()>;

    /// Identifier of the application currently in front
    fn frontmost_application_id(&mut self) -> Option<String>;
}
