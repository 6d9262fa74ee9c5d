use thiserror::Error;

/// Failures a caller of the history handler is expected to handle
///
/// Everything else (clipboard hiccups, unreadable history file, undecodable
/// icons) is logged and absorbed so the clipboard keeps working.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("History index {index} out of range (history has {len} entries)")]
    OutOfRange { index: usize, len: usize },
}
