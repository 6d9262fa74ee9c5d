//! Clipboard history: the bounded store, its JSON file, and the handler that owns both
//!
//! # Error Handling Strategy
//!
//! The history favors a working clipboard over perfect durability:
//!
//! - **File errors**: A missing, unreadable or corrupt history file loads as an
//!   empty history. Failed writes are logged and the in-memory history stays
//!   authoritative.
//!
//! - **Record errors**: A malformed record is skipped; the rest of the file loads.
//!
//! - **Caller errors**: Restoring an index outside the history is the one
//!   failure returned to the caller, as [`HistoryError::OutOfRange`].
//!
//! [`HistoryError::OutOfRange`]: crate::error::HistoryError::OutOfRange

pub mod handler;
pub mod persistence;
pub mod store;

pub use handler::HistoryHandler;
pub use persistence::{load, load_history, persist, save_history};
pub use store::HistoryStore;
