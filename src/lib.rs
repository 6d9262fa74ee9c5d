//! clip-history - A bounded, persistent history of clipboard snapshots
//!
//! This library watches the system clipboard, captures every change as a
//! [`Snapshot`] holding all of its representations, and keeps the most recent
//! ones in a capacity-bounded history mirrored to a JSON file. It supports:
//!
//! - Change detection against the clipboard's change counter
//! - Capturing every representation, with file icons shrunk to thumbnails
//! - Restoring any past snapshot to the clipboard
//! - Runtime changes to capacity and poll interval
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use clip_history::clipboard::{CaptureEngine, ImageCrateResizer, SystemClipboard};
//! use clip_history::config::ConfigStore;
//! use clip_history::scheduler::TokioScheduler;
//! use clip_history::HistoryHandler;
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let engine = CaptureEngine::new(Box::new(SystemClipboard::new()?), Box::new(ImageCrateResizer));
//! let config = ConfigStore::load(&clip_history::utils::get_config_path()?);
//! let handler = HistoryHandler::new(
//!     engine,
//!     &config,
//!     Arc::new(TokioScheduler::current()),
//!     clip_history::utils::get_history_path()?,
//! );
//!
//! let latest = handler.read();
//! println!("Latest: {}", latest.display_text());
//! handler.shutdown();
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod history;
pub mod logging;
pub mod models;
pub mod scheduler;
pub mod utils;

// Re-export commonly used types
pub use clipboard::{CaptureEngine, ClipboardService};
pub use config::{ConfigProvider, ConfigStore, HistoryConfig};
pub use error::HistoryError;
pub use history::{HistoryHandler, HistoryStore};
pub use models::Snapshot;
