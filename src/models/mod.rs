//! Data models for captured clipboard history.
//!
//! - [`Snapshot`] - One clipboard capture: preview text, file flag and raw representations
//! - [`StoredSnapshot`] - The JSON record a snapshot is persisted as (base64 content)

pub mod snapshot;

pub use snapshot::{NO_PREVIEW, Snapshot, StoredSnapshot};
