//! File-icon thumbnails
//!
//! File copies carry a full-resolution icon that can run to hundreds of
//! kilobytes. Only a 15×15 PNG is kept so the history file stays small no
//! matter what the source icon looks like.

use std::io::Cursor;

use anyhow::{Context, Result};
use image::ImageFormat;
use image::imageops::FilterType;

/// Edge length of the stored icon thumbnail, in pixels
pub const THUMBNAIL_SIZE: u32 = 15;

/// Image operations the capture engine needs
pub trait ImageResizer: Send + Sync {
    /// Scale an encoded image to fit within `width`×`height`
    ///
    /// The result is an encoded image in a lossless intermediate format.
    fn resize(&self, bytes: &[u8], width: u32, height: u32) -> Result<Vec<u8>>;

    /// Re-encode any decodable image as PNG
    fn encode_png(&self, bytes: &[u8]) -> Option<Vec<u8>>;
}

/// [`ImageResizer`] backed by the `image` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCrateResizer;

impl ImageResizer for ImageCrateResizer {
    fn resize(&self, bytes: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
        let decoded = image::load_from_memory(bytes).context("Failed to decode icon image")?;
        let resized = decoded.resize(width, height, FilterType::Triangle);

        let mut out = Vec::new();
        resized
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Tiff)
            .context("Failed to encode resized icon")?;
        Ok(out)
    }

    fn encode_png(&self, bytes: &[u8]) -> Option<Vec<u8>> {
        let decoded = image::load_from_memory(bytes).ok()?;
        let mut out = Vec::new();
        decoded.write_to(&mut Cursor::new(&mut out), ImageFormat::Png).ok()?;
        Some(out)
    }
}

/// Shrink raw icon bytes to a PNG thumbnail
///
/// Returns `None` when the icon cannot be decoded; the caller drops the icon
/// rather than persisting the raw data.
pub fn compress_icon(resizer: &dyn ImageResizer, raw: &[u8]) -> Option<Vec<u8>> {
    let resized = match resizer.resize(raw, THUMBNAIL_SIZE, THUMBNAIL_SIZE) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!("Icon could not be resized, dropping it: {:#}", e);
            return None;
        }
    };
    resizer.encode_png(&resized)
}
