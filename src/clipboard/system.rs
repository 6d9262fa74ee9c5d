//! [`ClipboardService`] over the system clipboard using arboard
//!
//! arboard exposes plain text and a single RGBA image, so this adapter
//! advertises at most [`PLAIN_TEXT`] and [`PNG`]. It has no change counter
//! either; one is derived by fingerprinting the contents on every query.
//!
//! # Platform Support
//! - macOS: pasteboard API
//! - Linux: X11 or Wayland (wl-clipboard)
//! - Windows: Win32 clipboard

use std::borrow::Cow;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::io::Cursor;

use anyhow::{Context, Result};
use arboard::{Clipboard, ImageData};
use image::{ImageFormat, RgbaImage};

use super::ClipboardService;
use super::content_type::{PLAIN_TEXT, PNG, TIFF};

pub struct SystemClipboard {
    clipboard: Clipboard,
    fingerprint: u64,
    change_count: i64,
}

impl SystemClipboard {
    pub fn new() -> Result<Self> {
        let mut clipboard = Clipboard::new().context("Failed to initialize clipboard")?;
        let fingerprint = fingerprint(&mut clipboard);
        Ok(Self { clipboard, fingerprint, change_count: 0 })
    }

    fn read_png(&mut self) -> Option<Vec<u8>> {
        let image = self.clipboard.get_image().ok()?;
        let rgba =
            RgbaImage::from_raw(image.width as u32, image.height as u32, image.bytes.into_owned())?;

        let mut out = Vec::new();
        match rgba.write_to(&mut Cursor::new(&mut out), ImageFormat::Png) {
            Ok(()) => Some(out),
            Err(e) => {
                tracing::warn!("Failed to encode clipboard image as PNG: {}", e);
                None
            }
        }
    }

    fn write_image(&mut self, bytes: &[u8]) -> Result<()> {
        let rgba = image::load_from_memory(bytes).context("Failed to decode image")?.to_rgba8();
        let (width, height) = rgba.dimensions();
        let data = ImageData {
            width: width as usize,
            height: height as usize,
            bytes: Cow::Owned(rgba.into_raw()),
        };
        self.clipboard.set_image(data).context("Failed to set clipboard image")
    }
}

/// Hash of everything arboard can see, used to detect external changes
fn fingerprint(clipboard: &mut Clipboard) -> u64 {
    let mut hasher = DefaultHasher::new();
    clipboard.get_text().ok().hash(&mut hasher);
    if let Ok(image) = clipboard.get_image() {
        (image.width, image.height).hash(&mut hasher);
        image.bytes.hash(&mut hasher);
    }
    hasher.finish()
}

impl ClipboardService for SystemClipboard {
    fn change_count(&mut self) -> i64 {
        let current = fingerprint(&mut self.clipboard);
        if current != self.fingerprint {
            self.fingerprint = current;
            self.change_count += 1;
        }
        self.change_count
    }

    fn available_types(&mut self) -> Vec<String> {
        let mut types = Vec::new();
        if self.clipboard.get_text().is_ok() {
            types.push(PLAIN_TEXT.to_string());
        }
        if self.clipboard.get_image().is_ok() {
            types.push(PNG.to_string());
        }
        types
    }

    fn read_bytes(&mut self, content_type: &str) -> Option<Vec<u8>> {
        match content_type {
            PLAIN_TEXT => self.clipboard.get_text().ok().map(String::into_bytes),
            PNG => self.read_png(),
            _ => None,
        }
    }

    fn read_text(&mut self) -> Option<String> {
        self.clipboard.get_text().ok()
    }

    fn clear(&mut self) -> Result<()> {
        self.clipboard.clear().context("Failed to clear clipboard")
    }

    fn write_bytes(&mut self, content_type: &str, bytes: &[u8]) -> Result<()> {
        match content_type {
            PLAIN_TEXT => self
                .clipboard
                .set_text(String::from_utf8_lossy(bytes).into_owned())
                .context("Failed to set clipboard contents"),
            PNG | TIFF => self.write_image(bytes),
            other => {
                tracing::trace!(content_type = other, "Representation not supported, skipping");
                Ok(())
            }
        }
    }

    fn frontmost_application_id(&mut self) -> Option<String> {
        None
    }
}
