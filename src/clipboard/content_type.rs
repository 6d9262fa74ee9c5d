//! Well-known content-type identifiers used by the capture engine

/// UTF-8 plain text
pub const PLAIN_TEXT: &str = "public.utf8-plain-text";

/// Reference to a file on disk
pub const FILE_URL: &str = "public.file-url";

/// TIFF bitmap
pub const TIFF: &str = "public.tiff";

/// PNG bitmap
pub const PNG: &str = "public.png";

/// File icon published alongside a file reference, often after a delay
pub const ICON: &str = "com.apple.icns";

/// Bundle identifier of the application that wrote the clipboard
pub const SOURCE_APPLICATION: &str = "org.nspasteboard.source";

/// Finder-private node reference; opaque and useless once the copy is over
pub const FINDER_NODE_REF: &str = "com.apple.finder.noderef";

/// Probed on every capture even if the clipboard does not advertise them
pub const EXTRA_TYPES: &[&str] = &[ICON, SOURCE_APPLICATION];

/// Never captured
pub const EXCLUDED_TYPES: &[&str] = &[FINDER_NODE_REF];

/// Types whose presence marks a capture as a file/image
pub const FILE_TYPES: &[&str] = &[FILE_URL, TIFF, PNG];

/// Types that may appear after the file reference they belong to and are
/// worth a bounded wait
pub const DEFERRED_TYPES: &[&str] = &[ICON];

pub fn is_excluded(content_type: &str) -> bool {
    EXCLUDED_TYPES.contains(&content_type)
}
