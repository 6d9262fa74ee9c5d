use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::clipboard::content_type::SOURCE_APPLICATION;

/// Preview shown when the clipboard had no plain-text representation
pub const NO_PREVIEW: &str = "No Preview Found";

/// One captured clipboard state with every representation that was available
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    display_text: String,
    is_file: bool,
    content: BTreeMap<String, Vec<u8>>,
}

impl Snapshot {
    /// Create a snapshot, inserting an empty source-application entry when missing
    pub fn new(
        display_text: impl Into<String>,
        is_file: bool,
        mut content: BTreeMap<String, Vec<u8>>,
    ) -> Self {
        content.entry(SOURCE_APPLICATION.to_string()).or_default();
        Self { display_text: display_text.into(), is_file, content }
    }

    /// Placeholder returned when nothing has been captured yet
    pub fn empty() -> Self {
        Self::new("", false, BTreeMap::new())
    }

    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    pub fn is_file(&self) -> bool {
        self.is_file
    }

    pub fn content(&self) -> &BTreeMap<String, Vec<u8>> {
        &self.content
    }

    /// Bytes stored for a content type, if any
    pub fn get(&self, content_type: &str) -> Option<&[u8]> {
        self.content.get(content_type).map(Vec::as_slice)
    }

    /// Identifier of the application that owned the clipboard at capture time
    pub fn source_application(&self) -> String {
        self.get(SOURCE_APPLICATION)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .unwrap_or_default()
    }

    /// Convert into the JSON-friendly record written to the history file
    pub fn to_storable(&self) -> StoredSnapshot {
        let content =
            self.content.iter().map(|(ty, bytes)| (ty.clone(), STANDARD.encode(bytes))).collect();

        StoredSnapshot { display_text: self.display_text.clone(), is_file: self.is_file, content }
    }

    /// Rebuild a snapshot from a stored record
    ///
    /// Returns `None` if any content value is not valid base64, so a single bad
    /// record can be dropped without failing the whole load.
    pub fn from_storable(record: StoredSnapshot) -> Option<Self> {
        let mut content = BTreeMap::new();
        for (ty, encoded) in record.content {
            match STANDARD.decode(encoded.as_bytes()) {
                Ok(bytes) => {
                    content.insert(ty, bytes);
                }
                Err(e) => {
                    tracing::warn!(
                        content_type = %ty,
                        "Dropping history record with invalid base64: {}",
                        e
                    );
                    return None;
                }
            }
        }

        Some(Self::new(record.display_text, record.is_file, content))
    }
}

/// Persisted form of a [`Snapshot`]: content bytes are base64 encoded
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoredSnapshot {
    #[serde(rename = "displayText", default)]
    pub display_text: String,
    #[serde(rename = "isFile", default)]
    pub is_file: bool,
    #[serde(default)]
    pub content: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::content_type::PLAIN_TEXT;

    fn text_snapshot(text: &str) -> Snapshot {
        let mut content = BTreeMap::new();
        content.insert(PLAIN_TEXT.to_string(), text.as_bytes().to_vec());
        Snapshot::new(text, false, content)
    }

    #[test]
    fn test_new_inserts_source_application() {
        let snapshot = text_snapshot("hello");
        assert_eq!(snapshot.get(SOURCE_APPLICATION), Some(&b""[..]));
        assert_eq!(snapshot.source_application(), "");
    }

    #[test]
    fn test_new_keeps_existing_source_application() {
        let mut content = BTreeMap::new();
        content.insert(SOURCE_APPLICATION.to_string(), b"com.apple.Safari".to_vec());
        let snapshot = Snapshot::new("x", false, content);
        assert_eq!(snapshot.source_application(), "com.apple.Safari");
    }

    #[test]
    fn test_storable_encodes_base64() {
        let stored = text_snapshot("hello").to_storable();
        assert_eq!(stored.display_text, "hello");
        assert!(!stored.is_file);
        assert_eq!(stored.content.get(PLAIN_TEXT).map(String::as_str), Some("aGVsbG8="));
    }

    #[test]
    fn test_from_storable_preserves_binary_bytes() {
        let mut content = BTreeMap::new();
        content.insert("public.png".to_string(), vec![0x89, 0x50, 0x00, 0xff, 0x10]);
        let snapshot = Snapshot::new(NO_PREVIEW, true, content);

        let restored = Snapshot::from_storable(snapshot.to_storable()).unwrap();
        assert_eq!(restored, snapshot);
    }

    #[test]
    fn test_from_storable_rejects_invalid_base64() {
        let mut record = StoredSnapshot::default();
        record.content.insert(PLAIN_TEXT.to_string(), "not base64!!".to_string());
        assert!(Snapshot::from_storable(record).is_none());
    }

    #[test]
    fn test_stored_snapshot_tolerates_missing_and_extra_fields() {
        let json = r#"{ "displayText": "only text", "unexpected": 42 }"#;
        let record: StoredSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(record.display_text, "only text");
        assert!(!record.is_file);
        assert!(record.content.is_empty());

        let snapshot = Snapshot::from_storable(record).unwrap();
        assert!(snapshot.content().contains_key(SOURCE_APPLICATION));
    }
}
