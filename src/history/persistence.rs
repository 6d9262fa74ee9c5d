//! History file load/save with atomic writes

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::store::HistoryStore;
use crate::models::Snapshot;

/// Read and parse the history file
///
/// Malformed records are skipped by [`HistoryStore::deserialize`]; only I/O
/// failures are reported.
pub fn load_history(path: &Path) -> Result<Vec<Snapshot>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read history file: {}", path.display()))?;
    Ok(HistoryStore::deserialize(&json))
}

/// Write the history atomically (temp file + rename)
pub fn save_history(path: &Path, store: &HistoryStore) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).context("Failed to create history directory")?;
    }

    let json = store.serialize();
    let temp = path.with_extension("json.tmp");
    fs::write(&temp, json).context("Failed to write history temp file")?;
    fs::rename(&temp, path).context("Failed to rename history temp file")?;

    Ok(())
}

/// Load history, falling back to an empty list on any failure
pub fn load(path: &Path) -> Vec<Snapshot> {
    if !path.exists() {
        tracing::debug!("No history file at {}, starting empty", path.display());
        return Vec::new();
    }

    match load_history(path) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Starting with empty history: {:#}", e);
            Vec::new()
        }
    }
}

/// Save history, logging instead of failing
pub fn persist(path: &Path, store: &HistoryStore) {
    if let Err(e) = save_history(path, store) {
        tracing::warn!("Failed to persist history to {}: {:#}", path.display(), e);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use tempfile::TempDir;

    use super::*;
    use crate::clipboard::content_type::PLAIN_TEXT;

    fn store_with(texts: &[&str]) -> HistoryStore {
        let mut store = HistoryStore::new(10);
        for text in texts {
            let mut content = BTreeMap::new();
            content.insert(PLAIN_TEXT.to_string(), text.as_bytes().to_vec());
            store.push(Snapshot::new(*text, false, content));
        }
        store
    }

    #[test]
    fn test_persist_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        let store = store_with(&["one", "two"]);

        persist(&path, &store);
        assert_eq!(load(&path), store.entries());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_persist_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("i-board").join("nested").join("history.json");

        persist(&path, &store_with(&["x"]));
        assert!(path.exists());
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(load(&dir.path().join("missing.json")).is_empty());
    }

    #[test]
    fn test_load_corrupt_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, "this is { not json").unwrap();
        assert!(load(&path).is_empty());
    }

    #[test]
    fn test_load_history_reports_unreadable_path() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be read as a file
        let err = load_history(dir.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to read history file"));
        assert!(load(dir.path()).is_empty());
    }

    #[test]
    fn test_persist_failure_is_swallowed() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file, not a directory").unwrap();

        // Parent is a regular file, so the write must fail without panicking
        persist(&blocker.join("history.json"), &store_with(&["x"]));
        assert!(save_history(&blocker.join("history.json"), &store_with(&["x"])).is_err());
    }
}
