use crate::models::{Snapshot, StoredSnapshot};

/// Capacity-bounded clipboard history, newest first
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HistoryStore {
    entries: Vec<Snapshot>,
    capacity: usize,
}

impl HistoryStore {
    pub fn new(capacity: usize) -> Self {
        Self { entries: Vec::new(), capacity }
    }

    /// Build a store from loaded entries, dropping the oldest beyond `capacity`
    pub fn with_entries(entries: Vec<Snapshot>, capacity: usize) -> Self {
        let mut store = Self { entries, capacity };
        store.truncate();
        store
    }

    pub fn entries(&self) -> &[Snapshot] {
        &self.entries
    }

    pub fn first(&self) -> Option<&Snapshot> {
        self.entries.first()
    }

    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Make `snapshot` the most recent entry, evicting from the tail if full
    pub fn push(&mut self, snapshot: Snapshot) {
        self.entries.insert(0, snapshot);
        self.truncate();
    }

    /// Change the capacity, returning how many old entries were dropped
    pub fn set_capacity(&mut self, capacity: usize) -> usize {
        self.capacity = capacity;
        self.truncate()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn truncate(&mut self) -> usize {
        let excess = self.entries.len().saturating_sub(self.capacity);
        self.entries.truncate(self.capacity);
        excess
    }

    /// Render the history as a pretty-printed JSON array
    ///
    /// Returns an empty string if serialization fails.
    pub fn serialize(&self) -> String {
        let records: Vec<StoredSnapshot> = self.entries.iter().map(Snapshot::to_storable).collect();
        match serde_json::to_string_pretty(&records) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to serialize history: {}", e);
                String::new()
            }
        }
    }

    /// Parse a JSON array of history records
    ///
    /// Records that fail to convert are skipped; text that is not a JSON array
    /// yields no entries at all.
    pub fn deserialize(text: &str) -> Vec<Snapshot> {
        let values: Vec<serde_json::Value> = match serde_json::from_str(text) {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!("History is not a JSON array, starting empty: {}", e);
                return Vec::new();
            }
        };

        let total = values.len();
        let entries: Vec<Snapshot> = values
            .into_iter()
            .enumerate()
            .filter_map(|(i, value)| match serde_json::from_value::<StoredSnapshot>(value) {
                Ok(record) => Snapshot::from_storable(record),
                Err(e) => {
                    tracing::warn!("Skipping malformed history record {}: {}", i, e);
                    None
                }
            })
            .collect();

        if entries.len() < total {
            tracing::warn!(
                "Loaded history: {} entries ({} skipped)",
                entries.len(),
                total - entries.len()
            );
        }
        entries
    }
}
