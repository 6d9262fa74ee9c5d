//! History settings and change notification
//!
//! The handler only needs the current [`HistoryConfig`] and a way to hear
//! about changes, expressed by [`ConfigProvider`]. [`ConfigStore`] is the
//! in-process implementation; it can be seeded from a JSON file and updated
//! at runtime.

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CAPACITY: usize = 20;
pub const DEFAULT_POLL_INTERVAL_SECS: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of retained snapshots
    pub capacity: usize,
    /// Seconds between clipboard polls; zero or less disables polling
    pub poll_interval_secs: f64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { capacity: DEFAULT_CAPACITY, poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS }
    }
}

impl HistoryConfig {
    /// Polling interval, or `None` when periodic polling is disabled
    ///
    /// A positive value too large for a [`Duration`], or so small it rounds to
    /// zero, also disables polling.
    pub fn poll_interval(&self) -> Option<Duration> {
        let secs = self.poll_interval_secs;
        if secs.is_nan() || secs <= 0.0 {
            return None;
        }

        let interval = Duration::try_from_secs_f64(secs).ok().filter(|d| !d.is_zero());
        if interval.is_none() {
            tracing::warn!(poll_interval_secs = secs, "Unusable poll interval, polling disabled");
        }
        interval
    }
}

pub type ConfigListener = Box<dyn Fn(&HistoryConfig) + Send + Sync>;

/// Source of the current settings and of change notifications
pub trait ConfigProvider: Send + Sync {
    fn current(&self) -> HistoryConfig;

    /// Register a callback invoked with the new settings after every change
    fn subscribe(&self, listener: ConfigListener);
}

/// In-memory [`ConfigProvider`]
///
/// Clones share state and listeners.
#[derive(Clone, Default)]
pub struct ConfigStore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    config: Mutex<HistoryConfig>,
    listeners: Mutex<Vec<Arc<dyn Fn(&HistoryConfig) + Send + Sync>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ConfigStore {
    pub fn new(config: HistoryConfig) -> Self {
        let inner = Inner { config: Mutex::new(config), listeners: Mutex::new(Vec::new()) };
        Self { inner: Arc::new(inner) }
    }

    /// Seed from a JSON settings file, using defaults if it is missing or malformed
    pub fn load(path: &Path) -> Self {
        let config = if path.exists() {
            match read_config(path) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Using default settings: {:#}", e);
                    HistoryConfig::default()
                }
            }
        } else {
            HistoryConfig::default()
        };
        Self::new(config)
    }

    /// Replace the settings and notify every subscriber
    pub fn update(&self, config: HistoryConfig) {
        *lock(&self.inner.config) = config;

        // Call listeners without holding either lock so they may read back.
        let listeners = lock(&self.inner.listeners).clone();
        for listener in listeners {
            listener(&config);
        }
    }
}

impl ConfigProvider for ConfigStore {
    fn current(&self) -> HistoryConfig {
        *lock(&self.inner.config)
    }

    fn subscribe(&self, listener: ConfigListener) {
        lock(&self.inner.listeners).push(Arc::from(listener));
    }
}

pub fn read_config(path: &Path) -> Result<HistoryConfig> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
    serde_json::from_str(&json).context("Failed to parse settings JSON")
}
