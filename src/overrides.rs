//! Runtime calibration overrides for field anchor positions.
//!
//! Template reprints shift by a few points between batches; rather than
//! redeploying with new constants, an operator calibrates the affected
//! anchors and the corrected points are persisted through a key-value sink
//! (a JSON blob on disk in production, in-memory in tests). Overrides move
//! only the anchor point; width and height stay inherited from the
//! built-in rectangle.
//!
//! Loading is lazy and best-effort: a missing or corrupt sink yields an
//! empty store. Writes go through synchronously, last-write-wins; this
//! runs in a single-operator admin context and needs no stricter
//! discipline.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

/// Environment variable naming the override blob location.
pub const OVERRIDES_PATH_VAR: &str = "CONTRACT_OVERRIDES_PATH";
const DEFAULT_OVERRIDES_FILE: &str = "contract_overrides.json";

/// A calibrated anchor point, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverridePoint {
    pub x: f32,
    pub y: f32,
}

/// Where the override blob is read from and written to.
pub trait OverrideSink: Send + Sync {
    /// Read the raw blob. `None` when nothing has been persisted yet.
    fn load(&self) -> Option<String>;
    /// Persist the raw blob. Failures are the caller's to log; they never
    /// abort calibration.
    fn store(&self, blob: &str) -> std::io::Result<()>;
}

/// File-backed sink: one small JSON document.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OverrideSink for FileSink {
    fn load(&self) -> Option<String> {
        fs::read_to_string(&self.path).ok()
    }

    fn store(&self, blob: &str) -> std::io::Result<()> {
        fs::write(&self.path, blob)
    }
}

/// In-memory sink for tests and previews.
#[derive(Default)]
pub struct MemorySink {
    blob: Mutex<Option<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OverrideSink for MemorySink {
    fn load(&self) -> Option<String> {
        self.blob.lock().clone()
    }

    fn store(&self, blob: &str) -> std::io::Result<()> {
        *self.blob.lock() = Some(blob.to_string());
        Ok(())
    }
}

/// Lazily loaded key→point map shadowing the built-in anchor table.
///
/// Keys that match no built-in anchor are inert: they are kept in the blob
/// (the calibration tool may be ahead of this binary) but never consulted.
pub struct OverrideStore {
    sink: Box<dyn OverrideSink>,
    entries: RwLock<Option<HashMap<String, OverridePoint>>>,
}

impl OverrideStore {
    pub fn new(sink: Box<dyn OverrideSink>) -> Self {
        Self {
            sink,
            entries: RwLock::new(None),
        }
    }

    /// Store backed by the file named in `CONTRACT_OVERRIDES_PATH`, or a
    /// local default next to the process.
    pub fn from_env() -> Self {
        let path = std::env::var(OVERRIDES_PATH_VAR)
            .unwrap_or_else(|_| DEFAULT_OVERRIDES_FILE.to_string());
        Self::new(Box::new(FileSink::new(path)))
    }

    /// Store that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemorySink::new()))
    }

    pub fn get(&self, key: &str) -> Option<OverridePoint> {
        self.ensure_loaded();
        self.entries
            .read()
            .as_ref()
            .and_then(|map| map.get(key).copied())
    }

    /// Record a corrected anchor point and write the blob through.
    pub fn set(&self, key: &str, x: f32, y: f32) {
        self.ensure_loaded();
        let mut guard = self.entries.write();
        let map = guard.get_or_insert_with(HashMap::new);
        map.insert(key.to_string(), OverridePoint { x, y });
        Self::persist(self.sink.as_ref(), map);
    }

    /// Drop every override and persist the empty blob.
    pub fn clear_all(&self) {
        let mut guard = self.entries.write();
        let map = guard.get_or_insert_with(HashMap::new);
        map.clear();
        Self::persist(self.sink.as_ref(), map);
    }

    fn ensure_loaded(&self) {
        if self.entries.read().is_some() {
            return;
        }
        let mut guard = self.entries.write();
        if guard.is_some() {
            return;
        }
        let loaded = match self.sink.load() {
            Some(blob) => match serde_json::from_str::<HashMap<String, OverridePoint>>(&blob) {
                Ok(map) => map,
                Err(err) => {
                    warn!("override blob unreadable, starting empty: {err}");
                    HashMap::new()
                }
            },
            None => HashMap::new(),
        };
        *guard = Some(loaded);
    }

    fn persist(sink: &dyn OverrideSink, map: &HashMap<String, OverridePoint>) {
        match serde_json::to_string_pretty(map) {
            Ok(blob) => {
                if let Err(err) = sink.store(&blob) {
                    warn!("failed to persist calibration overrides: {err}");
                }
            }
            Err(err) => warn!("failed to serialize calibration overrides: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_returns_nothing() {
        let store = OverrideStore::in_memory();
        assert!(store.get("first_name").is_none());
    }

    #[test]
    fn set_then_get_round_trips() {
        let store = OverrideStore::in_memory();
        store.set("first_name", 101.5, 150.0);
        let point = store.get("first_name").unwrap();
        assert_eq!(point.x, 101.5);
        assert_eq!(point.y, 150.0);
    }

    #[test]
    fn last_write_wins() {
        let store = OverrideStore::in_memory();
        store.set("amount", 10.0, 10.0);
        store.set("amount", 20.0, 30.0);
        assert_eq!(store.get("amount").unwrap().x, 20.0);
    }

    #[test]
    fn clear_all_empties_the_store() {
        let store = OverrideStore::in_memory();
        store.set("folio", 1.0, 2.0);
        store.clear_all();
        assert!(store.get("folio").is_none());
    }

    #[test]
    fn corrupt_blob_loads_as_empty() {
        let sink = MemorySink::new();
        sink.store("{not json").unwrap();
        let store = OverrideStore::new(Box::new(sink));
        assert!(store.get("first_name").is_none());
        // And the store stays usable afterwards.
        store.set("first_name", 5.0, 6.0);
        assert!(store.get("first_name").is_some());
    }
}
