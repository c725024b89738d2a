//! Persisted exchange state: the request/result pair handed to the results page.
//!
//! Two string entries, JSON-encoded, last write wins. No history.

use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError, RwLock};

use pretcad_common::{Result, ScreenerError};
use serde_json::Value;
use tracing::debug;

/// Last screening request, or a CIF provenance record.
pub const INPUT_KEY: &str = "screener_input";
/// Last screening result, verbatim.
pub const RESULT_KEY: &str = "screener_result";

/// Durable string key/value storage.
pub trait ExchangeStore: Send + Sync {
    fn persist(&self, key: &str, value: &str) -> Result<()>;

    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Write several entries in order. Stores shared between writers should
    /// override this so readers never observe a partial batch.
    fn persist_batch(&self, entries: &[(&str, &str)]) -> Result<()> {
        for (key, value) in entries {
            self.persist(key, value)?;
        }
        Ok(())
    }
}

/// Decoded exchange pair as the results page would read it.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredExchange {
    pub input: Option<Value>,
    pub result: Value,
}

impl StoredExchange {
    /// `None` until a run has succeeded at least once.
    pub fn load(store: &dyn ExchangeStore) -> Result<Option<Self>> {
        let Some(result) = store.load(RESULT_KEY)? else {
            return Ok(None);
        };
        let input = store
            .load(INPUT_KEY)?
            .map(|s| serde_json::from_str(&s))
            .transpose()?;
        Ok(Some(Self { input, result: serde_json::from_str(&result)? }))
    }
}

// ── In-memory ────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
    writes: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    /// Keys in the order they were written, across all calls.
    pub fn write_log(&self) -> Vec<String> {
        self.writes.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl ExchangeStore for MemoryStore {
    fn persist(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(key.to_string());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().unwrap_or_else(PoisonError::into_inner).get(key).cloned())
    }

    fn persist_batch(&self, entries: &[(&str, &str)]) -> Result<()> {
        let mut map = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let mut writes = self.writes.lock().unwrap_or_else(PoisonError::into_inner);
        for (key, value) in entries {
            map.insert(key.to_string(), value.to_string());
            writes.push(key.to_string());
        }
        Ok(())
    }
}

// ── JSON file ────────────────────────────────────────────────────────────────

/// Stores all entries as one JSON object in a file. Every write replaces the
/// file through a temp file in the same directory, so readers see either the
/// old or the new map.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path { &self.path }

    fn read_map(&self) -> Result<BTreeMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                ScreenerError::Storage(format!("{} is not a storage file: {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(&mut tmp, map)?;
        tmp.write_all(b"\n")?;
        tmp.persist(&self.path)
            .map_err(|e| ScreenerError::Storage(format!("{}: {}", self.path.display(), e)))?;
        Ok(())
    }
}

impl ExchangeStore for JsonFileStore {
    fn persist(&self, key: &str, value: &str) -> Result<()> {
        self.persist_batch(&[(key, value)])
    }

    fn load(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_map()?.remove(key))
    }

    fn persist_batch(&self, entries: &[(&str, &str)]) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut map = self.read_map()?;
        for (key, value) in entries {
            map.insert(key.to_string(), value.to_string());
        }
        self.write_map(&map)?;
        debug!(path = %self.path.display(), keys = entries.len(), "Exchange state written");
        Ok(())
    }
}
