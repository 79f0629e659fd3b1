//! Pluggable persistence for the client store.
//!
//! The store is constructed with whichever backend fits the caller: the CLI
//! uses a JSON file under the vatkeep home dir, tests use the in-memory one.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::store::StoreData;

pub trait StorageBackend: Send {
    fn load(&self) -> Result<Option<StoreData>>;
    fn save(&self, data: &StoreData) -> Result<()>;
}

/// Pretty-printed JSON blob at a fixed path.
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StorageBackend for JsonFileBackend {
    fn load(&self) -> Result<Option<StoreData>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let s = fs::read_to_string(&self.path)
            .with_context(|| format!("read {}", self.path.display()))?;
        let data = serde_json::from_str(&s)
            .with_context(|| format!("parse {}", self.path.display()))?;
        Ok(Some(data))
    }

    fn save(&self, data: &StoreData) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, json).with_context(|| format!("write {}", self.path.display()))?;
        Ok(())
    }
}

/// Keeps the blob in memory. Useful for tests and embedding.
#[derive(Default)]
pub struct MemoryBackend {
    data: Mutex<Option<StoreData>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

// Shared handles work as backends too, so a test can reopen a store on the
// same MemoryBackend it mutated earlier.
impl<B: StorageBackend + Send + Sync> StorageBackend for std::sync::Arc<B> {
    fn load(&self) -> Result<Option<StoreData>> {
        (**self).load()
    }

    fn save(&self, data: &StoreData) -> Result<()> {
        (**self).save(data)
    }
}

impl StorageBackend for MemoryBackend {
    fn load(&self) -> Result<Option<StoreData>> {
        let guard = self
            .data
            .lock()
            .map_err(|_| anyhow::anyhow!("backend lock poisoned"))?;
        Ok(guard.clone())
    }

    fn save(&self, data: &StoreData) -> Result<()> {
        let mut guard = self
            .data
            .lock()
            .map_err(|_| anyhow::anyhow!("backend lock poisoned"))?;
        *guard = Some(data.clone());
        Ok(())
    }
}
