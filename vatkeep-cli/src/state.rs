use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use vatkeep_store::{ClientStore, JsonFileBackend};

pub fn vatkeep_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".vatkeep"))
}

pub fn ensure_vatkeep_home() -> Result<PathBuf> {
    let dir = vatkeep_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn data_path() -> Result<PathBuf> {
    Ok(ensure_vatkeep_home()?.join("clients.json"))
}

/// Open the client store on the file backend under ~/.vatkeep.
pub fn open_store() -> Result<ClientStore> {
    ClientStore::open(Box::new(JsonFileBackend::new(data_path()?)))
}
