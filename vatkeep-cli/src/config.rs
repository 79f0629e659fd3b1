use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use vatkeep_core::AlertChannel;

use crate::state::ensure_vatkeep_home;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// IANA timezone used to decide what "today" means.
    pub timezone: String,
    pub alerts: AlertsSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertsSection {
    pub default_lead_days: u32,
    pub default_channel: AlertChannel,
    /// How many days back a recorded send still counts as "recently reminded".
    pub recent_window_days: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: "Asia/Dubai".to_string(),
            alerts: AlertsSection {
                default_lead_days: 7,
                default_channel: AlertChannel::Both,
                recent_window_days: 7,
            },
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_vatkeep_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(toml::from_str(&s).context("parse config.toml")?)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let cfg = Config::default();
    save_config(&cfg)?;
    println!("Wrote {}", p.display());
    Ok(())
}
