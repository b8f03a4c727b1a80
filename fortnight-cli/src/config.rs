use anyhow::{Context, Result};
use chrono::NaiveDate;
use chrono_tz::Tz;
use fortnight_core::HourRing;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::state::ensure_fortnight_home;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the to-do file. `$NOTESDIR` overrides it.
    pub notes_dir: String,
    pub tasks_file: String,

    /// A first-week Sunday. Every rotation is counted from here.
    pub anchor: NaiveDate,

    /// IANA zone used for "now".
    pub timezone: String,

    /// Quiet period after the last edit before the file is refreshed.
    pub write_delay_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            notes_dir: "~/Documents/Logseq/personal/pages".to_string(),
            tasks_file: "To Do List.md".to_string(),
            anchor: NaiveDate::from_ymd_opt(2022, 1, 2).unwrap_or_default(),
            timezone: "America/New_York".to_string(),
            write_delay_secs: 20,
        }
    }
}

impl Config {
    pub fn ring(&self) -> Result<HourRing> {
        HourRing::new(self.anchor).context("config anchor")
    }

    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("timezone '{}': {}", self.timezone, e))
    }

    pub fn write_delay(&self) -> Duration {
        Duration::from_secs(self.write_delay_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_fortnight_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config_to(p: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config_to(&p, &Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
