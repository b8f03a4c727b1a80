use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;

pub fn fortnight_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".fortnight"))
}

pub fn ensure_fortnight_home() -> Result<PathBuf> {
    let dir = fortnight_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Location of the to-do file.
///
/// `--file` wins, then `$NOTESDIR`, then `notes_dir` from the config.
pub fn tasks_path(cfg: &Config, file_override: Option<&Path>) -> PathBuf {
    if let Some(p) = file_override {
        return p.to_path_buf();
    }
    let notes_dir = std::env::var("NOTESDIR")
        .ok()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| cfg.notes_dir.clone());
    expand_home(&notes_dir).join(&cfg.tasks_file)
}

fn expand_home(dir: &str) -> PathBuf {
    match (dir.strip_prefix("~/"), std::env::var("HOME")) {
        (Some(rest), Ok(home)) => PathBuf::from(home).join(rest),
        _ => PathBuf::from(dir),
    }
}

pub fn read_tasks_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

pub fn write_tasks_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("write {}", path.display()))
}
