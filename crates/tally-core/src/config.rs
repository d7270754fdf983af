use std::fs;
use std::path::{Path, PathBuf};

use anyhow::anyhow;
use serde::Deserialize;
use tracing::{debug, info, warn};

const CONFIG_FILE: &str = "tally.toml";
const CONFIG_ENV_VAR: &str = "TALLY_CONFIG";
const DATA_DIR_ENV_VAR: &str = "TALLY_DATA_DIR";
const DEFAULT_DATA_DIR: &str = ".tally";

#[derive(Debug, Deserialize)]
struct ConfigFile {
    data_dir: Option<String>,
    storage: Option<StorageSection>,
}

#[derive(Debug, Deserialize)]
struct StorageSection {
    data_dir: Option<String>,
}

#[tracing::instrument(skip(override_dir))]
pub fn resolve_data_dir(override_dir: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(path) = override_dir {
        return Ok(path.to_path_buf());
    }

    if let Ok(raw) = std::env::var(DATA_DIR_ENV_VAR) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            debug!(dir = %trimmed, "data dir from environment");
            return Ok(expand_tilde(Path::new(trimmed)));
        }
    }

    if let Some(path) = config_file_path()
        && let Some(dir) = load_data_dir_from_file(&path)
    {
        return Ok(expand_tilde(Path::new(&dir)));
    }

    let home = dirs::home_dir().ok_or_else(|| anyhow!("cannot determine home directory"))?;
    Ok(home.join(DEFAULT_DATA_DIR))
}

fn config_file_path() -> Option<PathBuf> {
    if let Ok(raw) = std::env::var(CONFIG_ENV_VAR) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    std::env::current_dir().ok().map(|dir| dir.join(CONFIG_FILE))
}

fn load_data_dir_from_file(path: &Path) -> Option<String> {
    if !path.exists() {
        debug!(file = %path.display(), "config file not found");
        return None;
    }

    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(file = %path.display(), error = %err, "failed reading config file");
            return None;
        }
    };

    let parsed = match toml::from_str::<ConfigFile>(&raw) {
        Ok(parsed) => parsed,
        Err(err) => {
            warn!(file = %path.display(), error = %err, "failed parsing config file");
            return None;
        }
    };

    let dir = parsed
        .storage
        .and_then(|section| section.data_dir)
        .or(parsed.data_dir)?;

    let trimmed = dir.trim();
    if trimmed.is_empty() {
        return None;
    }

    info!(file = %path.display(), dir = %trimmed, "data dir from config file");
    Some(trimmed.to_string())
}

fn expand_tilde(path: &Path) -> PathBuf {
    let text = path.to_string_lossy();
    if let Some(rest) = text.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}
