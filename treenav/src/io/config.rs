//! Shell configuration stored in `.treenav.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Default config location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = ".treenav.toml";

/// Shell configuration (TOML).
///
/// Missing fields fall back to the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ShellConfig {
    /// Color the prompt.
    pub color: bool,

    /// Directory that `dump` and `txt_dump` write into.
    pub output_dir: PathBuf,

    /// Persist line history here between sessions.
    pub history_file: Option<PathBuf>,

    /// Maximum number of history entries kept by the line editor.
    pub max_history: usize,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            color: true,
            output_dir: PathBuf::from("."),
            history_file: None,
            max_history: 1000,
        }
    }
}

impl ShellConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_history == 0 {
            return Err(anyhow!("max_history must be > 0"));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(anyhow!("output_dir must not be empty"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `ShellConfig::default()`.
pub fn load_config(path: &Path) -> Result<ShellConfig> {
    if !path.exists() {
        let cfg = ShellConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ShellConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
