//! # Configuration
//!
//! Notas configuration lives in `config.json` inside the application config
//! directory (resolved with the `directories` crate, or overridden by the
//! caller). Every field has a default, so a missing file or a partial file
//! both load fine.
//!
//! | Key                     | Default         | Description                                 |
//! |-------------------------|-----------------|---------------------------------------------|
//! | `notes_dir`             | `~/Notas`       | Where quick-capture notes are written       |
//! | `file_ext`              | `.md`           | Extension for quick-capture files           |
//! | `refresh_interval_secs` | `5`             | Context refresh period for the timer tick   |
//! | `max_dispatch_depth`    | `8`             | Nested publish limit of the hub             |
//! | `log_level`             | build dependent | `trace`, `debug`, `info`, `warn`, `error`   |

use crate::error::{NotasError, Result};
use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_FILE_EXT: &str = ".md";
const NOTES_DIR_NAME: &str = "Notas";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotasConfig {
    #[serde(default)]
    pub notes_dir: Option<PathBuf>,

    #[serde(default = "default_file_ext")]
    pub file_ext: String,

    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    #[serde(default = "default_max_dispatch_depth")]
    pub max_dispatch_depth: usize,

    #[serde(default)]
    pub log_level: Option<String>,
}

fn default_file_ext() -> String {
    DEFAULT_FILE_EXT.to_string()
}

fn default_refresh_interval() -> u64 {
    5
}

fn default_max_dispatch_depth() -> usize {
    crate::hub::DEFAULT_MAX_DEPTH
}

impl Default for NotasConfig {
    fn default() -> Self {
        Self {
            notes_dir: None,
            file_ext: default_file_ext(),
            refresh_interval_secs: default_refresh_interval(),
            max_dispatch_depth: default_max_dispatch_depth(),
            log_level: None,
        }
    }
}

impl NotasConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(NotasError::Io)?;
        let config: NotasConfig =
            serde_json::from_str(&content).map_err(NotasError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(NotasError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(NotasError::Serialization)?;
        fs::write(config_path, content).map_err(NotasError::Io)?;
        Ok(())
    }

    /// The file extension, normalized to start with a dot.
    pub fn file_ext(&self) -> String {
        if self.file_ext.starts_with('.') {
            self.file_ext.clone()
        } else {
            format!(".{}", self.file_ext)
        }
    }

    /// Resolution order: `override_dir`, then `notes_dir`, then `<home>/Notas`.
    pub fn resolve_notes_dir(&self, override_dir: Option<PathBuf>) -> PathBuf {
        override_dir
            .or_else(|| self.notes_dir.clone())
            .unwrap_or_else(default_notes_dir)
    }
}

pub fn default_notes_dir() -> PathBuf {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(NOTES_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(NOTES_DIR_NAME))
}

/// OS-appropriate config directory, e.g. `~/.config/notas` on Linux.
pub fn default_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("dev", "writearch", "notas").map(|dirs| dirs.config_dir().to_path_buf())
}
