//! Boolean key/value settings the UI can persist, e.g. `dark-mode`.

use crate::error::{NotasError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DARK_MODE: &str = "dark-mode";
const SETTINGS_FILENAME: &str = "settings.json";

pub trait SettingsStore {
    fn get_bool(&self, key: &str) -> Option<bool>;

    fn set_bool(&mut self, key: &str, value: bool) -> Result<()>;

    fn dark_mode(&self) -> bool {
        self.get_bool(DARK_MODE).unwrap_or(false)
    }

    fn set_dark_mode(&mut self, enabled: bool) -> Result<()> {
        self.set_bool(DARK_MODE, enabled)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    values: BTreeMap<String, bool>,
}

/// Settings stored as JSON in `<dir>/settings.json`. Every `set_bool` writes through.
#[derive(Debug, Clone)]
pub struct JsonSettings {
    dir: PathBuf,
    data: SettingsFile,
}

impl JsonSettings {
    /// Loads settings from `dir`, or starts empty if the file does not exist.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let path = dir.join(SETTINGS_FILENAME);
        let data = if path.exists() {
            let content = fs::read_to_string(&path).map_err(NotasError::Io)?;
            serde_json::from_str(&content).map_err(NotasError::Serialization)?
        } else {
            SettingsFile::default()
        };
        Ok(Self { dir, data })
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILENAME)
    }

    fn persist(&self) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(NotasError::Io)?;
        }
        let content = serde_json::to_string_pretty(&self.data).map_err(NotasError::Serialization)?;
        fs::write(self.path(), content).map_err(NotasError::Io)?;
        Ok(())
    }
}

impl SettingsStore for JsonSettings {
    fn get_bool(&self, key: &str) -> Option<bool> {
        self.data.values.get(key).copied()
    }

    fn set_bool(&mut self, key: &str, value: bool) -> Result<()> {
        self.data.values.insert(key.to_string(), value);
        self.persist()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    values: BTreeMap<String, bool>,
}

impl SettingsStore for MemorySettings {
    fn get_bool(&self, key: &str) -> Option<bool> {
        self.values.get(key).copied()
    }

    fn set_bool(&mut self, key: &str, value: bool) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}
