use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::state::config::TableConfig;

#[derive(Debug)]
pub enum ConfigIoError {
    Io(io::Error),
    Parse(serde_json::Error),
}

impl std::fmt::Display for ConfigIoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "IO error: {err}"),
            Self::Parse(err) => write!(f, "table config parse error: {err}"),
        }
    }
}

impl std::error::Error for ConfigIoError {}

impl From<io::Error> for ConfigIoError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigIoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

// `orders.json` -> `orders.json.table`
pub fn sidecar_path_for_rows(rows_path: &Path) -> PathBuf {
    let mut os: OsString = rows_path.as_os_str().to_os_string();
    os.push(".table");
    PathBuf::from(os)
}

pub fn load_config(path: &Path) -> Result<TableConfig, ConfigIoError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn load_sidecar_or_default(rows_path: &Path) -> Result<TableConfig, ConfigIoError> {
    let path = sidecar_path_for_rows(rows_path);
    if !path.exists() {
        return Ok(TableConfig::default());
    }
    load_config(&path)
}

pub fn save_config(path: &Path, config: &TableConfig) -> Result<(), ConfigIoError> {
    super::write_json_replacing(path, config)?;
    Ok(())
}
