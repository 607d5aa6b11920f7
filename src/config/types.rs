// config/types.rs
use serde::{Deserialize, Serialize};
use std::{fs, io, path::PathBuf};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub editor: Option<String>,
    #[serde(default)]
    pub log_file: Option<String>,
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub always_force: bool,
}

impl Settings {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("k8ctx").join("settings.json"))
    }

    pub fn load_from_file(path: &str) -> io::Result<Self> {
        let path = shellexpand::tilde(path).to_string();
        let config_str = fs::read_to_string(&path)?;
        serde_json::from_str(&config_str).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// An explicitly named settings file must exist; the default one is
    /// optional.
    pub fn load(explicit: Option<&str>) -> io::Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path).map_err(|e| {
                io::Error::new(e.kind(), format!("could not load settings '{}': {}", path, e))
            });
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from_file(&path.to_string_lossy()),
            _ => Ok(Self::default()),
        }
    }
}
