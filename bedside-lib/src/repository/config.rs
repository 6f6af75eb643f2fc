use std::{
    fs,
    path::{Path, PathBuf},
};

use getset::{CopyGetters, Getters};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    Error, Result,
    export::ExportField,
    fs::{config_dir, data_dir},
};

const FILE_NAME: &str = "bedside.toml";
const ROSTER_FILE_NAME: &str = "patients.yaml";

/// Core configuration, serialized to TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct CoreConfig {
    /// The YAML file holding the roster
    #[getset(get = "pub")]
    roster_file: PathBuf,
    /// Where printable documents are written
    #[getset(get = "pub")]
    export_dir: PathBuf,
    #[getset(get = "pub")]
    export: ExportConfig,
    #[getset(get = "pub")]
    document: DocumentConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct ExportConfig {
    /// Fields preselected for export
    #[getset(get = "pub")]
    fields: Vec<ExportField>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, CopyGetters)]
#[serde(default)]
pub struct DocumentConfig {
    #[getset(get_copy = "pub")]
    lines_per_page: usize,
    /// Characters per line before wrapping
    #[getset(get_copy = "pub")]
    line_width: usize,
}

impl CoreConfig {
    /// Load the configuration from the XDG config directory, writing out defaults on first use.
    pub fn load() -> Result<Self> {
        let path = config_dir()?.join(FILE_NAME);
        let default_dir = data_dir()?;

        Self::load_from(&path, &default_dir)
    }

    /// Load from `path`, with roster and export locations defaulting into `data_dir`. An
    /// unreadable file falls back to the defaults.
    pub fn load_from(path: &Path, data_dir: &Path) -> Result<Self> {
        if path.exists() {
            let parsed = fs::read_to_string(path)
                .map_err(|e| e.to_string())
                .and_then(|contents| {
                    toml::from_str::<Self>(&contents).map_err(|e| e.to_string())
                });

            match parsed {
                Ok(cfg) => Ok(cfg.resolve(data_dir)),
                Err(e) => {
                    warn!("Ignoring configuration file {}: {e}", path.display());
                    Ok(Self::defaults_in(data_dir))
                }
            }
        } else {
            let cfg = Self::defaults_in(data_dir);
            cfg.save_to(path)?;
            Ok(cfg)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = self.to_toml()?;

        if let Some(parent) = path.parent() {
            crate::fs::ensure_dir(parent.to_path_buf())?;
        }

        fs::write(path, contents).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Path of the configuration file in the XDG config directory.
    pub fn path() -> Result<PathBuf> {
        Ok(config_dir()?.join(FILE_NAME))
    }

    pub fn set_roster_file(&mut self, path: PathBuf) {
        self.roster_file = path;
    }

    fn defaults_in(data_dir: &Path) -> Self {
        Self::default().resolve(data_dir)
    }

    /// Anchor empty or relative locations in `data_dir`.
    fn resolve(mut self, data_dir: &Path) -> Self {
        if self.roster_file.as_os_str().is_empty() {
            self.roster_file = PathBuf::from(ROSTER_FILE_NAME);
        }
        if self.roster_file.is_relative() {
            self.roster_file = data_dir.join(&self.roster_file);
        }
        if self.export_dir.as_os_str().is_empty() {
            self.export_dir = data_dir.to_path_buf();
        } else if self.export_dir.is_relative() {
            self.export_dir = data_dir.join(&self.export_dir);
        }

        self
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            roster_file: PathBuf::from(ROSTER_FILE_NAME),
            export_dir: PathBuf::new(),
            export: ExportConfig::default(),
            document: DocumentConfig::default(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            fields: ExportField::defaults().collect(),
        }
    }
}

impl DocumentConfig {
    pub fn new(lines_per_page: usize, line_width: usize) -> Self {
        Self {
            lines_per_page,
            line_width,
        }
    }
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self::new(60, 80)
    }
}
