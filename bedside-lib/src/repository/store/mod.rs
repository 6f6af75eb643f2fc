use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::debug;

use crate::repository::entities::Patient;

mod decode;
mod migrate;

pub use decode::parse_flag;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read roster file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write roster file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Roster file {path} is not valid YAML: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Roster file {path} must contain a list of patients")]
    NotAList { path: PathBuf },
    #[error("Patient #{index} in {path}: {reason}")]
    InvalidRecord {
        path: PathBuf,
        index: usize,
        reason: String,
    },
    #[error("Failed to serialize roster: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

/// The YAML file backing a roster.
///
/// Reads decode and migrate the whole file, writes replace it wholesale. There is no locking and
/// no atomic rename: a concurrent writer is silently overwritten.
#[derive(Debug, Clone)]
pub(crate) struct RosterFile {
    path: PathBuf,
}

impl RosterFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `None` when the file doesn't exist yet.
    pub fn read(&self) -> Result<Option<decode::Decoded>, StorageError> {
        let exists = self.path.try_exists().map_err(|source| self.read_error(source))?;
        if !exists {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path).map_err(|source| self.read_error(source))?;
        let decoded = decode::decode_roster(&self.path, &contents)?;

        debug!(
            "Loaded {} patients from {}",
            decoded.patients.len(),
            self.path.display()
        );

        Ok(Some(decoded))
    }

    pub fn write(&self, patients: &[Patient]) -> Result<(), StorageError> {
        let contents = serde_yaml::to_string(patients)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| self.write_error(source))?;
        }

        fs::write(&self.path, contents).map_err(|source| self.write_error(source))?;

        debug!(
            "Saved {} patients to {}",
            patients.len(),
            self.path.display()
        );

        Ok(())
    }

    fn read_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Read {
            path: self.path.clone(),
            source,
        }
    }

    fn write_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Write {
            path: self.path.clone(),
            source,
        }
    }
}
