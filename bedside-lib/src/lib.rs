//! Patient roster management for a single ward.
//!
//! The [`Repository`] owns the roster and its YAML backing file. Everything else in this crate
//! (export text, printable documents, navigation state) reads from it.

use std::path::PathBuf;

use thiserror::Error;

pub mod app;
pub mod document;
pub mod export;
pub mod fs;
pub mod repository;

pub use repository::{
    EditableField, FieldValue, Patient, PatientId, QuickAddTarget, Repository, SupportFlag,
    TextField,
};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Storage(#[from] repository::StorageError),
    #[error("Failed to write configuration file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
    #[error("Could not determine the home directory")]
    NoHome,
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("A patient with id {0} already exists")]
    DuplicateId(PatientId),
    #[error("No patient matches id {0}")]
    NotFound(String),
    #[error("Id prefix {0} matches more than one patient")]
    AmbiguousId(String),
    #[error("Unknown field {0}")]
    UnknownField(String),
    #[error("Field {field} expects {expected}")]
    FieldType {
        field: EditableField,
        expected: &'static str,
    },
    #[error("Failed to write document {path}: {source}")]
    Document {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
