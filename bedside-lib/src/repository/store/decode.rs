//! Decoding of the YAML roster into [`Patient`] values.
//!
//! Every attribute is optional on disk. A missing or `null` attribute keeps the default that
//! [`Patient::with_id`] starts from; a present one is coerced into the expected kind or rejected.

use std::path::Path;

use serde_yaml::{Mapping, Value};
use strum::IntoEnumIterator;
use tracing::info;

use crate::repository::{
    entities::{Patient, PatientId, SupportFlag, TextField},
    store::{StorageError, migrate::fold_station},
};

/// Key of the ward attribute dropped from the format; see [`fold_station`].
const LEGACY_STATION: &str = "station";

/// Patients read from a roster file.
#[derive(Debug, Default)]
pub(crate) struct Decoded {
    pub patients: Vec<Patient>,
    /// Records stored without an id that were given a fresh one. These only stay stable once
    /// the roster is written back.
    pub assigned_ids: usize,
}

pub(crate) fn decode_roster(path: &Path, contents: &str) -> Result<Decoded, StorageError> {
    if contents.trim().is_empty() {
        return Ok(Decoded::default());
    }

    let document: Value = serde_yaml::from_str(contents).map_err(|source| StorageError::Parse {
        path: path.to_owned(),
        source,
    })?;

    let entries = match document {
        Value::Null => return Ok(Decoded::default()),
        Value::Sequence(entries) => entries,
        _ => {
            return Err(StorageError::NotAList {
                path: path.to_owned(),
            });
        }
    };

    let mut decoded = Decoded::default();

    for (index, entry) in entries.iter().enumerate() {
        let (patient, assigned) =
            decode_patient(entry).map_err(|reason| StorageError::InvalidRecord {
                path: path.to_owned(),
                index,
                reason,
            })?;

        if assigned {
            decoded.assigned_ids += 1;
        }
        decoded.patients.push(patient);
    }

    Ok(decoded)
}

/// Decode one record. The flag tells whether the id was generated here.
fn decode_patient(entry: &Value) -> Result<(Patient, bool), String> {
    let Value::Mapping(fields) = entry else {
        return Err("expected a mapping of patient attributes".into());
    };

    let (id, assigned) = match text(fields, "id")? {
        Some(id) if !id.is_empty() => (PatientId::from(id), false),
        _ => (PatientId::generate(), true),
    };

    let mut patient = Patient::with_id(id, "");

    for field in TextField::iter() {
        if let Some(value) = text(fields, field.key())? {
            patient.set_text(field, value);
        }
    }

    for flag in SupportFlag::iter() {
        if let Some(value) = boolean(fields, flag.key())? {
            patient.set_flag(flag, value);
        }
    }

    if let Some(hidden) = boolean(fields, "hidden")? {
        patient.set_hidden(hidden);
    }

    let station = text(fields, LEGACY_STATION)?.unwrap_or_default();
    if let Some(bettplatz) = fold_station(&station, patient.bettplatz()) {
        info!(
            "Merged station '{station}' into bettplatz of patient {}",
            patient.id()
        );
        patient.set_text(TextField::Bettplatz, bettplatz);
    }

    Ok((patient, assigned))
}

fn text(fields: &Mapping, key: &str) -> Result<Option<String>, String> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => coerce_text(value)
            .map(Some)
            .ok_or_else(|| format!("attribute `{key}` must be text")),
    }
}

fn boolean(fields: &Mapping, key: &str) -> Result<Option<bool>, String> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => coerce_flag(value)
            .map(Some)
            .ok_or_else(|| format!("attribute `{key}` must be a boolean")),
    }
}

fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn coerce_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_u64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => parse_flag(s),
        _ => None,
    }
}

/// Parse a textual boolean as written by hand or typed on the command line.
pub fn parse_flag(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" | "ja" => Some(true),
        "false" | "no" | "off" | "0" | "nein" => Some(false),
        _ => None,
    }
}
