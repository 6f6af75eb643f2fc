//! Core domain entities for Bedside.
//!
//! A [`Patient`] is a plain value. Its attributes are addressed through the closed key enums
//! [`TextField`] and [`SupportFlag`] so that editors, exporters and the decoder can walk every
//! field generically without string lookups.

mod field;
mod patient;
mod patient_id;

pub use field::{EditableField, FieldValue, QuickAddTarget, SupportFlag, TextField};
pub use patient::{DEFAULT_NAME, Patient};
pub use patient_id::PatientId;
