//! Front-end state that doesn't depend on any widget toolkit.
//!
//! Everything here is a plain value. Transitions return a new value instead of mutating, so a
//! front end can keep the previous state around or compare the two.

use std::collections::BTreeSet;

use crate::{
    PatientId, Repository,
    export::{ExportField, format_patient, format_roster},
    repository::Patient,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum View {
    /// Overview of the roster
    #[default]
    Home,
    /// Editor for a single patient
    Patient(PatientId),
    Export,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    view: View,
}

impl AppState {
    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn navigate(&self, view: View) -> Self {
        Self { view }
    }

    /// The patient open in the editor, if any.
    pub fn current_patient(&self) -> Option<&PatientId> {
        match &self.view {
            View::Patient(id) => Some(id),
            _ => None,
        }
    }
}

/// Rows of the overview table: every active patient, or every patient matching `query` when it
/// isn't blank.
pub fn home_rows<'a>(repo: &'a Repository, query: &str) -> Vec<&'a Patient> {
    let query = query.trim();

    if query.is_empty() {
        Repository::sorted(repo.active())
    } else {
        Repository::sorted(repo.search(query))
    }
}

/// Navigation entries for the active patients as `(id, label)` pairs.
pub fn sidebar_entries(repo: &Repository) -> Vec<(PatientId, String)> {
    Repository::sorted(repo.active())
        .into_iter()
        .map(|p| (p.id().clone(), p.display_label()))
        .collect()
}

/// Which patients and fields go into an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSelection {
    patients: BTreeSet<PatientId>,
    fields: BTreeSet<ExportField>,
}

impl ExportSelection {
    /// Select every active patient together with `fields`.
    pub fn new(repo: &Repository, fields: impl IntoIterator<Item = ExportField>) -> Self {
        Self {
            patients: repo.active().into_iter().map(|p| p.id().clone()).collect(),
            fields: fields.into_iter().collect(),
        }
    }

    pub fn patients(&self) -> &BTreeSet<PatientId> {
        &self.patients
    }

    pub fn fields(&self) -> Vec<ExportField> {
        self.fields.iter().copied().collect()
    }

    pub fn is_selected(&self, id: &PatientId) -> bool {
        self.patients.contains(id)
    }

    pub fn toggle_patient(&self, id: &PatientId) -> Self {
        let mut patients = self.patients.clone();
        if !patients.remove(id) {
            patients.insert(id.clone());
        }

        Self {
            patients,
            fields: self.fields.clone(),
        }
    }

    pub fn toggle_field(&self, field: ExportField) -> Self {
        let mut fields = self.fields.clone();
        if !fields.remove(&field) {
            fields.insert(field);
        }

        Self {
            patients: self.patients.clone(),
            fields,
        }
    }

    pub fn with_patients(&self, patients: impl IntoIterator<Item = PatientId>) -> Self {
        Self {
            patients: patients.into_iter().collect(),
            fields: self.fields.clone(),
        }
    }

    pub fn with_fields(&self, fields: impl IntoIterator<Item = ExportField>) -> Self {
        Self {
            patients: self.patients.clone(),
            fields: fields.into_iter().collect(),
        }
    }

    /// Selected patients still present in `repo`, in bed order.
    pub fn included<'a>(&self, repo: &'a Repository) -> Vec<&'a Patient> {
        Repository::sorted(
            repo.patients()
                .iter()
                .filter(|p| self.patients.contains(p.id())),
        )
    }

    /// Export text for the selection, as shown in the preview.
    pub fn render(&self, repo: &Repository) -> String {
        format_roster(&self.included(repo), &self.fields())
    }

    /// One text block per selected patient, for document layout.
    pub fn blocks(&self, repo: &Repository) -> Vec<String> {
        let fields = self.fields();

        self.included(repo)
            .into_iter()
            .map(|p| format_patient(p, &fields))
            .collect()
    }
}
