//! Plain-text export of patient records.
//!
//! A record renders to a block of `Label: value` lines. Blocks are what gets copied to the
//! clipboard, shown in the export preview, and laid out into printable documents.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

use crate::repository::{Patient, TextField};

/// Width of the dashed line between two records.
pub const SEPARATOR_WIDTH: usize = 40;

/// Selectable export keys, in output order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    strum::Display,
    ValueEnum,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum ExportField {
    Bettplatz,
    /// Synthetic: the labels of every active support measure
    Unterstuetzung,
    Diagnosen,
    Nebendiagnosen,
    Operationen,
    WeitereOperationen,
    KardialeFunktion,
    Antiinfektiva,
    Diagnostik,
    Verlauf,
    ProblemeAufgaben,
    Uebergabe,
}

impl ExportField {
    /// The patient attribute this key reads, `None` for derived keys.
    pub fn source(self) -> Option<TextField> {
        use ExportField::*;

        Some(match self {
            Bettplatz => TextField::Bettplatz,
            Unterstuetzung => return None,
            Diagnosen => TextField::Diagnosen,
            Nebendiagnosen => TextField::Nebendiagnosen,
            Operationen => TextField::Operationen,
            WeitereOperationen => TextField::WeitereOperationen,
            KardialeFunktion => TextField::KardialeFunktion,
            Antiinfektiva => TextField::Antiinfektiva,
            Diagnostik => TextField::Diagnostik,
            Verlauf => TextField::Verlauf,
            ProblemeAufgaben => TextField::ProblemeAufgaben,
            Uebergabe => TextField::Uebergabe,
        })
    }

    pub fn label(self) -> &'static str {
        match self.source() {
            Some(field) => field.label(),
            None => "Med. Unterstützung",
        }
    }

    /// Whether the key is preselected in a fresh export.
    pub fn is_default(self) -> bool {
        use ExportField::*;

        matches!(
            self,
            Unterstuetzung
                | Diagnosen
                | Nebendiagnosen
                | Operationen
                | KardialeFunktion
                | Antiinfektiva
                | Uebergabe
        )
    }

    pub fn defaults() -> impl Iterator<Item = ExportField> {
        ExportField::iter().filter(|f| f.is_default())
    }
}

/// Render one patient. The block always opens with the name line; the selected keys follow in
/// [`ExportField`] order whatever the order of `fields`. Empty note fields and an empty
/// support-measure list are skipped.
pub fn format_patient(patient: &Patient, fields: &[ExportField]) -> String {
    let mut lines = vec![format!("Name: {}", patient.name())];

    for field in ExportField::iter().filter(|f| fields.contains(f)) {
        match field {
            ExportField::Bettplatz => {
                lines.push(format!("  Bettplatz: {}", patient.bettplatz()));
            }
            ExportField::Unterstuetzung => {
                if let Some(measures) = support_measures(patient) {
                    lines.push(format!("  {}: {measures}", field.label()));
                }
            }
            _ => {
                let Some(source) = field.source() else {
                    continue;
                };
                let value = patient.text(source);
                if !value.is_empty() {
                    lines.push(format!("  {}:", field.label()));
                    lines.extend(value.lines().map(|line| format!("    {line}")));
                }
            }
        }
    }

    lines.join("\n")
}

/// Render several patients, each block followed by a separator line.
pub fn format_roster(patients: &[&Patient], fields: &[ExportField]) -> String {
    let separator = separator();

    patients
        .iter()
        .flat_map(|p| [format_patient(p, fields), separator.clone()])
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn separator() -> String {
    "-".repeat(SEPARATOR_WIDTH)
}

/// Comma-joined labels of the patient's active support measures.
pub fn support_measures(patient: &Patient) -> Option<String> {
    let labels: Vec<_> = patient.active_flags().map(|f| f.label()).collect();

    if labels.is_empty() {
        None
    } else {
        Some(labels.join(", "))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::repository::SupportFlag;

    fn patient() -> Patient {
        let mut patient = Patient::new("Max Mustermann");
        patient
            .set_text(TextField::Bettplatz, "1")
            .set_text(TextField::Diagnosen, "Test");
        patient
    }

    #[test]
    fn test_format_patient() {
        let export = format_patient(
            &patient(),
            &[ExportField::Diagnosen],
        );

        assert!(export.starts_with("Name: Max Mustermann\n"));
        assert!(export.contains("Diagnosen:"));
        assert!(export.contains("Test"));
        assert!(!export.contains("Bettplatz"));
    }

    #[test]
    fn test_layout() {
        let mut patient = patient();
        patient.set_text(TextField::Verlauf, "Tag 1\nTag 2");

        let export = format_patient(
            &patient,
            &[ExportField::Verlauf, ExportField::Bettplatz],
        );

        assert_eq!(
            export,
            "Name: Max Mustermann\n  Bettplatz: 1\n  Verlauf:\n    Tag 1\n    Tag 2"
        );
    }

    #[test]
    fn test_empty_notes_are_skipped() {
        let export = format_patient(&patient(), &[ExportField::Uebergabe]);

        assert_eq!(export, "Name: Max Mustermann");
    }

    #[test]
    fn test_support_measures() {
        let mut patient = patient();
        patient
            .set_flag(SupportFlag::Vasopressoren, true)
            .set_flag(SupportFlag::Sedierung, true);

        let export = format_patient(&patient, &[ExportField::Unterstuetzung]);

        assert_eq!(
            export,
            "Name: Max Mustermann\n  Med. Unterstützung: Vasopressoren, Sedierung"
        );
        assert!(!export.contains("ECMO"));
        assert!(!export.contains("NIV"));
    }

    #[test]
    fn test_no_support_measures() {
        let export = format_patient(
            &patient(),
            &[ExportField::Unterstuetzung],
        );

        assert_eq!(export, "Name: Max Mustermann");
    }

    #[test]
    fn test_format_roster() {
        let a = Patient::new("A");
        let b = Patient::new("B");

        let text = format_roster(&[&a, &b], &[]);

        let dashes = "-".repeat(40);
        assert_eq!(text, format!("Name: A\n{dashes}\nName: B\n{dashes}"));
    }

    #[test]
    fn test_defaults() {
        let defaults: Vec<_> = ExportField::defaults().collect();

        assert_eq!(defaults.len(), 7);
        assert!(defaults.contains(&ExportField::Uebergabe));
        assert!(!defaults.contains(&ExportField::Bettplatz));
    }

    #[test]
    fn test_name_line_without_selection() {
        let text = format_roster(&[&patient()], &[]);

        assert_eq!(text, format!("Name: Max Mustermann\n{}", "-".repeat(40)));
    }

    #[test]
    fn test_labels() {
        assert_eq!(ExportField::Unterstuetzung.label(), "Med. Unterstützung");
        assert_eq!(ExportField::Uebergabe.label(), "Übergabe");
    }
}
