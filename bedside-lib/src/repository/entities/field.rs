use std::{fmt, str::FromStr};

use clap::ValueEnum;
use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::{Error, Result, repository::store::parse_flag};

/// Free-text attributes of a [`Patient`](super::Patient), in file order.
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
    EnumString,
    IntoStaticStr,
    strum::Display,
    ValueEnum,
)]
#[strum(serialize_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum TextField {
    Name,
    Bettplatz,
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

impl TextField {
    /// Key used in the roster file.
    pub fn key(self) -> &'static str {
        self.into()
    }

    pub fn label(self) -> &'static str {
        use TextField::*;

        match self {
            Name => "Name",
            Bettplatz => "Bettplatz",
            Diagnosen => "Diagnosen",
            Nebendiagnosen => "Nebendiagnosen",
            Operationen => "Operationen",
            WeitereOperationen => "Weitere Operationen",
            KardialeFunktion => "Kardiale Funktion",
            Antiinfektiva => "Antiinfektiva",
            Diagnostik => "Diagnostik",
            Verlauf => "Verlauf",
            ProblemeAufgaben => "Probleme/Aufgaben",
            Uebergabe => "Übergabe",
        }
    }

    /// Identification fields are single line, clinical notes are not.
    pub fn is_multiline(self) -> bool {
        !matches!(self, TextField::Name | TextField::Bettplatz)
    }

    /// Clinical note fields, i.e. everything but the identification fields.
    pub fn notes() -> impl Iterator<Item = TextField> {
        TextField::iter().filter(|f| f.is_multiline())
    }
}

/// Active support measures, in file order.
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
    EnumString,
    IntoStaticStr,
    strum::Display,
    ValueEnum,
)]
#[strum(serialize_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum SupportFlag {
    InvasiveBeatmung,
    Niv,
    Hfnc,
    Crrt,
    Ecmo,
    Impella,
    Vasopressoren,
    Inotropika,
    Ihd,
    Sedierung,
}

impl SupportFlag {
    pub fn key(self) -> &'static str {
        self.into()
    }

    pub fn label(self) -> &'static str {
        use SupportFlag::*;

        match self {
            InvasiveBeatmung => "Inv. Beatmung",
            Niv => "NIV",
            Hfnc => "HFNC",
            Crrt => "CRRT",
            Ecmo => "ECMO",
            Impella => "Impella",
            Vasopressoren => "Vasopressoren",
            Inotropika => "Inotropika",
            Ihd => "IHD",
            Sedierung => "Sedierung",
        }
    }
}

/// Fields that accept a dated quick note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum QuickAddTarget {
    #[default]
    Verlauf,
    Diagnosen,
    Diagnostik,
    ProblemeAufgaben,
}

impl From<QuickAddTarget> for TextField {
    fn from(target: QuickAddTarget) -> Self {
        match target {
            QuickAddTarget::Verlauf => TextField::Verlauf,
            QuickAddTarget::Diagnosen => TextField::Diagnosen,
            QuickAddTarget::Diagnostik => TextField::Diagnostik,
            QuickAddTarget::ProblemeAufgaben => TextField::ProblemeAufgaben,
        }
    }
}

/// Any attribute that can be edited on a patient, except the id and archive state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditableField {
    Text(TextField),
    Flag(SupportFlag),
}

impl EditableField {
    /// Fields in the order the patient editor presents them: identification, support measures,
    /// then clinical notes.
    pub fn editor_order() -> impl Iterator<Item = EditableField> {
        [TextField::Name, TextField::Bettplatz]
            .into_iter()
            .map(EditableField::Text)
            .chain(SupportFlag::iter().map(EditableField::Flag))
            .chain(TextField::notes().map(EditableField::Text))
    }

    pub fn label(self) -> &'static str {
        match self {
            EditableField::Text(f) => f.label(),
            EditableField::Flag(f) => f.label(),
        }
    }

    /// Whether a change to this field alters how the patient is listed.
    pub fn affects_listing(self) -> bool {
        matches!(
            self,
            EditableField::Text(TextField::Name | TextField::Bettplatz)
        )
    }
}

impl fmt::Display for EditableField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditableField::Text(field) => write!(f, "{field}"),
            EditableField::Flag(flag) => write!(f, "{flag}"),
        }
    }
}

impl FromStr for EditableField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if let Ok(field) = <TextField as FromStr>::from_str(s) {
            return Ok(EditableField::Text(field));
        }

        <SupportFlag as FromStr>::from_str(s)
            .map(EditableField::Flag)
            .map_err(|_| Error::UnknownField(s.to_owned()))
    }
}

/// The value held by an [`EditableField`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

impl FieldValue {
    /// Interpret user input for `field`.
    pub fn parse(field: EditableField, input: &str) -> Result<Self> {
        match field {
            EditableField::Text(_) => Ok(FieldValue::Text(input.to_owned())),
            EditableField::Flag(_) => {
                parse_flag(input)
                    .map(FieldValue::Flag)
                    .ok_or(Error::FieldType {
                        field,
                        expected: "a boolean",
                    })
            }
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => write!(f, "{text}"),
            FieldValue::Flag(true) => write!(f, "ja"),
            FieldValue::Flag(false) => write!(f, "nein"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_keys() {
        assert_eq!(TextField::KardialeFunktion.key(), "kardiale_funktion");
        assert_eq!(TextField::ProblemeAufgaben.key(), "probleme_aufgaben");
        assert_eq!(SupportFlag::InvasiveBeatmung.key(), "invasive_beatmung");
        assert_eq!(SupportFlag::Ihd.key(), "ihd");
    }

    #[test]
    fn test_notes_exclude_identification() {
        let notes: Vec<_> = TextField::notes().collect();

        assert_eq!(notes.len(), 10);
        assert!(!notes.contains(&TextField::Name));
        assert!(!notes.contains(&TextField::Bettplatz));
    }

    #[test]
    fn test_editor_order() {
        let order: Vec<_> = EditableField::editor_order().collect();

        assert_eq!(order.len(), 22);
        assert_eq!(order.first(), Some(&EditableField::Text(TextField::Name)));
        assert_eq!(
            order.get(2),
            Some(&EditableField::Flag(SupportFlag::InvasiveBeatmung))
        );
        assert_eq!(order.last(), Some(&EditableField::Text(TextField::Uebergabe)));
    }

    #[test]
    fn test_parse_field() {
        assert_eq!(
            "verlauf".parse::<EditableField>().unwrap(),
            EditableField::Text(TextField::Verlauf)
        );
        assert_eq!(
            "ecmo".parse::<EditableField>().unwrap(),
            EditableField::Flag(SupportFlag::Ecmo)
        );
        assert_eq!(
            "probleme_aufgaben".parse::<EditableField>().unwrap(),
            EditableField::Text(TextField::ProblemeAufgaben)
        );
        assert_eq!(
            "invasive_beatmung".parse::<EditableField>().unwrap(),
            EditableField::Flag(SupportFlag::InvasiveBeatmung)
        );
        assert!(matches!(
            "station".parse::<EditableField>(),
            Err(Error::UnknownField(_))
        ));
    }

    #[test]
    fn test_parse_value() {
        let flag = EditableField::Flag(SupportFlag::Niv);

        assert_eq!(FieldValue::parse(flag, "yes").unwrap(), FieldValue::Flag(true));
        assert_eq!(FieldValue::parse(flag, "0").unwrap(), FieldValue::Flag(false));
        assert!(matches!(
            FieldValue::parse(flag, "maybe"),
            Err(Error::FieldType { .. })
        ));

        let text = EditableField::Text(TextField::Name);
        assert_eq!(
            FieldValue::parse(text, "true").unwrap(),
            FieldValue::Text("true".into())
        );
    }

    #[test]
    fn test_quick_add_targets() {
        assert_eq!(TextField::from(QuickAddTarget::default()), TextField::Verlauf);
        assert_eq!(
            TextField::from(QuickAddTarget::ProblemeAufgaben),
            TextField::ProblemeAufgaben
        );
    }
}
