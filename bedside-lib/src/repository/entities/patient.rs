use getset::{CopyGetters, Getters, Setters};
use serde::Serialize;
use strum::IntoEnumIterator;

use crate::{
    Error, Result,
    repository::entities::{EditableField, FieldValue, PatientId, SupportFlag, TextField},
};

/// Name given to a record created without one.
pub const DEFAULT_NAME: &str = "Neuer Patient";

/// One entry of the roster.
///
/// Field declaration order is the order written to the roster file: identification first, then
/// clinical notes, then support measures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters, CopyGetters, Setters)]
pub struct Patient {
    #[getset(get = "pub")]
    id: PatientId,
    #[getset(get = "pub")]
    name: String,
    #[getset(get = "pub")]
    bettplatz: String,

    diagnosen: String,
    nebendiagnosen: String,
    operationen: String,
    weitere_operationen: String,
    kardiale_funktion: String,
    antiinfektiva: String,
    diagnostik: String,
    verlauf: String,
    probleme_aufgaben: String,
    uebergabe: String,

    invasive_beatmung: bool,
    niv: bool,
    hfnc: bool,
    crrt: bool,
    ecmo: bool,
    impella: bool,
    vasopressoren: bool,
    inotropika: bool,
    ihd: bool,
    sedierung: bool,

    /// Archived patients stay in the roster but are left out of the active list.
    #[getset(get_copy = "pub", set = "pub")]
    hidden: bool,
}

impl Patient {
    /// Create a blank record with a fresh id.
    pub fn new(name: &str) -> Self {
        Self::with_id(PatientId::generate(), name)
    }

    pub(crate) fn with_id(id: PatientId, name: &str) -> Self {
        Self {
            id,
            name: name.to_owned(),
            bettplatz: String::new(),
            diagnosen: String::new(),
            nebendiagnosen: String::new(),
            operationen: String::new(),
            weitere_operationen: String::new(),
            kardiale_funktion: String::new(),
            antiinfektiva: String::new(),
            diagnostik: String::new(),
            verlauf: String::new(),
            probleme_aufgaben: String::new(),
            uebergabe: String::new(),
            invasive_beatmung: false,
            niv: false,
            hfnc: false,
            crrt: false,
            ecmo: false,
            impella: false,
            vasopressoren: false,
            inotropika: false,
            ihd: false,
            sedierung: false,
            hidden: false,
        }
    }

    pub fn text(&self, field: TextField) -> &str {
        self.text_slot(field)
    }

    pub fn set_text(&mut self, field: TextField, value: impl Into<String>) -> &mut Self {
        *self.text_slot_mut(field) = value.into();
        self
    }

    pub fn flag(&self, flag: SupportFlag) -> bool {
        *self.flag_slot(flag)
    }

    pub fn set_flag(&mut self, flag: SupportFlag, value: bool) -> &mut Self {
        *self.flag_slot_mut(flag) = value;
        self
    }

    /// Support measures currently set, in declaration order.
    pub fn active_flags(&self) -> impl Iterator<Item = SupportFlag> + '_ {
        SupportFlag::iter().filter(|f| self.flag(*f))
    }

    pub fn get(&self, field: EditableField) -> FieldValue {
        match field {
            EditableField::Text(f) => FieldValue::Text(self.text(f).to_owned()),
            EditableField::Flag(f) => FieldValue::Flag(self.flag(f)),
        }
    }

    /// Write `value` into `field`. The value kind must match the field kind.
    pub fn set(&mut self, field: EditableField, value: FieldValue) -> Result<()> {
        match (field, value) {
            (EditableField::Text(f), FieldValue::Text(v)) => {
                self.set_text(f, v);
            }
            (EditableField::Flag(f), FieldValue::Flag(v)) => {
                self.set_flag(f, v);
            }
            (EditableField::Text(_), FieldValue::Flag(_)) => {
                return Err(Error::FieldType {
                    field,
                    expected: "text",
                });
            }
            (EditableField::Flag(_), FieldValue::Text(_)) => {
                return Err(Error::FieldType {
                    field,
                    expected: "a boolean",
                });
            }
        }

        Ok(())
    }

    /// Label shown in patient lists.
    pub fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.bettplatz)
    }

    fn text_slot(&self, field: TextField) -> &String {
        use TextField::*;

        match field {
            Name => &self.name,
            Bettplatz => &self.bettplatz,
            Diagnosen => &self.diagnosen,
            Nebendiagnosen => &self.nebendiagnosen,
            Operationen => &self.operationen,
            WeitereOperationen => &self.weitere_operationen,
            KardialeFunktion => &self.kardiale_funktion,
            Antiinfektiva => &self.antiinfektiva,
            Diagnostik => &self.diagnostik,
            Verlauf => &self.verlauf,
            ProblemeAufgaben => &self.probleme_aufgaben,
            Uebergabe => &self.uebergabe,
        }
    }

    fn text_slot_mut(&mut self, field: TextField) -> &mut String {
        use TextField::*;

        match field {
            Name => &mut self.name,
            Bettplatz => &mut self.bettplatz,
            Diagnosen => &mut self.diagnosen,
            Nebendiagnosen => &mut self.nebendiagnosen,
            Operationen => &mut self.operationen,
            WeitereOperationen => &mut self.weitere_operationen,
            KardialeFunktion => &mut self.kardiale_funktion,
            Antiinfektiva => &mut self.antiinfektiva,
            Diagnostik => &mut self.diagnostik,
            Verlauf => &mut self.verlauf,
            ProblemeAufgaben => &mut self.probleme_aufgaben,
            Uebergabe => &mut self.uebergabe,
        }
    }

    fn flag_slot(&self, flag: SupportFlag) -> &bool {
        use SupportFlag::*;

        match flag {
            InvasiveBeatmung => &self.invasive_beatmung,
            Niv => &self.niv,
            Hfnc => &self.hfnc,
            Crrt => &self.crrt,
            Ecmo => &self.ecmo,
            Impella => &self.impella,
            Vasopressoren => &self.vasopressoren,
            Inotropika => &self.inotropika,
            Ihd => &self.ihd,
            Sedierung => &self.sedierung,
        }
    }

    fn flag_slot_mut(&mut self, flag: SupportFlag) -> &mut bool {
        use SupportFlag::*;

        match flag {
            InvasiveBeatmung => &mut self.invasive_beatmung,
            Niv => &mut self.niv,
            Hfnc => &mut self.hfnc,
            Crrt => &mut self.crrt,
            Ecmo => &mut self.ecmo,
            Impella => &mut self.impella,
            Vasopressoren => &mut self.vasopressoren,
            Inotropika => &mut self.inotropika,
            Ihd => &mut self.ihd,
            Sedierung => &mut self.sedierung,
        }
    }
}

impl Default for Patient {
    fn default() -> Self {
        Self::new(DEFAULT_NAME)
    }
}
