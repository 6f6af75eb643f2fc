use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::{Error, Result, repository::store::RosterFile};

mod store;

pub mod config;
pub mod entities;
pub mod query;

pub use config::CoreConfig;
pub use entities::{
    DEFAULT_NAME, EditableField, FieldValue, Patient, PatientId, QuickAddTarget, SupportFlag,
    TextField,
};
pub use store::{StorageError, parse_flag};

/// Central access point for the roster.
///
/// The [`Repository`] is the sole owner of the patient list and of the file backing it. The list
/// keeps insertion order; display order is derived with [`Repository::sorted`]. Every mutation is
/// written through to disk before returning.
#[derive(Debug)]
pub struct Repository {
    file: RosterFile,
    patients: Vec<Patient>,
}

impl Repository {
    /// Open the roster at `path`, creating an empty one if the file doesn't exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let mut repo = Self {
            file: RosterFile::new(path.into()),
            patients: Vec::new(),
        };

        repo.load()?;

        Ok(repo)
    }

    pub fn from_config(cfg: &CoreConfig) -> Result<Self> {
        Self::open(cfg.roster_file().clone())
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Replace the in-memory roster with the file contents. Records stored without an id get
    /// one, and the file is rewritten right away so the id survives the next load.
    pub fn load(&mut self) -> Result<()> {
        match self.file.read()? {
            Some(decoded) => {
                self.patients = decoded.patients;
                if decoded.assigned_ids > 0 {
                    info!(
                        "Assigned ids to {} patients in {}",
                        decoded.assigned_ids,
                        self.path().display()
                    );
                    self.save()?;
                }
            }
            None => {
                debug!("No roster at {}, creating one", self.path().display());
                self.patients.clear();
                self.save()?;
            }
        }

        Ok(())
    }

    /// Rewrite the backing file with the full roster.
    pub fn save(&self) -> Result<()> {
        Ok(self.file.write(&self.patients)?)
    }

    /// All patients, hidden ones included, in insertion order.
    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    pub fn add(&mut self, patient: Patient) -> Result<PatientId> {
        if self.get(patient.id()).is_some() {
            return Err(Error::DuplicateId(patient.id().clone()));
        }

        let id = patient.id().clone();
        debug!("Adding patient {id}");
        self.patients.push(patient);
        self.save()?;

        Ok(id)
    }

    pub fn get(&self, id: &PatientId) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id() == id)
    }

    /// Look a patient up by full id or by an unambiguous id prefix.
    pub fn resolve(&self, id_or_prefix: &str) -> Result<&Patient> {
        if let Some(patient) = self.get(&PatientId::from(id_or_prefix)) {
            return Ok(patient);
        }

        let mut candidates = self
            .patients
            .iter()
            .filter(|p| !id_or_prefix.is_empty() && p.id().as_str().starts_with(id_or_prefix));

        match (candidates.next(), candidates.next()) {
            (Some(patient), None) => Ok(patient),
            (Some(_), Some(_)) => Err(Error::AmbiguousId(id_or_prefix.to_owned())),
            _ => Err(Error::NotFound(id_or_prefix.to_owned())),
        }
    }

    /// Replace the stored patient carrying the same id. Returns `false` if there is none, in
    /// which case nothing is written.
    pub fn update(&mut self, patient: Patient) -> Result<bool> {
        let Some(slot) = self.patients.iter_mut().find(|p| p.id() == patient.id()) else {
            return Ok(false);
        };

        *slot = patient;
        self.save()?;

        Ok(true)
    }

    /// Patients that aren't hidden, in insertion order.
    pub fn active(&self) -> Vec<&Patient> {
        self.patients.iter().filter(|p| !p.hidden()).collect()
    }

    /// Patients whose name contains `query`, ignoring case. Hidden patients are included.
    pub fn search(&self, query: &str) -> Vec<&Patient> {
        self.patients
            .iter()
            .filter(|p| query::matches(p, query))
            .collect()
    }

    /// Order patients by bed, see [`query::natural_cmp`].
    pub fn sorted<'a, I>(patients: I) -> Vec<&'a Patient>
    where
        I: IntoIterator<Item = &'a Patient>,
    {
        query::sorted(patients)
    }

    /// Set a single field and persist the patient.
    pub fn edit(&mut self, id: &PatientId, field: EditableField, value: FieldValue) -> Result<()> {
        let mut patient = self.cloned(id)?;
        patient.set(field, value)?;
        self.update(patient)?;

        Ok(())
    }

    /// Flip the archive flag and return its new value.
    pub fn toggle_hidden(&mut self, id: &PatientId) -> Result<bool> {
        let mut patient = self.cloned(id)?;
        let hidden = !patient.hidden();
        patient.set_hidden(hidden);
        self.update(patient)?;

        Ok(hidden)
    }

    /// Append a dated line to one of the running note fields. Empty text changes nothing.
    pub fn quick_add(
        &mut self,
        id: &PatientId,
        target: QuickAddTarget,
        text: &str,
        date: NaiveDate,
    ) -> Result<()> {
        let mut patient = self.cloned(id)?;
        if text.is_empty() {
            return Ok(());
        }

        let field = TextField::from(target);
        let note = append_note(patient.text(field), date, text);
        patient.set_text(field, note);
        self.update(patient)?;

        Ok(())
    }

    fn cloned(&self, id: &PatientId) -> Result<Patient> {
        self.get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    #[cfg(test)]
    /// Return a [`Repository`] backed by a file in a fresh temporary directory. The directory is
    /// removed when the returned guard is dropped.
    pub(crate) fn mock() -> (tempfile::TempDir, Self) {
        let tmp = tempfile::tempdir().unwrap();
        let repo = Self::open(tmp.path().join("patients.yaml")).unwrap();

        (tmp, repo)
    }
}

/// Prefix put in front of quick notes, e.g. `[07.03.]`.
pub fn note_prefix(date: NaiveDate) -> String {
    date.format("[%d.%m.]").to_string()
}

fn append_note(current: &str, date: NaiveDate, text: &str) -> String {
    format!("{current}\n{} {text}", note_prefix(date))
        .trim()
        .to_owned()
}

#[cfg(test)]
mod test {
    use std::fs;

    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 7).unwrap()
    }

    #[test]
    fn test_open_creates_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("patients.yaml");

        let repo = Repository::open(&path).unwrap();

        assert!(repo.patients().is_empty());
        assert!(path.exists());
    }

    #[test]
    fn test_open_malformed_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("patients.yaml");
        fs::write(&path, "{ this is: [not, a roster").unwrap();

        assert!(matches!(
            Repository::open(&path),
            Err(Error::Storage(StorageError::Parse { .. }))
        ));
    }

    #[test]
    fn test_add() {
        let (tmp, mut repo) = Repository::mock();

        let mut patient = Patient::new("Test Patient");
        patient.set_text(TextField::Bettplatz, "A1");
        let id = repo.add(patient).unwrap();

        let reopened = Repository::open(tmp.path().join("patients.yaml")).unwrap();
        assert_eq!(reopened.patients().len(), 1);
        assert_eq!(reopened.get(&id).unwrap().name(), "Test Patient");
        assert_eq!(reopened.get(&id).unwrap().bettplatz(), "A1");
    }

    #[test]
    fn test_add_duplicate_id() {
        let (_tmp, mut repo) = Repository::mock();

        let patient = Patient::new("Test");
        repo.add(patient.clone()).unwrap();

        assert!(matches!(repo.add(patient), Err(Error::DuplicateId(_))));
        assert_eq!(repo.patients().len(), 1);
    }

    #[test]
    fn test_update() {
        let (tmp, mut repo) = Repository::mock();

        let id = repo.add(Patient::new("Old Name")).unwrap();
        let mut patient = repo.get(&id).unwrap().clone();
        patient.set_text(TextField::Name, "New Name");

        assert!(repo.update(patient).unwrap());

        let reopened = Repository::open(tmp.path().join("patients.yaml")).unwrap();
        assert_eq!(reopened.get(&id).unwrap().name(), "New Name");
    }

    #[test]
    fn test_update_unknown() {
        let (_tmp, mut repo) = Repository::mock();
        repo.add(Patient::new("Known")).unwrap();

        assert!(!repo.update(Patient::new("Stranger")).unwrap());
        assert_eq!(repo.patients().len(), 1);
    }

    #[test]
    fn test_round_trip_preserves_order_and_fields() {
        let (tmp, mut repo) = Repository::mock();

        for (name, bed) in [("C", "3"), ("A", "1"), ("B", "2")] {
            let mut patient = Patient::new(name);
            patient
                .set_text(TextField::Bettplatz, bed)
                .set_text(TextField::Uebergabe, "Übergabe: Ä → Ö")
                .set_flag(SupportFlag::Impella, true);
            repo.add(patient).unwrap();
        }

        let reopened = Repository::open(tmp.path().join("patients.yaml")).unwrap();

        assert_eq!(reopened.patients(), repo.patients());
    }

    #[test]
    fn test_active() {
        let (_tmp, mut repo) = Repository::mock();

        let id = repo.add(Patient::new("Hidden")).unwrap();
        repo.add(Patient::new("Visible")).unwrap();
        assert_eq!(repo.active().len(), 2);

        assert!(repo.toggle_hidden(&id).unwrap());

        let active = repo.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active.first().unwrap().name(), "Visible");
        assert_eq!(repo.patients().len(), 2);
    }

    #[test]
    fn test_search() {
        let (_tmp, mut repo) = Repository::mock();

        repo.add(Patient::new("Alpha")).unwrap();
        repo.add(Patient::new("Beta")).unwrap();

        let results = repo.search("alpha");
        assert_eq!(results.len(), 1);
        assert_eq!(results.first().unwrap().name(), "Alpha");
    }

    #[test]
    fn test_search_includes_hidden() {
        let (_tmp, mut repo) = Repository::mock();

        let id = repo.add(Patient::new("Alpha")).unwrap();
        repo.toggle_hidden(&id).unwrap();

        assert_eq!(repo.search("alp").len(), 1);
    }

    #[test]
    fn test_medical_fields() {
        let (tmp, mut repo) = Repository::mock();

        let mut patient = Patient::new("ICU Patient");
        for flag in [
            SupportFlag::InvasiveBeatmung,
            SupportFlag::Ecmo,
            SupportFlag::Vasopressoren,
            SupportFlag::Inotropika,
            SupportFlag::Ihd,
            SupportFlag::Sedierung,
        ] {
            patient.set_flag(flag, true);
        }
        let id = repo.add(patient).unwrap();

        let reopened = Repository::open(tmp.path().join("patients.yaml")).unwrap();
        let loaded = reopened.get(&id).unwrap();
        assert!(loaded.flag(SupportFlag::InvasiveBeatmung));
        assert!(loaded.flag(SupportFlag::Ecmo));
        assert!(loaded.flag(SupportFlag::Sedierung));
        assert!(!loaded.flag(SupportFlag::Niv));
        assert!(!loaded.flag(SupportFlag::Hfnc));
        assert!(!loaded.flag(SupportFlag::Crrt));
        assert!(!loaded.flag(SupportFlag::Impella));
    }

    #[test]
    fn test_backward_compatibility() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("patients.yaml");
        fs::write(
            &path,
            "- id: old-id-1\n  name: Altpatient\n  station: ITS 1\n  bettplatz: '12'\n  diagnosen: Pneumonie\n  hidden: false\n",
        )
        .unwrap();

        let mut repo = Repository::open(&path).unwrap();
        let id = PatientId::from("old-id-1");
        assert_eq!(repo.get(&id).unwrap().bettplatz(), "ITS 1 12");

        // The next write drops the legacy attribute for good
        repo.toggle_hidden(&id).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("station"));

        let reopened = Repository::open(&path).unwrap();
        assert_eq!(reopened.get(&id).unwrap().bettplatz(), "ITS 1 12");
    }

    #[test]
    fn test_assigned_ids_are_stable() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("patients.yaml");
        fs::write(
            &path,
            "- name: Ohne Id\n  bettplatz: '2'\n- name: Leer\n  id: ''\n",
        )
        .unwrap();

        let first = Repository::open(&path).unwrap();
        let second = Repository::open(&path).unwrap();

        assert_eq!(first.patients(), second.patients());
        for patient in first.patients() {
            assert!(!patient.id().as_str().is_empty());
            assert_eq!(
                second.resolve(patient.id().short()).unwrap().name(),
                patient.name()
            );
        }
    }

    #[test]
    fn test_load_keeps_file_when_ids_present() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("patients.yaml");
        let contents = "- id: fixed\n  name: A\n  station: ITS\n";
        fs::write(&path, contents).unwrap();

        Repository::open(&path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), contents);
    }

    #[test]
    fn test_resolve() {
        let (_tmp, mut repo) = Repository::mock();

        let first = repo.add(Patient::with_id("abc-1".into(), "A")).unwrap();
        repo.add(Patient::with_id("abc-2".into(), "B")).unwrap();
        repo.add(Patient::with_id("xyz".into(), "C")).unwrap();

        assert_eq!(repo.resolve("abc-1").unwrap().id(), &first);
        assert_eq!(repo.resolve("xy").unwrap().name(), "C");
        assert!(matches!(repo.resolve("abc"), Err(Error::AmbiguousId(_))));
        assert!(matches!(repo.resolve("nope"), Err(Error::NotFound(_))));
        assert!(matches!(repo.resolve(""), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_edit() {
        let (_tmp, mut repo) = Repository::mock();
        let id = repo.add(Patient::new("Test")).unwrap();

        repo.edit(
            &id,
            EditableField::Flag(SupportFlag::Hfnc),
            FieldValue::Flag(true),
        )
        .unwrap();

        assert!(repo.get(&id).unwrap().flag(SupportFlag::Hfnc));
        assert!(matches!(
            repo.edit(
                &PatientId::from("missing"),
                EditableField::Text(TextField::Name),
                FieldValue::Text("x".into())
            ),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_quick_add() {
        let (_tmp, mut repo) = Repository::mock();
        let id = repo.add(Patient::new("Test")).unwrap();

        repo.quick_add(&id, QuickAddTarget::Verlauf, "extubiert", date())
            .unwrap();
        repo.quick_add(&id, QuickAddTarget::Verlauf, "mobilisiert", date())
            .unwrap();

        assert_eq!(
            repo.get(&id).unwrap().text(TextField::Verlauf),
            "[07.03.] extubiert\n[07.03.] mobilisiert"
        );
    }

    #[test]
    fn test_quick_add_empty_is_noop() {
        let (_tmp, mut repo) = Repository::mock();
        let id = repo.add(Patient::new("Test")).unwrap();

        repo.quick_add(&id, QuickAddTarget::Diagnostik, "", date())
            .unwrap();

        assert_eq!(repo.get(&id).unwrap().text(TextField::Diagnostik), "");
    }
}
