//! Pure queries over a roster: search and bed ordering.

use std::cmp::Ordering;

use crate::repository::entities::Patient;

/// Case-insensitive substring match against the patient's name.
pub fn matches(patient: &Patient, query: &str) -> bool {
    patient
        .name()
        .to_lowercase()
        .contains(&query.to_lowercase())
}

/// Order patients by bed using [`natural_cmp`]. Patients on equal beds keep their relative order.
pub fn sorted<'a, I>(patients: I) -> Vec<&'a Patient>
where
    I: IntoIterator<Item = &'a Patient>,
{
    let mut patients: Vec<_> = patients.into_iter().collect();
    patients.sort_by(|a, b| natural_cmp(a.bettplatz(), b.bettplatz()));
    patients
}

/// Compare two labels so that embedded numbers order by value: `"2" < "10"`.
///
/// Both labels are split into alternating runs of non-digits and ASCII digits, always starting
/// with a (possibly empty) non-digit run. Non-digit runs compare case-insensitively, digit runs
/// numerically. When all shared runs are equal, the label with fewer runs sorts first.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let a = Run::split(a);
    let b = Run::split(b);

    for (x, y) in a.iter().zip(&b) {
        let ordering = x.cmp(y);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    a.len().cmp(&b.len())
}

#[derive(Debug, PartialEq, Eq)]
enum Run {
    Text(String),
    /// Digits with leading zeros stripped, so that length then lexical order is numeric order
    /// for arbitrarily long runs.
    Number(String),
}

impl Run {
    fn split(label: &str) -> Vec<Run> {
        let mut runs = Vec::new();
        let mut current = String::new();
        let mut in_digits = false;

        for c in label.chars() {
            if c.is_ascii_digit() != in_digits {
                runs.push(Run::new(std::mem::take(&mut current), in_digits));
                in_digits = !in_digits;
            }
            current.push(c);
        }
        runs.push(Run::new(current, in_digits));

        runs
    }

    fn new(run: String, digits: bool) -> Self {
        if digits {
            Run::Number(run.trim_start_matches('0').to_owned())
        } else {
            Run::Text(run.to_lowercase())
        }
    }
}

impl Ord for Run {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Run::Text(a), Run::Text(b)) => a.cmp(b),
            (Run::Number(a), Run::Number(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            // Runs alternate from the same starting kind, so mixed pairs only occur if that
            // invariant breaks. Numbers first keeps the order total regardless.
            (Run::Number(_), Run::Text(_)) => Ordering::Less,
            (Run::Text(_), Run::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Run {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::repository::entities::TextField;

    fn patient(name: &str, bettplatz: &str) -> Patient {
        let mut patient = Patient::new(name);
        patient.set_text(TextField::Bettplatz, bettplatz);
        patient
    }

    fn beds(patients: &[&Patient]) -> Vec<String> {
        patients.iter().map(|p| p.bettplatz().clone()).collect()
    }

    #[test]
    fn test_numeric_order() {
        let roster = [patient("P1", "2"), patient("P2", "1"), patient("P3", "10")];

        let sorted = sorted(&roster);

        assert_eq!(beds(&sorted), ["1", "2", "10"]);
        assert_eq!(
            sorted.iter().map(|p| p.name().as_str()).collect::<Vec<_>>(),
            ["P2", "P1", "P3"]
        );
    }

    #[test]
    fn test_mixed_labels() {
        let roster = [
            patient("a", "ITS 12"),
            patient("b", "its 2"),
            patient("c", "IMC 1"),
            patient("d", ""),
            patient("e", "ITS 2b"),
        ];

        assert_eq!(
            beds(&sorted(&roster)),
            ["", "IMC 1", "its 2", "ITS 2b", "ITS 12"]
        );
    }

    #[test]
    fn test_stable_for_equal_keys() {
        let roster = [patient("first", "01"), patient("second", "1")];

        let sorted = sorted(&roster);

        assert_eq!(sorted.first().unwrap().name(), "first");
    }

    #[test]
    fn test_long_digit_runs() {
        assert_eq!(
            natural_cmp("99999999999999999999999", "100000000000000000000000"),
            Ordering::Less
        );
    }

    #[test]
    fn test_prefix_sorts_first() {
        assert_eq!(natural_cmp("Bett", "Bett 1"), Ordering::Less);
        assert_eq!(natural_cmp("3", "3a"), Ordering::Less);
    }

    #[test]
    fn test_matches() {
        let alpha = patient("Alpha", "1");

        assert!(matches(&alpha, "alpha"));
        assert!(matches(&alpha, "LPH"));
        assert!(!matches(&alpha, "beta"));
        assert!(matches(&alpha, ""));
    }
}
