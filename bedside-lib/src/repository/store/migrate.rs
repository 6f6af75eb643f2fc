//! Upgrades for records written by older versions of the roster format.

/// Fold a legacy `station` value into `bettplatz`.
///
/// Returns the new `bettplatz`, or `None` when the record needs no change. A station that already
/// appears anywhere in `bettplatz` is treated as merged, so applying this to its own output is a
/// no-op. The containment test is a plain substring match: station `A` counts as contained in
/// bed `A12`.
pub(crate) fn fold_station(station: &str, bettplatz: &str) -> Option<String> {
    if station.is_empty() || bettplatz.contains(station) {
        return None;
    }

    let merged = format!("{station} {bettplatz}");
    if bettplatz.is_empty() {
        Some(merged.trim_end().to_owned())
    } else {
        Some(merged)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_fold() {
        assert_eq!(fold_station("ITS 1", "12").as_deref(), Some("ITS 1 12"));
    }

    #[test]
    fn test_empty_station() {
        assert_eq!(fold_station("", "12"), None);
    }

    #[test]
    fn test_empty_bettplatz() {
        assert_eq!(fold_station("ITS", "").as_deref(), Some("ITS"));
    }

    #[test]
    fn test_already_contained() {
        assert_eq!(fold_station("ITS 1", "ITS 1 12"), None);
        // Substring match, even when the station denotes something else
        assert_eq!(fold_station("A", "A12"), None);
    }

    #[test]
    fn test_idempotent() {
        let once = fold_station("IMC", "4b").unwrap();

        assert_eq!(fold_station("IMC", &once), None);
    }
}
