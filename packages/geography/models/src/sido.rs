//! Korean province (si-do) name and centroid table.
//!
//! Maps between the short names stored in the statistics tables and the
//! official names used by map boundary data, for the 17 first-level
//! administrative divisions.

use std::collections::BTreeMap;

use crate::{LngLat, SidoInfo};

/// `(stored name, display name, lng, lat)` for every province.
pub const SIDO_ENTRIES: &[(&str, &str, f64, f64)] = &[
    ("서울", "서울특별시", 126.9780, 37.5665),
    ("부산", "부산광역시", 129.0756, 35.1796),
    ("대구", "대구광역시", 128.6014, 35.8714),
    ("인천", "인천광역시", 126.7052, 37.4563),
    ("광주", "광주광역시", 126.8526, 35.1595),
    ("대전", "대전광역시", 127.3845, 36.3504),
    ("울산", "울산광역시", 129.3114, 35.5384),
    ("세종", "세종특별자치시", 127.2894, 36.4800),
    ("경기", "경기도", 127.0093, 37.2636),
    ("강원", "강원도", 128.3115, 37.8603),
    ("충북", "충청북도", 127.7000, 36.6357),
    ("충남", "충청남도", 126.8000, 36.5184),
    ("전북", "전라북도", 127.1530, 35.7175),
    ("전남", "전라남도", 126.9910, 34.8679),
    ("경북", "경상북도", 128.8889, 36.4919),
    ("경남", "경상남도", 128.6922, 35.4606),
    ("제주", "제주특별자치도", 126.5312, 33.4996),
];

/// Errors detected while building a [`SidoTable`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SidoTableError {
    /// A stored name appears more than once.
    #[error("duplicate stored province name: {0}")]
    DuplicateStoredName(String),

    /// A display name appears more than once.
    #[error("duplicate display province name: {0}")]
    DuplicateDisplayName(String),

    /// An entry has a blank name.
    #[error("blank province name in entry {index}")]
    BlankName {
        /// Position of the offending entry.
        index: usize,
    },
}

/// Bidirectional province name lookup.
///
/// Every display name maps to exactly one stored name and vice versa.
/// Unknown names are never passed through: lookups return `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct SidoTable {
    entries: Vec<SidoInfo>,
    by_stored: BTreeMap<String, usize>,
    by_display: BTreeMap<String, usize>,
}

impl SidoTable {
    /// Builds and validates a table from `(stored, display, lng, lat)` rows.
    ///
    /// # Errors
    ///
    /// Returns [`SidoTableError`] if a name is blank or either side of the
    /// mapping is not unique.
    pub fn from_entries(entries: &[(&str, &str, f64, f64)]) -> Result<Self, SidoTableError> {
        let mut table = Self {
            entries: Vec::with_capacity(entries.len()),
            by_stored: BTreeMap::new(),
            by_display: BTreeMap::new(),
        };

        for (index, &(stored, display, lng, lat)) in entries.iter().enumerate() {
            let stored = stored.trim();
            let display = display.trim();
            if stored.is_empty() || display.is_empty() {
                return Err(SidoTableError::BlankName { index });
            }
            if table.by_stored.insert(stored.to_string(), index).is_some() {
                return Err(SidoTableError::DuplicateStoredName(stored.to_string()));
            }
            if table.by_display.insert(display.to_string(), index).is_some() {
                return Err(SidoTableError::DuplicateDisplayName(display.to_string()));
            }
            table.entries.push(SidoInfo {
                stored_name: stored.to_string(),
                display_name: display.to_string(),
                centroid: LngLat::new(lng, lat),
            });
        }

        Ok(table)
    }

    /// Builds the table of the 17 Korean provinces.
    ///
    /// # Errors
    ///
    /// Returns [`SidoTableError`] if [`SIDO_ENTRIES`] fails validation.
    pub fn standard() -> Result<Self, SidoTableError> {
        Self::from_entries(SIDO_ENTRIES)
    }

    /// Looks up a province by its stored short name.
    #[must_use]
    pub fn by_stored_name(&self, stored: &str) -> Option<&SidoInfo> {
        self.by_stored.get(stored).map(|&i| &self.entries[i])
    }

    /// Looks up a province by its official display name.
    #[must_use]
    pub fn by_display_name(&self, display: &str) -> Option<&SidoInfo> {
        self.by_display.get(display).map(|&i| &self.entries[i])
    }

    /// Converts a display name into the stored short name.
    #[must_use]
    pub fn to_stored(&self, display: &str) -> Option<&str> {
        self.by_display_name(display)
            .map(|info| info.stored_name.as_str())
    }

    /// Converts a stored short name into the display name.
    #[must_use]
    pub fn to_display(&self, stored: &str) -> Option<&str> {
        self.by_stored_name(stored)
            .map(|info| info.display_name.as_str())
    }

    /// All entries in table order.
    #[must_use]
    pub fn entries(&self) -> &[SidoInfo] {
        &self.entries
    }

    /// Number of provinces in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_count() {
        let table = SidoTable::standard().unwrap();
        assert_eq!(table.len(), 17);
    }

    #[test]
    fn names_map_both_ways() {
        let table = SidoTable::standard().unwrap();
        for info in table.entries() {
            assert_eq!(table.to_display(&info.stored_name), Some(info.display_name.as_str()));
            assert_eq!(table.to_stored(&info.display_name), Some(info.stored_name.as_str()));
        }
    }

    #[test]
    fn unknown_names_are_not_passed_through() {
        let table = SidoTable::standard().unwrap();
        assert_eq!(table.to_stored("서울"), None);
        assert_eq!(table.to_display("서울특별시"), None);
        assert_eq!(table.to_display("평양"), None);
    }

    #[test]
    fn rejects_duplicate_stored_name() {
        let err = SidoTable::from_entries(&[
            ("서울", "서울특별시", 0.0, 0.0),
            ("서울", "서울시", 0.0, 0.0),
        ])
        .unwrap_err();
        assert_eq!(err, SidoTableError::DuplicateStoredName("서울".to_string()));
    }

    #[test]
    fn rejects_duplicate_display_name() {
        let err = SidoTable::from_entries(&[
            ("서울", "서울특별시", 0.0, 0.0),
            ("서울2", "서울특별시", 0.0, 0.0),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            SidoTableError::DuplicateDisplayName("서울특별시".to_string())
        );
    }

    #[test]
    fn rejects_blank_name() {
        let err = SidoTable::from_entries(&[("  ", "서울특별시", 0.0, 0.0)]).unwrap_err();
        assert_eq!(err, SidoTableError::BlankName { index: 0 });
    }

    #[test]
    fn centroid_lookup() {
        let table = SidoTable::standard().unwrap();
        let jeju = table.by_stored_name("제주").unwrap();
        assert!((jeju.centroid.lat - 33.4996).abs() < f64::EPSILON);
    }
}
