//! The dashboard's filter selection.
//!
//! Dropdowns and map clicks mutate the same [`FilterState`], so the map
//! highlight and the query filter cannot drift apart. Changing the
//! province always clears the sub-region in the same step.

use std::collections::BTreeMap;

use edustats_database_models::StatisticsFilter;
use edustats_school_models::{DEFAULT_REPORTING_YEAR, SchoolLevel};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected filter mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// A sub-region was chosen while no province is selected.
    #[error("Cannot select sub-region '{sigungu}' without a province")]
    NoSido {
        /// The rejected sub-region.
        sigungu: String,
    },

    /// The sub-region does not belong to the selected province.
    #[error("'{sigungu}' is not a sub-region of '{sido}'")]
    UnknownSigungu {
        /// The selected province.
        sido: String,
        /// The rejected sub-region.
        sigungu: String,
    },
}

/// Known sub-regions per province, as served by the region tree endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionCatalog {
    tree: BTreeMap<String, Vec<String>>,
}

impl RegionCatalog {
    /// Wraps a province -> sub-region list map.
    #[must_use]
    pub const fn new(tree: BTreeMap<String, Vec<String>>) -> Self {
        Self { tree }
    }

    /// Sub-regions of `sido`, empty if the province is unknown.
    #[must_use]
    pub fn sigungus(&self, sido: &str) -> &[String] {
        self.tree.get(sido).map(Vec::as_slice).unwrap_or_default()
    }

    /// Whether `sigungu` is listed under `sido`.
    #[must_use]
    pub fn contains(&self, sido: &str, sigungu: &str) -> bool {
        self.sigungus(sido).iter().any(|s| s == sigungu)
    }

    /// Provinces in the catalog, ascending.
    pub fn sidos(&self) -> impl Iterator<Item = &str> {
        self.tree.keys().map(String::as_str)
    }
}

impl From<BTreeMap<String, Vec<String>>> for RegionCatalog {
    fn from(tree: BTreeMap<String, Vec<String>>) -> Self {
        Self::new(tree)
    }
}

/// The current filter selection.
///
/// Deserialized selections are checked so a sub-region never appears
/// without its province.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "FilterSnapshot")]
pub struct FilterState {
    year: i32,
    sido: Option<String>,
    sigungu: Option<String>,
    school_level: Option<SchoolLevel>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FilterSnapshot {
    year: i32,
    sido: Option<String>,
    sigungu: Option<String>,
    school_level: Option<SchoolLevel>,
}

impl TryFrom<FilterSnapshot> for FilterState {
    type Error = StateError;

    fn try_from(snapshot: FilterSnapshot) -> Result<Self, Self::Error> {
        if let (None, Some(sigungu)) = (&snapshot.sido, snapshot.sigungu.clone()) {
            return Err(StateError::NoSido { sigungu });
        }

        Ok(Self {
            year: snapshot.year,
            sido: snapshot.sido,
            sigungu: snapshot.sigungu,
            school_level: snapshot.school_level,
        })
    }
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            year: DEFAULT_REPORTING_YEAR,
            sido: None,
            sigungu: None,
            school_level: None,
        }
    }
}

impl FilterState {
    /// Selected year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Selected province.
    #[must_use]
    pub fn sido(&self) -> Option<&str> {
        self.sido.as_deref()
    }

    /// Selected sub-region.
    #[must_use]
    pub fn sigungu(&self) -> Option<&str> {
        self.sigungu.as_deref()
    }

    /// Selected school level.
    #[must_use]
    pub const fn school_level(&self) -> Option<SchoolLevel> {
        self.school_level
    }

    /// Sets the year. Returns whether the state changed.
    pub fn set_year(&mut self, year: i32) -> bool {
        if self.year == year {
            return false;
        }
        self.year = year;
        true
    }

    /// Sets or clears the school level. Returns whether the state changed.
    pub fn set_school_level(&mut self, level: Option<SchoolLevel>) -> bool {
        if self.school_level == level {
            return false;
        }
        self.school_level = level;
        true
    }

    /// Sets or clears the province and clears the sub-region. Returns
    /// whether the state changed.
    pub fn set_sido(&mut self, sido: Option<String>) -> bool {
        let changed = self.sido != sido || self.sigungu.is_some();
        if changed {
            log::trace!("sido -> {sido:?}");
        }
        self.sido = sido;
        self.sigungu = None;
        changed
    }

    /// Map click on a province, or on empty space to deselect.
    pub fn select_region_on_map(&mut self, sido: Option<String>) -> bool {
        self.set_sido(sido)
    }

    /// Sets or clears the sub-region. Returns whether the state changed.
    ///
    /// # Errors
    ///
    /// * [`StateError::NoSido`] if no province is selected
    /// * [`StateError::UnknownSigungu`] if `catalog` does not list the
    ///   sub-region under the selected province
    pub fn set_sigungu(
        &mut self,
        catalog: &RegionCatalog,
        sigungu: Option<String>,
    ) -> Result<bool, StateError> {
        if let Some(name) = &sigungu {
            let Some(sido) = &self.sido else {
                return Err(StateError::NoSido {
                    sigungu: name.clone(),
                });
            };
            if !catalog.contains(sido, name) {
                return Err(StateError::UnknownSigungu {
                    sido: sido.clone(),
                    sigungu: name.clone(),
                });
            }
        }

        if self.sigungu == sigungu {
            return Ok(false);
        }
        self.sigungu = sigungu;
        Ok(true)
    }

    /// Restores the default selection. Returns whether the state changed.
    pub fn reset(&mut self) -> bool {
        let default = Self::default();
        if *self == default {
            return false;
        }
        *self = default;
        true
    }

    /// The query filter for the current selection.
    #[must_use]
    pub fn to_filter(&self) -> StatisticsFilter {
        StatisticsFilter {
            year: Some(self.year),
            sido: self.sido.clone(),
            sigungu: self.sigungu.clone(),
            school_level: self.school_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> RegionCatalog {
        let mut tree = BTreeMap::new();
        tree.insert(
            "서울".to_string(),
            vec!["강남구".to_string(), "종로구".to_string()],
        );
        tree.insert("부산".to_string(), vec!["해운대구".to_string()]);
        RegionCatalog::from(tree)
    }

    #[test]
    fn defaults_to_reporting_year() {
        let state = FilterState::default();
        assert_eq!(state.year(), 2025);
        assert!(state.sido().is_none());
        assert!(state.sigungu().is_none());
        assert!(state.school_level().is_none());
    }

    #[test]
    fn changing_sido_clears_sigungu() {
        let catalog = catalog();
        let mut state = FilterState::default();
        assert!(state.set_sido(Some("서울".to_string())));
        assert!(state.set_sigungu(&catalog, Some("강남구".to_string())).unwrap());

        assert!(state.set_sido(Some("부산".to_string())));
        assert_eq!(state.sido(), Some("부산"));
        assert!(state.sigungu().is_none());
    }

    #[test]
    fn reselecting_same_sido_still_clears_sigungu() {
        let catalog = catalog();
        let mut state = FilterState::default();
        state.set_sido(Some("서울".to_string()));
        state.set_sigungu(&catalog, Some("종로구".to_string())).unwrap();

        assert!(state.select_region_on_map(Some("서울".to_string())));
        assert!(state.sigungu().is_none());
        assert!(!state.select_region_on_map(Some("서울".to_string())));
    }

    #[test]
    fn sigungu_requires_sido() {
        let mut state = FilterState::default();
        let err = state
            .set_sigungu(&catalog(), Some("강남구".to_string()))
            .unwrap_err();
        assert_eq!(
            err,
            StateError::NoSido {
                sigungu: "강남구".to_string()
            }
        );
        assert!(state.sigungu().is_none());
    }

    #[test]
    fn sigungu_must_belong_to_sido() {
        let mut state = FilterState::default();
        state.set_sido(Some("부산".to_string()));
        let err = state
            .set_sigungu(&catalog(), Some("강남구".to_string()))
            .unwrap_err();
        assert!(matches!(err, StateError::UnknownSigungu { .. }));
        assert!(state.set_sigungu(&catalog(), None).is_ok());
    }

    #[test]
    fn mutations_report_changes() {
        let mut state = FilterState::default();
        assert!(!state.set_year(2025));
        assert!(state.set_year(2024));
        assert!(state.set_school_level(Some(SchoolLevel::Middle)));
        assert!(!state.set_school_level(Some(SchoolLevel::Middle)));
        assert!(!state.set_sido(None));
    }

    #[test]
    fn reset_restores_defaults() {
        let mut state = FilterState::default();
        state.set_year(2023);
        state.set_sido(Some("서울".to_string()));
        state.set_school_level(Some(SchoolLevel::High));

        assert!(state.reset());
        assert_eq!(state, FilterState::default());
        assert!(!state.reset());
    }

    #[test]
    fn filter_mirrors_selection() {
        let mut state = FilterState::default();
        state.set_sido(Some("서울".to_string()));
        state.set_school_level(Some(SchoolLevel::Elementary));

        let filter = state.to_filter();
        assert_eq!(filter.year, Some(2025));
        assert_eq!(filter.sido.as_deref(), Some("서울"));
        assert!(filter.sigungu.is_none());
        assert_eq!(filter.school_level, Some(SchoolLevel::Elementary));
    }

    #[test]
    fn restored_selection_keeps_cascade() {
        let restored: FilterState = serde_json::from_str(
            r#"{"year":2024,"sido":"서울","sigungu":"강남구","schoolLevel":null}"#,
        )
        .unwrap();
        assert_eq!(restored.year(), 2024);
        assert_eq!(restored.sigungu(), Some("강남구"));

        let orphan = serde_json::from_str::<FilterState>(
            r#"{"year":2024,"sido":null,"sigungu":"강남구","schoolLevel":null}"#,
        );
        assert!(orphan.is_err());
    }
}
