#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! School level taxonomy and student fact-row types.
//!
//! This crate defines the closed set of school levels and the two fact
//! shapes the whole edustats system is built on: the pre-aggregated
//! [`StudentStatistics`] row and the per-school [`StudentDataRaw`] row.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The reporting year used when a request does not name one.
pub const DEFAULT_REPORTING_YEAR: i32 = 2025;

/// School level category.
///
/// The stored and wire representation is the Korean name. Parsing is
/// exact-match: anything outside the three known names is rejected.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum SchoolLevel {
    /// 초등학교
    #[serde(rename = "초등학교")]
    #[strum(serialize = "초등학교")]
    Elementary,
    /// 중학교
    #[serde(rename = "중학교")]
    #[strum(serialize = "중학교")]
    Middle,
    /// 고등학교
    #[serde(rename = "고등학교")]
    #[strum(serialize = "고등학교")]
    High,
}

impl SchoolLevel {
    /// Returns all school levels in ascending order of age group.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Elementary, Self::Middle, Self::High]
    }

    /// Parses a school level name, returning a descriptive error for
    /// unknown names.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidSchoolLevelError`] if `name` is not one of the three
    /// known Korean school level names.
    pub fn from_name(name: &str) -> Result<Self, InvalidSchoolLevelError> {
        name.parse().map_err(|_| InvalidSchoolLevelError {
            name: name.to_string(),
        })
    }
}

/// Error returned when a string does not name a known [`SchoolLevel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSchoolLevelError {
    /// The rejected input.
    pub name: String,
}

impl std::fmt::Display for InvalidSchoolLevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid school level '{}': expected one of 초등학교, 중학교, 고등학교",
            self.name
        )
    }
}

impl std::error::Error for InvalidSchoolLevelError {}

/// A pre-aggregated statistics row.
///
/// One row exists per `(year, sido, sigungu, school_level)`. Rows are
/// produced by a batch rebuild and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentStatistics {
    /// Survey year.
    pub year: i32,
    /// Province (si-do) short name, e.g. `서울`.
    pub sido: String,
    /// Sub-region (si-gun-gu) name.
    pub sigungu: Option<String>,
    /// School level.
    pub school_level: SchoolLevel,
    /// Total enrolled students.
    pub total_students: i64,
    /// Male students.
    pub male_students: i64,
    /// Female students.
    pub female_students: i64,
    /// Total number of classes.
    pub total_classes: i64,
    /// Number of distinct schools.
    pub school_count: i64,
}

/// A school-level fact row, one per school, year, grade and class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDataRaw {
    /// Survey year.
    pub year: i32,
    /// Province (si-do) short name.
    pub sido: String,
    /// Sub-region (si-gun-gu) name.
    pub sigungu: Option<String>,
    /// Supervising education office.
    pub edu_office: Option<String>,
    /// School name.
    pub school_name: String,
    /// School level.
    pub school_level: SchoolLevel,
    /// High school type (general, specialized, ...), high schools only.
    pub high_school_type: Option<String>,
    /// Establishment type (public, private, ...).
    pub establishment: Option<String>,
    /// Region size classification.
    pub region_size: Option<String>,
    /// Grade number.
    pub grade: i32,
    /// Class name within the grade.
    pub class_name: Option<String>,
    /// Number of classes.
    pub class_count: i64,
    /// Total students.
    pub students_total: i64,
    /// Male students.
    pub students_male: i64,
    /// Female students.
    pub students_female: i64,
}
