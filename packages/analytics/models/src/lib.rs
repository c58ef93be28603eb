#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation query parameter and result types.
//!
//! Each aggregation in `edustats_analytics` takes one of the `*Params`
//! types here and returns the matching result type. Results serialize
//! straight into the `data` field of API responses.

use edustats_database_models::{PageRequest, Pagination, StatisticsFilter};
use edustats_geography_models::LngLat;
use edustats_school_models::SchoolLevel;
use serde::{Deserialize, Serialize};

/// Grand totals for a summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryTotals {
    /// Total students.
    pub students: i64,
    /// Male students.
    pub male_students: i64,
    /// Female students.
    pub female_students: i64,
    /// Total classes.
    pub classes: i64,
    /// Total schools.
    pub schools: i64,
}

/// Students and schools for one school level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolLevelBreakdown {
    /// School level.
    pub school_level: SchoolLevel,
    /// Students at this level.
    pub students: i64,
    /// Schools at this level.
    pub schools: i64,
}

/// Students and schools for one province.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SidoBreakdown {
    /// Province short name.
    pub sido: String,
    /// Students in this province.
    pub students: i64,
    /// Schools in this province.
    pub schools: i64,
}

/// Result of the summary aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResult {
    /// The year summarized.
    pub year: i32,
    /// Grand totals; zero when nothing matches.
    pub total: SummaryTotals,
    /// Breakdown by school level, most students first.
    pub by_school_level: Vec<SchoolLevelBreakdown>,
    /// Breakdown by province, most students first. Empty when the
    /// filter already names a province.
    pub by_sido: Vec<SidoBreakdown>,
    /// Every year with data, most recent first.
    pub years: Vec<i32>,
}

/// Parameters for the yearly trend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendParams {
    /// Province filter.
    pub sido: Option<String>,
    /// Sub-region filter.
    pub sigungu: Option<String>,
    /// School level filter.
    pub school_level: Option<SchoolLevel>,
}

/// One year of a trend series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// Year.
    pub year: i32,
    /// Total students.
    pub total_students: i64,
    /// Male students.
    pub male_students: i64,
    /// Female students.
    pub female_students: i64,
    /// Total classes.
    pub total_classes: i64,
    /// Number of schools.
    pub school_count: i64,
}

/// Parameters for the per-province map aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapParams {
    /// Year.
    pub year: i32,
    /// School level filter.
    pub school_level: Option<SchoolLevel>,
}

/// Aggregate for one province on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapRegion {
    /// Province short name.
    pub sido: String,
    /// Official province name used by boundary data, if known.
    pub display_name: Option<String>,
    /// Total students.
    pub total_students: i64,
    /// Male students.
    pub male_students: i64,
    /// Female students.
    pub female_students: i64,
    /// Number of schools.
    pub school_count: i64,
    /// Province centroid, if known.
    pub coordinates: Option<LngLat>,
}

/// Color-scale bounds over the returned provinces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapMeta {
    /// Largest `total_students`; 0 when there is no data.
    pub max_students: i64,
    /// Smallest `total_students`; 0 when there is no data.
    pub min_students: i64,
    /// Number of provinces returned.
    pub total_regions: usize,
}

/// Result of the map aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapResult {
    /// Year.
    pub year: i32,
    /// School level filter applied, if any.
    pub school_level: Option<SchoolLevel>,
    /// Color-scale bounds.
    pub meta: MapMeta,
    /// Provinces, most students first.
    pub data: Vec<MapRegion>,
}

/// Parameters for a multi-group comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareParams {
    /// One province list per group.
    pub groups: Vec<Vec<String>>,
    /// School level filter.
    pub school_level: Option<SchoolLevel>,
}

/// The trend of one comparison group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareGroupResult {
    /// Position of the group in the request.
    pub group_index: usize,
    /// Provinces in the group.
    pub regions: Vec<String>,
    /// Yearly series over the group's provinces; empty for an empty group.
    pub data: Vec<TrendPoint>,
}

/// Parameters for the paginated school list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolsParams {
    /// Year, region and level filters.
    pub filter: StatisticsFilter,
    /// Page to return.
    pub page: PageRequest,
}

/// One school summed across grades.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolSummary {
    /// School name.
    pub school_name: String,
    /// Province.
    pub sido: String,
    /// Sub-region.
    pub sigungu: Option<String>,
    /// School level.
    pub school_level: SchoolLevel,
    /// Total students.
    pub total_students: i64,
    /// Male students.
    pub male_students: i64,
    /// Female students.
    pub female_students: i64,
    /// Total classes.
    pub total_classes: i64,
}

/// A page of schools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolsPage {
    /// Schools on this page, most students first.
    pub schools: Vec<SchoolSummary>,
    /// Pagination metadata.
    pub pagination: Pagination,
}

/// Parameters for a single school's grade breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolDetailParams {
    /// Exact school name.
    pub school_name: String,
    /// Year.
    pub year: i32,
    /// Province, to disambiguate schools sharing a name.
    pub sido: Option<String>,
}

/// Identity of a school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolInfo {
    /// School name.
    pub name: String,
    /// Province.
    pub sido: String,
    /// Sub-region.
    pub sigungu: Option<String>,
    /// School level.
    pub school_level: SchoolLevel,
}

/// Students and classes in one grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeBreakdown {
    /// Grade number.
    pub grade: i32,
    /// Classes in this grade.
    pub class_count: i64,
    /// Total students.
    pub total_students: i64,
    /// Male students.
    pub male_students: i64,
    /// Female students.
    pub female_students: i64,
}

/// Result of the school detail query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolDetail {
    /// The school, or `None` when no row matches.
    pub school: Option<SchoolInfo>,
    /// Grades in ascending order; empty when the school is unknown.
    pub grades: Vec<GradeBreakdown>,
}
