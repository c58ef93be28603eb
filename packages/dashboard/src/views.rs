//! Render-ready shaping of API results.

use std::collections::{BTreeMap, BTreeSet};

use edustats_analytics_models::{CompareGroupResult, SchoolSummary};
use serde::{Deserialize, Serialize};

use crate::compare::ComparisonGroups;

/// Choropleth colors from lowest to highest bucket.
pub const SCALE_COLORS: [&str; 5] = ["#3b82f6", "#22c55e", "#eab308", "#f97316", "#ef4444"];

/// Stop positions as fractions of the value range.
const SCALE_STEPS: [f64; 5] = [0.0, 0.2, 0.4, 0.6, 0.8];

/// One interpolation stop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorStop {
    /// Lowest value drawn in this color.
    pub value: f64,
    /// Color token.
    pub color: &'static str,
}

/// Five-stop linear color scale over `[min, max]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    stops: [ColorStop; 5],
}

impl ColorScale {
    /// Builds the scale. A zero or negative range is widened to 1.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(min: i64, max: i64) -> Self {
        let min = min as f64;
        let mut range = max as f64 - min;
        if range <= 0.0 {
            range = 1.0;
        }

        let stops = std::array::from_fn(|i| ColorStop {
            value: SCALE_STEPS[i].mul_add(range, min),
            color: SCALE_COLORS[i],
        });
        Self { stops }
    }

    /// The stops, lowest first.
    #[must_use]
    pub const fn stops(&self) -> &[ColorStop; 5] {
        &self.stops
    }

    /// Color of the highest stop not above `value`; values below the
    /// range get the first color.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn color_for(&self, value: i64) -> &'static str {
        let value = value as f64;
        self.stops
            .iter()
            .rev()
            .find(|stop| stop.value <= value)
            .map_or(self.stops[0].color, |stop| stop.color)
    }
}

/// One year of the merged comparison chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    /// Year.
    pub year: i32,
    /// Total students by group name, for groups with data that year.
    pub values: BTreeMap<String, i64>,
}

/// Merges per-group series into one point per year, ascending.
///
/// `results[i].group_index` indexes the groups that have regions, in
/// order, matching what [`ComparisonGroups::comparison_request`] sent.
/// Results with no matching group are skipped.
#[must_use]
pub fn merge_compare_series(
    groups: &ComparisonGroups,
    results: &[CompareGroupResult],
) -> Vec<SeriesPoint> {
    let ready: Vec<_> = groups.ready_groups().collect();

    let years: BTreeSet<i32> = results
        .iter()
        .flat_map(|r| r.data.iter().map(|p| p.year))
        .collect();

    years
        .into_iter()
        .map(|year| {
            let values = results
                .iter()
                .filter_map(|result| {
                    let group = ready.get(result.group_index)?;
                    let point = result.data.iter().find(|p| p.year == year)?;
                    Some((group.name.clone(), point.total_students))
                })
                .collect();
            SeriesPoint { year, values }
        })
        .collect()
}

/// Ranking direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Fewest students first.
    Asc,
    /// Most students first.
    #[default]
    Desc,
}

/// Sorts schools by total students, keeping the incoming order for ties.
#[must_use]
pub fn rank_schools(mut schools: Vec<SchoolSummary>, order: SortOrder) -> Vec<SchoolSummary> {
    match order {
        SortOrder::Asc => schools.sort_by_key(|s| s.total_students),
        SortOrder::Desc => schools.sort_by_key(|s| std::cmp::Reverse(s.total_students)),
    }
    schools
}
