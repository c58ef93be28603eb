//! Yearly trend series.

use edustats_analytics_models::{TrendParams, TrendPoint};
use edustats_database_models::{Column, Predicate};
use moosicbox_json_utils::database::ToValue as _;
use switchy_database::Database;

use crate::{AnalyticsError, query, render_filters};

/// Returns one point per year with data matching `params`, in ascending
/// year order.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the query fails.
pub async fn trend(db: &dyn Database, params: &TrendParams) -> Result<Vec<TrendPoint>, AnalyticsError> {
    let predicate = Predicate::new()
        .where_eq_opt(Column::Sido, params.sido.as_deref())
        .where_eq_opt(Column::Sigungu, params.sigungu.as_deref())
        .where_eq_opt(Column::SchoolLevel, params.school_level);

    trend_for(db, &predicate).await
}

/// Sums `student_statistics` by year under `predicate`.
pub(crate) async fn trend_for(
    db: &dyn Database,
    predicate: &Predicate,
) -> Result<Vec<TrendPoint>, AnalyticsError> {
    let (wc, params, _) = render_filters(predicate);
    let sql = format!(
        "SELECT year,
            CAST(COALESCE(SUM(total_students), 0) AS BIGINT) as total_students,
            CAST(COALESCE(SUM(male_students), 0) AS BIGINT) as male_students,
            CAST(COALESCE(SUM(female_students), 0) AS BIGINT) as female_students,
            CAST(COALESCE(SUM(total_classes), 0) AS BIGINT) as total_classes,
            CAST(COALESCE(SUM(school_count), 0) AS BIGINT) as school_count
         FROM student_statistics{wc}
         GROUP BY year
         ORDER BY year"
    );

    let rows = query(db, "Trend", &sql, &params).await?;
    Ok(rows
        .iter()
        .map(|row| TrendPoint {
            year: row.to_value("year").unwrap_or(0),
            total_students: row.to_value("total_students").unwrap_or(0),
            male_students: row.to_value("male_students").unwrap_or(0),
            female_students: row.to_value("female_students").unwrap_or(0),
            total_classes: row.to_value("total_classes").unwrap_or(0),
            school_count: row.to_value("school_count").unwrap_or(0),
        })
        .collect())
}
