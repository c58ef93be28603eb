//! Listing queries over the statistics tables.
//!
//! These back the filter dropdowns and the raw statistics table view.
//! Aggregations live in the `edustats_analytics` crate.

use std::collections::BTreeMap;

use edustats_database_models::{
    PageRequest, Pagination, Predicate, RegionsOverview, StatisticsFilter, StatisticsPage,
};
use edustats_school_models::{SchoolLevel, StudentStatistics};
use moosicbox_json_utils::database::ToValue as _;
use switchy_database::{Database, DatabaseValue};

use crate::{DbError, to_db_params};

/// Parses a stored school level, failing on names outside the closed set.
///
/// # Errors
///
/// Returns [`DbError::Conversion`] for an unknown school level.
pub fn parse_school_level(name: &str) -> Result<SchoolLevel, DbError> {
    SchoolLevel::from_name(name).map_err(|e| DbError::Conversion {
        message: e.to_string(),
    })
}

/// Lists provinces with data, ascending.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub async fn list_sidos(db: &dyn Database) -> Result<Vec<String>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT DISTINCT sido FROM student_statistics ORDER BY sido",
            &[],
        )
        .await?;

    Ok(rows
        .iter()
        .map(|row| row.to_value("sido").unwrap_or_default())
        .collect())
}

/// Lists years with data, most recent first.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub async fn list_years(db: &dyn Database) -> Result<Vec<i32>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT DISTINCT year FROM student_statistics ORDER BY year DESC",
            &[],
        )
        .await?;

    Ok(rows
        .iter()
        .map(|row| row.to_value("year").unwrap_or(0))
        .collect())
}

/// Lists school levels with data in canonical order.
///
/// Stored names outside the closed set are skipped with a warning.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub async fn list_school_levels(db: &dyn Database) -> Result<Vec<SchoolLevel>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT DISTINCT school_level FROM student_statistics",
            &[],
        )
        .await?;

    let mut levels: Vec<SchoolLevel> = rows
        .iter()
        .filter_map(|row| {
            let name: String = row.to_value("school_level").unwrap_or_default();
            match SchoolLevel::from_name(&name) {
                Ok(level) => Some(level),
                Err(e) => {
                    log::warn!("Skipping stored school level: {e}");
                    None
                }
            }
        })
        .collect();
    levels.sort_unstable();
    levels.dedup();

    Ok(levels)
}

/// Lists the distinct, non-null sub-regions of one province, ascending.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub async fn list_sigungus(db: &dyn Database, sido: &str) -> Result<Vec<String>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT DISTINCT sigungu FROM student_statistics
             WHERE sido = $1 AND sigungu IS NOT NULL
             ORDER BY sigungu",
            &[DatabaseValue::String(sido.to_string())],
        )
        .await?;

    Ok(rows
        .iter()
        .filter_map(|row| {
            let sigungu: Option<String> = row.to_value("sigungu").unwrap_or(None);
            sigungu
        })
        .collect())
}

/// Maps every province to its sorted sub-region list.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub async fn region_tree(db: &dyn Database) -> Result<BTreeMap<String, Vec<String>>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT DISTINCT sido, sigungu FROM student_statistics
             WHERE sigungu IS NOT NULL
             ORDER BY sido, sigungu",
            &[],
        )
        .await?;

    let mut tree: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for row in &rows {
        let sido: String = row.to_value("sido").unwrap_or_default();
        let sigungu: Option<String> = row.to_value("sigungu").unwrap_or(None);
        if let Some(sigungu) = sigungu {
            tree.entry(sido).or_default().push(sigungu);
        }
    }

    Ok(tree)
}

/// Returns the provinces, years and school levels present in the data.
///
/// # Errors
///
/// Returns [`DbError`] if any query fails.
pub async fn regions_overview(db: &dyn Database) -> Result<RegionsOverview, DbError> {
    Ok(RegionsOverview {
        sidos: list_sidos(db).await?,
        years: list_years(db).await?,
        school_levels: list_school_levels(db).await?,
    })
}

/// Returns one page of filtered `student_statistics` rows, ordered by year
/// descending then sido, sigungu and school level.
///
/// # Errors
///
/// Returns [`DbError`] if a query fails or a row holds an unknown school
/// level.
pub async fn query_statistics(
    db: &dyn Database,
    filter: &StatisticsFilter,
    page: PageRequest,
) -> Result<StatisticsPage, DbError> {
    let rendered = Predicate::from_filter(filter).render(1);
    let wc = rendered.where_clause();
    let mut params = to_db_params(&rendered.params);

    let count_sql = format!("SELECT COUNT(*) as total FROM student_statistics{wc}");
    let count_rows = db.query_raw_params(&count_sql, &params).await?;
    let total: i64 = count_rows
        .first()
        .map_or(0, |r| r.to_value("total").unwrap_or(0));

    let limit_idx = rendered.next_index;
    let offset_idx = limit_idx + 1;
    let sql = format!(
        "SELECT year, sido, sigungu, school_level, total_students, male_students,
                female_students, total_classes, school_count
         FROM student_statistics{wc}
         ORDER BY year DESC, sido, COALESCE(sigungu, ''), school_level
         LIMIT ${limit_idx} OFFSET ${offset_idx}"
    );
    params.push(DatabaseValue::Int64(i64::from(page.limit)));
    params.push(DatabaseValue::Int64(
        i64::try_from(page.offset()).unwrap_or(i64::MAX),
    ));

    let rows = db.query_raw_params(&sql, &params).await?;

    let mut out = Vec::with_capacity(rows.len());
    for row in &rows {
        let level: String = row.to_value("school_level").unwrap_or_default();
        out.push(StudentStatistics {
            year: row.to_value("year").unwrap_or(0),
            sido: row.to_value("sido").unwrap_or_default(),
            sigungu: row.to_value("sigungu").unwrap_or(None),
            school_level: parse_school_level(&level)?,
            total_students: row.to_value("total_students").unwrap_or(0),
            male_students: row.to_value("male_students").unwrap_or(0),
            female_students: row.to_value("female_students").unwrap_or(0),
            total_classes: row.to_value("total_classes").unwrap_or(0),
            school_count: row.to_value("school_count").unwrap_or(0),
        });
    }

    #[allow(clippy::cast_sign_loss)]
    Ok(StatisticsPage {
        rows: out,
        pagination: Pagination::new(page, total as u64),
    })
}
