//! School-level queries over `student_data_raw`.

use edustats_analytics_models::{
    GradeBreakdown, SchoolDetail, SchoolDetailParams, SchoolInfo, SchoolSummary, SchoolsPage,
    SchoolsParams,
};
use edustats_database_models::{Column, Pagination, Predicate};
use moosicbox_json_utils::database::ToValue as _;
use switchy_database::{Database, DatabaseValue};

use crate::{AnalyticsError, parse_level, query, render_filters};

/// Lists schools matching the filter, each summed across its grades, most
/// students first.
///
/// A school is identified by name, province, sub-region and level. Raw
/// rows without a province or level are ignored.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if a query fails or a stored school level is
/// unknown.
pub async fn schools_list(
    db: &dyn Database,
    params: &SchoolsParams,
) -> Result<SchoolsPage, AnalyticsError> {
    let filter = &params.filter;
    let predicate = Predicate::new()
        .where_not_null(Column::Sido)
        .where_not_null(Column::SchoolLevel)
        .where_eq_opt(Column::Year, filter.year)
        .where_eq_opt(Column::Sido, filter.sido.as_deref())
        .where_eq_opt(Column::Sigungu, filter.sigungu.as_deref())
        .where_eq_opt(Column::SchoolLevel, filter.school_level);
    let (wc, mut bound, next_index) = render_filters(&predicate);

    let count_sql = format!(
        "SELECT COUNT(*) as total FROM (
            SELECT school_name FROM student_data_raw{wc}
            GROUP BY school_name, sido, sigungu, school_level
         ) s"
    );
    let count_rows = query(db, "Schools count", &count_sql, &bound).await?;
    let total: i64 = count_rows
        .first()
        .map_or(0, |r| r.to_value("total").unwrap_or(0));

    let limit_idx = next_index;
    let offset_idx = limit_idx + 1;
    let sql = format!(
        "SELECT school_name, sido, sigungu, school_level,
            CAST(COALESCE(SUM(students_total), 0) AS BIGINT) as total_students,
            CAST(COALESCE(SUM(students_male), 0) AS BIGINT) as male_students,
            CAST(COALESCE(SUM(students_female), 0) AS BIGINT) as female_students,
            CAST(COALESCE(SUM(class_count), 0) AS BIGINT) as total_classes
         FROM student_data_raw{wc}
         GROUP BY school_name, sido, sigungu, school_level
         ORDER BY total_students DESC, school_name, sido, COALESCE(sigungu, '')
         LIMIT ${limit_idx} OFFSET ${offset_idx}"
    );
    bound.push(DatabaseValue::Int64(i64::from(params.page.limit)));
    bound.push(DatabaseValue::Int64(
        i64::try_from(params.page.offset()).unwrap_or(i64::MAX),
    ));

    let rows = query(db, "Schools", &sql, &bound).await?;
    let mut schools = Vec::with_capacity(rows.len());
    for row in &rows {
        let level: String = row.to_value("school_level").unwrap_or_default();
        schools.push(SchoolSummary {
            school_name: row.to_value("school_name").unwrap_or_default(),
            sido: row.to_value("sido").unwrap_or_default(),
            sigungu: row.to_value("sigungu").unwrap_or(None),
            school_level: parse_level(&level)?,
            total_students: row.to_value("total_students").unwrap_or(0),
            male_students: row.to_value("male_students").unwrap_or(0),
            female_students: row.to_value("female_students").unwrap_or(0),
            total_classes: row.to_value("total_classes").unwrap_or(0),
        });
    }

    #[allow(clippy::cast_sign_loss)]
    let pagination = Pagination::new(params.page, total.max(0) as u64);

    Ok(SchoolsPage {
        schools,
        pagination,
    })
}

/// Returns a school's identity and per-grade breakdown for one year.
///
/// When several schools share the name, `sido` narrows the match; any
/// remaining ambiguity resolves to the first by province then sub-region.
/// An unknown school yields `school: None` and no grades.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if a query fails or a stored school level is
/// unknown.
pub async fn school_detail(
    db: &dyn Database,
    params: &SchoolDetailParams,
) -> Result<SchoolDetail, AnalyticsError> {
    let Some(school) = identify(db, params).await? else {
        log::debug!(
            "No school named '{}' in {}",
            params.school_name,
            params.year
        );
        return Ok(SchoolDetail {
            school: None,
            grades: vec![],
        });
    };

    let mut predicate = Predicate::new()
        .where_eq(Column::SchoolName, school.name.as_str())
        .where_eq(Column::Year, params.year)
        .where_eq(Column::Sido, school.sido.as_str())
        .where_eq(Column::SchoolLevel, school.school_level);
    predicate = match &school.sigungu {
        Some(sigungu) => predicate.where_eq(Column::Sigungu, sigungu.as_str()),
        None => predicate.where_null(Column::Sigungu),
    };
    let (wc, bound, _) = render_filters(&predicate);

    let sql = format!(
        "SELECT grade,
            CAST(COALESCE(SUM(class_count), 0) AS BIGINT) as class_count,
            CAST(COALESCE(SUM(students_total), 0) AS BIGINT) as total_students,
            CAST(COALESCE(SUM(students_male), 0) AS BIGINT) as male_students,
            CAST(COALESCE(SUM(students_female), 0) AS BIGINT) as female_students
         FROM student_data_raw{wc}
         GROUP BY grade
         ORDER BY grade"
    );

    let rows = query(db, "School grades", &sql, &bound).await?;
    let grades = rows
        .iter()
        .map(|row| GradeBreakdown {
            grade: row.to_value("grade").unwrap_or(0),
            class_count: row.to_value("class_count").unwrap_or(0),
            total_students: row.to_value("total_students").unwrap_or(0),
            male_students: row.to_value("male_students").unwrap_or(0),
            female_students: row.to_value("female_students").unwrap_or(0),
        })
        .collect();

    Ok(SchoolDetail {
        school: Some(school),
        grades,
    })
}

async fn identify(
    db: &dyn Database,
    params: &SchoolDetailParams,
) -> Result<Option<SchoolInfo>, AnalyticsError> {
    let predicate = Predicate::new()
        .where_eq(Column::SchoolName, params.school_name.as_str())
        .where_eq(Column::Year, params.year)
        .where_eq_opt(Column::Sido, params.sido.as_deref())
        .where_not_null(Column::Sido)
        .where_not_null(Column::SchoolLevel);
    let (wc, bound, _) = render_filters(&predicate);

    let sql = format!(
        "SELECT school_name, sido, sigungu, school_level
         FROM student_data_raw{wc}
         GROUP BY school_name, sido, sigungu, school_level
         ORDER BY sido, COALESCE(sigungu, ''), school_level
         LIMIT 1"
    );

    let rows = query(db, "School identity", &sql, &bound).await?;
    let Some(row) = rows.first() else {
        return Ok(None);
    };

    let level: String = row.to_value("school_level").unwrap_or_default();
    Ok(Some(SchoolInfo {
        name: row.to_value("school_name").unwrap_or_default(),
        sido: row.to_value("sido").unwrap_or_default(),
        sigungu: row.to_value("sigungu").unwrap_or(None),
        school_level: parse_level(&level)?,
    }))
}
