//! Dashboard summary: grand totals plus per-level and per-province
//! breakdowns for one year.

use edustats_analytics_models::{SchoolLevelBreakdown, SidoBreakdown, SummaryResult, SummaryTotals};
use edustats_database_models::{Column, Predicate, StatisticsFilter};
use moosicbox_json_utils::database::ToValue as _;
use switchy_database::Database;

use crate::{AnalyticsError, parse_level, query, render_filters};

/// Summarizes `year`, narrowed by the region and level in `filter`.
///
/// The `year` in `filter` is ignored in favor of `year`. The per-province
/// breakdown is left empty when the filter already names a province.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if a query fails or a stored school level is
/// unknown.
pub async fn summary(
    db: &dyn Database,
    year: i32,
    filter: &StatisticsFilter,
) -> Result<SummaryResult, AnalyticsError> {
    let predicate = Predicate::from_filter(&StatisticsFilter {
        year: Some(year),
        ..filter.clone()
    });

    let total = totals(db, &predicate).await?;
    let by_school_level = by_school_level(db, &predicate).await?;
    let by_sido = if predicate.constrains(Column::Sido) {
        vec![]
    } else {
        by_sido(db, &predicate).await?
    };
    let years = edustats_database::queries::list_years(db).await?;

    log::debug!(
        "Summary for {year}: {} students across {} levels",
        total.students,
        by_school_level.len()
    );

    Ok(SummaryResult {
        year,
        total,
        by_school_level,
        by_sido,
        years,
    })
}

async fn totals(db: &dyn Database, predicate: &Predicate) -> Result<SummaryTotals, AnalyticsError> {
    let (wc, params, _) = render_filters(predicate);
    let sql = format!(
        "SELECT
            CAST(COALESCE(SUM(total_students), 0) AS BIGINT) as students,
            CAST(COALESCE(SUM(male_students), 0) AS BIGINT) as male_students,
            CAST(COALESCE(SUM(female_students), 0) AS BIGINT) as female_students,
            CAST(COALESCE(SUM(total_classes), 0) AS BIGINT) as classes,
            CAST(COALESCE(SUM(school_count), 0) AS BIGINT) as schools
         FROM student_statistics{wc}"
    );

    let rows = query(db, "Summary totals", &sql, &params).await?;
    Ok(rows.first().map_or_else(SummaryTotals::default, |row| SummaryTotals {
        students: row.to_value("students").unwrap_or(0),
        male_students: row.to_value("male_students").unwrap_or(0),
        female_students: row.to_value("female_students").unwrap_or(0),
        classes: row.to_value("classes").unwrap_or(0),
        schools: row.to_value("schools").unwrap_or(0),
    }))
}

async fn by_school_level(
    db: &dyn Database,
    predicate: &Predicate,
) -> Result<Vec<SchoolLevelBreakdown>, AnalyticsError> {
    let (wc, params, _) = render_filters(predicate);
    let sql = format!(
        "SELECT school_level,
            CAST(COALESCE(SUM(total_students), 0) AS BIGINT) as students,
            CAST(COALESCE(SUM(school_count), 0) AS BIGINT) as schools
         FROM student_statistics{wc}
         GROUP BY school_level
         ORDER BY students DESC, school_level"
    );

    let rows = query(db, "Summary by level", &sql, &params).await?;
    let mut out = Vec::with_capacity(rows.len());
    for row in &rows {
        let level: String = row.to_value("school_level").unwrap_or_default();
        out.push(SchoolLevelBreakdown {
            school_level: parse_level(&level)?,
            students: row.to_value("students").unwrap_or(0),
            schools: row.to_value("schools").unwrap_or(0),
        });
    }
    Ok(out)
}

async fn by_sido(
    db: &dyn Database,
    predicate: &Predicate,
) -> Result<Vec<SidoBreakdown>, AnalyticsError> {
    let (wc, params, _) = render_filters(predicate);
    let sql = format!(
        "SELECT sido,
            CAST(COALESCE(SUM(total_students), 0) AS BIGINT) as students,
            CAST(COALESCE(SUM(school_count), 0) AS BIGINT) as schools
         FROM student_statistics{wc}
         GROUP BY sido
         ORDER BY students DESC, sido"
    );

    let rows = query(db, "Summary by sido", &sql, &params).await?;
    Ok(rows
        .iter()
        .map(|row| SidoBreakdown {
            sido: row.to_value("sido").unwrap_or_default(),
            students: row.to_value("students").unwrap_or(0),
            schools: row.to_value("schools").unwrap_or(0),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use edustats_database::load::insert_statistics_rows;
    use edustats_database::test_utils::{TempDatabase, stats_row};
    use edustats_school_models::SchoolLevel;

    use super::*;

    async fn seeded() -> TempDatabase {
        let temp = TempDatabase::new().await.unwrap();
        insert_statistics_rows(
            temp.db(),
            &[
                stats_row(2024, "서울", Some("강남구"), SchoolLevel::Elementary, 1000, 510, 490, 5),
                stats_row(2025, "서울", Some("강남구"), SchoolLevel::Elementary, 950, 480, 470, 5),
                stats_row(2025, "서울", Some("강남구"), SchoolLevel::Middle, 300, 160, 140, 2),
                stats_row(2025, "서울", Some("종로구"), SchoolLevel::Middle, 200, 90, 110, 2),
                stats_row(2025, "부산", Some("해운대구"), SchoolLevel::High, 1250, 640, 610, 4),
            ],
        )
        .await
        .unwrap();
        temp
    }

    #[tokio::test]
    async fn totals_sum_matching_rows() {
        let temp = seeded().await;
        let result = summary(temp.db(), 2025, &StatisticsFilter::default())
            .await
            .unwrap();

        assert_eq!(result.year, 2025);
        assert_eq!(result.total.students, 2700);
        assert_eq!(result.total.male_students, 1370);
        assert_eq!(result.total.female_students, 1330);
        assert_eq!(result.total.schools, 13);
        assert_eq!(result.total.classes, 130);
        assert_eq!(result.years, vec![2025, 2024]);
    }

    #[tokio::test]
    async fn breakdowns_sort_by_students_then_key() {
        let temp = seeded().await;
        let result = summary(temp.db(), 2025, &StatisticsFilter::default())
            .await
            .unwrap();

        let sidos: Vec<_> = result.by_sido.iter().map(|s| s.sido.as_str()).collect();
        assert_eq!(sidos, vec!["서울", "부산"]);
        assert_eq!(result.by_sido[0].students, 1450);

        let levels: Vec<_> = result
            .by_school_level
            .iter()
            .map(|l| (l.school_level, l.students))
            .collect();
        assert_eq!(
            levels,
            vec![
                (SchoolLevel::High, 1250),
                (SchoolLevel::Elementary, 950),
                (SchoolLevel::Middle, 500),
            ]
        );
    }

    #[tokio::test]
    async fn sido_filter_drops_sido_breakdown() {
        let temp = seeded().await;
        let result = summary(temp.db(), 2025, &StatisticsFilter::default().with_sido("서울"))
            .await
            .unwrap();

        assert_eq!(result.total.students, 1450);
        assert!(result.by_sido.is_empty());
        assert_eq!(result.by_school_level.len(), 2);
    }

    #[tokio::test]
    async fn no_match_yields_zero_totals() {
        let temp = seeded().await;
        let result = summary(temp.db(), 1999, &StatisticsFilter::default())
            .await
            .unwrap();

        assert_eq!(result.total, SummaryTotals::default());
        assert!(result.by_school_level.is_empty());
        assert!(result.by_sido.is_empty());
        assert_eq!(result.years, vec![2025, 2024]);
    }

    #[tokio::test]
    async fn filter_year_is_overridden() {
        let temp = seeded().await;
        let result = summary(temp.db(), 2024, &StatisticsFilter::default().with_year(2025))
            .await
            .unwrap();
        assert_eq!(result.total.students, 1000);
    }
}
