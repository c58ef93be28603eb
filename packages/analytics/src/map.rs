//! Per-province aggregates for the choropleth map.

use edustats_analytics_models::{MapMeta, MapParams, MapRegion, MapResult};
use edustats_database_models::{Column, Predicate};
use edustats_geography_models::sido::SidoTable;
use moosicbox_json_utils::database::ToValue as _;
use switchy_database::Database;

use crate::{AnalyticsError, query, render_filters};

/// Sums students per province for one year, attaching each province's
/// official name and centroid from `sidos`.
///
/// Provinces missing from `sidos` are still returned, without a display
/// name or coordinates.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the query fails.
pub async fn map_data(
    db: &dyn Database,
    params: &MapParams,
    sidos: &SidoTable,
) -> Result<MapResult, AnalyticsError> {
    let predicate = Predicate::new()
        .where_eq(Column::Year, params.year)
        .where_eq_opt(Column::SchoolLevel, params.school_level);
    let (wc, bound, _) = render_filters(&predicate);

    let sql = format!(
        "SELECT sido,
            CAST(COALESCE(SUM(total_students), 0) AS BIGINT) as total_students,
            CAST(COALESCE(SUM(male_students), 0) AS BIGINT) as male_students,
            CAST(COALESCE(SUM(female_students), 0) AS BIGINT) as female_students,
            CAST(COALESCE(SUM(school_count), 0) AS BIGINT) as school_count
         FROM student_statistics{wc}
         GROUP BY sido
         ORDER BY total_students DESC, sido"
    );

    let rows = query(db, "Map", &sql, &bound).await?;
    let data: Vec<MapRegion> = rows
        .iter()
        .map(|row| {
            let sido: String = row.to_value("sido").unwrap_or_default();
            let info = sidos.by_stored_name(&sido);
            if info.is_none() {
                log::debug!("No map entry for sido '{sido}'");
            }
            MapRegion {
                display_name: info.map(|i| i.display_name.clone()),
                coordinates: info.map(|i| i.centroid),
                sido,
                total_students: row.to_value("total_students").unwrap_or(0),
                male_students: row.to_value("male_students").unwrap_or(0),
                female_students: row.to_value("female_students").unwrap_or(0),
                school_count: row.to_value("school_count").unwrap_or(0),
            }
        })
        .collect();

    let meta = MapMeta {
        max_students: data.iter().map(|r| r.total_students).max().unwrap_or(0),
        min_students: data.iter().map(|r| r.total_students).min().unwrap_or(0),
        total_regions: data.len(),
    };

    Ok(MapResult {
        year: params.year,
        school_level: params.school_level,
        meta,
        data,
    })
}

#[cfg(test)]
mod tests {
    use edustats_database::load::insert_statistics_rows;
    use edustats_database::test_utils::{TempDatabase, stats_row};
    use edustats_school_models::SchoolLevel;

    use super::*;

    #[tokio::test]
    async fn regions_are_enriched_and_bounded() {
        let temp = TempDatabase::new().await.unwrap();
        insert_statistics_rows(
            temp.db(),
            &[
                stats_row(2025, "서울", Some("강남구"), SchoolLevel::Elementary, 950, 480, 470, 5),
                stats_row(2025, "서울", Some("종로구"), SchoolLevel::Middle, 200, 90, 110, 2),
                stats_row(2025, "부산", Some("해운대구"), SchoolLevel::High, 600, 300, 300, 3),
                stats_row(2025, "미확인", None, SchoolLevel::High, 10, 5, 5, 1),
                stats_row(2024, "제주", None, SchoolLevel::High, 5000, 2500, 2500, 9),
            ],
        )
        .await
        .unwrap();
        let sidos = SidoTable::standard().unwrap();

        let result = map_data(
            temp.db(),
            &MapParams {
                year: 2025,
                school_level: None,
            },
            &sidos,
        )
        .await
        .unwrap();

        assert_eq!(result.meta.total_regions, 3);
        assert_eq!(result.meta.max_students, 1150);
        assert_eq!(result.meta.min_students, 10);
        let names: Vec<_> = result.data.iter().map(|r| r.sido.as_str()).collect();
        assert_eq!(names, vec!["서울", "부산", "미확인"]);
        assert_eq!(result.data[0].display_name.as_deref(), Some("서울특별시"));
        assert!(result.data[0].coordinates.is_some());
        assert!(result.data[2].display_name.is_none());
        assert!(result.data[2].coordinates.is_none());
    }

    #[tokio::test]
    async fn single_region_has_equal_bounds() {
        let temp = TempDatabase::new().await.unwrap();
        insert_statistics_rows(
            temp.db(),
            &[
                stats_row(2025, "세종", None, SchoolLevel::High, 30, 15, 15, 1),
                stats_row(2025, "서울", Some("강남구"), SchoolLevel::Elementary, 950, 480, 470, 5),
            ],
        )
        .await
        .unwrap();
        let sidos = SidoTable::standard().unwrap();

        let result = map_data(
            temp.db(),
            &MapParams {
                year: 2025,
                school_level: Some(SchoolLevel::High),
            },
            &sidos,
        )
        .await
        .unwrap();

        assert_eq!(result.meta.total_regions, 1);
        assert_eq!(result.meta.max_students, 30);
        assert_eq!(result.meta.min_students, 30);
        assert_eq!(result.school_level, Some(SchoolLevel::High));
    }

    #[tokio::test]
    async fn empty_year_has_zero_bounds() {
        let temp = TempDatabase::new().await.unwrap();
        let sidos = SidoTable::standard().unwrap();
        let result = map_data(
            temp.db(),
            &MapParams {
                year: 2025,
                school_level: None,
            },
            &sidos,
        )
        .await
        .unwrap();

        assert!(result.data.is_empty());
        assert_eq!(result.meta, MapMeta::default());
    }
}
