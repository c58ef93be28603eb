//! Bulk loading of parsed fact rows and the statistics rebuild.
//!
//! Raw rows arrive already parsed (spreadsheet parsing lives outside this
//! crate). [`rebuild_statistics`] derives `student_statistics` from the raw
//! table, replacing whatever was there.

use edustats_school_models::{StudentDataRaw, StudentStatistics};
use moosicbox_json_utils::database::ToValue as _;
use switchy_database::{Database, DatabaseValue};

use crate::DbError;

/// Rows between progress log lines during bulk inserts.
const PROGRESS_INTERVAL: usize = 5000;

fn opt_string(value: Option<&String>) -> DatabaseValue {
    value.map_or(DatabaseValue::Null, |s| DatabaseValue::String(s.clone()))
}

/// Deletes every raw row for `year`, so a year's file can be re-imported.
///
/// # Errors
///
/// Returns [`DbError`] if the delete fails.
pub async fn delete_raw_year(db: &dyn Database, year: i32) -> Result<u64, DbError> {
    let deleted = db
        .exec_raw_params(
            "DELETE FROM student_data_raw WHERE year = $1",
            &[DatabaseValue::Int32(year)],
        )
        .await?;

    log::info!("Deleted {deleted} raw rows for {year}");
    Ok(deleted)
}

/// Inserts parsed school-level rows into `student_data_raw` in a single
/// transaction.
///
/// # Errors
///
/// Returns [`DbError`] if any insert fails. Nothing is inserted in that
/// case.
pub async fn insert_raw_rows(db: &dyn Database, rows: &[StudentDataRaw]) -> Result<u64, DbError> {
    let txn = db.begin_transaction().await?;

    let result = async {
        let mut inserted = 0u64;

        for (i, row) in rows.iter().enumerate() {
            inserted += txn
                .exec_raw_params(
                    "INSERT INTO student_data_raw (
                        year, sido, sigungu, edu_office, school_name, school_level,
                        high_school_type, establishment, region_size, grade, class_name,
                        class_count, students_total, students_male, students_female
                    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
                    &[
                        DatabaseValue::Int32(row.year),
                        DatabaseValue::String(row.sido.clone()),
                        opt_string(row.sigungu.as_ref()),
                        opt_string(row.edu_office.as_ref()),
                        DatabaseValue::String(row.school_name.clone()),
                        DatabaseValue::String(row.school_level.to_string()),
                        opt_string(row.high_school_type.as_ref()),
                        opt_string(row.establishment.as_ref()),
                        opt_string(row.region_size.as_ref()),
                        DatabaseValue::Int32(row.grade),
                        opt_string(row.class_name.as_ref()),
                        DatabaseValue::Int64(row.class_count),
                        DatabaseValue::Int64(row.students_total),
                        DatabaseValue::Int64(row.students_male),
                        DatabaseValue::Int64(row.students_female),
                    ],
                )
                .await?;

            if (i + 1) % PROGRESS_INTERVAL == 0 {
                log::info!("Inserted {} of {} raw rows...", i + 1, rows.len());
            }
        }

        Ok::<_, DbError>(inserted)
    }
    .await;

    let inserted = match result {
        Ok(inserted) => inserted,
        Err(e) => {
            txn.rollback().await?;
            return Err(e);
        }
    };
    txn.commit().await?;

    log::info!("Inserted {inserted} raw rows");
    Ok(inserted)
}

/// Inserts already-aggregated rows into `student_statistics` in a single
/// transaction.
///
/// # Errors
///
/// Returns [`DbError`] if any insert fails. Nothing is inserted in that
/// case.
pub async fn insert_statistics_rows(
    db: &dyn Database,
    rows: &[StudentStatistics],
) -> Result<u64, DbError> {
    let txn = db.begin_transaction().await?;

    let result = async {
        let mut inserted = 0u64;

        for row in rows {
            inserted += txn
                .exec_raw_params(
                    "INSERT INTO student_statistics (
                        year, sido, sigungu, school_level, total_students, male_students,
                        female_students, total_classes, school_count
                    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
                    &[
                        DatabaseValue::Int32(row.year),
                        DatabaseValue::String(row.sido.clone()),
                        opt_string(row.sigungu.as_ref()),
                        DatabaseValue::String(row.school_level.to_string()),
                        DatabaseValue::Int64(row.total_students),
                        DatabaseValue::Int64(row.male_students),
                        DatabaseValue::Int64(row.female_students),
                        DatabaseValue::Int64(row.total_classes),
                        DatabaseValue::Int64(row.school_count),
                    ],
                )
                .await?;
        }

        Ok::<_, DbError>(inserted)
    }
    .await;

    match result {
        Ok(inserted) => {
            txn.commit().await?;
            Ok(inserted)
        }
        Err(e) => {
            txn.rollback().await?;
            Err(e)
        }
    }
}

/// Replaces `student_statistics` with sums over `student_data_raw`,
/// grouped by year, sido, sigungu and school level.
///
/// Raw rows without a sido or school level are skipped. The delete and
/// the insert run in one transaction, so readers see either the old or
/// the new table. Returns the number of statistics rows after the rebuild.
///
/// # Errors
///
/// Returns [`DbError`] if any statement fails. The previous statistics are
/// kept in that case.
pub async fn rebuild_statistics(db: &dyn Database) -> Result<u64, DbError> {
    log::info!("Rebuilding student_statistics from raw rows...");

    let txn = db.begin_transaction().await?;

    let result = async {
        txn.exec_raw("DELETE FROM student_statistics").await?;
        txn.exec_raw(
            "INSERT INTO student_statistics (
                year, sido, sigungu, school_level, total_students, male_students,
                female_students, total_classes, school_count
            )
            SELECT
                year,
                sido,
                sigungu,
                school_level,
                CAST(COALESCE(SUM(students_total), 0) AS BIGINT),
                CAST(COALESCE(SUM(students_male), 0) AS BIGINT),
                CAST(COALESCE(SUM(students_female), 0) AS BIGINT),
                CAST(COALESCE(SUM(class_count), 0) AS BIGINT),
                COUNT(DISTINCT school_name)
            FROM student_data_raw
            WHERE sido IS NOT NULL AND school_level IS NOT NULL
            GROUP BY year, sido, sigungu, school_level",
        )
        .await?;
        Ok::<_, DbError>(())
    }
    .await;

    if let Err(e) = result {
        log::error!("Rebuild failed, keeping previous statistics: {e}");
        txn.rollback().await?;
        return Err(e);
    }
    txn.commit().await?;

    let rows = db
        .query_raw_params("SELECT COUNT(*) as total FROM student_statistics", &[])
        .await?;
    let total: i64 = rows.first().map_or(0, |r| r.to_value("total").unwrap_or(0));

    log::info!("Rebuilt student_statistics: {total} rows");

    #[allow(clippy::cast_sign_loss)]
    Ok(total as u64)
}

#[cfg(test)]
mod tests {
    use edustats_database_models::{PageRequest, StatisticsFilter};
    use edustats_school_models::SchoolLevel;

    use super::*;
    use crate::queries;
    use crate::test_utils::{TempDatabase, raw_row};

    #[tokio::test]
    async fn rebuild_groups_raw_rows() {
        let temp = TempDatabase::new().await.unwrap();
        let db = temp.db();

        let rows = vec![
            raw_row(2025, "서울", Some("강남구"), "대치초등학교", SchoolLevel::Elementary, 1, 4, 100, 52, 48),
            raw_row(2025, "서울", Some("강남구"), "대치초등학교", SchoolLevel::Elementary, 2, 3, 90, 45, 45),
            raw_row(2025, "서울", Some("강남구"), "도곡초등학교", SchoolLevel::Elementary, 1, 2, 50, 20, 30),
            raw_row(2025, "서울", Some("강남구"), "대치중학교", SchoolLevel::Middle, 1, 5, 150, 80, 70),
        ];
        assert_eq!(insert_raw_rows(db, &rows).await.unwrap(), 4);
        assert_eq!(rebuild_statistics(db).await.unwrap(), 2);

        let page = queries::query_statistics(
            db,
            &StatisticsFilter::default().with_school_level(SchoolLevel::Elementary),
            PageRequest::new(1, 10),
        )
        .await
        .unwrap();

        assert_eq!(page.rows.len(), 1);
        let row = &page.rows[0];
        assert_eq!(row.total_students, 240);
        assert_eq!(row.male_students, 117);
        assert_eq!(row.female_students, 123);
        assert_eq!(row.total_classes, 9);
        assert_eq!(row.school_count, 2);
    }

    #[tokio::test]
    async fn rebuild_replaces_previous_statistics() {
        let temp = TempDatabase::new().await.unwrap();
        let db = temp.db();

        let rows = vec![raw_row(2024, "부산", None, "해운대고등학교", SchoolLevel::High, 1, 8, 240, 120, 120)];
        insert_raw_rows(db, &rows).await.unwrap();
        assert_eq!(rebuild_statistics(db).await.unwrap(), 1);
        assert_eq!(rebuild_statistics(db).await.unwrap(), 1);

        delete_raw_year(db, 2024).await.unwrap();
        assert_eq!(rebuild_statistics(db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn failed_rebuild_keeps_previous_statistics() {
        let temp = TempDatabase::new().await.unwrap();
        let db = temp.db();

        let rows = vec![raw_row(2025, "대구", None, "수성중학교", SchoolLevel::Middle, 1, 6, 180, 90, 90)];
        insert_raw_rows(db, &rows).await.unwrap();
        assert_eq!(rebuild_statistics(db).await.unwrap(), 1);

        db.exec_raw("DROP TABLE student_data_raw").await.unwrap();
        assert!(rebuild_statistics(db).await.is_err());

        let page = queries::query_statistics(db, &StatisticsFilter::default(), PageRequest::new(1, 10))
            .await
            .unwrap();
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].sido, "대구");
        assert_eq!(page.rows[0].total_students, 180);
    }

    #[tokio::test]
    async fn failed_bulk_insert_inserts_nothing() {
        let temp = TempDatabase::new().await.unwrap();
        let db = temp.db();

        db.exec_raw(
            "CREATE TRIGGER reject_grade_nine BEFORE INSERT ON student_data_raw
             WHEN NEW.grade = 9 BEGIN SELECT RAISE(ABORT, 'grade out of range'); END",
        )
        .await
        .unwrap();

        let rows = vec![
            raw_row(2025, "대구", None, "수성중학교", SchoolLevel::Middle, 1, 6, 180, 90, 90),
            raw_row(2025, "대구", None, "수성중학교", SchoolLevel::Middle, 9, 6, 180, 90, 90),
        ];
        assert!(insert_raw_rows(db, &rows).await.is_err());
        assert_eq!(rebuild_statistics(db).await.unwrap(), 0);
    }
}
