//! Throwaway `SQLite` databases and row builders for tests.

use std::path::PathBuf;
use std::sync::Arc;

use edustats_school_models::{SchoolLevel, StudentDataRaw, StudentStatistics};
use switchy_database::Database;

use crate::DbError;
use crate::db::open_sqlite;

/// A schema-initialized `SQLite` file in the temp directory, removed on drop.
pub struct TempDatabase {
    db: Arc<dyn Database>,
    path: PathBuf,
}

impl TempDatabase {
    /// Creates a fresh, empty database.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the file cannot be created or initialized.
    pub async fn new() -> Result<Self, DbError> {
        let path = std::env::temp_dir().join(format!("edustats-test-{}.db", uuid::Uuid::new_v4()));
        let db = open_sqlite(&path).await?;
        Ok(Self {
            db: Arc::from(db),
            path,
        })
    }

    /// Borrows the connection.
    #[must_use]
    pub fn db(&self) -> &dyn Database {
        self.db.as_ref()
    }

    /// Returns a shared handle to the connection.
    #[must_use]
    pub fn shared(&self) -> Arc<dyn Database> {
        Arc::clone(&self.db)
    }
}

impl Drop for TempDatabase {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Builds a statistics row.
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn stats_row(
    year: i32,
    sido: &str,
    sigungu: Option<&str>,
    school_level: SchoolLevel,
    total_students: i64,
    male_students: i64,
    female_students: i64,
    school_count: i64,
) -> StudentStatistics {
    StudentStatistics {
        year,
        sido: sido.to_string(),
        sigungu: sigungu.map(str::to_string),
        school_level,
        total_students,
        male_students,
        female_students,
        total_classes: school_count * 10,
        school_count,
    }
}

/// Builds a raw school row.
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn raw_row(
    year: i32,
    sido: &str,
    sigungu: Option<&str>,
    school_name: &str,
    school_level: SchoolLevel,
    grade: i32,
    class_count: i64,
    students_total: i64,
    students_male: i64,
    students_female: i64,
) -> StudentDataRaw {
    StudentDataRaw {
        year,
        sido: sido.to_string(),
        sigungu: sigungu.map(str::to_string),
        edu_office: None,
        school_name: school_name.to_string(),
        school_level,
        high_school_type: None,
        establishment: None,
        region_size: None,
        grade,
        class_name: None,
        class_count,
        students_total,
        students_male,
        students_female,
    }
}
