#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Database connection, schema, loading and listing queries for edustats.
//!
//! Uses `switchy_database` so the same raw SQL runs against the bundled
//! `SQLite` file or a Postgres server. All SQL sticks to the portable
//! subset (`COALESCE`, `CAST(.. AS BIGINT)`, `LIMIT`/`OFFSET`, `$n`
//! placeholders).

pub mod db;
pub mod load;
pub mod queries;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use edustats_database_models::FilterValue;
use switchy_database::{Database, DatabaseValue};

/// Errors that can occur during database operations.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Database query error.
    #[error("Database error: {0}")]
    Database(#[from] switchy_database::DatabaseError),

    /// Opening a connection failed.
    #[error("Connection error: {0}")]
    Connection(String),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Data conversion error.
    #[error("Data conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

/// Converts a predicate parameter into a bound database value.
#[must_use]
pub fn to_db_value(value: &FilterValue) -> DatabaseValue {
    match value {
        FilterValue::Int(v) => DatabaseValue::Int32(*v),
        FilterValue::Text(s) => DatabaseValue::String(s.clone()),
    }
}

/// Converts a rendered predicate's parameter list into bound values.
#[must_use]
pub fn to_db_params(values: &[FilterValue]) -> Vec<DatabaseValue> {
    values.iter().map(to_db_value).collect()
}

/// Creates both fact tables and their filter indexes if they don't
/// already exist.
///
/// # Errors
///
/// Returns [`DbError`] if any DDL statement fails.
pub async fn ensure_schema(db: &dyn Database) -> Result<(), DbError> {
    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS student_statistics (
            year            INTEGER NOT NULL,
            sido            TEXT NOT NULL,
            sigungu         TEXT,
            school_level    TEXT NOT NULL,
            total_students  BIGINT NOT NULL DEFAULT 0,
            male_students   BIGINT NOT NULL DEFAULT 0,
            female_students BIGINT NOT NULL DEFAULT 0,
            total_classes   BIGINT NOT NULL DEFAULT 0,
            school_count    BIGINT NOT NULL DEFAULT 0
        )",
    )
    .await?;

    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS student_data_raw (
            year             INTEGER NOT NULL,
            sido             TEXT,
            sigungu          TEXT,
            edu_office       TEXT,
            school_name      TEXT NOT NULL,
            school_level     TEXT,
            high_school_type TEXT,
            establishment    TEXT,
            region_size      TEXT,
            grade            INTEGER NOT NULL DEFAULT 0,
            class_name       TEXT,
            class_count      BIGINT NOT NULL DEFAULT 0,
            students_total   BIGINT NOT NULL DEFAULT 0,
            students_male    BIGINT NOT NULL DEFAULT 0,
            students_female  BIGINT NOT NULL DEFAULT 0
        )",
    )
    .await?;

    db.exec_raw(
        "CREATE INDEX IF NOT EXISTS idx_statistics_filters
         ON student_statistics (year, sido, sigungu, school_level)",
    )
    .await?;

    db.exec_raw(
        "CREATE INDEX IF NOT EXISTS idx_raw_year_region
         ON student_data_raw (year, sido, sigungu)",
    )
    .await?;

    db.exec_raw(
        "CREATE INDEX IF NOT EXISTS idx_raw_year_school
         ON student_data_raw (year, school_name)",
    )
    .await?;

    Ok(())
}
