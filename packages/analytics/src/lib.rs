#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation queries behind the edustats dashboard views.
//!
//! Each public function takes a typed parameter struct, builds its filter
//! with [`edustats_database_models::Predicate`], runs one or more
//! `GROUP BY`/`SUM` queries and returns a typed result. Every query is a
//! pure function of the stored facts and its parameters. Sums are
//! `COALESCE`d to zero and grouped outputs carry a secondary sort key so
//! results are reproducible.

pub mod compare;
pub mod map;
pub mod schools;
pub mod summary;
pub mod trend;

use edustats_database_models::Predicate;
use switchy_database::{Database, DatabaseValue};
use thiserror::Error;

/// Errors that can occur during analytics operations.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] switchy_database::DatabaseError),

    /// A listing query in the database layer failed.
    #[error(transparent)]
    Db(#[from] edustats_database::DbError),

    /// Data conversion error.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

/// Renders `predicate` from `$1` and returns the `WHERE` clause, the bound
/// parameters and the next free placeholder index.
fn render_filters(predicate: &Predicate) -> (String, Vec<DatabaseValue>, u32) {
    let rendered = predicate.render(1);
    (
        rendered.where_clause(),
        edustats_database::to_db_params(&rendered.params),
        rendered.next_index,
    )
}

/// Runs `sql` and returns the rows, logging failures with `context`.
async fn query(
    db: &dyn Database,
    context: &str,
    sql: &str,
    params: &[DatabaseValue],
) -> Result<Vec<switchy_database::Row>, AnalyticsError> {
    db.query_raw_params(sql, params).await.map_err(|e| {
        log::debug!("{context} query failed: {e}");
        AnalyticsError::from(e)
    })
}

fn parse_level(name: &str) -> Result<edustats_school_models::SchoolLevel, AnalyticsError> {
    edustats_school_models::SchoolLevel::from_name(name).map_err(|e| AnalyticsError::Conversion {
        message: e.to_string(),
    })
}
