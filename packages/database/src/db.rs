//! Database connection utilities.

use std::path::Path;

use switchy_database::Database;
use switchy_database_connection::{Credentials, init_sqlite_rusqlite};

use crate::{DbError, ensure_schema};

/// Default location of the `SQLite` statistics database.
pub const DEFAULT_DB_PATH: &str = "data/edustats.db";

/// Opens (or creates) the `SQLite` statistics database at `path` and
/// ensures the schema exists.
///
/// # Errors
///
/// Returns [`DbError`] if the parent directory cannot be created, the
/// database cannot be opened, or schema creation fails.
pub async fn open_sqlite(path: &Path) -> Result<Box<dyn Database>, DbError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let db = init_sqlite_rusqlite(Some(path)).map_err(|e| DbError::Connection(e.to_string()))?;

    ensure_schema(db.as_ref()).await?;

    Ok(db)
}

/// Creates a new database connection from the environment.
///
/// When `DATABASE_URL` names a Postgres server it is used, with a
/// 120-second `statement_timeout` so stalled queries fail instead of
/// hanging. Otherwise the `SQLite` file at `EDUSTATS_DB_PATH` (default
/// [`DEFAULT_DB_PATH`]) is opened.
///
/// # Errors
///
/// Returns [`DbError`] if the connection or schema setup fails.
pub async fn connect_from_env() -> Result<Box<dyn Database>, DbError> {
    if let Ok(url) = std::env::var("DATABASE_URL")
        && url.starts_with("postgres")
    {
        // Strip query parameters (e.g. ?sslmode=require) that the
        // Credentials parser doesn't understand.
        let url_base = url.split('?').next().unwrap_or(&url);

        log::info!("Connecting to Postgres...");
        let creds =
            Credentials::from_url(url_base).map_err(|e| DbError::Connection(e.to_string()))?;
        let db = switchy_database_connection::init_postgres_raw_native_tls(creds)
            .await
            .map_err(|e| DbError::Connection(e.to_string()))?;

        db.exec_raw("SET statement_timeout = '120s'").await?;
        ensure_schema(db.as_ref()).await?;

        return Ok(db);
    }

    let path = std::env::var("EDUSTATS_DB_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
    log::info!("Opening SQLite database at {path}...");
    open_sqlite(Path::new(&path)).await
}
