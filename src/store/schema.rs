//! `SQLite` schema bootstrap logic.
//!
//! Uses `CREATE TABLE IF NOT EXISTS`, so it is safe to run on every start.

use sqlx::SqlitePool;

use crate::Result;

/// Create the `key_value` table backing [`SqliteStore`](super::SqliteStore).
///
/// # Errors
///
/// Returns `AppError::Store` if the DDL statement fails.
pub async fn bootstrap_schema(pool: &SqlitePool) -> Result<()> {
    let ddl = r"
CREATE TABLE IF NOT EXISTS key_value (
    key         TEXT PRIMARY KEY NOT NULL,
    value       TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);
";
    sqlx::raw_sql(ddl).execute(pool).await?;
    Ok(())
}
