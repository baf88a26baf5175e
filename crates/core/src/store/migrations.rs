//! Local store schema migrations.
//!
//! Applied versions are tracked in a `_migrations` table; each entry below is
//! a SQL batch run once, in order.

use super::Error;
use tokio_rusqlite::{Connection, params};

const MIGRATIONS: &[(i64, &str)] = &[(1, include_str!("../../migrations/001_local_store.sql"))];

/// Run any pending migrations.
///
/// # Errors
///
/// Returns an error if a migration batch fails to execute.
pub async fn run(conn: &Connection) -> Result<(), Error> {
    conn.call(|conn| -> Result<(), Error> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            )",
            [],
        )?;

        let current: i64 =
            conn.query_row("SELECT COALESCE(MAX(version), 0) FROM _migrations", [], |row| row.get(0))?;

        for (version, sql) in MIGRATIONS {
            if *version <= current {
                continue;
            }
            conn.execute_batch(sql)
                .map_err(|e| Error::MigrationFailed(format!("version {version}: {e}")))?;
            conn.execute(
                "INSERT INTO _migrations (version, applied_at) VALUES (?1, ?2)",
                params![version, chrono::Utc::now().to_rfc3339()],
            )?;
            tracing::debug!(version, "applied local store migration");
        }

        Ok(())
    })
    .await
    .map_err(Error::from)
}
