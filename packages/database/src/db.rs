//! Database connection utilities.

use std::path::Path;

use switchy_database::Database;
use switchy_database_connection::init_sqlite_rusqlite;

use crate::StoreError;

/// Default path of the canvass `SQLite` database.
pub const DEFAULT_DB_PATH: &str = "data/canvass.db";

/// Opens (or creates) the canvass `SQLite` database and ensures the schema
/// exists.
///
/// # Errors
///
/// Returns [`StoreError`] if the database cannot be opened or schema
/// creation fails.
pub async fn open_db(path: &Path) -> Result<Box<dyn Database>, StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    log::debug!("Opening canvass database at {}", path.display());
    let db = init_sqlite_rusqlite(Some(path)).map_err(|e| StoreError::Connection(e.to_string()))?;

    ensure_schema(db.as_ref()).await?;

    Ok(db)
}

/// Creates all document tables if they don't already exist.
async fn ensure_schema(db: &dyn Database) -> Result<(), StoreError> {
    for table in ["areas", "area_assignments", "locations"] {
        db.exec_raw(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id          TEXT PRIMARY KEY,
                org_id      INTEGER NOT NULL,
                document    TEXT NOT NULL,
                updated_at  TEXT NOT NULL
            )"
        ))
        .await?;
    }

    db.exec_raw("CREATE INDEX IF NOT EXISTS idx_locations_org ON locations (org_id)")
        .await?;

    Ok(())
}
