//! `SQLite`-backed [`CanvassStore`] and snapshot import.
//!
//! Each document table holds one JSON document per row, keyed by ID and
//! indexed by organization. Locations embed their households and visits,
//! so a location is always read and written as a whole.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use canvass_map_canvass_models::{Area, Assignment, CanvassSnapshot, Location};
use moosicbox_json_utils::database::ToValue as _;
use serde_json::Value;
use switchy_database::{Database, DatabaseValue};

use crate::{CanvassStore, StoreError};

/// Canvass store backed by a `switchy_database` connection.
pub struct SqliteStore {
    db: Arc<dyn Database>,
}

impl SqliteStore {
    /// Wraps an already-open database connection.
    #[must_use]
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }

    /// Opens the database at `path`, creating the schema if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the database cannot be opened.
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        let db = crate::db::open_db(path).await?;
        Ok(Self::new(Arc::from(db)))
    }

    /// The underlying connection.
    #[must_use]
    pub fn database(&self) -> &dyn Database {
        self.db.as_ref()
    }
}

#[async_trait]
impl CanvassStore for SqliteStore {
    async fn get_assignment(&self, id: &str) -> Result<Option<Assignment>, StoreError> {
        get_document(self.db.as_ref(), "area_assignments", id).await
    }

    async fn get_area(&self, id: &str) -> Result<Option<Area>, StoreError> {
        get_document(self.db.as_ref(), "areas", id).await
    }

    async fn list_locations(&self, org_id: i64) -> Result<Vec<Location>, StoreError> {
        let rows = self
            .db
            .query_raw_params(
                "SELECT document FROM locations WHERE org_id = $1 ORDER BY rowid",
                &[DatabaseValue::Int64(org_id)],
            )
            .await?;

        let mut locations = Vec::with_capacity(rows.len());
        for row in &rows {
            let document: String = row.to_value("document").map_err(|e| StoreError::Conversion {
                message: format!("Failed to read location document: {e}"),
            })?;
            locations.push(serde_json::from_str(&document)?);
        }

        log::debug!("Loaded {} location(s) for org {org_id}", locations.len());

        Ok(locations)
    }
}

async fn get_document<T: serde::de::DeserializeOwned>(
    db: &dyn Database,
    table: &str,
    id: &str,
) -> Result<Option<T>, StoreError> {
    let rows = db
        .query_raw_params(
            &format!("SELECT document FROM {table} WHERE id = $1"),
            &[DatabaseValue::String(id.to_string())],
        )
        .await?;

    let Some(row) = rows.first() else {
        return Ok(None);
    };

    let document: String = row.to_value("document").map_err(|e| StoreError::Conversion {
        message: format!("Failed to read {table} document {id}: {e}"),
    })?;

    Ok(Some(serde_json::from_str(&document)?))
}

async fn upsert_document(
    db: &dyn Database,
    table: &str,
    id: &str,
    org_id: i64,
    document: Value,
) -> Result<(), StoreError> {
    let now = chrono::Utc::now().to_rfc3339();

    db.exec_raw_params(
        &format!(
            "INSERT INTO {table} (id, org_id, document, updated_at)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (id) DO UPDATE SET
                 org_id = excluded.org_id,
                 document = excluded.document,
                 updated_at = excluded.updated_at"
        ),
        &[
            DatabaseValue::String(id.to_string()),
            DatabaseValue::Int64(org_id),
            DatabaseValue::String(document.to_string()),
            DatabaseValue::String(now),
        ],
    )
    .await?;

    Ok(())
}

/// Inserts or replaces an area document.
///
/// # Errors
///
/// Returns [`StoreError`] if encoding or the database write fails.
pub async fn upsert_area(db: &dyn Database, area: &Area) -> Result<(), StoreError> {
    upsert_document(db, "areas", &area.id, area.org_id, serde_json::to_value(area)?).await
}

/// Inserts or replaces an assignment document.
///
/// # Errors
///
/// Returns [`StoreError`] if encoding or the database write fails.
pub async fn upsert_assignment(db: &dyn Database, assignment: &Assignment) -> Result<(), StoreError> {
    upsert_document(
        db,
        "area_assignments",
        &assignment.id,
        assignment.org_id,
        serde_json::to_value(assignment)?,
    )
    .await
}

/// Inserts or replaces a location document, households and visits included.
///
/// # Errors
///
/// Returns [`StoreError`] if encoding or the database write fails.
pub async fn upsert_location(db: &dyn Database, location: &Location) -> Result<(), StoreError> {
    upsert_document(
        db,
        "locations",
        &location.id,
        location.org_id,
        serde_json::to_value(location)?,
    )
    .await
}

/// Counts of documents written by [`import_snapshot`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Areas written.
    pub areas: usize,
    /// Assignments written.
    pub assignments: usize,
    /// Locations written.
    pub locations: usize,
}

/// Writes every document of `snapshot`, replacing documents with the same
/// ID.
///
/// # Errors
///
/// Returns [`StoreError`] on the first failed write.
pub async fn import_snapshot(
    db: &dyn Database,
    snapshot: &CanvassSnapshot,
) -> Result<ImportSummary, StoreError> {
    for area in &snapshot.areas {
        upsert_area(db, area).await?;
    }
    for assignment in &snapshot.assignments {
        upsert_assignment(db, assignment).await?;
    }
    for location in &snapshot.locations {
        upsert_location(db, location).await?;
    }

    let summary = ImportSummary {
        areas: snapshot.areas.len(),
        assignments: snapshot.assignments.len(),
        locations: snapshot.locations.len(),
    };
    log::info!(
        "Imported {} area(s), {} assignment(s), {} location(s)",
        summary.areas,
        summary.assignments,
        summary.locations
    );

    Ok(summary)
}

/// Reads a snapshot from a JSON file.
///
/// # Errors
///
/// Returns [`StoreError`] if the file cannot be read or parsed.
pub fn read_snapshot(path: &Path) -> Result<CanvassSnapshot, StoreError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}
