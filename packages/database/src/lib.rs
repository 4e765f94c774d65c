#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Canvass document store.
//!
//! [`CanvassStore`] is the data-access interface the area graph is computed
//! from. Two backends are provided:
//!
//! - [`queries::SqliteStore`]: assignments, areas and locations kept as JSON
//!   documents in `SQLite` via `switchy_database`, one row per document.
//! - [`memory::MemoryStore`]: an in-memory [`CanvassSnapshot`], used by
//!   tests.
//!
//! Snapshots are loaded into `SQLite` with [`queries::import_snapshot`].

pub mod db;
pub mod memory;
pub mod queries;

use async_trait::async_trait;
use canvass_map_canvass_models::{Area, Assignment, Location};

pub use canvass_map_canvass_models::CanvassSnapshot;

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database query error.
    #[error("Database error: {0}")]
    Database(#[from] switchy_database::DatabaseError),

    /// The database could not be opened.
    #[error("Connection error: {0}")]
    Connection(String),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored document could not be encoded or decoded.
    #[error("Document error: {0}")]
    Document(#[from] serde_json::Error),

    /// Data conversion error.
    #[error("Data conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

/// Read access to the canvass documents of one store.
///
/// Implementations are shared across request handlers behind an `Arc`.
#[async_trait]
pub trait CanvassStore: Send + Sync {
    /// Fetches an assignment by ID.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    async fn get_assignment(&self, id: &str) -> Result<Option<Assignment>, StoreError>;

    /// Fetches an area by ID.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    async fn get_area(&self, id: &str) -> Result<Option<Area>, StoreError>;

    /// Lists every location of an organization, with households and visits.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    async fn list_locations(&self, org_id: i64) -> Result<Vec<Location>, StoreError>;
}
