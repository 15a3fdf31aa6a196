// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite` persistence for the complaint assignment engine.
//!
//! [`Persistence`] owns one Diesel connection and implements
//! [`fieldops::AssignmentStore`]. Every guarded commit is a single
//! transaction, so an assignment record and the complaint row it describes
//! are always written together.
//!
//! ## Testing
//!
//! `Persistence::new_in_memory()` gives each caller its own shared-cache
//! in-memory database, so tests never see each other's rows.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use fieldops_domain::{Area, AreaId, Complaint, Priority, Technician, TechnicianId};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod store;

#[cfg(test)]
mod tests;

pub use backend::sqlite::MIGRATIONS;
pub use error::PersistenceError;

/// Source of unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter over a single `SQLite` connection.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Opens a fresh in-memory database with the schema applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:fieldops_mem_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Opens (or creates) a database file with the schema applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Re-checks that foreign key enforcement is on.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Intake
    // ========================================================================

    /// Creates an area without a manager.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_area(&mut self, code: &str, name: &str) -> Result<Area, PersistenceError> {
        mutations::intake::create_area(&mut self.conn, code, name)
    }

    /// Creates a technician.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_technician(
        &mut self,
        area_id: AreaId,
        name: &str,
        active: bool,
    ) -> Result<Technician, PersistenceError> {
        mutations::intake::create_technician(&mut self.conn, area_id, name, active)
    }

    /// Activates or deactivates a technician.
    ///
    /// # Errors
    ///
    /// Returns an error if the technician does not exist.
    pub fn set_technician_active(
        &mut self,
        technician_id: TechnicianId,
        active: bool,
    ) -> Result<(), PersistenceError> {
        mutations::intake::set_technician_active(&mut self.conn, technician_id, active)
    }

    /// Creates an unassigned complaint.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_complaint(
        &mut self,
        area_id: AreaId,
        priority: Priority,
        created_at: OffsetDateTime,
    ) -> Result<Complaint, PersistenceError> {
        mutations::intake::create_complaint(&mut self.conn, area_id, priority, created_at)
    }

    /// Lists every area.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_areas(&mut self) -> Result<Vec<Area>, PersistenceError> {
        queries::areas::list_areas(&mut self.conn)
    }
}
