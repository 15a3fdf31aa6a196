// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fieldops_domain::{AreaId, Technician, TechnicianId};

use crate::data_models::TechnicianRow;
use crate::diesel_schema::technicians;
use crate::error::PersistenceError;

/// Looks up a technician by identifier.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_technician(
    conn: &mut SqliteConnection,
    technician_id: TechnicianId,
) -> Result<Option<Technician>, PersistenceError> {
    technicians::table
        .filter(technicians::technician_id.eq(technician_id.value()))
        .select(TechnicianRow::as_select())
        .first::<TechnicianRow>(conn)
        .optional()
        .map(|row| row.map(Technician::from))
        .map_err(|e| PersistenceError::QueryFailed(format!("find_technician: {e}")))
}

/// Lists the technicians of an area, active or not, ordered by identifier.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_area_technicians(
    conn: &mut SqliteConnection,
    area_id: AreaId,
) -> Result<Vec<Technician>, PersistenceError> {
    let rows: Vec<TechnicianRow> = technicians::table
        .filter(technicians::area_id.eq(area_id.value()))
        .select(TechnicianRow::as_select())
        .order(technicians::technician_id.asc())
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_area_technicians: {e}")))?;
    Ok(rows.into_iter().map(Technician::from).collect())
}
