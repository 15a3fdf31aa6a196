// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fieldops_domain::{
    Area, AreaId, Complaint, ComplaintId, ComplaintStatus, Priority, Technician, TechnicianId,
};
use time::OffsetDateTime;
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{NewArea, NewComplaint, NewTechnician, format_timestamp};
use crate::diesel_schema::{areas, complaints, technicians};
use crate::error::PersistenceError;

/// Inserts an area without a manager.
///
/// # Errors
///
/// Returns an error if the insert fails (e.g., duplicate code).
pub fn create_area(
    conn: &mut SqliteConnection,
    code: &str,
    name: &str,
) -> Result<Area, PersistenceError> {
    diesel::insert_into(areas::table)
        .values(&NewArea {
            area_code: code,
            area_name: name,
        })
        .execute(conn)?;
    let area_id: i64 = get_last_insert_rowid(conn)?;

    debug!(area_id, code, "Created area");
    Ok(Area::new(
        AreaId::new(area_id),
        code.to_string(),
        name.to_string(),
        None,
    ))
}

/// Inserts a technician into `area_id`.
///
/// # Errors
///
/// Returns an error if the insert fails (e.g., unknown area).
pub fn create_technician(
    conn: &mut SqliteConnection,
    area_id: AreaId,
    name: &str,
    active: bool,
) -> Result<Technician, PersistenceError> {
    diesel::insert_into(technicians::table)
        .values(&NewTechnician {
            area_id: area_id.value(),
            name,
            is_active: i32::from(active),
        })
        .execute(conn)?;
    let technician_id: i64 = get_last_insert_rowid(conn)?;

    debug!(technician_id, area_id = %area_id, "Created technician");
    Ok(Technician::new(
        TechnicianId::new(technician_id),
        area_id,
        name.to_string(),
        active,
    ))
}

/// Activates or deactivates a technician.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the technician does not exist.
pub fn set_technician_active(
    conn: &mut SqliteConnection,
    technician_id: TechnicianId,
    active: bool,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        technicians::table.filter(technicians::technician_id.eq(technician_id.value())),
    )
    .set(technicians::is_active.eq(i32::from(active)))
    .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "technician {technician_id}"
        )));
    }
    Ok(())
}

/// Inserts an unassigned complaint raised at `created_at`.
///
/// # Errors
///
/// Returns an error if the insert fails (e.g., unknown area).
pub fn create_complaint(
    conn: &mut SqliteConnection,
    area_id: AreaId,
    priority: Priority,
    created_at: OffsetDateTime,
) -> Result<Complaint, PersistenceError> {
    diesel::insert_into(complaints::table)
        .values(&NewComplaint {
            area_id: area_id.value(),
            status: ComplaintStatus::Unassigned.as_str(),
            priority: priority.as_str(),
            created_at: format_timestamp(created_at)?,
            version: 0,
        })
        .execute(conn)?;
    let complaint_id: i64 = get_last_insert_rowid(conn)?;

    debug!(complaint_id, area_id = %area_id, "Created complaint");
    Ok(Complaint::new_unassigned(
        ComplaintId::new(complaint_id),
        area_id,
        priority,
        created_at,
    ))
}
