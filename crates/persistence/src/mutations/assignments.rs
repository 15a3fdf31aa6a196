// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Guarded assignment writes.
//!
//! Each commit runs in one transaction. The complaint row is updated first
//! with `WHERE version = ? AND status = ?`; zero affected rows means another
//! writer won and the transaction ends without further writes. Any failure
//! after that point returns an error, which rolls the transaction back.

use diesel::SqliteConnection;
use diesel::dsl;
use diesel::prelude::*;
use fieldops::{CommitOutcome, VersionGuard};
use fieldops_audit::AssignmentRecord;
use fieldops_domain::{AreaId, Complaint, ComplaintStatus, TechnicianId};
use time::OffsetDateTime;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{NewAssignmentRecord, format_timestamp};
use crate::diesel_schema::{areas, assignment_records, complaints};
use crate::error::PersistenceError;
use crate::queries;

fn insert_record(
    conn: &mut SqliteConnection,
    record: &AssignmentRecord,
) -> Result<AssignmentRecord, PersistenceError> {
    diesel::insert_into(assignment_records::table)
        .values(&NewAssignmentRecord::from_record(record)?)
        .execute(conn)?;
    let record_id: i64 = get_last_insert_rowid(conn)?;

    let mut stored: AssignmentRecord = record.clone();
    stored.record_id = Some(record_id);
    Ok(stored)
}

type GuardedComplaint = dsl::Filter<
    dsl::Filter<
        dsl::Filter<complaints::table, dsl::Eq<complaints::complaint_id, i64>>,
        dsl::Eq<complaints::version, i64>,
    >,
    dsl::Eq<complaints::status, &'static str>,
>;

// The complaint row, only if it still has the version and status the
// caller read.
fn guarded_complaint(guard: &VersionGuard) -> GuardedComplaint {
    complaints::table
        .filter(complaints::complaint_id.eq(guard.complaint_id.value()))
        .filter(complaints::version.eq(guard.version))
        .filter(complaints::status.eq(guard.status.as_str()))
}

/// Assigns an unassigned complaint and inserts its first open record.
///
/// # Errors
///
/// Returns an error if the transaction fails.
pub fn commit_assignment(
    conn: &mut SqliteConnection,
    guard: &VersionGuard,
    record: &AssignmentRecord,
) -> Result<CommitOutcome<AssignmentRecord>, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let updated: usize = diesel::update(guarded_complaint(guard))
            .set((
                complaints::assigned_technician_id.eq(Some(record.technician_id.value())),
                complaints::status.eq(ComplaintStatus::Assigned.as_str()),
                complaints::version.eq(complaints::version + 1_i64),
            ))
            .execute(conn)?;

        if updated == 0 {
            return Ok(CommitOutcome::Conflict);
        }

        Ok(CommitOutcome::Committed(insert_record(conn, record)?))
    })
}

/// Closes the open record `closing_record_id`, inserts `record` and points
/// the complaint at the new technician.
///
/// # Errors
///
/// Returns `PersistenceError::RecordAlreadyClosed` (after rolling back) if
/// the record to close is not open, or an error if the transaction fails.
pub fn commit_reassignment(
    conn: &mut SqliteConnection,
    guard: &VersionGuard,
    closing_record_id: i64,
    ended_at: OffsetDateTime,
    record: &AssignmentRecord,
) -> Result<CommitOutcome<AssignmentRecord>, PersistenceError> {
    let ended_at: String = format_timestamp(ended_at)?;

    conn.transaction::<_, PersistenceError, _>(|conn| {
        let updated: usize = diesel::update(guarded_complaint(guard))
            .set((
                complaints::assigned_technician_id.eq(Some(record.technician_id.value())),
                complaints::version.eq(complaints::version + 1_i64),
            ))
            .execute(conn)?;

        if updated == 0 {
            return Ok(CommitOutcome::Conflict);
        }

        let closed: usize = diesel::update(
            assignment_records::table
                .filter(assignment_records::record_id.eq(closing_record_id))
                .filter(assignment_records::complaint_id.eq(guard.complaint_id.value()))
                .filter(assignment_records::ended_at.is_null()),
        )
        .set(assignment_records::ended_at.eq(Some(ended_at.as_str())))
        .execute(conn)?;

        if closed == 0 {
            return Err(PersistenceError::RecordAlreadyClosed(closing_record_id));
        }

        Ok(CommitOutcome::Committed(insert_record(conn, record)?))
    })
}

/// Moves a complaint to `target` and stores `resolved_at`.
///
/// # Errors
///
/// Returns an error if the transaction fails.
pub fn commit_status(
    conn: &mut SqliteConnection,
    guard: &VersionGuard,
    target: ComplaintStatus,
    resolved_at: Option<OffsetDateTime>,
) -> Result<CommitOutcome<Complaint>, PersistenceError> {
    let resolved_at: Option<String> = resolved_at.map(format_timestamp).transpose()?;

    conn.transaction::<_, PersistenceError, _>(|conn| {
        let updated: usize = diesel::update(guarded_complaint(guard))
            .set((
                complaints::status.eq(target.as_str()),
                complaints::resolved_at.eq(resolved_at.as_deref()),
                complaints::version.eq(complaints::version + 1_i64),
            ))
            .execute(conn)?;

        if updated == 0 {
            return Ok(CommitOutcome::Conflict);
        }

        let complaint: Complaint = queries::complaints::find_complaint(conn, guard.complaint_id)?
            .ok_or_else(|| {
                PersistenceError::NotFound(format!("complaint {}", guard.complaint_id))
            })?;
        Ok(CommitOutcome::Committed(complaint))
    })
}

/// Sets the manager link of an area.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the area does not exist.
pub fn set_area_manager(
    conn: &mut SqliteConnection,
    area_id: AreaId,
    technician_id: TechnicianId,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(areas::table.filter(areas::area_id.eq(area_id.value())))
        .set(areas::manager_id.eq(Some(technician_id.value())))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("area {area_id}")));
    }
    Ok(())
}
