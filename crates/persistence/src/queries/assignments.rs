// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Assignment record queries.

use std::collections::BTreeMap;

use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use fieldops::{OpenAssignment, WorkloadScope};
use fieldops_audit::AssignmentRecord;
use fieldops_domain::{AreaId, ComplaintId, ComplaintStatus, TechnicianId};
use std::str::FromStr;
use time::OffsetDateTime;

use crate::data_models::{AssignmentRecordRow, parse_timestamp};
use crate::diesel_schema::{assignment_records, complaints, technicians};
use crate::error::PersistenceError;

/// Lists open records in `scope`, joined with complaint status and the
/// holding technician's area.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is malformed.
pub fn list_open_assignments(
    conn: &mut SqliteConnection,
    scope: WorkloadScope,
) -> Result<Vec<OpenAssignment>, PersistenceError> {
    let mut query = assignment_records::table
        .inner_join(complaints::table)
        .inner_join(technicians::table)
        .filter(assignment_records::ended_at.is_null())
        .select((
            AssignmentRecordRow::as_select(),
            complaints::status,
            technicians::area_id,
        ))
        .order(assignment_records::record_id.asc())
        .into_boxed::<Sqlite>();

    match scope {
        WorkloadScope::Technician(technician_id) => {
            query = query.filter(assignment_records::technician_id.eq(technician_id.value()));
        }
        WorkloadScope::Area(area_id) => {
            query = query.filter(technicians::area_id.eq(area_id.value()));
        }
        WorkloadScope::All => {}
    }

    let rows: Vec<(AssignmentRecordRow, String, i64)> = query
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_open_assignments: {e}")))?;

    rows.into_iter()
        .map(|(row, status, area_id)| {
            Ok(OpenAssignment {
                record: AssignmentRecord::try_from(row)?,
                complaint_status: ComplaintStatus::from_str(&status)?,
                technician_area_id: AreaId::new(area_id),
            })
        })
        .collect()
}

/// Returns the latest `started_at` per technician over all their records.
///
/// The maximum is taken by the database on the fixed-width stored text.
///
/// # Errors
///
/// Returns an error if the query fails or a stored timestamp is malformed.
pub fn latest_assignment_starts(
    conn: &mut SqliteConnection,
    technician_ids: &[TechnicianId],
) -> Result<BTreeMap<TechnicianId, OffsetDateTime>, PersistenceError> {
    use diesel::dsl::max;

    let ids: Vec<i64> = technician_ids.iter().map(|id| id.value()).collect();

    let rows: Vec<(i64, Option<String>)> = assignment_records::table
        .filter(assignment_records::technician_id.eq_any(ids))
        .group_by(assignment_records::technician_id)
        .select((
            assignment_records::technician_id,
            max(assignment_records::started_at),
        ))
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("latest_assignment_starts: {e}")))?;

    rows.into_iter()
        .filter_map(|(technician_id, started_at)| {
            started_at.map(|value| (TechnicianId::new(technician_id), value))
        })
        .map(|(technician_id, started_at)| Ok((technician_id, parse_timestamp(&started_at)?)))
        .collect()
}

/// Returns the open record of a complaint.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is malformed.
pub fn active_record(
    conn: &mut SqliteConnection,
    complaint_id: ComplaintId,
) -> Result<Option<AssignmentRecord>, PersistenceError> {
    assignment_records::table
        .filter(assignment_records::complaint_id.eq(complaint_id.value()))
        .filter(assignment_records::ended_at.is_null())
        .select(AssignmentRecordRow::as_select())
        .first::<AssignmentRecordRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("active_record: {e}")))?
        .map(AssignmentRecord::try_from)
        .transpose()
}

/// Returns every record of a complaint in insertion order.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is malformed.
pub fn assignment_history(
    conn: &mut SqliteConnection,
    complaint_id: ComplaintId,
) -> Result<Vec<AssignmentRecord>, PersistenceError> {
    assignment_records::table
        .filter(assignment_records::complaint_id.eq(complaint_id.value()))
        .select(AssignmentRecordRow::as_select())
        .order(assignment_records::record_id.asc())
        .load::<AssignmentRecordRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("assignment_history: {e}")))?
        .into_iter()
        .map(AssignmentRecord::try_from)
        .collect()
}
