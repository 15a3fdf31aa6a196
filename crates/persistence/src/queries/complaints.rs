// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fieldops_domain::{Complaint, ComplaintId};

use crate::data_models::ComplaintRow;
use crate::diesel_schema::complaints;
use crate::error::PersistenceError;

/// Looks up a complaint by identifier.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is malformed.
pub fn find_complaint(
    conn: &mut SqliteConnection,
    complaint_id: ComplaintId,
) -> Result<Option<Complaint>, PersistenceError> {
    complaints::table
        .filter(complaints::complaint_id.eq(complaint_id.value()))
        .select(ComplaintRow::as_select())
        .first::<ComplaintRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("find_complaint: {e}")))?
        .map(Complaint::try_from)
        .transpose()
}

/// Lists every complaint, ordered by identifier.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is malformed.
pub fn list_complaints(conn: &mut SqliteConnection) -> Result<Vec<Complaint>, PersistenceError> {
    complaints::table
        .select(ComplaintRow::as_select())
        .order(complaints::complaint_id.asc())
        .load::<ComplaintRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_complaints: {e}")))?
        .into_iter()
        .map(Complaint::try_from)
        .collect()
}
