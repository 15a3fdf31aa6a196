// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fieldops_domain::{Area, AreaId};

use crate::data_models::AreaRow;
use crate::diesel_schema::areas;
use crate::error::PersistenceError;

/// Looks up an area by identifier.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_area(
    conn: &mut SqliteConnection,
    area_id: AreaId,
) -> Result<Option<Area>, PersistenceError> {
    areas::table
        .filter(areas::area_id.eq(area_id.value()))
        .select(AreaRow::as_select())
        .first::<AreaRow>(conn)
        .optional()
        .map(|row| row.map(Area::from))
        .map_err(|e| PersistenceError::QueryFailed(format!("find_area: {e}")))
}

/// Lists every area, ordered by identifier.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_areas(conn: &mut SqliteConnection) -> Result<Vec<Area>, PersistenceError> {
    let rows: Vec<AreaRow> = areas::table
        .select(AreaRow::as_select())
        .order(areas::area_id.asc())
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_areas: {e}")))?;
    Ok(rows.into_iter().map(Area::from).collect())
}
