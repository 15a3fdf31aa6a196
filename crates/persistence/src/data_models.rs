// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and their conversion to domain values.
//!
//! Timestamps are stored as fixed-width RFC 3339 text in UTC with nine
//! fractional digits, so text order equals time order and `MAX()` over a
//! timestamp column is meaningful.

use diesel::prelude::*;
use fieldops_audit::AssignmentRecord;
use fieldops_domain::{
    Area, AreaId, Complaint, ComplaintId, ComplaintStatus, Priority, Technician, TechnicianId,
};
use std::str::FromStr;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::diesel_schema::{areas, assignment_records, complaints, technicians};
use crate::error::PersistenceError;

pub fn format_timestamp(value: OffsetDateTime) -> Result<String, PersistenceError> {
    Ok(value.to_offset(UtcOffset::UTC).format(format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:9]Z"
    ))?)
}

pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    Ok(OffsetDateTime::parse(value, &Rfc3339)?)
}

fn parse_optional_timestamp(
    value: Option<&str>,
) -> Result<Option<OffsetDateTime>, PersistenceError> {
    value.map(parse_timestamp).transpose()
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = areas)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AreaRow {
    pub area_id: i64,
    pub area_code: String,
    pub area_name: String,
    pub manager_id: Option<i64>,
}

impl From<AreaRow> for Area {
    fn from(row: AreaRow) -> Self {
        Self::new(
            AreaId::new(row.area_id),
            row.area_code,
            row.area_name,
            row.manager_id.map(TechnicianId::new),
        )
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = areas)]
pub struct NewArea<'a> {
    pub area_code: &'a str,
    pub area_name: &'a str,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = technicians)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TechnicianRow {
    pub technician_id: i64,
    pub area_id: i64,
    pub name: String,
    pub is_active: i32,
}

impl From<TechnicianRow> for Technician {
    fn from(row: TechnicianRow) -> Self {
        Self::new(
            TechnicianId::new(row.technician_id),
            AreaId::new(row.area_id),
            row.name,
            row.is_active != 0,
        )
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = technicians)]
pub struct NewTechnician<'a> {
    pub area_id: i64,
    pub name: &'a str,
    pub is_active: i32,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = complaints)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ComplaintRow {
    pub complaint_id: i64,
    pub area_id: i64,
    pub assigned_technician_id: Option<i64>,
    pub status: String,
    pub priority: String,
    pub created_at: String,
    pub resolved_at: Option<String>,
    pub version: i64,
}

impl TryFrom<ComplaintRow> for Complaint {
    type Error = PersistenceError;

    fn try_from(row: ComplaintRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ComplaintId::new(row.complaint_id),
            area_id: AreaId::new(row.area_id),
            assigned_technician_id: row.assigned_technician_id.map(TechnicianId::new),
            status: ComplaintStatus::from_str(&row.status)?,
            priority: Priority::from_str(&row.priority)?,
            created_at: parse_timestamp(&row.created_at)?,
            resolved_at: parse_optional_timestamp(row.resolved_at.as_deref())?,
            version: row.version,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = complaints)]
pub struct NewComplaint<'a> {
    pub area_id: i64,
    pub status: &'a str,
    pub priority: &'a str,
    pub created_at: String,
    pub version: i64,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = assignment_records)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AssignmentRecordRow {
    pub record_id: i64,
    pub complaint_id: i64,
    pub technician_id: i64,
    pub assigned_by: String,
    pub reason: String,
    pub started_at: String,
    pub ended_at: Option<String>,
}

impl TryFrom<AssignmentRecordRow> for AssignmentRecord {
    type Error = PersistenceError;

    fn try_from(row: AssignmentRecordRow) -> Result<Self, Self::Error> {
        Ok(Self {
            record_id: Some(row.record_id),
            complaint_id: ComplaintId::new(row.complaint_id),
            technician_id: TechnicianId::new(row.technician_id),
            assigned_by: row.assigned_by,
            reason: row.reason,
            started_at: parse_timestamp(&row.started_at)?,
            ended_at: parse_optional_timestamp(row.ended_at.as_deref())?,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = assignment_records)]
pub struct NewAssignmentRecord<'a> {
    pub complaint_id: i64,
    pub technician_id: i64,
    pub assigned_by: &'a str,
    pub reason: &'a str,
    pub started_at: String,
}

impl<'a> NewAssignmentRecord<'a> {
    pub fn from_record(record: &'a AssignmentRecord) -> Result<Self, PersistenceError> {
        Ok(Self {
            complaint_id: record.complaint_id.value(),
            technician_id: record.technician_id.value(),
            assigned_by: &record.assigned_by,
            reason: &record.reason,
            started_at: format_timestamp(record.started_at)?,
        })
    }
}
