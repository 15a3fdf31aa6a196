// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The repository boundary of the assignment engine.
//!
//! The engine never holds a lock across a read and the following write.
//! Every write is conditional on the complaint's `version` and `status`
//! as read (a [`VersionGuard`]); a store reports [`CommitOutcome::Conflict`]
//! when another writer got there first and the engine retries from fresh
//! reads.

use std::collections::BTreeMap;

use fieldops_audit::AssignmentRecord;
use fieldops_domain::{
    Area, AreaId, Complaint, ComplaintId, ComplaintStatus, Technician, TechnicianId,
};
use time::OffsetDateTime;

/// Which open assignment records to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkloadScope {
    /// Records held by one technician.
    Technician(TechnicianId),
    /// Records held by technicians of one area.
    Area(AreaId),
    /// Every open record.
    All,
}

/// An open assignment record joined with the facts workload needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAssignment {
    pub record: AssignmentRecord,
    /// Current status of the complaint the record belongs to.
    pub complaint_status: ComplaintStatus,
    /// Area of the technician holding the record.
    pub technician_area_id: AreaId,
}

/// The state a conditional write expects to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionGuard {
    pub complaint_id: ComplaintId,
    pub version: i64,
    pub status: ComplaintStatus,
}

impl VersionGuard {
    /// Captures the guard for a complaint as just read.
    #[must_use]
    pub const fn of(complaint: &Complaint) -> Self {
        Self {
            complaint_id: complaint.id,
            version: complaint.version,
            status: complaint.status,
        }
    }
}

/// Result of a conditional write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome<T> {
    /// The guard matched; the write is durable.
    Committed(T),
    /// The complaint changed since it was read; nothing was written.
    Conflict,
}

/// Durable storage for complaints, technicians, areas and assignment records.
///
/// Each `commit_*` method is a single transaction: either every listed
/// effect is applied and the complaint's `version` is incremented by one,
/// or nothing is written.
pub trait AssignmentStore {
    /// The store's failure type, surfaced as `CoreError::Storage`.
    type Error: std::fmt::Display;

    /// Looks up a complaint.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn find_complaint(&mut self, id: ComplaintId) -> Result<Option<Complaint>, Self::Error>;

    /// Lists every complaint.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list_complaints(&mut self) -> Result<Vec<Complaint>, Self::Error>;

    /// Looks up a technician.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn find_technician(&mut self, id: TechnicianId) -> Result<Option<Technician>, Self::Error>;

    /// Lists the technicians of an area, active or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list_area_technicians(&mut self, area_id: AreaId) -> Result<Vec<Technician>, Self::Error>;

    /// Looks up an area.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn find_area(&mut self, id: AreaId) -> Result<Option<Area>, Self::Error>;

    /// Replaces the manager link of an area.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn set_area_manager(
        &mut self,
        area_id: AreaId,
        technician_id: TechnicianId,
    ) -> Result<(), Self::Error>;

    /// Lists open assignment records (`ended_at` unset) in `scope`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list_open_assignments(
        &mut self,
        scope: WorkloadScope,
    ) -> Result<Vec<OpenAssignment>, Self::Error>;

    /// Returns, per technician, the start of their most recent assignment,
    /// open or closed. Technicians never assigned are absent from the map.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn latest_assignment_starts(
        &mut self,
        technicians: &[TechnicianId],
    ) -> Result<BTreeMap<TechnicianId, OffsetDateTime>, Self::Error>;

    /// Returns the open record of a complaint, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn active_record(
        &mut self,
        complaint_id: ComplaintId,
    ) -> Result<Option<AssignmentRecord>, Self::Error>;

    /// Returns every record of a complaint, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn assignment_history(
        &mut self,
        complaint_id: ComplaintId,
    ) -> Result<Vec<AssignmentRecord>, Self::Error>;

    /// Assigns an unassigned complaint: sets its technician to
    /// `record.technician_id`, moves it to `assigned` and inserts `record`.
    ///
    /// Returns the stored record (with its identifier).
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails for a reason other than
    /// a guard mismatch.
    fn commit_assignment(
        &mut self,
        guard: &VersionGuard,
        record: &AssignmentRecord,
    ) -> Result<CommitOutcome<AssignmentRecord>, Self::Error>;

    /// Transfers an assigned complaint: closes the record `closing_record_id`
    /// at `ended_at`, inserts `record` and points the complaint at its
    /// technician. The status is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails for a reason other than
    /// a guard mismatch.
    fn commit_reassignment(
        &mut self,
        guard: &VersionGuard,
        closing_record_id: i64,
        ended_at: OffsetDateTime,
        record: &AssignmentRecord,
    ) -> Result<CommitOutcome<AssignmentRecord>, Self::Error>;

    /// Moves a complaint to `target`, storing `resolved_at` as given.
    ///
    /// Returns the updated complaint.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails for a reason other than
    /// a guard mismatch.
    fn commit_status(
        &mut self,
        guard: &VersionGuard,
        target: ComplaintStatus,
        resolved_at: Option<OffsetDateTime>,
    ) -> Result<CommitOutcome<Complaint>, Self::Error>;
}
