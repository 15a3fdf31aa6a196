// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeMap;

use fieldops::{AssignmentStore, CommitOutcome, OpenAssignment, VersionGuard, WorkloadScope};
use fieldops_audit::AssignmentRecord;
use fieldops_domain::{
    Area, AreaId, Complaint, ComplaintId, ComplaintStatus, Technician, TechnicianId,
};
use time::OffsetDateTime;

use crate::error::PersistenceError;
use crate::{Persistence, mutations, queries};

impl AssignmentStore for Persistence {
    type Error = PersistenceError;

    fn find_complaint(&mut self, id: ComplaintId) -> Result<Option<Complaint>, Self::Error> {
        queries::complaints::find_complaint(&mut self.conn, id)
    }

    fn list_complaints(&mut self) -> Result<Vec<Complaint>, Self::Error> {
        queries::complaints::list_complaints(&mut self.conn)
    }

    fn find_technician(&mut self, id: TechnicianId) -> Result<Option<Technician>, Self::Error> {
        queries::technicians::find_technician(&mut self.conn, id)
    }

    fn list_area_technicians(&mut self, area_id: AreaId) -> Result<Vec<Technician>, Self::Error> {
        queries::technicians::list_area_technicians(&mut self.conn, area_id)
    }

    fn find_area(&mut self, id: AreaId) -> Result<Option<Area>, Self::Error> {
        queries::areas::find_area(&mut self.conn, id)
    }

    fn set_area_manager(
        &mut self,
        area_id: AreaId,
        technician_id: TechnicianId,
    ) -> Result<(), Self::Error> {
        mutations::assignments::set_area_manager(&mut self.conn, area_id, technician_id)
    }

    fn list_open_assignments(
        &mut self,
        scope: WorkloadScope,
    ) -> Result<Vec<OpenAssignment>, Self::Error> {
        queries::assignments::list_open_assignments(&mut self.conn, scope)
    }

    fn latest_assignment_starts(
        &mut self,
        technicians: &[TechnicianId],
    ) -> Result<BTreeMap<TechnicianId, OffsetDateTime>, Self::Error> {
        queries::assignments::latest_assignment_starts(&mut self.conn, technicians)
    }

    fn active_record(
        &mut self,
        complaint_id: ComplaintId,
    ) -> Result<Option<AssignmentRecord>, Self::Error> {
        queries::assignments::active_record(&mut self.conn, complaint_id)
    }

    fn assignment_history(
        &mut self,
        complaint_id: ComplaintId,
    ) -> Result<Vec<AssignmentRecord>, Self::Error> {
        queries::assignments::assignment_history(&mut self.conn, complaint_id)
    }

    fn commit_assignment(
        &mut self,
        guard: &VersionGuard,
        record: &AssignmentRecord,
    ) -> Result<CommitOutcome<AssignmentRecord>, Self::Error> {
        mutations::assignments::commit_assignment(&mut self.conn, guard, record)
    }

    fn commit_reassignment(
        &mut self,
        guard: &VersionGuard,
        closing_record_id: i64,
        ended_at: OffsetDateTime,
        record: &AssignmentRecord,
    ) -> Result<CommitOutcome<AssignmentRecord>, Self::Error> {
        mutations::assignments::commit_reassignment(
            &mut self.conn,
            guard,
            closing_record_id,
            ended_at,
            record,
        )
    }

    fn commit_status(
        &mut self,
        guard: &VersionGuard,
        target: ComplaintStatus,
        resolved_at: Option<OffsetDateTime>,
    ) -> Result<CommitOutcome<Complaint>, Self::Error> {
        mutations::assignments::commit_status(&mut self.conn, guard, target, resolved_at)
    }
}
