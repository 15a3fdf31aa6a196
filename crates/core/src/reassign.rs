// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fieldops_audit::AssignmentRecord;
use fieldops_domain::{
    Complaint, ComplaintId, DomainError, Technician, TechnicianId, validate_assignment_target,
    validate_reason, validate_reassignment,
};
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::engine::{
    AssignmentAuthority, MAX_CAS_RETRIES, cas_exhausted, load_complaint, load_technician,
};
use crate::error::CoreError;
use crate::notify::{AssignmentEvent, AssignmentNotifier, dispatch};
use crate::store::{AssignmentStore, CommitOutcome, VersionGuard};

/// Hands assigned complaints from one technician to another.
///
/// The current record is closed and the new one opened in the same
/// transaction, so a complaint never has two open records.
pub struct ReassignmentCoordinator<'a, S: AssignmentStore> {
    store: &'a mut S,
    notifier: &'a dyn AssignmentNotifier,
}

impl<'a, S: AssignmentStore> ReassignmentCoordinator<'a, S> {
    pub const fn new(store: &'a mut S, notifier: &'a dyn AssignmentNotifier) -> Self {
        Self { store, notifier }
    }

    /// Moves `complaint_id` to `new_technician_id`.
    ///
    /// # Errors
    ///
    /// - `ValidationError` if `reason` is blank
    /// - `NotFound` if the complaint or technician does not exist
    /// - `InvalidState` if the complaint is not `assigned`/`in_progress`,
    ///   already belongs to `new_technician_id`, or the technician is not
    ///   eligible
    /// - `ConcurrentModification` if every commit attempt conflicted
    pub fn reassign(
        &mut self,
        complaint_id: ComplaintId,
        new_technician_id: TechnicianId,
        authority: &AssignmentAuthority,
        reason: &str,
    ) -> Result<AssignmentRecord, CoreError> {
        validate_reason(reason)?;

        for attempt in 0..=MAX_CAS_RETRIES {
            let complaint: Complaint = load_complaint(&mut *self.store, complaint_id)?;
            let technician: Technician = load_technician(&mut *self.store, new_technician_id)?;
            validate_reassignment(&complaint, new_technician_id)?;
            validate_assignment_target(
                &complaint,
                &technician,
                authority.area_override.is_granted(),
            )?;

            let current: AssignmentRecord = self
                .store
                .active_record(complaint_id)
                .map_err(CoreError::storage)?
                .ok_or(DomainError::MissingActiveAssignment(complaint_id))?;
            let closing_record_id: i64 = current.record_id.ok_or_else(|| {
                CoreError::Storage(format!(
                    "open record of complaint {complaint_id} has no identifier"
                ))
            })?;

            let now: OffsetDateTime = OffsetDateTime::now_utc();
            let record: AssignmentRecord = AssignmentRecord::open(
                complaint_id,
                new_technician_id,
                &authority.actor,
                reason.trim().to_string(),
                now,
            );

            match self
                .store
                .commit_reassignment(&VersionGuard::of(&complaint), closing_record_id, now, &record)
                .map_err(CoreError::storage)?
            {
                CommitOutcome::Committed(stored) => {
                    info!(
                        complaint_id = %complaint_id,
                        from = %current.technician_id,
                        to = %new_technician_id,
                        assigned_by = %stored.assigned_by,
                        "Complaint reassigned"
                    );
                    dispatch(
                        self.notifier,
                        &AssignmentEvent::Reassigned {
                            record: stored.clone(),
                            area_id: complaint.area_id,
                            previous_technician_id: current.technician_id,
                        },
                    );
                    return Ok(stored);
                }
                CommitOutcome::Conflict => {
                    warn!(
                        complaint_id = %complaint_id,
                        version = complaint.version,
                        attempt = attempt + 1,
                        "Reassignment lost a concurrent update"
                    );
                }
            }
        }

        Err(cas_exhausted(complaint_id))
    }
}
