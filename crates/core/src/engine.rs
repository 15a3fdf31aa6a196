// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeMap;

use fieldops_audit::{Actor, AssignmentRecord};
use fieldops_domain::{
    AreaId, Candidate, Complaint, ComplaintId, DomainError, Technician, TechnicianId,
    select_least_loaded, validate_assignment_target, validate_reason,
};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::notify::{AssignmentEvent, AssignmentNotifier, dispatch};
use crate::store::{AssignmentStore, CommitOutcome, VersionGuard};
use crate::workload::WorkloadTracker;

/// Compare-and-swap retries after the first attempt.
pub const MAX_CAS_RETRIES: u32 = 3;

/// Reason recorded on automatic assignments.
pub const AUTO_ASSIGN_REASON: &str = "Auto-assigned (load-balanced)";

/// Whether an actor may place a complaint with a technician of another area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaOverride {
    Denied,
    Granted,
}

impl AreaOverride {
    #[must_use]
    pub const fn from_bool(granted: bool) -> Self {
        if granted { Self::Granted } else { Self::Denied }
    }

    #[must_use]
    pub const fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// The actor behind an operator-initiated change and what they may do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentAuthority {
    pub actor: Actor,
    pub area_override: AreaOverride,
}

impl AssignmentAuthority {
    #[must_use]
    pub const fn new(actor: Actor, area_override: AreaOverride) -> Self {
        Self {
            actor,
            area_override,
        }
    }
}

pub(crate) fn load_complaint<S: AssignmentStore>(
    store: &mut S,
    complaint_id: ComplaintId,
) -> Result<Complaint, CoreError> {
    store
        .find_complaint(complaint_id)
        .map_err(CoreError::storage)?
        .ok_or_else(|| CoreError::not_found("Complaint", complaint_id.value()))
}

pub(crate) fn load_technician<S: AssignmentStore>(
    store: &mut S,
    technician_id: TechnicianId,
) -> Result<Technician, CoreError> {
    store
        .find_technician(technician_id)
        .map_err(CoreError::storage)?
        .ok_or_else(|| CoreError::not_found("Technician", technician_id.value()))
}

pub(crate) const fn cas_exhausted(complaint_id: ComplaintId) -> CoreError {
    CoreError::ConcurrentModification {
        complaint_id,
        attempts: MAX_CAS_RETRIES + 1,
    }
}

/// Places unassigned complaints with technicians.
pub struct AssignmentEngine<'a, S: AssignmentStore> {
    store: &'a mut S,
    notifier: &'a dyn AssignmentNotifier,
}

impl<'a, S: AssignmentStore> AssignmentEngine<'a, S> {
    pub const fn new(store: &'a mut S, notifier: &'a dyn AssignmentNotifier) -> Self {
        Self { store, notifier }
    }

    /// Assigns `complaint_id` to the least-loaded active technician of its
    /// area on behalf of the system.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the complaint does not exist
    /// - `InvalidState` if it is not `unassigned`
    /// - `NoTechnicianAvailable` if its area has no active technician
    /// - `ConcurrentModification` if every commit attempt conflicted
    pub fn auto_assign(&mut self, complaint_id: ComplaintId) -> Result<AssignmentRecord, CoreError> {
        let actor: Actor = Actor::system();

        for attempt in 0..=MAX_CAS_RETRIES {
            let complaint: Complaint = load_complaint(&mut *self.store, complaint_id)?;
            ensure_unassigned(&complaint)?;

            let technician_id: TechnicianId = self.select_technician(complaint.area_id)?;
            let record: AssignmentRecord = AssignmentRecord::open(
                complaint_id,
                technician_id,
                &actor,
                String::from(AUTO_ASSIGN_REASON),
                OffsetDateTime::now_utc(),
            );

            if let Some(record) = self.commit(&complaint, &record, attempt)? {
                return Ok(record);
            }
        }

        Err(cas_exhausted(complaint_id))
    }

    /// Assigns `complaint_id` to a chosen technician.
    ///
    /// The technician must be active and work in the complaint's area
    /// unless the authority carries the area override.
    ///
    /// # Errors
    ///
    /// - `ValidationError` if `reason` is blank
    /// - `NotFound` if the complaint or technician does not exist
    /// - `InvalidState` if the complaint is not `unassigned` or the
    ///   technician is not eligible
    /// - `ConcurrentModification` if every commit attempt conflicted
    pub fn manual_assign(
        &mut self,
        complaint_id: ComplaintId,
        technician_id: TechnicianId,
        authority: &AssignmentAuthority,
        reason: &str,
    ) -> Result<AssignmentRecord, CoreError> {
        validate_reason(reason)?;

        for attempt in 0..=MAX_CAS_RETRIES {
            let complaint: Complaint = load_complaint(&mut *self.store, complaint_id)?;
            let technician: Technician = load_technician(&mut *self.store, technician_id)?;
            ensure_unassigned(&complaint)?;
            validate_assignment_target(
                &complaint,
                &technician,
                authority.area_override.is_granted(),
            )?;

            let record: AssignmentRecord = AssignmentRecord::open(
                complaint_id,
                technician_id,
                &authority.actor,
                reason.trim().to_string(),
                OffsetDateTime::now_utc(),
            );

            if let Some(record) = self.commit(&complaint, &record, attempt)? {
                return Ok(record);
            }
        }

        Err(cas_exhausted(complaint_id))
    }

    fn select_technician(&mut self, area_id: AreaId) -> Result<TechnicianId, CoreError> {
        let loads: BTreeMap<TechnicianId, u32> =
            WorkloadTracker::new(&mut *self.store).workload_of_area(area_id)?;
        if loads.is_empty() {
            return Err(CoreError::NoTechnicianAvailable(area_id));
        }

        let ids: Vec<TechnicianId> = loads.keys().copied().collect();
        let last_starts: BTreeMap<TechnicianId, OffsetDateTime> = self
            .store
            .latest_assignment_starts(&ids)
            .map_err(CoreError::storage)?;

        let candidates: Vec<Candidate> = loads
            .iter()
            .map(|(technician_id, load)| Candidate {
                technician_id: *technician_id,
                load: *load,
                last_assigned_at: last_starts.get(technician_id).copied(),
            })
            .collect();

        let chosen: &Candidate = select_least_loaded(&candidates)
            .ok_or(CoreError::NoTechnicianAvailable(area_id))?;

        debug!(
            area_id = %area_id,
            technician_id = %chosen.technician_id,
            load = chosen.load,
            candidates = candidates.len(),
            "Selected technician"
        );

        Ok(chosen.technician_id)
    }

    fn commit(
        &mut self,
        complaint: &Complaint,
        record: &AssignmentRecord,
        attempt: u32,
    ) -> Result<Option<AssignmentRecord>, CoreError> {
        match self
            .store
            .commit_assignment(&VersionGuard::of(complaint), record)
            .map_err(CoreError::storage)?
        {
            CommitOutcome::Committed(stored) => {
                info!(
                    complaint_id = %stored.complaint_id,
                    technician_id = %stored.technician_id,
                    assigned_by = %stored.assigned_by,
                    "Complaint assigned"
                );
                dispatch(
                    self.notifier,
                    &AssignmentEvent::Assigned {
                        record: stored.clone(),
                        area_id: complaint.area_id,
                    },
                );
                Ok(Some(stored))
            }
            CommitOutcome::Conflict => {
                warn!(
                    complaint_id = %complaint.id,
                    version = complaint.version,
                    attempt = attempt + 1,
                    "Assignment lost a concurrent update"
                );
                Ok(None)
            }
        }
    }
}

fn ensure_unassigned(complaint: &Complaint) -> Result<(), CoreError> {
    if complaint.status.accepts_assignment() {
        Ok(())
    } else {
        Err(DomainError::ComplaintNotUnassigned {
            complaint_id: complaint.id,
            status: complaint.status,
        }
        .into())
    }
}
