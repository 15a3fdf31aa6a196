// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fieldops_audit::Actor;
use fieldops_domain::{Complaint, ComplaintId, ComplaintStatus, validate_status_transition};
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::engine::{MAX_CAS_RETRIES, cas_exhausted, load_complaint};
use crate::error::CoreError;
use crate::notify::{AssignmentEvent, AssignmentNotifier, dispatch};
use crate::store::{AssignmentStore, CommitOutcome, VersionGuard};

/// Moves a complaint along its lifecycle.
///
/// Entering `resolved` stamps `resolved_at`. Assignment records are left
/// untouched: completed complaints drop out of workload by status.
///
/// # Errors
///
/// - `NotFound` if the complaint does not exist
/// - `InvalidState` if the transition is not allowed
/// - `ConcurrentModification` if every commit attempt conflicted
pub fn transition_status<S: AssignmentStore>(
    store: &mut S,
    notifier: &dyn AssignmentNotifier,
    complaint_id: ComplaintId,
    target: ComplaintStatus,
    actor: &Actor,
) -> Result<Complaint, CoreError> {
    for attempt in 0..=MAX_CAS_RETRIES {
        let complaint: Complaint = load_complaint(store, complaint_id)?;
        validate_status_transition(complaint.status, target)?;

        let resolved_at: Option<OffsetDateTime> = if target == ComplaintStatus::Resolved {
            Some(OffsetDateTime::now_utc())
        } else {
            complaint.resolved_at
        };

        match store
            .commit_status(&VersionGuard::of(&complaint), target, resolved_at)
            .map_err(CoreError::storage)?
        {
            CommitOutcome::Committed(updated) => {
                info!(
                    complaint_id = %complaint_id,
                    from = %complaint.status,
                    to = %target,
                    actor = %actor.id,
                    "Complaint status changed"
                );
                dispatch(
                    notifier,
                    &AssignmentEvent::StatusChanged {
                        complaint_id,
                        from: complaint.status,
                        to: target,
                    },
                );
                return Ok(updated);
            }
            CommitOutcome::Conflict => {
                warn!(
                    complaint_id = %complaint_id,
                    version = complaint.version,
                    attempt = attempt + 1,
                    "Status change lost a concurrent update"
                );
            }
        }
    }

    Err(cas_exhausted(complaint_id))
}
