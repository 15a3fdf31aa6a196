// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fieldops_audit::AssignmentRecord;
use fieldops_domain::{AreaId, ComplaintId, ComplaintStatus, TechnicianId};
use thiserror::Error;
use tracing::warn;

/// A committed change worth telling someone about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentEvent {
    /// A complaint received its first technician.
    Assigned {
        record: AssignmentRecord,
        area_id: AreaId,
    },
    /// A complaint moved from one technician to another.
    Reassigned {
        record: AssignmentRecord,
        area_id: AreaId,
        previous_technician_id: TechnicianId,
    },
    /// A complaint moved along its lifecycle.
    StatusChanged {
        complaint_id: ComplaintId,
        from: ComplaintStatus,
        to: ComplaintStatus,
    },
}

/// Delivery failure reported by a notifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("notification delivery failed: {0}")]
pub struct NotifyError(pub String);

/// Fan-out of committed assignment events.
///
/// Notification happens after the commit and never affects its outcome.
pub trait AssignmentNotifier: Send + Sync {
    /// Delivers one event.
    ///
    /// # Errors
    ///
    /// Returns an error if the event could not be handed off.
    fn notify(&self, event: &AssignmentEvent) -> Result<(), NotifyError>;
}

/// A notifier that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl AssignmentNotifier for NoopNotifier {
    fn notify(&self, _event: &AssignmentEvent) -> Result<(), NotifyError> {
        Ok(())
    }
}

pub(crate) fn dispatch(notifier: &dyn AssignmentNotifier, event: &AssignmentEvent) {
    if let Err(err) = notifier.notify(event) {
        warn!(error = %err, "Assignment notification dropped");
    }
}
