// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Complaint lifecycle rules.
//!
//! Valid status transitions are:
//! - `unassigned` → `assigned` (assignment engine only)
//! - `unassigned` → `closed` (closed without assignment)
//! - `assigned` → `in_progress` | `on_hold` | `resolved`
//! - `in_progress` → `on_hold` | `resolved`
//! - `on_hold` → `in_progress` | `resolved`
//! - `resolved` → `closed`

use crate::error::DomainError;
use crate::types::{Complaint, ComplaintStatus, Technician, TechnicianId};

/// Validates a status change requested outside the assignment engine.
///
/// The move into `assigned` is rejected here: only the assignment engine
/// may perform it, together with the technician write.
///
/// # Errors
///
/// Returns `DomainError::InvalidStatusTransition` when the move is not allowed.
pub fn validate_status_transition(
    from: ComplaintStatus,
    to: ComplaintStatus,
) -> Result<(), DomainError> {
    use ComplaintStatus::{Assigned, Closed, InProgress, OnHold, Resolved, Unassigned};

    let allowed: bool = matches!(
        (from, to),
        (Unassigned, Closed)
            | (Assigned, InProgress | OnHold | Resolved)
            | (InProgress, OnHold | Resolved)
            | (OnHold, InProgress | Resolved)
            | (Resolved, Closed)
    );

    if allowed {
        Ok(())
    } else {
        Err(DomainError::InvalidStatusTransition { from, to })
    }
}

/// Validates that `technician` may take over `complaint`.
///
/// The technician must be active and, unless `cross_area_allowed`, belong
/// to the complaint's area.
///
/// # Errors
///
/// Returns an error if the technician is inactive or outside the area.
pub fn validate_assignment_target(
    complaint: &Complaint,
    technician: &Technician,
    cross_area_allowed: bool,
) -> Result<(), DomainError> {
    if !technician.active {
        return Err(DomainError::TechnicianInactive(technician.id));
    }

    if technician.area_id != complaint.area_id && !cross_area_allowed {
        return Err(DomainError::TechnicianOutsideArea {
            technician_id: technician.id,
            technician_area: technician.area_id,
            complaint_area: complaint.area_id,
        });
    }

    Ok(())
}

/// Validates that `complaint` can be transferred to `new_technician`.
///
/// # Errors
///
/// Returns an error if the complaint holds no active assignment, or if it
/// is already held by `new_technician`.
pub fn validate_reassignment(
    complaint: &Complaint,
    new_technician: TechnicianId,
) -> Result<(), DomainError> {
    if !complaint.status.holds_active_assignment() {
        return Err(DomainError::ComplaintNotReassignable {
            complaint_id: complaint.id,
            status: complaint.status,
        });
    }

    match complaint.assigned_technician_id {
        None => Err(DomainError::MissingActiveAssignment(complaint.id)),
        Some(current) if current == new_technician => {
            Err(DomainError::AlreadyAssignedToTechnician {
                complaint_id: complaint.id,
                technician_id: new_technician,
            })
        }
        Some(_) => Ok(()),
    }
}

/// Validates an operator-supplied audit reason.
///
/// # Errors
///
/// Returns `DomainError::EmptyReason` when the reason is blank.
pub fn validate_reason(reason: &str) -> Result<(), DomainError> {
    if reason.trim().is_empty() {
        return Err(DomainError::EmptyReason);
    }
    Ok(())
}
