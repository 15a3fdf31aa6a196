// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{AreaId, ComplaintId, ComplaintStatus, TechnicianId};

/// Errors raised when an assignment rule is violated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The complaint is not waiting for a first assignment.
    ComplaintNotUnassigned {
        /// The complaint.
        complaint_id: ComplaintId,
        /// Its current status.
        status: ComplaintStatus,
    },
    /// The complaint has no active assignment that could be transferred.
    ComplaintNotReassignable {
        /// The complaint.
        complaint_id: ComplaintId,
        /// Its current status.
        status: ComplaintStatus,
    },
    /// The requested technician already holds the complaint.
    AlreadyAssignedToTechnician {
        /// The complaint.
        complaint_id: ComplaintId,
        /// The technician named in the request.
        technician_id: TechnicianId,
    },
    /// The technician works in a different area and no override was presented.
    TechnicianOutsideArea {
        /// The technician.
        technician_id: TechnicianId,
        /// The technician's own area.
        technician_area: AreaId,
        /// The area the complaint belongs to.
        complaint_area: AreaId,
    },
    /// The technician is deactivated.
    TechnicianInactive(TechnicianId),
    /// A manager must be a technician of the area they manage.
    ManagerOutsideArea {
        /// The proposed manager.
        technician_id: TechnicianId,
        /// The area being managed.
        area_id: AreaId,
    },
    /// The status change is not part of the complaint lifecycle.
    InvalidStatusTransition {
        /// The current status.
        from: ComplaintStatus,
        /// The requested status.
        to: ComplaintStatus,
    },
    /// The complaint is marked as held but has no open assignment record.
    MissingActiveAssignment(ComplaintId),
    /// An audit reason is required for operator-initiated changes.
    EmptyReason,
    /// Unknown complaint status string.
    InvalidStatus(String),
    /// Unknown priority string.
    InvalidPriority(String),
}

impl DomainError {
    /// Returns whether this error describes malformed input rather than
    /// a conflict with the stored state.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyReason | Self::InvalidStatus(_) | Self::InvalidPriority(_)
        )
    }
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ComplaintNotUnassigned {
                complaint_id,
                status,
            } => {
                write!(
                    f,
                    "Complaint {complaint_id} cannot be assigned: status is '{status}', expected 'unassigned'"
                )
            }
            Self::ComplaintNotReassignable {
                complaint_id,
                status,
            } => {
                write!(
                    f,
                    "Complaint {complaint_id} cannot be reassigned while '{status}'"
                )
            }
            Self::AlreadyAssignedToTechnician {
                complaint_id,
                technician_id,
            } => {
                write!(
                    f,
                    "Complaint {complaint_id} is already assigned to this technician ({technician_id})"
                )
            }
            Self::TechnicianOutsideArea {
                technician_id,
                technician_area,
                complaint_area,
            } => {
                write!(
                    f,
                    "Technician {technician_id} belongs to area {technician_area}, not area {complaint_area}"
                )
            }
            Self::TechnicianInactive(technician_id) => {
                write!(f, "Technician {technician_id} is inactive")
            }
            Self::ManagerOutsideArea {
                technician_id,
                area_id,
            } => {
                write!(
                    f,
                    "Technician {technician_id} cannot manage area {area_id}: not a member of that area"
                )
            }
            Self::InvalidStatusTransition { from, to } => {
                write!(f, "Cannot move complaint from '{from}' to '{to}'")
            }
            Self::MissingActiveAssignment(complaint_id) => {
                write!(
                    f,
                    "Complaint {complaint_id} has no active assignment record"
                )
            }
            Self::EmptyReason => write!(f, "A reason is required"),
            Self::InvalidStatus(value) => write!(f, "Invalid complaint status: {value}"),
            Self::InvalidPriority(value) => write!(f, "Invalid priority: {value}"),
        }
    }
}

impl std::error::Error for DomainError {}
