// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for assignment operations and read-only views.

use std::collections::BTreeMap;
use std::str::FromStr;

use fieldops::{
    AreaDirectory, AssignmentEngine, AssignmentNotifier, AssignmentStats, AssignmentStore,
    BatchAssigner, BatchOutcome, ReassignmentCoordinator, StatsAggregator, WorkloadTracker,
    transition_status,
};
use fieldops_audit::AssignmentRecord;
use fieldops_domain::{
    AreaId, Complaint, ComplaintId, ComplaintStatus, ResolutionStats, Technician, TechnicianId,
};
use fieldops_persistence::Persistence;
use tracing::info;

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApiError, translate_core_error, translate_domain_error};
use crate::request_response::{
    AssignManagerRequest, AssignResponse, AssignmentHistoryResponse, AssignmentInfo,
    AssignmentStatsResponse, AvailableStaffEntry, AvailableStaffQuery, AvailableStaffResponse,
    BatchAssignRequest, BatchAssignResponse, BatchFailure, BatchItemInfo, BatchItemOutcome,
    ComplaintInfo, CountEntry, ManagerResponse, ManualAssignRequest, ReassignRequest, StaffInfo,
    StatusTransitionRequest, StatusTransitionResponse, WorkloadResponse,
};

fn storage_error(context: &str, err: &impl std::fmt::Display) -> ApiError {
    ApiError::Internal {
        message: format!("{context}: {err}"),
    }
}

/// Rejects a named office that is not the technician's own.
///
/// An unknown technician passes here; the engine reports it as not found.
fn check_office(
    persistence: &mut Persistence,
    staff_id: TechnicianId,
    office_id: Option<i64>,
    field: &str,
) -> Result<(), ApiError> {
    let Some(office_id) = office_id else {
        return Ok(());
    };

    let technician: Option<Technician> = persistence
        .find_technician(staff_id)
        .map_err(|e| storage_error("Failed to load technician", &e))?;

    match technician {
        Some(technician) if technician.area_id.value() != office_id => {
            Err(ApiError::InvalidInput {
                field: field.to_string(),
                message: format!(
                    "Staff {staff_id} belongs to office {}, not office {office_id}",
                    technician.area_id
                ),
            })
        }
        _ => Ok(()),
    }
}

fn assign_response(record: &AssignmentRecord, message: String) -> AssignResponse {
    AssignResponse {
        assignment: AssignmentInfo::from(record),
        message,
    }
}

/// Auto-assigns one complaint to the least-loaded technician of its area.
///
/// The record is attributed to the system actor; the requesting operator
/// is only logged.
///
/// # Errors
///
/// Returns an error if the actor may not assign or the engine fails.
pub fn auto_assign(
    persistence: &mut Persistence,
    notifier: &dyn AssignmentNotifier,
    complaint_id: i64,
    actor: &AuthenticatedActor,
) -> Result<AssignResponse, ApiError> {
    AuthorizationService::authorize_assign(actor)?;

    let record: AssignmentRecord = AssignmentEngine::new(persistence, notifier)
        .auto_assign(ComplaintId::new(complaint_id))
        .map_err(translate_core_error)?;

    info!(
        complaint_id,
        technician_id = %record.technician_id,
        requested_by = %actor.id,
        "Auto-assignment requested"
    );

    let message: String = format!(
        "Complaint {complaint_id} assigned to staff {}",
        record.technician_id
    );
    Ok(assign_response(&record, message))
}

/// Auto-assigns a list of complaints, reporting each outcome.
///
/// # Errors
///
/// Returns an error if the actor may not assign or the list is empty.
/// Per-complaint failures are reported in the response, not as errors.
pub fn auto_assign_many(
    persistence: &mut Persistence,
    notifier: &dyn AssignmentNotifier,
    request: &BatchAssignRequest,
    actor: &AuthenticatedActor,
) -> Result<BatchAssignResponse, ApiError> {
    AuthorizationService::authorize_assign(actor)?;

    if request.complaint_ids.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("complaintIds"),
            message: String::from("At least one complaint id is required"),
        });
    }

    let ids: Vec<ComplaintId> = request
        .complaint_ids
        .iter()
        .copied()
        .map(ComplaintId::new)
        .collect();
    let outcome: BatchOutcome =
        BatchAssigner::new(persistence, notifier).auto_assign_many(&ids);

    let results: Vec<BatchItemInfo> = outcome
        .results
        .iter()
        .map(|item| BatchItemInfo {
            complaint_id: item.complaint_id.value(),
            outcome: match &item.outcome {
                Ok(record) => BatchItemOutcome::Assigned(AssignmentInfo::from(record)),
                Err(err) => BatchItemOutcome::Failed(BatchFailure {
                    kind: err.kind().as_str().to_string(),
                    message: err.to_string(),
                }),
            },
        })
        .collect();

    Ok(BatchAssignResponse {
        total: outcome.total,
        successful: outcome.successful,
        failed: outcome.failed,
        results,
    })
}

/// Assigns a complaint to a chosen technician.
///
/// # Errors
///
/// Returns an error if the actor may not assign, the office does not match
/// the technician, or the engine rejects the assignment.
pub fn manual_assign(
    persistence: &mut Persistence,
    notifier: &dyn AssignmentNotifier,
    complaint_id: i64,
    request: &ManualAssignRequest,
    actor: &AuthenticatedActor,
) -> Result<AssignResponse, ApiError> {
    AuthorizationService::authorize_assign(actor)?;

    let staff_id: TechnicianId = TechnicianId::new(request.staff_id);
    check_office(persistence, staff_id, request.office_id, "officeId")?;

    let record: AssignmentRecord = AssignmentEngine::new(persistence, notifier)
        .manual_assign(
            ComplaintId::new(complaint_id),
            staff_id,
            &actor.authority(),
            &request.reason,
        )
        .map_err(translate_core_error)?;

    let message: String = format!("Complaint {complaint_id} assigned to staff {staff_id}");
    Ok(assign_response(&record, message))
}

/// Moves an assigned complaint to another technician.
///
/// # Errors
///
/// Returns an error if the actor may not reassign, the office does not
/// match the technician, or the coordinator rejects the move.
pub fn reassign(
    persistence: &mut Persistence,
    notifier: &dyn AssignmentNotifier,
    complaint_id: i64,
    request: &ReassignRequest,
    actor: &AuthenticatedActor,
) -> Result<AssignResponse, ApiError> {
    AuthorizationService::authorize_reassign(actor)?;

    let staff_id: TechnicianId = TechnicianId::new(request.new_staff_id);
    check_office(persistence, staff_id, request.new_office_id, "newOfficeId")?;

    let record: AssignmentRecord = ReassignmentCoordinator::new(persistence, notifier)
        .reassign(
            ComplaintId::new(complaint_id),
            staff_id,
            &actor.authority(),
            &request.reason,
        )
        .map_err(translate_core_error)?;

    let message: String = format!("Complaint {complaint_id} reassigned to staff {staff_id}");
    Ok(assign_response(&record, message))
}

/// Reports workload distribution, resolution times and complaint counts.
///
/// # Errors
///
/// Returns an error if the underlying reads fail.
pub fn get_assignment_stats(
    persistence: &mut Persistence,
    _actor: &AuthenticatedActor,
) -> Result<AssignmentStatsResponse, ApiError> {
    let mut aggregator = StatsAggregator::new(persistence);

    let assignment: AssignmentStats = aggregator
        .assignment_stats()
        .map_err(translate_core_error)?;
    let resolution: ResolutionStats = aggregator
        .resolution_stats()
        .map_err(translate_core_error)?;
    let by_status: BTreeMap<String, usize> = aggregator
        .status_counts()
        .map_err(translate_core_error)?
        .into_iter()
        .map(|(status, count)| (status.as_str().to_string(), count))
        .collect();
    let by_priority: BTreeMap<String, usize> = aggregator
        .priority_counts()
        .map_err(translate_core_error)?
        .into_iter()
        .map(|(priority, count)| (priority.as_str().to_string(), count))
        .collect();

    Ok(AssignmentStatsResponse {
        total_active: assignment.total_active,
        by_staff: assignment
            .by_technician
            .iter()
            .map(|(id, count)| CountEntry {
                id: id.value(),
                count: *count,
            })
            .collect(),
        by_office: assignment
            .by_area
            .iter()
            .map(|(id, count)| CountEntry {
                id: id.value(),
                count: *count,
            })
            .collect(),
        resolution,
        by_status,
        by_priority,
    })
}

/// Lists the active technicians of an office with their current load.
///
/// An unknown office yields an empty list.
///
/// # Errors
///
/// Returns an error if the underlying reads fail.
pub fn list_available_staff(
    persistence: &mut Persistence,
    query: &AvailableStaffQuery,
    _actor: &AuthenticatedActor,
) -> Result<AvailableStaffResponse, ApiError> {
    let area_id: AreaId = AreaId::new(query.office_id);

    let technicians: Vec<Technician> = AreaDirectory::new(persistence)
        .list_active_technicians(area_id)
        .map_err(translate_core_error)?;
    let loads: BTreeMap<TechnicianId, u32> = WorkloadTracker::new(persistence)
        .workload_of_area(area_id)
        .map_err(translate_core_error)?;

    let staff: Vec<AvailableStaffEntry> = technicians
        .iter()
        .map(|technician| AvailableStaffEntry {
            staff: StaffInfo::from(technician),
            active_assignments: loads.get(&technician.id).copied().unwrap_or(0),
        })
        .collect();

    Ok(AvailableStaffResponse {
        office_id: query.office_id,
        staff,
    })
}

/// Returns a technician's current number of active assignments.
///
/// # Errors
///
/// Returns an error if the technician does not exist.
pub fn get_staff_workload(
    persistence: &mut Persistence,
    staff_id: i64,
    _actor: &AuthenticatedActor,
) -> Result<WorkloadResponse, ApiError> {
    let active_assignments: u32 = WorkloadTracker::new(persistence)
        .workload_of(TechnicianId::new(staff_id))
        .map_err(translate_core_error)?;

    Ok(WorkloadResponse {
        staff_id,
        active_assignments,
    })
}

/// Returns every assignment record of a complaint, oldest first.
///
/// # Errors
///
/// Returns an error if the complaint does not exist.
pub fn get_assignment_history(
    persistence: &mut Persistence,
    complaint_id: i64,
    _actor: &AuthenticatedActor,
) -> Result<AssignmentHistoryResponse, ApiError> {
    let id: ComplaintId = ComplaintId::new(complaint_id);

    let complaint: Option<Complaint> = persistence
        .find_complaint(id)
        .map_err(|e| storage_error("Failed to load complaint", &e))?;
    if complaint.is_none() {
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("Complaint"),
            message: format!("Complaint {complaint_id} does not exist"),
        });
    }

    let records: Vec<AssignmentRecord> = persistence
        .assignment_history(id)
        .map_err(|e| storage_error("Failed to load assignment history", &e))?;

    Ok(AssignmentHistoryResponse {
        complaint_id,
        assignments: records.iter().map(AssignmentInfo::from).collect(),
    })
}

/// Moves a complaint along its lifecycle.
///
/// # Errors
///
/// Returns an error if the actor lacks the capability, the status name is
/// unknown, or the transition is not allowed.
pub fn transition_complaint_status(
    persistence: &mut Persistence,
    notifier: &dyn AssignmentNotifier,
    complaint_id: i64,
    request: &StatusTransitionRequest,
    actor: &AuthenticatedActor,
) -> Result<StatusTransitionResponse, ApiError> {
    AuthorizationService::authorize_transition_status(actor)?;

    let target: ComplaintStatus =
        ComplaintStatus::from_str(request.status.trim()).map_err(translate_domain_error)?;

    let complaint: Complaint = transition_status(
        persistence,
        notifier,
        ComplaintId::new(complaint_id),
        target,
        &actor.to_audit_actor(),
    )
    .map_err(translate_core_error)?;

    Ok(StatusTransitionResponse {
        complaint: ComplaintInfo::from(&complaint),
        message: format!("Complaint {complaint_id} is now {target}"),
    })
}

/// Returns the manager of an office.
///
/// # Errors
///
/// Returns an error if the office does not exist or has no manager.
pub fn get_area_manager(
    persistence: &mut Persistence,
    area_id: i64,
    _actor: &AuthenticatedActor,
) -> Result<ManagerResponse, ApiError> {
    let manager: Technician = AreaDirectory::new(persistence)
        .get_manager(AreaId::new(area_id))
        .map_err(translate_core_error)?;

    Ok(ManagerResponse {
        office_id: area_id,
        manager: StaffInfo::from(&manager),
    })
}

/// Appoints the manager of an office, replacing any previous one.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, either party does not
/// exist, or the technician works in another office.
pub fn assign_area_manager(
    persistence: &mut Persistence,
    area_id: i64,
    request: &AssignManagerRequest,
    actor: &AuthenticatedActor,
) -> Result<ManagerResponse, ApiError> {
    AuthorizationService::authorize_manage_areas(actor)?;

    let mut directory = AreaDirectory::new(persistence);
    directory
        .assign_manager(AreaId::new(area_id), TechnicianId::new(request.technician_id))
        .map_err(translate_core_error)?;
    let manager: Technician = directory
        .get_manager(AreaId::new(area_id))
        .map_err(translate_core_error)?;

    info!(area_id, manager_id = request.technician_id, actor = %actor.id, "Area manager appointed");

    Ok(ManagerResponse {
        office_id: area_id,
        manager: StaffInfo::from(&manager),
    })
}
