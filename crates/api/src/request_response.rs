// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response types for the API layer.
//!
//! Field names follow the back-office wire contract: complaints, staff and
//! offices are addressed by numeric ids, and bodies are `camelCase`.

use fieldops_audit::AssignmentRecord;
use fieldops_domain::{Complaint, ResolutionStats, Technician};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// Whether an action is permitted for the current actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Allowed,
    Denied,
}

impl Capability {
    #[must_use]
    pub const fn from_bool(allowed: bool) -> Self {
        if allowed { Self::Allowed } else { Self::Denied }
    }

    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// What an actor may do with complaint assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentCapabilities {
    pub can_assign: Capability,
    pub can_reassign: Capability,
    /// Assign to a technician outside the complaint's area.
    pub can_override_area: Capability,
    pub can_transition_status: Capability,
    pub can_manage_areas: Capability,
}

/// Body of a manual assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualAssignRequest {
    /// The technician to assign.
    pub staff_id: i64,
    /// The technician's office, when the caller names it.
    #[serde(default)]
    pub office_id: Option<i64>,
    /// Audit reason.
    pub reason: String,
}

/// Body of a reassignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReassignRequest {
    /// The technician taking over.
    pub new_staff_id: i64,
    /// The new technician's office, when the caller names it.
    #[serde(default)]
    pub new_office_id: Option<i64>,
    /// Audit reason.
    pub reason: String,
}

/// Body of a batch auto-assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchAssignRequest {
    pub complaint_ids: Vec<i64>,
}

/// Body of a status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTransitionRequest {
    /// Target status, e.g. `in_progress`.
    pub status: String,
}

/// Body of an area manager appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignManagerRequest {
    pub technician_id: i64,
}

/// Query of the available staff listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableStaffQuery {
    pub office_id: i64,
}

/// An assignment record on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentInfo {
    pub record_id: Option<i64>,
    pub complaint_id: i64,
    pub staff_id: i64,
    pub assigned_by: String,
    pub reason: String,
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub ended_at: Option<OffsetDateTime>,
}

impl From<&AssignmentRecord> for AssignmentInfo {
    fn from(record: &AssignmentRecord) -> Self {
        Self {
            record_id: record.record_id,
            complaint_id: record.complaint_id.value(),
            staff_id: record.technician_id.value(),
            assigned_by: record.assigned_by.clone(),
            reason: record.reason.clone(),
            started_at: record.started_at,
            ended_at: record.ended_at,
        }
    }
}

/// Result of a single assignment or reassignment.
///
/// Only `assignment` goes on the wire as the envelope `data`; `message`
/// becomes the envelope message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignResponse {
    pub assignment: AssignmentInfo,
    pub message: String,
}

/// Why one complaint of a batch was not assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchFailure {
    /// Error kind tag, e.g. `NoTechnicianAvailable`.
    pub kind: String,
    pub message: String,
}

/// Outcome of one complaint of a batch: the new record or the failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatchItemOutcome {
    Assigned(AssignmentInfo),
    Failed(BatchFailure),
}

impl BatchItemOutcome {
    /// Returns whether the complaint was assigned.
    #[must_use]
    pub const fn is_assigned(&self) -> bool {
        matches!(self, Self::Assigned(_))
    }
}

/// Per-complaint result of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemInfo {
    pub complaint_id: i64,
    pub outcome: BatchItemOutcome,
}

/// Response of a batch auto-assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchAssignResponse {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<BatchItemInfo>,
}

/// A technician on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffInfo {
    pub staff_id: i64,
    pub office_id: i64,
    pub name: String,
    pub active: bool,
}

impl From<&Technician> for StaffInfo {
    fn from(technician: &Technician) -> Self {
        Self {
            staff_id: technician.id.value(),
            office_id: technician.area_id.value(),
            name: technician.name.clone(),
            active: technician.active,
        }
    }
}

/// An active technician together with their current load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableStaffEntry {
    #[serde(flatten)]
    pub staff: StaffInfo,
    pub active_assignments: u32,
}

/// Response of the available staff listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableStaffResponse {
    pub office_id: i64,
    pub staff: Vec<AvailableStaffEntry>,
}

/// Response of a workload lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadResponse {
    pub staff_id: i64,
    pub active_assignments: u32,
}

/// A keyed count in the statistics response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountEntry {
    pub id: i64,
    pub count: usize,
}

/// Response of the statistics endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentStatsResponse {
    pub total_active: usize,
    pub by_staff: Vec<CountEntry>,
    pub by_office: Vec<CountEntry>,
    pub resolution: ResolutionStats,
    /// Complaint count per status, every status present.
    pub by_status: BTreeMap<String, usize>,
    /// Complaint count per priority, every priority present.
    pub by_priority: BTreeMap<String, usize>,
}

/// Response of the assignment history lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentHistoryResponse {
    pub complaint_id: i64,
    pub assignments: Vec<AssignmentInfo>,
}

/// A complaint on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintInfo {
    pub complaint_id: i64,
    pub office_id: i64,
    pub assigned_staff_id: Option<i64>,
    pub status: String,
    pub priority: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub resolved_at: Option<OffsetDateTime>,
    pub version: i64,
}

impl From<&Complaint> for ComplaintInfo {
    fn from(complaint: &Complaint) -> Self {
        Self {
            complaint_id: complaint.id.value(),
            office_id: complaint.area_id.value(),
            assigned_staff_id: complaint.assigned_technician_id.map(|id| id.value()),
            status: complaint.status.as_str().to_string(),
            priority: complaint.priority.as_str().to_string(),
            created_at: complaint.created_at,
            resolved_at: complaint.resolved_at,
            version: complaint.version,
        }
    }
}

/// Response of a status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusTransitionResponse {
    pub complaint: ComplaintInfo,
    pub message: String,
}

/// Response of the manager lookup and appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerResponse {
    pub office_id: i64,
    pub manager: StaffInfo,
}
