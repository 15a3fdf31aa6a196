// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the assignment engine.
//!
//! Handlers take an authenticated actor, check its capabilities, run the
//! engine against `Persistence` and translate the outcome into wire DTOs.
//! Core errors never cross this boundary untranslated.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod capabilities;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthorizationService, Role, authenticate_stub};
pub use capabilities::compute_capabilities;
pub use error::{ApiError, AuthError, translate_core_error, translate_domain_error};
pub use handlers::{
    assign_area_manager, auto_assign, auto_assign_many, get_area_manager, get_assignment_history,
    get_assignment_stats, get_staff_workload, list_available_staff, manual_assign, reassign,
    transition_complaint_status,
};
pub use request_response::{
    AssignManagerRequest, AssignResponse, AssignmentCapabilities, AssignmentHistoryResponse,
    AssignmentInfo, AssignmentStatsResponse, AvailableStaffEntry, AvailableStaffQuery,
    AvailableStaffResponse, BatchAssignRequest, BatchAssignResponse, BatchFailure, BatchItemInfo,
    BatchItemOutcome, Capability, ComplaintInfo, CountEntry, ManagerResponse, ManualAssignRequest,
    ReassignRequest, StaffInfo, StatusTransitionRequest, StatusTransitionResponse,
    WorkloadResponse,
};
