// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod error;
mod lifecycle;
mod resolution;
mod selection;
mod types;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use lifecycle::{
    validate_assignment_target, validate_reason, validate_reassignment, validate_status_transition,
};
pub use resolution::{ResolutionStats, compute_resolution_stats, round_to_hundredths};
pub use selection::{Candidate, compare_candidates, select_least_loaded};
pub use types::{
    Area, AreaId, Complaint, ComplaintId, ComplaintStatus, Priority, Technician, TechnicianId,
};
