// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Load-balanced technician selection.
//!
//! ## Ordering Rules
//!
//! Candidates are ordered by:
//! 1. Current workload (lowest wins)
//! 2. Tie Breaker 1: start of the most recent assignment (oldest wins,
//!    never-assigned technicians first)
//! 3. Tie Breaker 2: technician identity (smallest wins)
//!
//! Identities are unique, so the ordering is total: repeated selection over
//! unchanged inputs always yields the same technician.

use std::cmp::Ordering;
use time::OffsetDateTime;

use crate::types::TechnicianId;

/// A technician competing for an assignment, with the inputs used to rank it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// The technician.
    pub technician_id: TechnicianId,
    /// Number of active assignments currently held.
    pub load: u32,
    /// Start of the technician's most recent assignment, open or closed.
    pub last_assigned_at: Option<OffsetDateTime>,
}

/// Compares two candidates by the selection rules.
///
/// Returns `Ordering::Less` when `a` should be preferred over `b`.
#[must_use]
pub fn compare_candidates(a: &Candidate, b: &Candidate) -> Ordering {
    a.load
        .cmp(&b.load)
        .then_with(|| compare_last_assigned(a.last_assigned_at, b.last_assigned_at))
        .then_with(|| a.technician_id.cmp(&b.technician_id))
}

// `None` (never assigned) sorts before any timestamp.
fn compare_last_assigned(a: Option<OffsetDateTime>, b: Option<OffsetDateTime>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.cmp(&b),
    }
}

/// Picks the preferred candidate, or `None` when there are no candidates.
#[must_use]
pub fn select_least_loaded(candidates: &[Candidate]) -> Option<&Candidate> {
    candidates.iter().min_by(|a, b| compare_candidates(a, b))
}
