// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Resolution-time statistics.
//!
//! Only `closed` complaints carrying both `created_at` and `resolved_at`
//! qualify. The median is the element at index `n / 2` of the ascending
//! list, without interpolation.

use serde::{Deserialize, Serialize};

use crate::types::{Complaint, ComplaintStatus};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Summary of how long closed complaints took to resolve, in hours.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionStats {
    pub average_resolution_hours: f64,
    pub median_resolution_hours: f64,
    pub fastest_resolution_hours: f64,
    pub slowest_resolution_hours: f64,
    pub total_resolved: usize,
}

/// Rounds to two decimal places.
#[must_use]
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Computes resolution statistics over `complaints`.
///
/// Returns the all-zero structure when no complaint qualifies.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute_resolution_stats(complaints: &[Complaint]) -> ResolutionStats {
    let mut hours: Vec<f64> = complaints
        .iter()
        .filter(|c| c.status == ComplaintStatus::Closed)
        .filter_map(Complaint::resolution_seconds)
        .map(|seconds| seconds as f64 / SECONDS_PER_HOUR)
        .collect();

    if hours.is_empty() {
        return ResolutionStats::default();
    }

    hours.sort_by(f64::total_cmp);

    let total: usize = hours.len();
    let sum: f64 = hours.iter().sum();

    ResolutionStats {
        average_resolution_hours: round_to_hundredths(sum / total as f64),
        median_resolution_hours: round_to_hundredths(hours[total / 2]),
        fastest_resolution_hours: round_to_hundredths(hours[0]),
        slowest_resolution_hours: round_to_hundredths(hours[total - 1]),
        total_resolved: total,
    }
}
