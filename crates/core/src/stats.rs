// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeMap;

use fieldops_domain::{
    AreaId, Complaint, ComplaintStatus, Priority, ResolutionStats, TechnicianId,
    compute_resolution_stats,
};

use crate::error::CoreError;
use crate::store::{AssignmentStore, OpenAssignment, WorkloadScope};
use crate::workload::counts_toward_workload;

/// Active assignments across the whole system.
///
/// `by_area` groups by the area of the technician holding the complaint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssignmentStats {
    pub total_active: usize,
    pub by_technician: BTreeMap<TechnicianId, usize>,
    pub by_area: BTreeMap<AreaId, usize>,
}

/// Read-only reporting over assignments and complaints.
pub struct StatsAggregator<'a, S: AssignmentStore> {
    store: &'a mut S,
}

impl<'a, S: AssignmentStore> StatsAggregator<'a, S> {
    pub const fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    /// Counts active assignments overall, per technician and per area.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn assignment_stats(&mut self) -> Result<AssignmentStats, CoreError> {
        let open: Vec<OpenAssignment> = self
            .store
            .list_open_assignments(WorkloadScope::All)
            .map_err(CoreError::storage)?;

        let mut stats: AssignmentStats = AssignmentStats::default();
        for entry in open.iter().filter(|entry| counts_toward_workload(entry)) {
            stats.total_active += 1;
            *stats
                .by_technician
                .entry(entry.record.technician_id)
                .or_insert(0) += 1;
            *stats.by_area.entry(entry.technician_area_id).or_insert(0) += 1;
        }

        Ok(stats)
    }

    /// Resolution-time statistics over every closed complaint.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn resolution_stats(&mut self) -> Result<ResolutionStats, CoreError> {
        let complaints: Vec<Complaint> = self.store.list_complaints().map_err(CoreError::storage)?;
        Ok(compute_resolution_stats(&complaints))
    }

    /// Number of complaints in each status. Every status is present.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn status_counts(&mut self) -> Result<BTreeMap<ComplaintStatus, usize>, CoreError> {
        let complaints: Vec<Complaint> = self.store.list_complaints().map_err(CoreError::storage)?;

        let mut counts: BTreeMap<ComplaintStatus, usize> =
            ComplaintStatus::ALL.into_iter().map(|s| (s, 0)).collect();
        for complaint in &complaints {
            *counts.entry(complaint.status).or_insert(0) += 1;
        }
        Ok(counts)
    }

    /// Number of complaints of each priority. Every priority is present.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn priority_counts(&mut self) -> Result<BTreeMap<Priority, usize>, CoreError> {
        let complaints: Vec<Complaint> = self.store.list_complaints().map_err(CoreError::storage)?;

        let mut counts: BTreeMap<Priority, usize> =
            Priority::ALL.into_iter().map(|p| (p, 0)).collect();
        for complaint in &complaints {
            *counts.entry(complaint.priority).or_insert(0) += 1;
        }
        Ok(counts)
    }
}
