// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Workload is never cached: it is the number of open assignment records
//! whose complaint is `assigned` or `in_progress`, counted at call time.

use std::collections::BTreeMap;

use fieldops_domain::{AreaId, Technician, TechnicianId};

use crate::directory::AreaDirectory;
use crate::error::CoreError;
use crate::store::{AssignmentStore, OpenAssignment, WorkloadScope};

pub(crate) fn counts_toward_workload(open: &OpenAssignment) -> bool {
    open.complaint_status.holds_active_assignment()
}

/// Derives technician workload from durable assignment state.
pub struct WorkloadTracker<'a, S: AssignmentStore> {
    store: &'a mut S,
}

impl<'a, S: AssignmentStore> WorkloadTracker<'a, S> {
    pub const fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    /// Returns the number of complaints `technician_id` currently holds.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` for an unknown technician.
    pub fn workload_of(&mut self, technician_id: TechnicianId) -> Result<u32, CoreError> {
        if self
            .store
            .find_technician(technician_id)
            .map_err(CoreError::storage)?
            .is_none()
        {
            return Err(CoreError::not_found("Technician", technician_id.value()));
        }

        let open: Vec<OpenAssignment> = self
            .store
            .list_open_assignments(WorkloadScope::Technician(technician_id))
            .map_err(CoreError::storage)?;

        Ok(open.iter().fold(0, |load, entry| {
            if counts_toward_workload(entry) {
                load + 1
            } else {
                load
            }
        }))
    }

    /// Returns the workload of every active technician in `area_id`,
    /// including those holding nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn workload_of_area(
        &mut self,
        area_id: AreaId,
    ) -> Result<BTreeMap<TechnicianId, u32>, CoreError> {
        let technicians: Vec<Technician> =
            AreaDirectory::new(&mut *self.store).list_active_technicians(area_id)?;

        let mut loads: BTreeMap<TechnicianId, u32> = technicians
            .iter()
            .map(|technician| (technician.id, 0))
            .collect();

        let open: Vec<OpenAssignment> = self
            .store
            .list_open_assignments(WorkloadScope::Area(area_id))
            .map_err(CoreError::storage)?;

        for entry in open.iter().filter(|entry| counts_toward_workload(entry)) {
            if let Some(load) = loads.get_mut(&entry.record.technician_id) {
                *load += 1;
            }
        }

        Ok(loads)
    }
}
