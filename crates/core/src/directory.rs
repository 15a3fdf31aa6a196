// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fieldops_domain::{Area, AreaId, DomainError, Technician, TechnicianId};
use tracing::info;

use crate::error::CoreError;
use crate::store::AssignmentStore;

/// Area membership and management lookups.
pub struct AreaDirectory<'a, S: AssignmentStore> {
    store: &'a mut S,
}

impl<'a, S: AssignmentStore> AreaDirectory<'a, S> {
    pub const fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    /// Returns the technician managing `area_id`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if the area does not exist or has no
    /// manager.
    pub fn get_manager(&mut self, area_id: AreaId) -> Result<Technician, CoreError> {
        let area: Area = self.load_area(area_id)?;
        let manager_id: TechnicianId = area
            .manager_id
            .ok_or_else(|| CoreError::not_found("Manager of area", area_id.value()))?;

        self.store
            .find_technician(manager_id)
            .map_err(CoreError::storage)?
            .ok_or_else(|| CoreError::not_found("Technician", manager_id.value()))
    }

    /// Lists the active technicians of `area_id`, ordered by identity.
    ///
    /// An unknown area has no technicians.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn list_active_technicians(
        &mut self,
        area_id: AreaId,
    ) -> Result<Vec<Technician>, CoreError> {
        let mut technicians: Vec<Technician> = self
            .store
            .list_area_technicians(area_id)
            .map_err(CoreError::storage)?
            .into_iter()
            .filter(|technician| technician.active)
            .collect();
        technicians.sort_by_key(|technician| technician.id);
        Ok(technicians)
    }

    /// Makes `technician_id` the manager of `area_id`, replacing any
    /// previous manager.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if either side is missing and
    /// `CoreError::InvalidState` if the technician works elsewhere.
    pub fn assign_manager(
        &mut self,
        area_id: AreaId,
        technician_id: TechnicianId,
    ) -> Result<Area, CoreError> {
        let mut area: Area = self.load_area(area_id)?;
        let technician: Technician = self
            .store
            .find_technician(technician_id)
            .map_err(CoreError::storage)?
            .ok_or_else(|| CoreError::not_found("Technician", technician_id.value()))?;

        if technician.area_id != area_id {
            return Err(DomainError::ManagerOutsideArea {
                technician_id,
                area_id,
            }
            .into());
        }

        self.store
            .set_area_manager(area_id, technician_id)
            .map_err(CoreError::storage)?;

        info!(area_id = %area_id, technician_id = %technician_id, "Area manager assigned");

        area.manager_id = Some(technician_id);
        Ok(area)
    }

    fn load_area(&mut self, area_id: AreaId) -> Result<Area, CoreError> {
        self.store
            .find_area(area_id)
            .map_err(CoreError::storage)?
            .ok_or_else(|| CoreError::not_found("Area", area_id.value()))
    }
}
