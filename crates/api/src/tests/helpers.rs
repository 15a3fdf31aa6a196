// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::sync::Mutex;

use fieldops::{AssignmentEvent, AssignmentNotifier, NotifyError};
use fieldops_domain::{AreaId, Priority, TechnicianId};
use fieldops_persistence::Persistence;
use time::macros::datetime;

use crate::{AuthenticatedActor, Role};

pub fn create_test_admin() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("admin-1"), Role::Admin)
}

pub fn create_test_supervisor() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("sup-1"), Role::Supervisor)
}

pub fn create_test_technician_actor() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("tech-1"), Role::Technician)
}

/// Two offices: NORTH with two technicians, SOUTH with one.
pub struct Fixture {
    pub persistence: Persistence,
    pub north: AreaId,
    pub south: AreaId,
    pub north_staff: Vec<TechnicianId>,
    pub south_staff: Vec<TechnicianId>,
}

impl Fixture {
    pub fn new() -> Self {
        let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
        let north: AreaId = persistence.create_area("NORTH", "North office").unwrap().id;
        let south: AreaId = persistence.create_area("SOUTH", "South office").unwrap().id;
        let north_staff: Vec<TechnicianId> = ["Asha", "Bram"]
            .iter()
            .map(|name| persistence.create_technician(north, name, true).unwrap().id)
            .collect();
        let south_staff: Vec<TechnicianId> =
            vec![persistence.create_technician(south, "Cleo", true).unwrap().id];

        Self {
            persistence,
            north,
            south,
            north_staff,
            south_staff,
        }
    }

    pub fn complaint_in(&mut self, area_id: AreaId) -> i64 {
        self.persistence
            .create_complaint(area_id, Priority::Medium, datetime!(2026-04-01 08:00 UTC))
            .unwrap()
            .id
            .value()
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<AssignmentEvent>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<AssignmentEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl AssignmentNotifier for RecordingNotifier {
    fn notify(&self, event: &AssignmentEvent) -> Result<(), NotifyError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}
