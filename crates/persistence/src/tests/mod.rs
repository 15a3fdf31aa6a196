// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod store_tests;

use fieldops::{AreaOverride, AssignmentAuthority};
use fieldops_audit::Actor;
use fieldops_domain::{AreaId, Complaint, Priority, TechnicianId};
use time::OffsetDateTime;
use time::macros::datetime;

use crate::Persistence;

pub const INTAKE_TIME: OffsetDateTime = datetime!(2026-03-02 09:30 UTC);

/// One area with `technicians` active technicians.
pub fn seed_area(
    persistence: &mut Persistence,
    code: &str,
    technicians: usize,
) -> (AreaId, Vec<TechnicianId>) {
    let area_id: AreaId = persistence
        .create_area(code, &format!("{code} office"))
        .unwrap()
        .id;
    let technician_ids: Vec<TechnicianId> = (0..technicians)
        .map(|n| {
            persistence
                .create_technician(area_id, &format!("{code} tech {n}"), true)
                .unwrap()
                .id
        })
        .collect();
    (area_id, technician_ids)
}

pub fn raise_complaint(persistence: &mut Persistence, area_id: AreaId) -> Complaint {
    persistence
        .create_complaint(area_id, Priority::High, INTAKE_TIME)
        .unwrap()
}

pub fn supervisor() -> AssignmentAuthority {
    AssignmentAuthority::new(
        Actor::new(String::from("sup-3"), String::from("supervisor")),
        AreaOverride::Denied,
    )
}
