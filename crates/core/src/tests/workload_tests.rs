// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeMap;

use fieldops_domain::{AreaId, ComplaintStatus, TechnicianId};
use time::macros::datetime;

use crate::tests::helpers::MemoryStore;
use crate::{CoreError, WorkloadTracker};

#[test]
fn test_workload_counts_active_assignments_only() {
    let mut store: MemoryStore = MemoryStore::new();
    let area: AreaId = store.add_area(1);
    let tech: TechnicianId = store.add_technician(1, area, true);
    let at = datetime!(2026-01-05 09:00 UTC);
    store.add_held_complaint(10, area, tech, ComplaintStatus::Assigned, at);
    store.add_held_complaint(11, area, tech, ComplaintStatus::InProgress, at);
    store.add_held_complaint(12, area, tech, ComplaintStatus::OnHold, at);
    store.add_held_complaint(13, area, tech, ComplaintStatus::Resolved, at);
    store.add_past_assignment(14, area, tech, at);

    let load: u32 = WorkloadTracker::new(&mut store).workload_of(tech).unwrap();

    assert_eq!(load, 2);
}

#[test]
fn test_unknown_technician_has_no_workload() {
    let mut store: MemoryStore = MemoryStore::new();

    let result: Result<u32, CoreError> =
        WorkloadTracker::new(&mut store).workload_of(TechnicianId::new(3));

    assert_eq!(
        result,
        Err(CoreError::NotFound {
            entity: "Technician",
            id: 3
        })
    );
}

#[test]
fn test_area_workload_includes_idle_technicians() {
    let mut store: MemoryStore = MemoryStore::new();
    let area: AreaId = store.add_area(1);
    let busy: TechnicianId = store.add_technician(1, area, true);
    let idle: TechnicianId = store.add_technician(2, area, true);
    store.add_technician(3, area, false);
    store.add_held_complaint(
        10,
        area,
        busy,
        ComplaintStatus::Assigned,
        datetime!(2026-01-05 09:00 UTC),
    );

    let loads: BTreeMap<TechnicianId, u32> =
        WorkloadTracker::new(&mut store).workload_of_area(area).unwrap();

    assert_eq!(loads, BTreeMap::from([(busy, 1), (idle, 0)]));
}

#[test]
fn test_cross_area_work_counts_in_technician_area() {
    let mut store: MemoryStore = MemoryStore::new();
    let home: AreaId = store.add_area(1);
    let away: AreaId = store.add_area(2);
    let tech: TechnicianId = store.add_technician(1, home, true);
    store.add_held_complaint(
        10,
        away,
        tech,
        ComplaintStatus::Assigned,
        datetime!(2026-01-05 09:00 UTC),
    );

    let mut tracker: WorkloadTracker<'_, MemoryStore> = WorkloadTracker::new(&mut store);

    assert_eq!(tracker.workload_of_area(home).unwrap(), BTreeMap::from([(tech, 1)]));
    assert!(tracker.workload_of_area(away).unwrap().is_empty());
}
