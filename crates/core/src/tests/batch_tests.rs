// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fieldops_domain::{AreaId, ComplaintId, ComplaintStatus, TechnicianId};

use crate::tests::helpers::MemoryStore;
use crate::{BatchAssigner, BatchOutcome, CoreError, ErrorKind, NoopNotifier, WorkloadTracker};

fn run(store: &MemoryStore, ids: &[ComplaintId]) -> BatchOutcome {
    let mut store: MemoryStore = store.clone();
    BatchAssigner::new(&mut store, &NoopNotifier).auto_assign_many(ids)
}

#[test]
fn test_batch_tallies_partial_failure() {
    let store: MemoryStore = MemoryStore::new();
    let staffed: AreaId = store.add_area(1);
    let empty: AreaId = store.add_area(2);
    store.add_technician(1, staffed, true);
    store.add_technician(2, staffed, true);
    let c1: ComplaintId = store.add_complaint(10, staffed);
    let c2: ComplaintId = store.add_complaint(11, empty);
    let c3: ComplaintId = store.add_complaint(12, staffed);

    let outcome: BatchOutcome = run(&store, &[c1, c2, c3]);

    assert_eq!(outcome.total, 3);
    assert_eq!(outcome.successful, 2);
    assert_eq!(outcome.failed, 1);

    let order: Vec<ComplaintId> = outcome.results.iter().map(|r| r.complaint_id).collect();
    assert_eq!(order, vec![c1, c2, c3]);
    assert!(outcome.results[0].outcome.is_ok());
    assert_eq!(
        outcome.results[1].outcome,
        Err(CoreError::NoTechnicianAvailable(empty))
    );
    assert!(outcome.results[2].outcome.is_ok());
    assert_eq!(store.complaint(c2).status, ComplaintStatus::Unassigned);
}

#[test]
fn test_batch_sees_its_own_writes() {
    let store: MemoryStore = MemoryStore::new();
    let area: AreaId = store.add_area(1);
    let t1: TechnicianId = store.add_technician(1, area, true);
    let t2: TechnicianId = store.add_technician(2, area, true);
    let ids: Vec<ComplaintId> = (10..14).map(|id| store.add_complaint(id, area)).collect();

    let outcome: BatchOutcome = run(&store, &ids);

    assert_eq!(outcome.successful, 4);
    let mut tracker_store: MemoryStore = store.clone();
    let mut tracker: WorkloadTracker<'_, MemoryStore> = WorkloadTracker::new(&mut tracker_store);
    assert_eq!(tracker.workload_of(t1).unwrap(), 2);
    assert_eq!(tracker.workload_of(t2).unwrap(), 2);
}

#[test]
fn test_duplicate_ids_are_separate_items() {
    let store: MemoryStore = MemoryStore::new();
    let area: AreaId = store.add_area(1);
    store.add_technician(1, area, true);
    let c1: ComplaintId = store.add_complaint(10, area);

    let outcome: BatchOutcome = run(&store, &[c1, c1]);

    assert_eq!(outcome.total, 2);
    assert_eq!(outcome.successful, 1);
    assert_eq!(
        outcome.results[1].outcome.as_ref().map_err(CoreError::kind),
        Err(ErrorKind::InvalidState)
    );
    assert_eq!(store.open_records_of(c1).len(), 1);
}

#[test]
fn test_unknown_ids_fail_individually() {
    let store: MemoryStore = MemoryStore::new();
    let area: AreaId = store.add_area(1);
    store.add_technician(1, area, true);
    let c1: ComplaintId = store.add_complaint(10, area);

    let outcome: BatchOutcome = run(&store, &[ComplaintId::new(404), c1]);

    assert_eq!(outcome.failed, 1);
    assert_eq!(
        outcome.results[0].outcome.as_ref().map_err(CoreError::kind),
        Err(ErrorKind::NotFound)
    );
    assert!(outcome.results[1].outcome.is_ok());
}

#[test]
fn test_empty_batch() {
    let store: MemoryStore = MemoryStore::new();

    let outcome: BatchOutcome = run(&store, &[]);

    assert_eq!(outcome.total, 0);
    assert_eq!(outcome.successful, 0);
    assert_eq!(outcome.failed, 0);
    assert!(outcome.results.is_empty());
}
