// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fieldops_audit::Actor;
use fieldops_domain::{AreaId, Complaint, ComplaintId, ComplaintStatus, DomainError, TechnicianId};
use time::macros::datetime;

use crate::tests::helpers::{MemoryStore, RecordingNotifier};
use crate::{AssignmentEvent, CoreError, NoopNotifier, WorkloadTracker, transition_status};

fn technician_actor() -> Actor {
    Actor::new(String::from("tech-1"), String::from("technician"))
}

fn held(status: ComplaintStatus) -> (MemoryStore, TechnicianId, ComplaintId) {
    let store: MemoryStore = MemoryStore::new();
    let area: AreaId = store.add_area(1);
    let tech: TechnicianId = store.add_technician(1, area, true);
    let complaint: ComplaintId =
        store.add_held_complaint(10, area, tech, status, datetime!(2026-01-05 09:00 UTC));
    (store, tech, complaint)
}

fn transition(
    store: &MemoryStore,
    complaint: ComplaintId,
    target: ComplaintStatus,
) -> Result<Complaint, CoreError> {
    let mut store: MemoryStore = store.clone();
    transition_status(
        &mut store,
        &NoopNotifier,
        complaint,
        target,
        &technician_actor(),
    )
}

#[test]
fn test_full_lifecycle_stamps_resolution_once() {
    let (store, tech, complaint) = held(ComplaintStatus::Assigned);

    transition(&store, complaint, ComplaintStatus::InProgress).unwrap();
    transition(&store, complaint, ComplaintStatus::OnHold).unwrap();
    transition(&store, complaint, ComplaintStatus::InProgress).unwrap();
    let resolved: Complaint = transition(&store, complaint, ComplaintStatus::Resolved).unwrap();
    let closed: Complaint = transition(&store, complaint, ComplaintStatus::Closed).unwrap();

    assert!(resolved.resolved_at.is_some());
    assert_eq!(closed.resolved_at, resolved.resolved_at);
    assert_eq!(closed.status, ComplaintStatus::Closed);
    assert_eq!(closed.assigned_technician_id, Some(tech));
    assert_eq!(closed.version, 6);
}

#[test]
fn test_resolving_releases_workload_without_closing_record() {
    let (mut store, tech, complaint) = held(ComplaintStatus::InProgress);

    transition(&store, complaint, ComplaintStatus::Resolved).unwrap();

    assert_eq!(WorkloadTracker::new(&mut store).workload_of(tech).unwrap(), 0);
    assert_eq!(store.open_records_of(complaint).len(), 1);
}

#[test]
fn test_unassigned_complaint_can_be_closed_directly() {
    let store: MemoryStore = MemoryStore::new();
    let area: AreaId = store.add_area(1);
    let complaint: ComplaintId = store.add_complaint(10, area);

    let closed: Complaint = transition(&store, complaint, ComplaintStatus::Closed).unwrap();

    assert_eq!(closed.status, ComplaintStatus::Closed);
    assert_eq!(closed.resolved_at, None);
}

#[test]
fn test_assigned_status_cannot_be_set_directly() {
    let store: MemoryStore = MemoryStore::new();
    let area: AreaId = store.add_area(1);
    let complaint: ComplaintId = store.add_complaint(10, area);

    let result: Result<Complaint, CoreError> =
        transition(&store, complaint, ComplaintStatus::Assigned);

    assert_eq!(
        result,
        Err(CoreError::InvalidState(DomainError::InvalidStatusTransition {
            from: ComplaintStatus::Unassigned,
            to: ComplaintStatus::Assigned,
        }))
    );
}

#[test]
fn test_closed_complaint_cannot_reopen() {
    let (store, _, complaint) = held(ComplaintStatus::Closed);

    let result: Result<Complaint, CoreError> =
        transition(&store, complaint, ComplaintStatus::InProgress);

    assert!(matches!(
        result,
        Err(CoreError::InvalidState(DomainError::InvalidStatusTransition { .. }))
    ));
    assert_eq!(store.complaint(complaint).status, ComplaintStatus::Closed);
}

#[test]
fn test_status_change_retries_after_conflict() {
    let (store, _, complaint) = held(ComplaintStatus::Assigned);
    store.interleave(move |s| s.touch(complaint));

    let updated: Complaint = transition(&store, complaint, ComplaintStatus::InProgress).unwrap();

    assert_eq!(updated.status, ComplaintStatus::InProgress);
    assert_eq!(updated.version, 3);
}

#[test]
fn test_status_change_is_announced() {
    let (mut store, _, complaint) = held(ComplaintStatus::Assigned);
    let notifier: RecordingNotifier = RecordingNotifier::default();

    transition_status(
        &mut store,
        &notifier,
        complaint,
        ComplaintStatus::OnHold,
        &technician_actor(),
    )
    .unwrap();

    assert_eq!(
        notifier.events(),
        vec![AssignmentEvent::StatusChanged {
            complaint_id: complaint,
            from: ComplaintStatus::Assigned,
            to: ComplaintStatus::OnHold,
        }]
    );
}
