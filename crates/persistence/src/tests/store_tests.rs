// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Guarded commits against a real database.

use std::collections::BTreeMap;

use fieldops::{AssignmentStore, CommitOutcome, OpenAssignment, VersionGuard, WorkloadScope};
use fieldops_audit::{Actor, AssignmentRecord};
use fieldops_domain::{Complaint, ComplaintStatus, TechnicianId};
use time::OffsetDateTime;
use time::macros::datetime;

use super::{raise_complaint, seed_area};
use crate::Persistence;
use crate::error::PersistenceError;

const FIRST_START: OffsetDateTime = datetime!(2026-03-02 10:00 UTC);
const HANDOVER: OffsetDateTime = datetime!(2026-03-02 13:15:30.25 UTC);

fn open_record(complaint: &Complaint, technician_id: TechnicianId, at: OffsetDateTime) -> AssignmentRecord {
    AssignmentRecord::open(
        complaint.id,
        technician_id,
        &Actor::system(),
        String::from("Auto-assigned (load-balanced)"),
        at,
    )
}

fn committed<T>(outcome: CommitOutcome<T>) -> T {
    match outcome {
        CommitOutcome::Committed(value) => value,
        CommitOutcome::Conflict => panic!("expected a committed write"),
    }
}

/// An area with two technicians and one complaint assigned to the first.
fn assigned_fixture() -> (Persistence, Complaint, Vec<TechnicianId>, AssignmentRecord) {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let (area_id, technicians) = seed_area(&mut persistence, "NORTH", 2);
    let complaint: Complaint = raise_complaint(&mut persistence, area_id);

    let record: AssignmentRecord = committed(
        persistence
            .commit_assignment(
                &VersionGuard::of(&complaint),
                &open_record(&complaint, technicians[0], FIRST_START),
            )
            .unwrap(),
    );
    let complaint: Complaint = persistence.find_complaint(complaint.id).unwrap().unwrap();

    (persistence, complaint, technicians, record)
}

#[test]
fn test_commit_assignment_updates_complaint_and_opens_record() {
    let (mut persistence, complaint, technicians, record) = assigned_fixture();

    assert!(record.record_id.is_some());
    assert_eq!(complaint.status, ComplaintStatus::Assigned);
    assert_eq!(complaint.assigned_technician_id, Some(technicians[0]));
    assert_eq!(complaint.version, 1);

    let active: AssignmentRecord = persistence.active_record(complaint.id).unwrap().unwrap();
    assert_eq!(active, record);
    assert_eq!(active.started_at, FIRST_START);
    assert!(active.is_automatic());
}

#[test]
fn test_stale_guard_conflicts_without_writing() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let (area_id, technicians) = seed_area(&mut persistence, "NORTH", 2);
    let complaint: Complaint = raise_complaint(&mut persistence, area_id);
    let stale: VersionGuard = VersionGuard::of(&complaint);

    committed(
        persistence
            .commit_assignment(&stale, &open_record(&complaint, technicians[0], FIRST_START))
            .unwrap(),
    );
    let second = persistence
        .commit_assignment(&stale, &open_record(&complaint, technicians[1], FIRST_START))
        .unwrap();

    assert_eq!(second, CommitOutcome::Conflict);
    assert_eq!(persistence.assignment_history(complaint.id).unwrap().len(), 1);
    let stored: Complaint = persistence.find_complaint(complaint.id).unwrap().unwrap();
    assert_eq!(stored.assigned_technician_id, Some(technicians[0]));
    assert_eq!(stored.version, 1);
}

#[test]
fn test_second_open_record_is_rejected_and_rolled_back() {
    let (mut persistence, complaint, technicians, _) = assigned_fixture();

    // The guard matches, so only the open-record index can stop this write.
    let result = persistence.commit_assignment(
        &VersionGuard::of(&complaint),
        &open_record(&complaint, technicians[1], HANDOVER),
    );

    assert!(matches!(result, Err(PersistenceError::DatabaseError(_))));
    let stored: Complaint = persistence.find_complaint(complaint.id).unwrap().unwrap();
    assert_eq!(stored, complaint);
    assert_eq!(persistence.assignment_history(complaint.id).unwrap().len(), 1);
}

#[test]
fn test_reassignment_closes_previous_record_at_new_start() {
    let (mut persistence, complaint, technicians, first) = assigned_fixture();

    let second: AssignmentRecord = committed(
        persistence
            .commit_reassignment(
                &VersionGuard::of(&complaint),
                first.record_id.unwrap(),
                HANDOVER,
                &open_record(&complaint, technicians[1], HANDOVER),
            )
            .unwrap(),
    );

    let history: Vec<AssignmentRecord> = persistence.assignment_history(complaint.id).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].ended_at, Some(HANDOVER));
    assert_eq!(history[1], second);
    assert!(history[1].is_open());

    let stored: Complaint = persistence.find_complaint(complaint.id).unwrap().unwrap();
    assert_eq!(stored.assigned_technician_id, Some(technicians[1]));
    assert_eq!(stored.status, ComplaintStatus::Assigned);
    assert_eq!(stored.version, 2);
}

#[test]
fn test_reassignment_of_closed_record_rolls_back() {
    let (mut persistence, complaint, technicians, _) = assigned_fixture();

    let result = persistence.commit_reassignment(
        &VersionGuard::of(&complaint),
        9_999,
        HANDOVER,
        &open_record(&complaint, technicians[1], HANDOVER),
    );

    assert_eq!(result, Err(PersistenceError::RecordAlreadyClosed(9_999)));
    let stored: Complaint = persistence.find_complaint(complaint.id).unwrap().unwrap();
    assert_eq!(stored, complaint);
    assert_eq!(persistence.assignment_history(complaint.id).unwrap().len(), 1);
}

#[test]
fn test_commit_status_stores_resolution_time() {
    let (mut persistence, complaint, _, _) = assigned_fixture();
    let resolved_at: OffsetDateTime = datetime!(2026-03-03 08:00 UTC);

    let stored: Complaint = committed(
        persistence
            .commit_status(
                &VersionGuard::of(&complaint),
                ComplaintStatus::Resolved,
                Some(resolved_at),
            )
            .unwrap(),
    );

    assert_eq!(stored.status, ComplaintStatus::Resolved);
    assert_eq!(stored.resolved_at, Some(resolved_at));
    assert_eq!(stored.version, complaint.version + 1);
    assert_eq!(stored.resolution_seconds(), Some(22 * 3600 + 30 * 60));
}

#[test]
fn test_commit_status_with_wrong_status_conflicts() {
    let (mut persistence, complaint, _, _) = assigned_fixture();
    let guard: VersionGuard = VersionGuard {
        complaint_id: complaint.id,
        version: complaint.version,
        status: ComplaintStatus::InProgress,
    };

    let outcome = persistence
        .commit_status(&guard, ComplaintStatus::OnHold, None)
        .unwrap();

    assert_eq!(outcome, CommitOutcome::Conflict);
}

#[test]
fn test_open_assignments_carry_status_and_technician_area() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let (north, north_techs) = seed_area(&mut persistence, "NORTH", 1);
    let (south, south_techs) = seed_area(&mut persistence, "SOUTH", 1);

    for (area_id, technician_id) in [(north, north_techs[0]), (south, south_techs[0])] {
        let complaint: Complaint = raise_complaint(&mut persistence, area_id);
        committed(
            persistence
                .commit_assignment(
                    &VersionGuard::of(&complaint),
                    &open_record(&complaint, technician_id, FIRST_START),
                )
                .unwrap(),
        );
    }

    let all: Vec<OpenAssignment> = persistence.list_open_assignments(WorkloadScope::All).unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().all(|open| open.complaint_status == ComplaintStatus::Assigned));

    let south_only: Vec<OpenAssignment> =
        persistence.list_open_assignments(WorkloadScope::Area(south)).unwrap();
    assert_eq!(south_only.len(), 1);
    assert_eq!(south_only[0].technician_area_id, south);
    assert_eq!(south_only[0].record.technician_id, south_techs[0]);

    let by_tech: Vec<OpenAssignment> = persistence
        .list_open_assignments(WorkloadScope::Technician(north_techs[0]))
        .unwrap();
    assert_eq!(by_tech.len(), 1);
    assert_eq!(by_tech[0].technician_area_id, north);
}

#[test]
fn test_latest_assignment_starts_include_closed_records() {
    let (mut persistence, complaint, technicians, first) = assigned_fixture();
    committed(
        persistence
            .commit_reassignment(
                &VersionGuard::of(&complaint),
                first.record_id.unwrap(),
                HANDOVER,
                &open_record(&complaint, technicians[1], HANDOVER),
            )
            .unwrap(),
    );

    let latest: BTreeMap<TechnicianId, OffsetDateTime> =
        persistence.latest_assignment_starts(&technicians).unwrap();

    assert_eq!(latest.get(&technicians[0]), Some(&FIRST_START));
    assert_eq!(latest.get(&technicians[1]), Some(&HANDOVER));
}

#[test]
fn test_latest_assignment_starts_skip_never_assigned() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let (_, technicians) = seed_area(&mut persistence, "EAST", 2);

    let latest = persistence.latest_assignment_starts(&technicians).unwrap();

    assert!(latest.is_empty());
}

#[test]
fn test_latest_assignment_start_compares_fractional_seconds() {
    let (mut persistence, _, technicians, _) = assigned_fixture();
    let area_id = persistence
        .find_technician(technicians[0])
        .unwrap()
        .unwrap()
        .area_id;
    let second: Complaint = raise_complaint(&mut persistence, area_id);
    let half_second_later: OffsetDateTime = datetime!(2026-03-02 10:00:00.5 UTC);
    committed(
        persistence
            .commit_assignment(
                &VersionGuard::of(&second),
                &open_record(&second, technicians[0], half_second_later),
            )
            .unwrap(),
    );

    let latest: BTreeMap<TechnicianId, OffsetDateTime> =
        persistence.latest_assignment_starts(&technicians).unwrap();

    assert_eq!(latest.get(&technicians[0]), Some(&half_second_later));
    assert_eq!(latest.get(&technicians[1]), None);
}
