// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! An in-memory `AssignmentStore` shared between clones, with hooks that
//! let a test slip a concurrent write in front of the next commit.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};

use fieldops_audit::{Actor, AssignmentRecord};
use fieldops_domain::{
    Area, AreaId, Complaint, ComplaintId, ComplaintStatus, Priority, Technician, TechnicianId,
};
use time::OffsetDateTime;
use time::macros::datetime;

use crate::{
    AreaOverride, AssignmentAuthority, AssignmentEvent, AssignmentNotifier, AssignmentStore,
    CommitOutcome, NotifyError, OpenAssignment, VersionGuard, WorkloadScope,
};

pub const INTAKE_TIME: OffsetDateTime = datetime!(2026-01-05 08:00 UTC);

type Interleave = Box<dyn FnOnce(&mut MemoryState) + Send>;

#[derive(Default)]
pub struct MemoryState {
    pub areas: BTreeMap<AreaId, Area>,
    pub technicians: BTreeMap<TechnicianId, Technician>,
    pub complaints: BTreeMap<ComplaintId, Complaint>,
    pub records: Vec<AssignmentRecord>,
    pub fail_reads: bool,
    next_record_id: i64,
    interleaved: VecDeque<Interleave>,
}

impl MemoryState {
    fn insert_record(&mut self, record: &AssignmentRecord) -> AssignmentRecord {
        self.next_record_id += 1;
        let mut stored: AssignmentRecord = record.clone();
        stored.record_id = Some(self.next_record_id);
        self.records.push(stored.clone());
        stored
    }

    fn guard_matches(&self, guard: &VersionGuard) -> bool {
        self.complaints
            .get(&guard.complaint_id)
            .is_some_and(|c| c.version == guard.version && c.status == guard.status)
    }

    fn run_interleaved(&mut self) {
        if let Some(write) = self.interleaved.pop_front() {
            write(self);
        }
    }

    /// Simulates an unrelated write that bumps the complaint's version.
    pub fn touch(&mut self, complaint_id: ComplaintId) {
        let complaint: &mut Complaint = self.complaints.get_mut(&complaint_id).unwrap();
        complaint.version += 1;
    }

    /// Simulates another writer assigning the complaint.
    pub fn assign(
        &mut self,
        complaint_id: ComplaintId,
        technician_id: TechnicianId,
        started_at: OffsetDateTime,
    ) {
        let complaint: &mut Complaint = self.complaints.get_mut(&complaint_id).unwrap();
        complaint.status = ComplaintStatus::Assigned;
        complaint.assigned_technician_id = Some(technician_id);
        complaint.version += 1;
        let record: AssignmentRecord = AssignmentRecord::open(
            complaint_id,
            technician_id,
            &Actor::system(),
            String::from("seeded"),
            started_at,
        );
        self.insert_record(&record);
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&mut MemoryState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    pub fn add_area(&self, id: i64) -> AreaId {
        let area_id: AreaId = AreaId::new(id);
        self.with_state(|s| {
            s.areas.insert(
                area_id,
                Area::new(area_id, format!("A{id}"), format!("Area {id}"), None),
            );
        });
        area_id
    }

    pub fn add_technician(&self, id: i64, area_id: AreaId, active: bool) -> TechnicianId {
        let technician_id: TechnicianId = TechnicianId::new(id);
        self.with_state(|s| {
            s.technicians.insert(
                technician_id,
                Technician::new(technician_id, area_id, format!("Tech {id}"), active),
            );
        });
        technician_id
    }

    pub fn add_complaint(&self, id: i64, area_id: AreaId) -> ComplaintId {
        let complaint_id: ComplaintId = ComplaintId::new(id);
        self.with_state(|s| {
            s.complaints.insert(
                complaint_id,
                Complaint::new_unassigned(complaint_id, area_id, Priority::Medium, INTAKE_TIME),
            );
        });
        complaint_id
    }

    /// Adds a complaint already held by `technician_id` in `status`.
    pub fn add_held_complaint(
        &self,
        id: i64,
        area_id: AreaId,
        technician_id: TechnicianId,
        status: ComplaintStatus,
        started_at: OffsetDateTime,
    ) -> ComplaintId {
        let complaint_id: ComplaintId = self.add_complaint(id, area_id);
        self.with_state(|s| {
            s.assign(complaint_id, technician_id, started_at);
            s.complaints.get_mut(&complaint_id).unwrap().status = status;
        });
        complaint_id
    }

    /// Adds a closed record for `technician_id` on a fresh closed complaint.
    pub fn add_past_assignment(
        &self,
        id: i64,
        area_id: AreaId,
        technician_id: TechnicianId,
        started_at: OffsetDateTime,
    ) {
        let complaint_id: ComplaintId = self.add_held_complaint(
            id,
            area_id,
            technician_id,
            ComplaintStatus::Closed,
            started_at,
        );
        self.with_state(|s| {
            for record in s
                .records
                .iter_mut()
                .filter(|r| r.complaint_id == complaint_id)
            {
                record.ended_at = Some(started_at + time::Duration::hours(1));
            }
        });
    }

    pub fn interleave(&self, write: impl FnOnce(&mut MemoryState) + Send + 'static) {
        self.with_state(|s| s.interleaved.push_back(Box::new(write)));
    }

    pub fn complaint(&self, id: ComplaintId) -> Complaint {
        self.with_state(|s| s.complaints[&id].clone())
    }

    pub fn records_of(&self, id: ComplaintId) -> Vec<AssignmentRecord> {
        self.with_state(|s| {
            s.records
                .iter()
                .filter(|r| r.complaint_id == id)
                .cloned()
                .collect()
        })
    }

    pub fn open_records_of(&self, id: ComplaintId) -> Vec<AssignmentRecord> {
        self.records_of(id)
            .into_iter()
            .filter(AssignmentRecord::is_open)
            .collect()
    }

    pub fn record_count(&self) -> usize {
        self.with_state(|s| s.records.len())
    }
}

impl AssignmentStore for MemoryStore {
    type Error = String;

    fn find_complaint(&mut self, id: ComplaintId) -> Result<Option<Complaint>, String> {
        self.with_state(|s| {
            if s.fail_reads {
                return Err(String::from("disk I/O error"));
            }
            Ok(s.complaints.get(&id).cloned())
        })
    }

    fn list_complaints(&mut self) -> Result<Vec<Complaint>, String> {
        self.with_state(|s| Ok(s.complaints.values().cloned().collect()))
    }

    fn find_technician(&mut self, id: TechnicianId) -> Result<Option<Technician>, String> {
        self.with_state(|s| Ok(s.technicians.get(&id).cloned()))
    }

    fn list_area_technicians(&mut self, area_id: AreaId) -> Result<Vec<Technician>, String> {
        self.with_state(|s| {
            Ok(s.technicians
                .values()
                .filter(|t| t.area_id == area_id)
                .cloned()
                .collect())
        })
    }

    fn find_area(&mut self, id: AreaId) -> Result<Option<Area>, String> {
        self.with_state(|s| Ok(s.areas.get(&id).cloned()))
    }

    fn set_area_manager(
        &mut self,
        area_id: AreaId,
        technician_id: TechnicianId,
    ) -> Result<(), String> {
        self.with_state(|s| {
            let area: &mut Area = s.areas.get_mut(&area_id).ok_or("no such area")?;
            area.manager_id = Some(technician_id);
            Ok(())
        })
    }

    fn list_open_assignments(&mut self, scope: WorkloadScope) -> Result<Vec<OpenAssignment>, String> {
        self.with_state(|s| {
            Ok(s.records
                .iter()
                .filter(|r| r.is_open())
                .map(|r| OpenAssignment {
                    record: r.clone(),
                    complaint_status: s.complaints[&r.complaint_id].status,
                    technician_area_id: s.technicians[&r.technician_id].area_id,
                })
                .filter(|open| match scope {
                    WorkloadScope::Technician(id) => open.record.technician_id == id,
                    WorkloadScope::Area(id) => open.technician_area_id == id,
                    WorkloadScope::All => true,
                })
                .collect())
        })
    }

    fn latest_assignment_starts(
        &mut self,
        technicians: &[TechnicianId],
    ) -> Result<BTreeMap<TechnicianId, OffsetDateTime>, String> {
        self.with_state(|s| {
            let mut latest: BTreeMap<TechnicianId, OffsetDateTime> = BTreeMap::new();
            for record in s
                .records
                .iter()
                .filter(|r| technicians.contains(&r.technician_id))
            {
                let entry: &mut OffsetDateTime =
                    latest.entry(record.technician_id).or_insert(record.started_at);
                if record.started_at > *entry {
                    *entry = record.started_at;
                }
            }
            Ok(latest)
        })
    }

    fn active_record(
        &mut self,
        complaint_id: ComplaintId,
    ) -> Result<Option<AssignmentRecord>, String> {
        self.with_state(|s| {
            Ok(s.records
                .iter()
                .find(|r| r.complaint_id == complaint_id && r.is_open())
                .cloned())
        })
    }

    fn assignment_history(
        &mut self,
        complaint_id: ComplaintId,
    ) -> Result<Vec<AssignmentRecord>, String> {
        Ok(self.records_of(complaint_id))
    }

    fn commit_assignment(
        &mut self,
        guard: &VersionGuard,
        record: &AssignmentRecord,
    ) -> Result<CommitOutcome<AssignmentRecord>, String> {
        self.with_state(|s| {
            s.run_interleaved();
            if !s.guard_matches(guard) {
                return Ok(CommitOutcome::Conflict);
            }
            let complaint: &mut Complaint = s.complaints.get_mut(&guard.complaint_id).unwrap();
            complaint.status = ComplaintStatus::Assigned;
            complaint.assigned_technician_id = Some(record.technician_id);
            complaint.version += 1;
            Ok(CommitOutcome::Committed(s.insert_record(record)))
        })
    }

    fn commit_reassignment(
        &mut self,
        guard: &VersionGuard,
        closing_record_id: i64,
        ended_at: OffsetDateTime,
        record: &AssignmentRecord,
    ) -> Result<CommitOutcome<AssignmentRecord>, String> {
        self.with_state(|s| {
            s.run_interleaved();
            if !s.guard_matches(guard) {
                return Ok(CommitOutcome::Conflict);
            }
            let closing: &mut AssignmentRecord = s
                .records
                .iter_mut()
                .find(|r| r.record_id == Some(closing_record_id) && r.is_open())
                .ok_or("record already closed")?;
            closing.ended_at = Some(ended_at);
            let complaint: &mut Complaint = s.complaints.get_mut(&guard.complaint_id).unwrap();
            complaint.assigned_technician_id = Some(record.technician_id);
            complaint.version += 1;
            Ok(CommitOutcome::Committed(s.insert_record(record)))
        })
    }

    fn commit_status(
        &mut self,
        guard: &VersionGuard,
        target: ComplaintStatus,
        resolved_at: Option<OffsetDateTime>,
    ) -> Result<CommitOutcome<Complaint>, String> {
        self.with_state(|s| {
            s.run_interleaved();
            if !s.guard_matches(guard) {
                return Ok(CommitOutcome::Conflict);
            }
            let complaint: &mut Complaint = s.complaints.get_mut(&guard.complaint_id).unwrap();
            complaint.status = target;
            complaint.resolved_at = resolved_at;
            complaint.version += 1;
            Ok(CommitOutcome::Committed(complaint.clone()))
        })
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub events: Mutex<Vec<AssignmentEvent>>,
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

pub struct FailingNotifier;

impl AssignmentNotifier for FailingNotifier {
    fn notify(&self, _event: &AssignmentEvent) -> Result<(), NotifyError> {
        Err(NotifyError(String::from("mail relay unreachable")))
    }
}

pub fn supervisor() -> AssignmentAuthority {
    AssignmentAuthority::new(
        Actor::new(String::from("sup-7"), String::from("supervisor")),
        AreaOverride::Denied,
    )
}

pub fn admin() -> AssignmentAuthority {
    AssignmentAuthority::new(
        Actor::new(String::from("admin-1"), String::from("admin")),
        AreaOverride::Granted,
    )
}
