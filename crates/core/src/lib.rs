// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod batch;
mod directory;
mod engine;
mod error;
mod lifecycle;
mod notify;
mod reassign;
mod stats;
mod store;
mod workload;

#[cfg(test)]
mod tests;

pub use batch::{BatchAssigner, BatchItem, BatchOutcome};
pub use directory::AreaDirectory;
pub use engine::{
    AUTO_ASSIGN_REASON, AreaOverride, AssignmentAuthority, AssignmentEngine, MAX_CAS_RETRIES,
};
pub use error::{CoreError, ErrorKind};
pub use lifecycle::transition_status;
pub use notify::{AssignmentEvent, AssignmentNotifier, NoopNotifier, NotifyError};
pub use reassign::ReassignmentCoordinator;
pub use stats::{AssignmentStats, StatsAggregator};
pub use store::{AssignmentStore, CommitOutcome, OpenAssignment, VersionGuard, WorkloadScope};
pub use workload::WorkloadTracker;
