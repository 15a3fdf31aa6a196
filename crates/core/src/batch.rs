// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fieldops_audit::AssignmentRecord;
use fieldops_domain::ComplaintId;
use tracing::info;

use crate::engine::AssignmentEngine;
use crate::error::CoreError;
use crate::notify::AssignmentNotifier;
use crate::store::AssignmentStore;

/// The outcome of one item of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub complaint_id: ComplaintId,
    pub outcome: Result<AssignmentRecord, CoreError>,
}

/// Tallies of a batch run. `results` follows the input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<BatchItem>,
}

/// Runs automatic assignment over many complaints.
///
/// Items are processed one at a time in input order, so every selection
/// sees the workload written by the items before it. One item's failure
/// never aborts the rest.
pub struct BatchAssigner<'a, S: AssignmentStore> {
    store: &'a mut S,
    notifier: &'a dyn AssignmentNotifier,
}

impl<'a, S: AssignmentStore> BatchAssigner<'a, S> {
    pub const fn new(store: &'a mut S, notifier: &'a dyn AssignmentNotifier) -> Self {
        Self { store, notifier }
    }

    /// Auto-assigns every complaint in `complaint_ids`.
    #[must_use]
    pub fn auto_assign_many(&mut self, complaint_ids: &[ComplaintId]) -> BatchOutcome {
        let mut engine: AssignmentEngine<'_, S> =
            AssignmentEngine::new(&mut *self.store, self.notifier);

        let results: Vec<BatchItem> = complaint_ids
            .iter()
            .map(|&complaint_id| BatchItem {
                complaint_id,
                outcome: engine.auto_assign(complaint_id),
            })
            .collect();

        let successful: usize = results.iter().filter(|item| item.outcome.is_ok()).count();
        let outcome: BatchOutcome = BatchOutcome {
            total: results.len(),
            successful,
            failed: results.len() - successful,
            results,
        };

        info!(
            total = outcome.total,
            successful = outcome.successful,
            failed = outcome.failed,
            "Batch auto-assignment finished"
        );

        outcome
    }
}
