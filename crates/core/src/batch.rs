//! Per-item results for bulk operations.
//!
//! Bulk mutations run item by item with no surrounding transaction. A
//! failure on one item is recorded and the batch carries on; the caller
//! gets both lists back instead of a silent partial result.

use serde::Serialize;

use crate::error::CoreError;
use crate::notice::Notice;
use crate::types::DbId;

/// Maximum number of ids accepted by a single bulk request.
pub const MAX_BATCH_SIZE: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFailure {
    pub id: DbId,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    pub succeeded: Vec<DbId>,
    pub failed: Vec<BatchFailure>,
}

impl BatchOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_ok(&mut self, id: DbId) {
        self.succeeded.push(id);
    }

    pub fn record_err(&mut self, id: DbId, error: impl ToString) {
        self.failed.push(BatchFailure {
            id,
            error: error.to_string(),
        });
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Summary notice for the UI, e.g. "3 deleted, 1 failed".
    pub fn notice(&self, action: &str) -> Notice {
        let ok = self.succeeded.len();
        let failed = self.failed.len();

        if failed == 0 {
            Notice::success(
                format!("Bulk {action} complete"),
                format!("{ok} {action}d"),
            )
        } else if ok == 0 {
            Notice::error(
                format!("Bulk {action} failed"),
                format!("0 {action}d, {failed} failed"),
            )
        } else {
            Notice::warning(
                format!("Bulk {action} partially complete"),
                format!("{ok} {action}d, {failed} failed"),
            )
        }
    }

    /// `Err(PartialBatchFailure)` when any item failed.
    pub fn into_result(self) -> Result<Self, CoreError> {
        if self.failed.is_empty() {
            Ok(self)
        } else {
            Err(CoreError::PartialBatchFailure {
                succeeded: self.succeeded.len(),
                failed: self.failed.len(),
            })
        }
    }
}

/// Reject empty or oversized id lists before any work starts.
pub fn validate_batch_ids(ids: &[DbId]) -> Result<(), CoreError> {
    if ids.is_empty() {
        return Err(CoreError::invalid_field("ids", "must not be empty"));
    }
    if ids.len() > MAX_BATCH_SIZE {
        return Err(CoreError::invalid_field(
            "ids",
            format!("cannot process more than {MAX_BATCH_SIZE} items at once"),
        ));
    }
    Ok(())
}
