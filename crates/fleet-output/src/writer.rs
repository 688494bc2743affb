//! The `OutputWriter` trait implemented by all backend writers.

use crate::{DecisionRow, OutputResult, TickSummaryRow, TruckSnapshotRow};

/// Trait implemented by the CSV and SQLite writers.
///
/// Errors are returned to the observer, which keeps the first one for
/// [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write one batch of truck snapshots (one row per truck).
    fn write_snapshots(&mut self, rows: &[TruckSnapshotRow]) -> OutputResult<()>;

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Write one handled event.
    fn write_decision(&mut self, row: &DecisionRow) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
