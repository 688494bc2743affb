//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `truck_snapshots.csv`
//! - `tick_summaries.csv`
//! - `decisions.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{DecisionRow, OutputResult, TickSummaryRow, TruckSnapshotRow};

pub const SNAPSHOT_HEADER: [&str; 14] = [
    "tick", "time", "truck_id", "status", "lat", "lng", "current_node",
    "destination_node", "active_route_id", "fuel_percent", "capacity_used_percent",
    "eta_minutes", "wait_time_ticks", "remaining_nodes",
];

pub const SUMMARY_HEADER: [&str; 8] = [
    "tick", "unix_time_secs", "moving", "refueling", "stranded", "arrived", "idle", "events",
];

pub const DECISION_HEADER: [&str; 10] = [
    "tick", "truck_id", "event", "event_details", "action", "confidence", "origin",
    "outcome", "overridden_action", "reasoning",
];

/// Writes simulation output to three CSV files.
pub struct CsvWriter {
    snapshots: Writer<File>,
    summaries: Writer<File>,
    decisions: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create the three CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut snapshots = Writer::from_path(dir.join("truck_snapshots.csv"))?;
        snapshots.write_record(SNAPSHOT_HEADER)?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(SUMMARY_HEADER)?;

        let mut decisions = Writer::from_path(dir.join("decisions.csv"))?;
        decisions.write_record(DECISION_HEADER)?;

        Ok(Self { snapshots, summaries, decisions, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[TruckSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.tick.to_string(),
                row.time.clone(),
                row.truck_id.clone(),
                row.status.to_owned(),
                format!("{:.6}", row.lat),
                format!("{:.6}", row.lng),
                row.current_node.clone(),
                row.destination_node.clone(),
                row.active_route.clone(),
                format!("{:.2}", row.fuel_percent),
                format!("{:.2}", row.capacity_used_percent),
                row.eta_minutes.to_string(),
                row.wait_time_ticks.to_string(),
                row.remaining_nodes.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.unix_time_secs.to_string(),
            row.moving.to_string(),
            row.refueling.to_string(),
            row.stranded.to_string(),
            row.arrived.to_string(),
            row.idle.to_string(),
            row.events.to_string(),
        ])?;
        Ok(())
    }

    fn write_decision(&mut self, row: &DecisionRow) -> OutputResult<()> {
        self.decisions.write_record(&[
            row.tick.to_string(),
            row.truck_id.clone(),
            row.event.clone(),
            row.event_details.clone(),
            row.action.to_owned(),
            format!("{:.2}", row.confidence),
            row.origin.to_owned(),
            row.outcome.clone(),
            row.overridden.to_owned(),
            row.reasoning.clone(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.summaries.flush()?;
        self.decisions.flush()?;
        Ok(())
    }
}
