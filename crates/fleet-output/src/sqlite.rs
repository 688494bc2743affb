//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `fleet.db` file in the configured output directory with
//! three tables: `truck_snapshots`, `tick_summaries` and `decisions`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{DecisionRow, OutputResult, TickSummaryRow, TruckSnapshotRow};

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `fleet.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let conn = Connection::open(dir.join("fleet.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS truck_snapshots (
                 tick                  INTEGER NOT NULL,
                 time                  TEXT    NOT NULL,
                 truck_id              TEXT    NOT NULL,
                 status                TEXT    NOT NULL,
                 lat                   REAL    NOT NULL,
                 lng                   REAL    NOT NULL,
                 current_node          TEXT    NOT NULL,
                 destination_node      TEXT    NOT NULL,
                 active_route_id       TEXT    NOT NULL,
                 fuel_percent          REAL    NOT NULL,
                 capacity_used_percent REAL    NOT NULL,
                 eta_minutes           INTEGER NOT NULL,
                 wait_time_ticks       INTEGER NOT NULL,
                 remaining_nodes       INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS tick_summaries (
                 tick           INTEGER PRIMARY KEY,
                 unix_time_secs INTEGER NOT NULL,
                 moving         INTEGER NOT NULL,
                 refueling      INTEGER NOT NULL,
                 stranded       INTEGER NOT NULL,
                 arrived        INTEGER NOT NULL,
                 idle           INTEGER NOT NULL,
                 events         INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS decisions (
                 tick              INTEGER NOT NULL,
                 truck_id          TEXT    NOT NULL,
                 event             TEXT    NOT NULL,
                 event_details     TEXT    NOT NULL,
                 action            TEXT    NOT NULL,
                 confidence        REAL    NOT NULL,
                 origin            TEXT    NOT NULL,
                 outcome           TEXT    NOT NULL,
                 overridden_action TEXT    NOT NULL,
                 reasoning         TEXT    NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_snapshots(&mut self, rows: &[TruckSnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO truck_snapshots \
                 (tick, time, truck_id, status, lat, lng, current_node, destination_node, \
                  active_route_id, fuel_percent, capacity_used_percent, eta_minutes, \
                  wait_time_ticks, remaining_nodes) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.tick as i64,
                    row.time,
                    row.truck_id,
                    row.status,
                    row.lat,
                    row.lng,
                    row.current_node,
                    row.destination_node,
                    row.active_route,
                    row.fuel_percent,
                    row.capacity_used_percent,
                    row.eta_minutes,
                    row.wait_time_ticks,
                    row.remaining_nodes,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO tick_summaries \
             (tick, unix_time_secs, moving, refueling, stranded, arrived, idle, events) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                row.tick as i64,
                row.unix_time_secs,
                row.moving,
                row.refueling,
                row.stranded,
                row.arrived,
                row.idle,
                row.events,
            ],
        )?;
        Ok(())
    }

    fn write_decision(&mut self, row: &DecisionRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO decisions \
             (tick, truck_id, event, event_details, action, confidence, origin, outcome, \
              overridden_action, reasoning) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            rusqlite::params![
                row.tick as i64,
                row.truck_id,
                row.event,
                row.event_details,
                row.action,
                row.confidence,
                row.origin,
                row.outcome,
                row.overridden,
                row.reasoning,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
