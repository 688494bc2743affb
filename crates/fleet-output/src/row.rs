//! Plain data row types written by output backends.

use fleet_core::SimClock;
use fleet_mobility::TruckState;
use fleet_sim::{DecisionRecord, TickSummary};

/// One truck at one snapshot tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TruckSnapshotRow {
    pub tick:                  u64,
    /// `"HH:MM"` virtual time of day.
    pub time:                  String,
    pub truck_id:              String,
    pub status:                &'static str,
    pub lat:                   f64,
    pub lng:                   f64,
    pub current_node:          String,
    pub destination_node:      String,
    /// Catalog route id, or `AD_HOC`.
    pub active_route:          String,
    pub fuel_percent:          f64,
    pub capacity_used_percent: f64,
    pub eta_minutes:           u32,
    pub wait_time_ticks:       u32,
    /// Plan nodes still ahead of the truck.
    pub remaining_nodes:       u32,
}

impl TruckSnapshotRow {
    pub fn new(clock: &SimClock, truck: &TruckState) -> Self {
        Self {
            tick:                  clock.current_tick.0,
            time:                  clock.time_of_day(),
            truck_id:              truck.truck_id.to_string(),
            status:                truck.status.as_str(),
            lat:                   truck.location.lat,
            lng:                   truck.location.lng,
            current_node:          truck.current_node.to_string(),
            destination_node:      truck.destination_node.to_string(),
            active_route:          truck.active_route.to_string(),
            fuel_percent:          truck.fuel_percent,
            capacity_used_percent: truck.capacity_used_percent,
            eta_minutes:           truck.eta_minutes,
            wait_time_ticks:       truck.wait_time_ticks,
            remaining_nodes:       truck.route_nodes.len().saturating_sub(1) as u32,
        }
    }
}

/// Fleet counts for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:           u64,
    pub unix_time_secs: i64,
    pub moving:         u32,
    pub refueling:      u32,
    pub stranded:       u32,
    pub arrived:        u32,
    pub idle:           u32,
    pub events:         u32,
}

impl TickSummaryRow {
    pub fn new(summary: &TickSummary, unix_time_secs: i64) -> Self {
        Self {
            tick:      summary.tick.0,
            unix_time_secs,
            moving:    summary.moving as u32,
            refueling: summary.refueling as u32,
            stranded:  summary.stranded as u32,
            arrived:   summary.arrived as u32,
            idle:      summary.idle as u32,
            events:    summary.events as u32,
        }
    }
}

/// One dispatched event and the decision applied for it.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionRow {
    pub tick:          u64,
    pub truck_id:      String,
    pub event:         String,
    pub event_details: String,
    pub action:        &'static str,
    pub confidence:    f64,
    pub origin:        &'static str,
    pub outcome:       String,
    /// Action the safety override replaced; empty when there was none.
    pub overridden:    &'static str,
    pub reasoning:     String,
}

impl From<&DecisionRecord> for DecisionRow {
    fn from(r: &DecisionRecord) -> Self {
        Self {
            tick:          r.tick.0,
            truck_id:      r.truck_id.to_string(),
            event:         r.event.kind.to_string(),
            event_details: r.event.details.clone(),
            action:        r.decision.action.as_str(),
            confidence:    r.decision.confidence,
            origin:        r.origin.as_str(),
            outcome:       r.outcome.to_string(),
            overridden:    r.overridden.as_ref().map_or("", |d| d.action.as_str()),
            reasoning:     r.decision.reasoning.clone(),
        }
    }
}
