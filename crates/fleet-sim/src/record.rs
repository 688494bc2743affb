//! Decision log entries and the exported fleet snapshot.

use fleet_core::{Tick, TruckId};
use fleet_decision::{Decision, TruckEvent};
use fleet_mobility::TruckState;

use crate::ApplyOutcome;

/// Who produced the decision that was applied.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DecisionOrigin {
    Source,
    /// The source failed and the heuristic answered.
    Fallback,
    /// The source answered a `LOW_FUEL` event without rerouting, and the
    /// heuristic's reroute was applied on top.
    SafetyOverride,
}

impl DecisionOrigin {
    pub fn as_str(self) -> &'static str {
        match self {
            DecisionOrigin::Source         => "source",
            DecisionOrigin::Fallback       => "fallback",
            DecisionOrigin::SafetyOverride => "safety_override",
        }
    }
}

/// One dispatched event and what came of it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DecisionRecord {
    pub tick:       Tick,
    pub truck_id:   TruckId,
    pub event:      TruckEvent,
    /// The decision whose outcome is recorded.
    pub decision:   Decision,
    pub origin:     DecisionOrigin,
    pub outcome:    ApplyOutcome,
    /// The source's decision, when the safety override replaced it.
    pub overridden: Option<Decision>,
}

/// Current virtual time plus every truck, in fleet order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FleetSnapshot {
    pub tick:          Tick,
    /// `"HH:MM"`.
    pub time:          String,
    pub sim_unix_secs: i64,
    pub trucks:        Vec<TruckState>,
}
