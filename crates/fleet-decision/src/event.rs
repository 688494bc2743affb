//! Operational events that call for a decision.

use std::fmt;

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum EventKind {
    LowFuel,
    /// The truck's catalog route was closed (also accepts `BLOCKED`).
    RoadClosed,
    TrafficJam,
    NewLoadOffer,
    VehicleBreakdown,
    /// Anything else an operator injects; passed through verbatim.
    Other(String),
}

impl EventKind {
    /// Kinds the periodic random-event generator draws from.
    pub const RANDOM: [EventKind; 3] =
        [EventKind::TrafficJam, EventKind::NewLoadOffer, EventKind::VehicleBreakdown];

    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW_FUEL"                       => EventKind::LowFuel,
            "ROAD_CLOSED" | "BLOCKED"        => EventKind::RoadClosed,
            "TRAFFIC_JAM" | "TRAFFIC"        => EventKind::TrafficJam,
            "NEW_LOAD_OFFER"                 => EventKind::NewLoadOffer,
            "VEHICLE_BREAKDOWN"              => EventKind::VehicleBreakdown,
            _                                => EventKind::Other(s.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EventKind::LowFuel          => "LOW_FUEL",
            EventKind::RoadClosed       => "ROAD_CLOSED",
            EventKind::TrafficJam       => "TRAFFIC_JAM",
            EventKind::NewLoadOffer     => "NEW_LOAD_OFFER",
            EventKind::VehicleBreakdown => "VEHICLE_BREAKDOWN",
            EventKind::Other(s)         => s,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for EventKind {
    fn from(s: &str) -> Self {
        EventKind::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for EventKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One event raised for one truck.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TruckEvent {
    pub kind:    EventKind,
    /// Free-form context, e.g. the closed route id.
    pub details: String,
}

impl TruckEvent {
    pub fn new(kind: EventKind, details: impl Into<String>) -> Self {
        Self { kind, details: details.into() }
    }
}

impl fmt::Display for TruckEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.details.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.kind, self.details)
        }
    }
}
