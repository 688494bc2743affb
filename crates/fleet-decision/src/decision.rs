//! The decision value applied to a truck.

use std::fmt;
use std::str::FromStr;

use fleet_core::{NodeId, RouteId};

use crate::DecisionError;

// ── Action ────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Action {
    Continue,
    Reroute,
    StopForFuel,
    Wait,
    AcceptLoad,
    RejectLoad,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Continue    => "CONTINUE",
            Action::Reroute     => "REROUTE",
            Action::StopForFuel => "STOP_FOR_FUEL",
            Action::Wait        => "WAIT",
            Action::AcceptLoad  => "ACCEPT_LOAD",
            Action::RejectLoad  => "REJECT_LOAD",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = DecisionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CONTINUE"      => Ok(Action::Continue),
            "REROUTE"       => Ok(Action::Reroute),
            "STOP_FOR_FUEL" => Ok(Action::StopForFuel),
            "WAIT"          => Ok(Action::Wait),
            "ACCEPT_LOAD"   => Ok(Action::AcceptLoad),
            "REJECT_LOAD"   => Ok(Action::RejectLoad),
            other => Err(DecisionError::Malformed(format!("unknown action {other:?}"))),
        }
    }
}

// ── Impact ────────────────────────────────────────────────────────────────────

/// What a decision changes about the truck's plan.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Impact {
    /// Follow a catalog route.
    RouteReference(RouteId),
    /// Append these nodes after the truck's current node.
    ExplicitPath(Vec<NodeId>),
    #[default]
    None,
}

// ── Decision ──────────────────────────────────────────────────────────────────

/// An immutable verdict for one truck and one event.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decision {
    pub action:     Action,
    pub reasoning:  String,
    /// In `[0, 1]`.  Heuristic decisions carry 0.
    pub confidence: f64,
    pub impact:     Impact,
}

impl Decision {
    pub fn new(action: Action, reasoning: impl Into<String>, confidence: f64, impact: Impact) -> Self {
        Self {
            action,
            reasoning: reasoning.into(),
            confidence: confidence.clamp(0.0, 1.0),
            impact,
        }
    }

    pub fn proceed(reasoning: impl Into<String>, confidence: f64) -> Self {
        Self::new(Action::Continue, reasoning, confidence, Impact::None)
    }

    pub fn reroute_via(nodes: Vec<NodeId>, reasoning: impl Into<String>, confidence: f64) -> Self {
        Self::new(Action::Reroute, reasoning, confidence, Impact::ExplicitPath(nodes))
    }

    pub fn reroute_onto(route: RouteId, reasoning: impl Into<String>, confidence: f64) -> Self {
        Self::new(Action::Reroute, reasoning, confidence, Impact::RouteReference(route))
    }

    #[inline]
    pub fn is_reroute(&self) -> bool {
        self.action == Action::Reroute
    }
}

/// A decision plus the reasoning steps that led to it.
#[derive(Clone, PartialEq, Debug)]
pub struct DecisionReply {
    pub decision: Decision,
    pub trace:    Vec<String>,
}

impl DecisionReply {
    pub fn new(decision: Decision, trace: Vec<String>) -> Self {
        Self { decision, trace }
    }
}
