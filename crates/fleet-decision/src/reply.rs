//! Parsing the JSON reply format used by agent-style decision services.
//!
//! ```json
//! {
//!   "action": "REROUTE",
//!   "reasoning": "Bypass is closed",
//!   "thoughts": ["checked alternatives", "R_SW_CITY is open"],
//!   "confidence": 0.8,
//!   "selected_route_id": "R_SW_CITY",
//!   "new_route_nodes": []
//! }
//! ```
//!
//! The object may be wrapped in a Markdown code fence.  Missing fields take
//! defaults: `CONTINUE`, a generic reasoning line, confidence 1.0.
//! `new_route_nodes` wins over `selected_route_id` when both are present.

use serde::Deserialize;

use fleet_core::{NodeId, RouteId};

use crate::{Action, Decision, DecisionError, DecisionReply, DecisionResult, Impact};

const DEFAULT_REASONING: &str = "Agent completed analysis.";

#[derive(Deserialize)]
struct AgentReply {
    #[serde(default)]
    action:            Option<String>,
    #[serde(default)]
    reasoning:         Option<String>,
    #[serde(default)]
    thoughts:          Vec<String>,
    #[serde(default)]
    confidence:        Option<f64>,
    #[serde(default)]
    selected_route_id: Option<String>,
    #[serde(default)]
    new_route_nodes:   Vec<String>,
}

/// Parse an agent reply into a decision and its reasoning trace.
pub fn parse_agent_reply(text: &str) -> DecisionResult<DecisionReply> {
    let body = json_body(text)?;
    let reply: AgentReply = serde_json::from_str(body)
        .map_err(|e| DecisionError::Malformed(e.to_string()))?;

    let action = match reply.action.as_deref() {
        Some(a) if !a.trim().is_empty() => a.parse::<Action>()?,
        _ => Action::Continue,
    };

    let impact = if !reply.new_route_nodes.is_empty() {
        Impact::ExplicitPath(reply.new_route_nodes.into_iter().map(NodeId).collect())
    } else if let Some(route) = reply.selected_route_id.filter(|r| !r.trim().is_empty()) {
        Impact::RouteReference(RouteId(route))
    } else {
        Impact::None
    };

    let confidence = reply.confidence.unwrap_or(1.0);
    if !confidence.is_finite() {
        return Err(DecisionError::Malformed(format!("confidence {confidence}")));
    }

    let reasoning = reply
        .reasoning
        .filter(|r| !r.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_REASONING.to_string());

    Ok(DecisionReply::new(
        Decision::new(action, reasoning, confidence, impact),
        reply.thoughts,
    ))
}

/// The `{ ... }` span of `text`, with any code fence removed.
fn json_body(text: &str) -> DecisionResult<&str> {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix("```json") {
        body = rest;
    } else if let Some(rest) = body.strip_prefix("```") {
        body = rest;
    }
    body = body.trim_end().trim_end_matches("```");

    match (body.find('{'), body.rfind('}')) {
        (Some(start), Some(end)) if start < end => Ok(&body[start..=end]),
        _ => Err(DecisionError::Malformed("reply contains no JSON object".into())),
    }
}
