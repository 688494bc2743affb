//! Sources of exogenous events.

use std::collections::HashMap;

use fleet_core::{SimRng, Tick, TruckId};
use fleet_decision::{EventKind, TruckEvent};
use fleet_mobility::TruckState;

use crate::RandomEventParams;

/// Draws the random events of one tick.
///
/// Called once per truck per tick, in truck order, after the movement phase.
pub trait RandomEvents: Send {
    fn draw(&mut self, tick: Tick, truck: &TruckState) -> Option<TruckEvent>;
}

/// Seeded random events for moving trucks.
pub struct SeededEvents {
    rng:    SimRng,
    params: RandomEventParams,
}

impl SeededEvents {
    pub fn new(seed: u64, params: RandomEventParams) -> Self {
        Self { rng: SimRng::new(seed), params }
    }
}

impl RandomEvents for SeededEvents {
    fn draw(&mut self, _tick: Tick, truck: &TruckState) -> Option<TruckEvent> {
        if !truck.status.is_moving() || !self.rng.gen_bool(self.params.probability) {
            return None;
        }
        let kind = self.rng.choose(&EventKind::RANDOM)?.clone();
        Some(TruckEvent::new(kind, "random"))
    }
}

/// Never raises anything.
pub struct NoRandomEvents;

impl RandomEvents for NoRandomEvents {
    fn draw(&mut self, _tick: Tick, _truck: &TruckState) -> Option<TruckEvent> {
        None
    }
}

/// Fires pre-set events at exact ticks, regardless of truck status.
#[derive(Default)]
pub struct ScriptedEvents {
    script: HashMap<(Tick, TruckId), TruckEvent>,
}

impl ScriptedEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(mut self, tick: Tick, truck_id: &str, kind: EventKind) -> Self {
        self.script
            .insert((tick, TruckId::from(truck_id)), TruckEvent::new(kind, "scripted"));
        self
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl RandomEvents for ScriptedEvents {
    fn draw(&mut self, tick: Tick, truck: &TruckState) -> Option<TruckEvent> {
        self.script.remove(&(tick, truck.truck_id.clone()))
    }
}
