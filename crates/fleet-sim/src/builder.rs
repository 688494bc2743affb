//! Fluent builder for constructing a [`FleetSim`].

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use fleet_core::SimConfig;
use fleet_decision::{DecisionSource, HeuristicFallback};
use fleet_mobility::MovementParams;
use fleet_network::{NodeCatalog, RouteCatalog};

use crate::{
    FleetSim, RandomEventParams, RandomEvents, SeededEvents, SimError, SimResult, TruckSpec,
};

/// Fluent builder for [`FleetSim<D, H>`].
///
/// # Required inputs
///
/// - [`SimConfig`] (seed, tick duration, output interval)
/// - the node and route catalogs (the route catalog is shared so an operator
///   can toggle routes while the simulation runs)
/// - `D: DecisionSource` and `H: HeuristicFallback`
///
/// # Optional inputs (have defaults)
///
/// | Method                  | Default                                    |
/// |-------------------------|--------------------------------------------|
/// | `.trucks(v)`            | none (build fails on an empty fleet)       |
/// | `.params(p)`            | `MovementParams::default()`                |
/// | `.random_params(p)`     | `RandomEventParams::default()`             |
/// | `.random_events(r)`     | `SeededEvents` seeded from `config.seed`   |
///
/// # Example
///
/// ```rust,ignore
/// let (nodes, routes) = fleet_network::demo::world()?;
/// let mut sim = FleetSimBuilder::new(config, Arc::new(nodes), Arc::new(routes),
///                                    ContinueSource, SafetyHeuristic::new())
///     .trucks(demo_fleet())
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct FleetSimBuilder<D: DecisionSource, H: HeuristicFallback> {
    config:        SimConfig,
    nodes:         Arc<NodeCatalog>,
    routes:        Arc<RouteCatalog>,
    source:        D,
    fallback:      H,
    trucks:        Vec<TruckSpec>,
    params:        MovementParams,
    random_params: RandomEventParams,
    random:        Option<Box<dyn RandomEvents>>,
}

impl<D: DecisionSource, H: HeuristicFallback> FleetSimBuilder<D, H> {
    pub fn new(
        config:   SimConfig,
        nodes:    Arc<NodeCatalog>,
        routes:   Arc<RouteCatalog>,
        source:   D,
        fallback: H,
    ) -> Self {
        Self {
            config,
            nodes,
            routes,
            source,
            fallback,
            trucks:        Vec::new(),
            params:        MovementParams::default(),
            random_params: RandomEventParams::default(),
            random:        None,
        }
    }

    pub fn trucks(mut self, trucks: Vec<TruckSpec>) -> Self {
        self.trucks = trucks;
        self
    }

    pub fn params(mut self, params: MovementParams) -> Self {
        self.params = params;
        self
    }

    /// Tuning for the default seeded generator.  Ignored when
    /// [`random_events`][Self::random_events] is also given.
    pub fn random_params(mut self, params: RandomEventParams) -> Self {
        self.random_params = params;
        self
    }

    /// Replace the random-event generator, e.g. with
    /// [`NoRandomEvents`][crate::NoRandomEvents] for deterministic tests.
    pub fn random_events(mut self, random: impl RandomEvents + 'static) -> Self {
        self.random = Some(Box::new(random));
        self
    }

    /// Validate the fleet, place every truck at the start of its route and
    /// return a ready-to-run [`FleetSim`].
    pub fn build(self) -> SimResult<FleetSim<D, H>> {
        if self.trucks.is_empty() {
            return Err(SimError::Config("fleet has no trucks".into()));
        }
        if !(0.0..=1.0).contains(&self.random_params.probability) {
            return Err(SimError::Config(format!(
                "random event probability {} outside [0, 1]",
                self.random_params.probability
            )));
        }

        let mut seen = HashSet::new();
        for spec in &self.trucks {
            if !seen.insert(spec.truck_id.clone()) {
                return Err(SimError::DuplicateTruck(spec.truck_id.clone()));
            }
        }

        let trucks = self
            .trucks
            .iter()
            .map(|s| s.spawn(None, &self.nodes, &self.routes, &self.params))
            .collect::<SimResult<Vec<_>>>()?;

        let random = self.random.unwrap_or_else(|| {
            Box::new(SeededEvents::new(self.config.seed, self.random_params.clone()))
        });

        Ok(FleetSim {
            clock:        self.config.make_clock(),
            config:       self.config,
            params:       self.params,
            nodes:        self.nodes,
            routes:       self.routes,
            trucks,
            source:       self.source,
            fallback:     self.fallback,
            specs:        self.trucks,
            random,
            decision_log: HashMap::new(),
        })
    }
}
