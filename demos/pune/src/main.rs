//! pune — three trucks running deliveries around Pune.
//!
//! With `sim.total_ticks > 0` the simulation runs to completion as fast as
//! it can.  Otherwise it ticks every `sim.tick_interval_ms` on a background
//! thread while stdin takes operator commands:
//!
//! ```text
//! status                   print the fleet
//! event <truck> <EVENT>    raise an event now (LOW_FUEL, ROAD_CLOSED, ...)
//! close <route>            close a catalog route
//! open <route>             reopen it
//! routes <destination>     list open routes to a destination
//! reset                    restart from the configured fleet
//! quit
//! ```
//!
//! Logging follows `RUST_LOG` (default `info`).  Output goes to
//! `output_dir` as CSV.

mod config;

use std::io::BufRead;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fleet_core::{Clock, SystemClock};
use fleet_decision::{ContinueSource, CooldownSource, SafetyHeuristic};
use fleet_network::{NodeCatalog, RouteCatalog, demo, load_nodes_csv, load_routes_csv};
use fleet_output::{CsvWriter, SimOutputObserver};
use fleet_routing::{OsrmProvider, ProviderGuard, RoutingClient};
use fleet_sim::{FleetSim, FleetSimBuilder, FleetSnapshot, SharedSim, demo_fleet};

use config::DemoConfig;

type Sim = FleetSim<CooldownSource<ContinueSource>, SafetyHeuristic>;

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = DemoConfig::load()?;
    if let Some(n) = config.sim.num_threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .context("configuring the movement thread pool")?;
    }

    let (nodes, routes) = world(&config)?;
    info!(nodes = nodes.len(), routes = routes.len(), "world loaded");

    let routing = routing_client(&config)?;
    let heuristic = match &routing {
        Some(client) => SafetyHeuristic::with_routing(Arc::clone(client)),
        None => SafetyHeuristic::new(),
    };
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
    let source = CooldownSource::new(ContinueSource, clock);

    let trucks = if config.trucks.is_empty() { demo_fleet() } else { config.trucks.clone() };
    let mut sim = FleetSimBuilder::new(config.sim.clone(), Arc::new(nodes), Arc::new(routes), source, heuristic)
        .trucks(trucks)
        .params(config.movement.clone())
        .random_params(config.random.clone())
        .build()?;
    if !config.fleet.trucks.is_empty() {
        sim.reset(&config.fleet)?;
    }

    if let Some(client) = &routing {
        for truck in &sim.trucks {
            let Some(dest) = sim.nodes.coordinate(truck.destination_node.as_str()) else { continue };
            let est = client.get_route(truck.location, dest);
            info!(
                truck = %truck.truck_id,
                km = est.distance_km,
                minutes = est.duration_min,
                source = ?est.source,
                "road estimate to destination"
            );
        }
    }

    let writer = CsvWriter::new(&config.output_dir)?;
    let observer = SimOutputObserver::new(writer, &config.sim);

    println!("=== pune — fleet simulation ===");
    print_fleet(&sim.snapshot());
    println!();

    if config.sim.total_ticks > 0 {
        bounded(sim, observer)
    } else {
        paced(sim, observer, &config)
    }
}

// ── Setup ─────────────────────────────────────────────────────────────────────

fn world(config: &DemoConfig) -> Result<(NodeCatalog, RouteCatalog)> {
    match (&config.nodes_csv, &config.routes_csv) {
        (None, None) => Ok(demo::world()?),
        (Some(n), Some(r)) => {
            let nodes = load_nodes_csv(n).with_context(|| format!("loading {}", n.display()))?;
            let routes = load_routes_csv(r, &nodes).with_context(|| format!("loading {}", r.display()))?;
            Ok((nodes, routes))
        }
        _ => bail!("nodes_csv and routes_csv must be given together"),
    }
}

fn routing_client(config: &DemoConfig) -> Result<Option<Arc<RoutingClient>>> {
    let Some(url) = &config.osrm_url else {
        info!("no routing provider configured; using local estimates");
        return Ok(None);
    };
    let provider = OsrmProvider::new(url.clone(), config.guard.request_timeout())?;
    let guard = ProviderGuard::new(config.guard.clone(), Arc::new(SystemClock::new()));
    info!(url = %url, "routing via OSRM");
    Ok(Some(Arc::new(RoutingClient::new(Arc::new(provider), guard))))
}

// ── Run modes ─────────────────────────────────────────────────────────────────

fn bounded(mut sim: Sim, mut observer: SimOutputObserver<CsvWriter>) -> Result<()> {
    let t0 = Instant::now();
    sim.run(&mut observer)?;
    let elapsed = t0.elapsed();

    if let Some(e) = observer.take_error() {
        eprintln!("output error: {e}");
    }

    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    print_fleet(&sim.snapshot());
    Ok(())
}

fn paced(sim: Sim, observer: SimOutputObserver<CsvWriter>, config: &DemoConfig) -> Result<()> {
    let shared = SharedSim::new(sim);
    let ticker = shared.spawn_ticker(config.sim.tick_interval(), observer);
    println!("Ticking every {} ms; type `status`, `event T1 LOW_FUEL`, `close R_SW_HWY`, `quit`.", config.sim.tick_interval_ms);

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => {}
            ["quit" | "exit"] => break,
            ["status"] => print_fleet(&shared.snapshot()),
            ["event", truck, kind] => match shared.inject_event(truck, kind) {
                Ok(record) => println!(
                    "{}: {} → {} ({})",
                    record.truck_id, record.event, record.decision.action, record.outcome
                ),
                Err(e) => println!("{e}"),
            },
            ["close", route] => report(shared.set_route_active(route, false)),
            ["open", route] => report(shared.set_route_active(route, true)),
            ["routes", dest] => shared.with(|sim| {
                for r in sim.routes.alternatives(dest, None) {
                    println!(
                        "{:<14} {} → {}  {:>5.1} km  {:>3} min  risk {:.2}",
                        r.id.as_str(), r.origin, r.destination, r.distance_km, r.duration_minutes, r.congestion_risk
                    );
                }
            }),
            ["reset"] => report(shared.reset(&config.fleet)),
            _ => println!("unknown command: {line}"),
        }
    }

    let mut observer = ticker.stop()?;
    if let Err(e) = observer.finish() {
        warn!(error = %e, "flushing output failed");
    }
    if let Some(e) = observer.take_error() {
        eprintln!("output error: {e}");
    }
    print_fleet(&shared.snapshot());
    Ok(())
}

fn report(result: fleet_sim::SimResult<()>) {
    match result {
        Ok(()) => println!("ok"),
        Err(e) => println!("{e}"),
    }
}

fn print_fleet(snapshot: &FleetSnapshot) {
    println!("{} ({})", snapshot.tick, snapshot.time);
    println!(
        "{:<6} {:<17} {:<16} {:<16} {:>6} {:>5}",
        "Truck", "Status", "At", "Route", "Fuel", "ETA"
    );
    println!("{}", "-".repeat(71));
    for t in &snapshot.trucks {
        println!(
            "{:<6} {:<17} {:<16} {:<16} {:>5.1}% {:>5}",
            t.truck_id.as_str(),
            t.status.as_str(),
            t.current_node.as_str(),
            t.active_route.to_string(),
            t.fuel_percent,
            t.eta_minutes,
        );
    }
}
