//! Demo configuration: an optional TOML file plus environment overrides.
//!
//! ```toml
//! osrm_url   = "http://localhost:5000"
//! output_dir = "output/pune"
//! nodes_csv  = "data/nodes.csv"
//! routes_csv = "data/routes.csv"
//!
//! [sim]
//! total_ticks      = 120     # 0 = paced, runs until `quit`
//! tick_interval_ms = 500
//!
//! [movement]
//! low_fuel_threshold = 25.0
//!
//! [fleet.trucks.T1]
//! fuel_percent          = 30.0
//! capacity_used_percent = 70.0
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use fleet_core::SimConfig;
use fleet_mobility::MovementParams;
use fleet_routing::GuardConfig;
use fleet_sim::{FleetConfig, RandomEventParams, TruckSpec};

/// Path of the TOML file, when set.
pub const CONFIG_ENV: &str = "FLEET_CONFIG";
/// OSRM base URL; overrides `osrm_url` from the file.
pub const OSRM_ENV: &str = "FLEET_OSRM_URL";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub sim:        SimConfig,
    pub movement:   MovementParams,
    pub random:     RandomEventParams,
    pub guard:      GuardConfig,
    /// Overrides applied on top of the starting fleet.
    pub fleet:      FleetConfig,
    /// Starting fleet; empty means the three demo trucks.
    pub trucks:     Vec<TruckSpec>,
    /// Node and route CSVs; both unset means the built-in Pune map.
    pub nodes_csv:  Option<PathBuf>,
    pub routes_csv: Option<PathBuf>,
    /// Without a URL every route lookup is a local estimate.
    pub osrm_url:   Option<String>,
    pub output_dir: PathBuf,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            sim:        SimConfig::default(),
            movement:   MovementParams::default(),
            random:     RandomEventParams::default(),
            guard:      GuardConfig::default(),
            fleet:      FleetConfig::default(),
            trucks:     Vec::new(),
            nodes_csv:  None,
            routes_csv: None,
            osrm_url:   None,
            output_dir: PathBuf::from("output/pune"),
        }
    }
}

impl DemoConfig {
    /// Read `FLEET_CONFIG` (if set) and apply `FLEET_OSRM_URL`.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        if let Ok(url) = std::env::var(OSRM_ENV) {
            if !url.trim().is_empty() {
                config.osrm_url = Some(url);
            }
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }
}
