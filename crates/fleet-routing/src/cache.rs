//! Memo of successful provider answers.
//!
//! Keys are coordinates rounded to 5 decimal places, so two requests a few
//! centimetres apart share an entry.  The cache is unbounded: the world is a
//! small closed node set and entries live for the process lifetime.  Only
//! real provider answers are stored; fallback estimates never are.

use parking_lot::Mutex;

use fleet_core::Coordinate;

use crate::{RouteEstimate, RouteSource};

#[cfg(feature = "fx-hash")]
type Map<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
type Map<K, V> = std::collections::HashMap<K, V>;

type PairKey = (i64, i64, i64, i64);
type TableKey = Vec<(i64, i64)>;

fn pair_key(start: Coordinate, end: Coordinate) -> PairKey {
    let (a, b) = start.rounded_key();
    let (c, d) = end.rounded_key();
    (a, b, c, d)
}

fn table_key(points: &[Coordinate]) -> TableKey {
    points.iter().map(|p| p.rounded_key()).collect()
}

#[derive(Default)]
pub struct RouteCache {
    routes: Mutex<Map<PairKey, RouteEstimate>>,
    tables: Mutex<Map<TableKey, Vec<Vec<f64>>>>,
}

impl RouteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached answer for `start → end`, tagged [`RouteSource::Cache`].
    pub fn get(&self, start: Coordinate, end: Coordinate) -> Option<RouteEstimate> {
        self.routes.lock().get(&pair_key(start, end)).map(|hit| RouteEstimate {
            source: RouteSource::Cache,
            ..hit.clone()
        })
    }

    pub fn insert(&self, start: Coordinate, end: Coordinate, estimate: RouteEstimate) {
        self.routes.lock().insert(pair_key(start, end), estimate);
    }

    pub fn get_table(&self, points: &[Coordinate]) -> Option<Vec<Vec<f64>>> {
        self.tables.lock().get(&table_key(points)).cloned()
    }

    pub fn insert_table(&self, points: &[Coordinate], durations: Vec<Vec<f64>>) {
        self.tables.lock().insert(table_key(points), durations);
    }

    /// Number of cached pair routes.
    pub fn len(&self) -> usize {
        self.routes.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.lock().is_empty()
    }

    pub fn clear(&self) {
        self.routes.lock().clear();
        self.tables.lock().clear();
    }
}
