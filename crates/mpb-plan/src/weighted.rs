//! Weighted A* with bounded suboptimality and re-expansion.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use serde::{Deserialize, Serialize};

use mpb_core::heuristics::manhattan;
use mpb_core::{Cell, ErrorInfo, MpbError, OccupancyGrid};

use crate::common::{cardinal_neighbors, preflight, reconstruct_path, HeapEntry};
use crate::result::{PlannerResult, Timer};

/// Default inflation factor.
pub const DEFAULT_WEIGHT: f64 = 1.5;

/// Validated weighted A* configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedConfig {
    weight: f64,
}

impl WeightedConfig {
    /// Creates a configuration, rejecting weights below 1.0.
    pub fn new(weight: f64) -> Result<Self, MpbError> {
        if !(weight >= 1.0) {
            return Err(MpbError::Planner(
                ErrorInfo::new(
                    "planner-config",
                    "weighted A* requires a heuristic weight of at least 1.0",
                )
                .with_context("weight", weight.to_string()),
            ));
        }
        Ok(Self { weight })
    }

    /// The inflation factor.
    pub fn weight(&self) -> f64 {
        self.weight
    }
}

impl Default for WeightedConfig {
    fn default() -> Self {
        Self {
            weight: DEFAULT_WEIGHT,
        }
    }
}

/// Weighted A* with the default weight.
pub fn weighted_astar(
    grid: &OccupancyGrid,
    start: Cell,
    goal: Cell,
) -> Result<PlannerResult, MpbError> {
    Ok(weighted_astar_with(grid, start, goal, WeightedConfig::default()))
}

/// Weighted A* with `f = g + w * h`.
///
/// No closed set: a node is re-expanded whenever a strictly better g
/// arrives, and stale heap entries are discarded by comparing their g
/// snapshot against the current best.
pub fn weighted_astar_with(
    grid: &OccupancyGrid,
    start: Cell,
    goal: Cell,
    config: WeightedConfig,
) -> PlannerResult {
    let timer = Timer::start();
    if let Some(early) = preflight(grid, start, goal, &timer) {
        return early;
    }
    let weight = config.weight();

    let mut open: BinaryHeap<Reverse<HeapEntry>> = BinaryHeap::new();
    let mut best_g: HashMap<Cell, f64> = HashMap::from([(start, 0.0)]);
    let mut parents: HashMap<Cell, Cell> = HashMap::new();
    let mut counter = 0u64;
    let mut expansions = 0u64;

    open.push(Reverse(HeapEntry {
        f: weight * manhattan(start, goal),
        tie: 0.0,
        counter,
        g: 0.0,
        cell: start,
    }));
    counter += 1;

    while let Some(Reverse(entry)) = open.pop() {
        if best_g.get(&entry.cell).map_or(true, |&g| entry.g > g) {
            continue;
        }
        expansions += 1;

        if entry.cell == goal {
            let path = reconstruct_path(&parents, goal);
            let cost = (path.len() - 1) as f64;
            return PlannerResult::success(path, cost, expansions, timer.elapsed_ms());
        }

        for next in cardinal_neighbors(grid, entry.cell) {
            let tentative = entry.g + 1.0;
            if best_g.get(&next).map_or(true, |&g| tentative < g) {
                best_g.insert(next, tentative);
                parents.insert(next, entry.cell);
                open.push(Reverse(HeapEntry {
                    f: tentative + weight * manhattan(next, goal),
                    tie: 0.0,
                    counter,
                    g: tentative,
                    cell: next,
                }));
                counter += 1;
            }
        }
    }

    PlannerResult::no_path(expansions, timer.elapsed_ms())
}
