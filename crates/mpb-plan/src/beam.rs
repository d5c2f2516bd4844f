//! Beam search with a bounded frontier per depth layer.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use mpb_core::heuristics::manhattan;
use mpb_core::{Cell, ErrorInfo, MpbError, OccupancyGrid};

use crate::common::{cardinal_neighbors, preflight, reconstruct_path};
use crate::result::{MetricValue, PlannerResult, Timer};

/// Default beam width.
pub const DEFAULT_BEAM_WIDTH: usize = 32;

/// Validated beam search configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeamConfig {
    width: usize,
}

impl BeamConfig {
    /// Creates a configuration, rejecting widths below one.
    pub fn new(width: usize) -> Result<Self, MpbError> {
        if width == 0 {
            return Err(MpbError::Planner(
                ErrorInfo::new("planner-config", "beam search requires a width of at least 1")
                    .with_context("width", width.to_string()),
            ));
        }
        Ok(Self { width })
    }

    /// The number of candidates kept per layer.
    pub fn width(&self) -> usize {
        self.width
    }
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_BEAM_WIDTH,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    f: f64,
    h: f64,
    g: f64,
    cell: Cell,
    parent: Cell,
}

impl Candidate {
    fn rank(&self) -> (f64, f64, f64, usize, usize) {
        (self.f, self.h, self.g, self.cell.row, self.cell.col)
    }

    fn beats(&self, other: &Candidate) -> bool {
        let (af, ah, ag, ar, ac) = self.rank();
        let (bf, bh, bg, br, bc) = other.rank();
        af.total_cmp(&bf)
            .then(ah.total_cmp(&bh))
            .then(ag.total_cmp(&bg))
            .then(ar.cmp(&br))
            .then(ac.cmp(&bc))
            == std::cmp::Ordering::Less
    }
}

/// Beam search with the default width.
pub fn beam_search(
    grid: &OccupancyGrid,
    start: Cell,
    goal: Cell,
) -> Result<PlannerResult, MpbError> {
    Ok(beam_search_with(grid, start, goal, BeamConfig::default()))
}

/// Bounded best-first layer search.
///
/// Each depth layer generates candidates from every kept node,
/// deduplicates them per cell by best rank, and keeps only the lowest
/// `width`. The goal is detected during generation. Not optimal, and a
/// narrow beam may miss an existing path.
pub fn beam_search_with(
    grid: &OccupancyGrid,
    start: Cell,
    goal: Cell,
    config: BeamConfig,
) -> PlannerResult {
    let timer = Timer::start();
    if let Some(early) = preflight(grid, start, goal, &timer) {
        return early;
    }

    let mut g: HashMap<Cell, f64> = HashMap::from([(start, 0.0)]);
    let mut parents: HashMap<Cell, Cell> = HashMap::new();
    let mut layer = vec![start];
    let mut expansions = 0u64;

    loop {
        let mut candidates: HashMap<Cell, Candidate> = HashMap::new();
        for &node in &layer {
            expansions += 1;
            let node_g = g.get(&node).copied().unwrap_or(f64::INFINITY);
            for next in cardinal_neighbors(grid, node) {
                let tentative = node_g + 1.0;
                if g.get(&next).map_or(false, |&known| known <= tentative) {
                    continue;
                }
                if next == goal {
                    g.insert(goal, tentative);
                    parents.insert(goal, node);
                    let path = reconstruct_path(&parents, goal);
                    let cost = (path.len() - 1) as f64;
                    return PlannerResult::success(path, cost, expansions, timer.elapsed_ms())
                        .with_metric("optimality_guaranteed", MetricValue::Flag(false));
                }
                let h = manhattan(next, goal);
                let candidate = Candidate {
                    f: tentative + h,
                    h,
                    g: tentative,
                    cell: next,
                    parent: node,
                };
                match candidates.get(&next) {
                    Some(held) if !candidate.beats(held) => {}
                    _ => {
                        candidates.insert(next, candidate);
                    }
                }
            }
        }

        if candidates.is_empty() {
            return PlannerResult::no_path(expansions, timer.elapsed_ms())
                .with_metric("failure_reason", MetricValue::Text("beam_exhausted".into()))
                .with_metric("optimality_guaranteed", MetricValue::Flag(false));
        }

        let mut ranked: Vec<Candidate> = candidates.into_values().collect();
        ranked.sort_by(|a, b| {
            if a.beats(b) {
                std::cmp::Ordering::Less
            } else if b.beats(a) {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        });
        ranked.truncate(config.width());
        layer = ranked.iter().map(|candidate| candidate.cell).collect();
        for candidate in ranked {
            g.insert(candidate.cell, candidate.g);
            parents.insert(candidate.cell, candidate.parent);
        }
    }
}
