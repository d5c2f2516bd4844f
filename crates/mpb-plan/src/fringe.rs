//! Fringe search: threshold sweeps over now and later lists.

use std::collections::HashMap;

use mpb_core::heuristics::manhattan;
use mpb_core::{Cell, MpbError, OccupancyGrid};

use crate::common::{cardinal_neighbors, preflight, reconstruct_path};
use crate::result::{MetricValue, PlannerResult, Timer};

/// Fringe search with the manhattan threshold schedule.
///
/// Entries carry the g value they were pushed with; an entry whose
/// snapshot no longer matches the node's current g is stale and skipped.
/// Nodes whose f exceeds the threshold migrate to the `later` list while
/// the sweep records the minimum rejected f, which becomes the next
/// threshold.
pub fn fringe_search(
    grid: &OccupancyGrid,
    start: Cell,
    goal: Cell,
) -> Result<PlannerResult, MpbError> {
    let timer = Timer::start();
    if let Some(early) = preflight(grid, start, goal, &timer) {
        return Ok(early);
    }

    let mut g: HashMap<Cell, f64> = HashMap::from([(start, 0.0)]);
    let mut parents: HashMap<Cell, Cell> = HashMap::new();
    let mut now: Vec<(Cell, f64)> = vec![(start, 0.0)];
    let mut later: Vec<(Cell, f64)> = Vec::new();
    let mut threshold = manhattan(start, goal);
    let mut history: Vec<f64> = Vec::new();

    let mut expansions = 0u64;
    let mut iterations = 0u64;
    let mut reopened = 0u64;
    let mut max_now = now.len();
    let mut max_later = 0usize;
    let mut max_active = now.len();

    loop {
        iterations += 1;
        history.push(threshold);
        let mut rejected_min = f64::INFINITY;

        while let Some((node, snapshot)) = now.pop() {
            let current_g = g.get(&node).copied().unwrap_or(f64::INFINITY);
            if snapshot != current_g {
                continue;
            }
            let f = current_g + manhattan(node, goal);
            if f > threshold {
                rejected_min = rejected_min.min(f);
                later.push((node, current_g));
                max_later = max_later.max(later.len());
                max_active = max_active.max(now.len() + later.len());
                continue;
            }
            if node == goal {
                let path = reconstruct_path(&parents, goal);
                let cost = (path.len() - 1) as f64;
                return Ok(attach(
                    PlannerResult::success(path, cost, expansions, timer.elapsed_ms()),
                    iterations,
                    reopened,
                    max_now,
                    max_later,
                    max_active,
                    history,
                ));
            }
            expansions += 1;

            for next in cardinal_neighbors(grid, node) {
                let tentative = current_g + 1.0;
                let known = g.get(&next).copied();
                if known.map_or(true, |k| tentative < k) {
                    if known.is_some() {
                        reopened += 1;
                    }
                    g.insert(next, tentative);
                    parents.insert(next, node);
                    now.push((next, tentative));
                    max_now = max_now.max(now.len());
                    max_active = max_active.max(now.len() + later.len());
                }
            }
        }

        if later.is_empty() {
            return Ok(attach(
                PlannerResult::no_path(expansions, timer.elapsed_ms()),
                iterations,
                reopened,
                max_now,
                max_later,
                max_active,
                history,
            ));
        }
        threshold = rejected_min;
        std::mem::swap(&mut now, &mut later);
    }
}

#[allow(clippy::too_many_arguments)]
fn attach(
    result: PlannerResult,
    iterations: u64,
    reopened: u64,
    max_now: usize,
    max_later: usize,
    max_active: usize,
    history: Vec<f64>,
) -> PlannerResult {
    result
        .with_metric("iterations", MetricValue::Int(iterations as i64))
        .with_metric("reopened_nodes", MetricValue::Int(reopened as i64))
        .with_metric("max_now_size", MetricValue::Int(max_now as i64))
        .with_metric("max_later_size", MetricValue::Int(max_later as i64))
        .with_metric("max_active_fringe", MetricValue::Int(max_active as i64))
        .with_metric("threshold_history", MetricValue::FloatList(history))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bestfirst::astar;
    use crate::result::PlannerStatus;

    #[test]
    fn thresholds_deepen_until_the_optimum() {
        let mut grid = OccupancyGrid::new_free(7, 7).unwrap();
        for col in 0..5 {
            grid.set_blocked(Cell::new(3, col), true);
        }
        let start = Cell::new(0, 0);
        let goal = Cell::new(6, 0);
        let exact = astar(&grid, start, goal).unwrap();
        let result = fringe_search(&grid, start, goal).unwrap();
        assert_eq!(result.status, PlannerStatus::Success);
        assert_eq!(result.path_cost, exact.path_cost);
        match result.extensions.get("threshold_history") {
            Some(MetricValue::FloatList(history)) => {
                assert_eq!(history.first(), Some(&manhattan(start, goal)));
                assert!(history.windows(2).all(|pair| pair[0] < pair[1]));
            }
            other => panic!("unexpected threshold_history: {other:?}"),
        }
    }

    #[test]
    fn exhausted_lists_mean_no_path() {
        let mut grid = OccupancyGrid::new_free(5, 5).unwrap();
        for row in 0..5 {
            grid.set_blocked(Cell::new(row, 3), true);
        }
        let result = fringe_search(&grid, Cell::new(2, 0), Cell::new(2, 4)).unwrap();
        assert_eq!(result.status, PlannerStatus::NoPath);
    }
}
