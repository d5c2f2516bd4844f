//! Iterative-deepening A* with a recursive f-bounded probe.

use std::collections::HashSet;

use mpb_core::heuristics::manhattan;
use mpb_core::{Cell, MpbError, OccupancyGrid};

use crate::common::{cardinal_neighbors, preflight};
use crate::result::{MetricValue, PlannerResult, Timer};

enum Probe {
    Found,
    /// Minimum f seen beyond the bound; infinite when the subtree is dry.
    Minimum(f64),
}

struct DepthFirst<'a> {
    grid: &'a OccupancyGrid,
    goal: Cell,
    on_path: HashSet<Cell>,
    path: Vec<Cell>,
    expansions: u64,
    max_depth: usize,
}

impl DepthFirst<'_> {
    fn probe(&mut self, node: Cell, g: f64, bound: f64) -> Probe {
        let f = g + manhattan(node, self.goal);
        if f > bound {
            return Probe::Minimum(f);
        }
        if node == self.goal {
            return Probe::Found;
        }
        self.expansions += 1;

        let mut successors: Vec<Cell> = cardinal_neighbors(self.grid, node)
            .filter(|next| !self.on_path.contains(next))
            .collect();
        successors.sort_by(|a, b| {
            manhattan(*a, self.goal)
                .total_cmp(&manhattan(*b, self.goal))
                .then(a.cmp(b))
        });

        let mut next_bound = f64::INFINITY;
        for next in successors {
            self.on_path.insert(next);
            self.path.push(next);
            self.max_depth = self.max_depth.max(self.path.len());
            match self.probe(next, g + 1.0, bound) {
                Probe::Found => return Probe::Found,
                Probe::Minimum(overflow) => next_bound = next_bound.min(overflow),
            }
            self.path.pop();
            self.on_path.remove(&next);
        }
        Probe::Minimum(next_bound)
    }
}

/// IDA* with the manhattan bound, deepening until found or exhausted.
pub fn idastar(grid: &OccupancyGrid, start: Cell, goal: Cell) -> Result<PlannerResult, MpbError> {
    let timer = Timer::start();
    if let Some(early) = preflight(grid, start, goal, &timer) {
        return Ok(early);
    }

    let mut search = DepthFirst {
        grid,
        goal,
        on_path: HashSet::from([start]),
        path: vec![start],
        expansions: 0,
        max_depth: 1,
    };
    let mut bound = manhattan(start, goal);
    let mut history: Vec<f64> = Vec::new();
    let mut iterations = 0u64;

    loop {
        iterations += 1;
        history.push(bound);
        match search.probe(start, 0.0, bound) {
            Probe::Found => {
                let path = search.path.clone();
                let cost = (path.len() - 1) as f64;
                return Ok(
                    PlannerResult::success(path, cost, search.expansions, timer.elapsed_ms())
                        .with_metric("iterations", MetricValue::Int(iterations as i64))
                        .with_metric("max_depth", MetricValue::Int(search.max_depth as i64))
                        .with_metric("threshold_history", MetricValue::FloatList(history)),
                );
            }
            Probe::Minimum(next) if next.is_finite() => bound = next,
            Probe::Minimum(_) => {
                return Ok(PlannerResult::no_path(search.expansions, timer.elapsed_ms())
                    .with_metric("iterations", MetricValue::Int(iterations as i64))
                    .with_metric("max_depth", MetricValue::Int(search.max_depth as i64))
                    .with_metric("threshold_history", MetricValue::FloatList(history)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bestfirst::astar;
    use crate::result::PlannerStatus;

    #[test]
    fn deepening_matches_the_astar_optimum() {
        let mut grid = OccupancyGrid::new_free(6, 6).unwrap();
        for col in 0..4 {
            grid.set_blocked(Cell::new(2, col), true);
        }
        let start = Cell::new(0, 0);
        let goal = Cell::new(5, 1);
        let exact = astar(&grid, start, goal).unwrap();
        let result = idastar(&grid, start, goal).unwrap();
        assert_eq!(result.status, PlannerStatus::Success);
        assert_eq!(result.path_cost, exact.path_cost);
        match result.extensions.get("threshold_history") {
            Some(MetricValue::FloatList(history)) => assert!(!history.is_empty()),
            other => panic!("unexpected threshold_history: {other:?}"),
        }
    }

    #[test]
    fn sealed_goal_terminates_with_no_path() {
        let mut grid = OccupancyGrid::new_free(4, 4).unwrap();
        grid.set_blocked(Cell::new(2, 3), true);
        grid.set_blocked(Cell::new(3, 2), true);
        let result = idastar(&grid, Cell::new(0, 0), Cell::new(3, 3)).unwrap();
        assert_eq!(result.status, PlannerStatus::NoPath);
    }
}
