//! Layered bidirectional breadth-first search.

use std::collections::HashMap;

use mpb_core::{Cell, MpbError, OccupancyGrid};

use crate::common::{cardinal_neighbors, preflight, reconstruct_path};
use crate::result::{MetricValue, PlannerResult, Timer};

#[derive(Debug, Clone, Copy)]
struct Meeting {
    cost: usize,
    node: Cell,
}

fn offer(slot: &mut Option<Meeting>, cost: usize, node: Cell) {
    let better = match slot {
        None => true,
        Some(held) => cost < held.cost || (cost == held.cost && node < held.node),
    };
    if better {
        *slot = Some(Meeting { cost, node });
    }
}

struct Wave {
    dist: HashMap<Cell, usize>,
    parents: HashMap<Cell, Cell>,
    frontier: Vec<Cell>,
    depth: usize,
    expanded: u64,
    generated: u64,
}

impl Wave {
    fn seeded(origin: Cell) -> Self {
        Self {
            dist: HashMap::from([(origin, 0)]),
            parents: HashMap::new(),
            frontier: vec![origin],
            depth: 0,
            expanded: 0,
            generated: 0,
        }
    }

    /// Expands one full layer, checking for meetings against the opposite
    /// wave both when a node is taken from the frontier and when a
    /// successor is generated.
    fn advance(&mut self, grid: &OccupancyGrid, other: &HashMap<Cell, usize>, best: &mut Option<Meeting>) {
        let mut next_frontier = Vec::new();
        for index in 0..self.frontier.len() {
            let node = self.frontier[index];
            self.expanded += 1;
            if let Some(&opposite) = other.get(&node) {
                offer(best, self.depth + opposite, node);
            }
            for next in cardinal_neighbors(grid, node) {
                if self.dist.contains_key(&next) {
                    continue;
                }
                self.dist.insert(next, self.depth + 1);
                self.parents.insert(next, node);
                self.generated += 1;
                if let Some(&opposite) = other.get(&next) {
                    offer(best, self.depth + 1 + opposite, next);
                }
                next_frontier.push(next);
            }
        }
        self.frontier = next_frontier;
        self.depth += 1;
    }
}

/// Bidirectional BFS expanding the smaller frontier each iteration, ties
/// resolved by iteration parity (odd iterations go forward).
pub fn bidirectional_bfs(
    grid: &OccupancyGrid,
    start: Cell,
    goal: Cell,
) -> Result<PlannerResult, MpbError> {
    let timer = Timer::start();
    if let Some(early) = preflight(grid, start, goal, &timer) {
        return Ok(early);
    }

    let mut forward = Wave::seeded(start);
    let mut backward = Wave::seeded(goal);
    let mut best: Option<Meeting> = None;
    let mut frontier_peak = 1usize;
    let mut iteration = 0u64;

    loop {
        if forward.frontier.is_empty() || backward.frontier.is_empty() {
            break;
        }
        if let Some(held) = best {
            if forward.depth + 1 + backward.depth + 1 >= held.cost {
                break;
            }
        }
        iteration += 1;
        let forward_turn = forward.frontier.len() < backward.frontier.len()
            || (forward.frontier.len() == backward.frontier.len() && iteration % 2 == 1);
        if forward_turn {
            forward.advance(grid, &backward.dist, &mut best);
        } else {
            backward.advance(grid, &forward.dist, &mut best);
        }
        frontier_peak = frontier_peak
            .max(forward.frontier.len())
            .max(backward.frontier.len());
    }

    let expansions = forward.expanded + backward.expanded;
    let metrics = |result: PlannerResult| {
        result
            .with_metric("expanded_forward", MetricValue::Int(forward.expanded as i64))
            .with_metric("expanded_backward", MetricValue::Int(backward.expanded as i64))
            .with_metric("generated_forward", MetricValue::Int(forward.generated as i64))
            .with_metric("generated_backward", MetricValue::Int(backward.generated as i64))
            .with_metric("frontier_peak", MetricValue::Int(frontier_peak as i64))
    };

    let Some(held) = best else {
        return Ok(metrics(PlannerResult::no_path(expansions, timer.elapsed_ms())));
    };

    let mut path = reconstruct_path(&forward.parents, held.node);
    let mut current = held.node;
    while let Some(&next) = backward.parents.get(&current) {
        path.push(next);
        current = next;
    }
    let cost = (path.len() - 1) as f64;
    Ok(metrics(
        PlannerResult::success(path, cost, expansions, timer.elapsed_ms()).with_metric(
            "meeting_node",
            MetricValue::Text(held.node.to_string()),
        ),
    ))
}
