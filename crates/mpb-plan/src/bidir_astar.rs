//! Bidirectional A* with lazy deletion and a meeting bridge.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use mpb_core::heuristics::manhattan;
use mpb_core::{Cell, MpbError, OccupancyGrid};

use crate::common::{cardinal_neighbors, preflight, reconstruct_path, HeapEntry};
use crate::result::{MetricValue, PlannerResult, Timer};

struct Side {
    open: BinaryHeap<Reverse<HeapEntry>>,
    g: HashMap<Cell, f64>,
    parents: HashMap<Cell, Cell>,
    target: Cell,
    expanded: u64,
}

impl Side {
    fn seeded(origin: Cell, target: Cell, counter: &mut u64) -> Self {
        let mut open = BinaryHeap::new();
        open.push(Reverse(HeapEntry {
            f: manhattan(origin, target),
            tie: 0.0,
            counter: *counter,
            g: 0.0,
            cell: origin,
        }));
        *counter += 1;
        Self {
            open,
            g: HashMap::from([(origin, 0.0)]),
            parents: HashMap::new(),
            target,
            expanded: 0,
        }
    }

    /// Discards stale entries until the top of the heap is fresh.
    fn fresh_top(&mut self) -> Option<HeapEntry> {
        while let Some(&Reverse(entry)) = self.open.peek() {
            let stale = self.g.get(&entry.cell).map_or(true, |&g| entry.g > g);
            if stale {
                self.open.pop();
            } else {
                return Some(entry);
            }
        }
        None
    }
}

#[derive(Debug, Clone, Copy)]
struct Bridge {
    cost: f64,
    forward: Cell,
    backward: Cell,
}

impl Bridge {
    fn offer(slot: &mut Option<Bridge>, candidate: Bridge) {
        let better = slot.map_or(true, |held| candidate.cost < held.cost);
        if better {
            *slot = Some(candidate);
        }
    }
}

/// Bidirectional A* between `start` and `goal`.
///
/// Each step expands the side whose fresh top-of-heap f is smaller, ties
/// going to the side with fewer expansions (forward on full equality). The
/// meeting bridge is refreshed both when a popped node is already settled
/// by the opposite side and when a relaxed edge lands on the opposite
/// frontier; the search stops once `top_f + top_b` can no longer beat it.
pub fn bidirectional_astar(
    grid: &OccupancyGrid,
    start: Cell,
    goal: Cell,
) -> Result<PlannerResult, MpbError> {
    let timer = Timer::start();
    if let Some(early) = preflight(grid, start, goal, &timer) {
        return Ok(early);
    }

    let mut counter = 0u64;
    let mut forward = Side::seeded(start, goal, &mut counter);
    let mut backward = Side::seeded(goal, start, &mut counter);
    let mut bridge: Option<Bridge> = None;
    let mut generated = 0u64;

    loop {
        let (Some(top_f), Some(top_b)) = (forward.fresh_top(), backward.fresh_top()) else {
            break;
        };
        if let Some(held) = bridge {
            if top_f.f + top_b.f >= held.cost {
                break;
            }
        }
        let forward_turn = match top_f.f.total_cmp(&top_b.f) {
            std::cmp::Ordering::Less => true,
            std::cmp::Ordering::Greater => false,
            std::cmp::Ordering::Equal => forward.expanded <= backward.expanded,
        };
        if forward_turn {
            expand(grid, &mut forward, &backward, true, &mut counter, &mut generated, &mut bridge);
        } else {
            expand(grid, &mut backward, &forward, false, &mut counter, &mut generated, &mut bridge);
        }
    }

    let expansions = forward.expanded + backward.expanded;
    let Some(held) = bridge else {
        return Ok(PlannerResult::no_path(expansions, timer.elapsed_ms())
            .with_metric("expanded_forward", MetricValue::Int(forward.expanded as i64))
            .with_metric("expanded_backward", MetricValue::Int(backward.expanded as i64))
            .with_metric("generated", MetricValue::Int(generated as i64)));
    };

    let mut path = reconstruct_path(&forward.parents, held.forward);
    if held.backward != held.forward {
        path.push(held.backward);
    }
    let mut current = held.backward;
    while let Some(&next) = backward.parents.get(&current) {
        path.push(next);
        current = next;
    }
    let cost = (path.len() - 1) as f64;
    Ok(
        PlannerResult::success(path, cost, expansions, timer.elapsed_ms())
            .with_metric("expanded_forward", MetricValue::Int(forward.expanded as i64))
            .with_metric("expanded_backward", MetricValue::Int(backward.expanded as i64))
            .with_metric("generated", MetricValue::Int(generated as i64))
            .with_metric(
                "meeting_bridge",
                MetricValue::Text(format!("{} -> {}", held.forward, held.backward)),
            ),
    )
}

fn expand(
    grid: &OccupancyGrid,
    side: &mut Side,
    other: &Side,
    is_forward: bool,
    counter: &mut u64,
    generated: &mut u64,
    bridge: &mut Option<Bridge>,
) {
    let Some(Reverse(entry)) = side.open.pop() else {
        return;
    };
    side.expanded += 1;

    if let Some(&other_g) = other.g.get(&entry.cell) {
        Bridge::offer(bridge, oriented(entry.cell, entry.cell, entry.g + other_g, is_forward));
    }

    for next in cardinal_neighbors(grid, entry.cell) {
        if let Some(&other_g) = other.g.get(&next) {
            let crossing = entry.g + 1.0 + other_g;
            Bridge::offer(bridge, oriented(entry.cell, next, crossing, is_forward));
        }
        let tentative = entry.g + 1.0;
        if side.g.get(&next).map_or(true, |&g| tentative < g) {
            side.g.insert(next, tentative);
            side.parents.insert(next, entry.cell);
            side.open.push(Reverse(HeapEntry {
                f: tentative + manhattan(next, side.target),
                tie: 0.0,
                counter: *counter,
                g: tentative,
                cell: next,
            }));
            *counter += 1;
            *generated += 1;
        }
    }
}

fn oriented(own: Cell, opposite: Cell, cost: f64, is_forward: bool) -> Bridge {
    if is_forward {
        Bridge {
            cost,
            forward: own,
            backward: opposite,
        }
    } else {
        Bridge {
            cost,
            forward: opposite,
            backward: own,
        }
    }
}
