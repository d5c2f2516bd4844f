//! Helpers shared by the planner implementations.

use std::cmp::Ordering;
use std::collections::HashMap;

use mpb_core::{Cell, OccupancyGrid};

use crate::result::{PlannerResult, Timer};

/// Cardinal step offsets in fixed up, down, left, right order.
pub(crate) const CARDINAL_DIRS: [(i64, i64); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Free in-bounds cardinal neighbors of a cell.
pub(crate) fn cardinal_neighbors(
    grid: &OccupancyGrid,
    cell: Cell,
) -> impl Iterator<Item = Cell> + '_ {
    let (row, col) = cell.signed();
    CARDINAL_DIRS.iter().filter_map(move |&(dr, dc)| {
        grid.cell_at(row + dr, col + dc)
            .filter(|&next| grid.is_free(next))
    })
}

/// Rejects out-of-bounds or blocked endpoints, in a fixed check order so the
/// detail string is deterministic.
pub(crate) fn endpoint_rejection(
    grid: &OccupancyGrid,
    start: Cell,
    goal: Cell,
) -> Option<&'static str> {
    if !grid.in_bounds(start) {
        return Some("start is out of bounds");
    }
    if !grid.in_bounds(goal) {
        return Some("goal is out of bounds");
    }
    if grid.is_blocked(start) {
        return Some("start is blocked");
    }
    if grid.is_blocked(goal) {
        return Some("goal is blocked");
    }
    None
}

/// Shared entry guard: endpoint rejection plus the trivial start == goal
/// case. Returns `Some` when the caller should return immediately.
pub(crate) fn preflight(
    grid: &OccupancyGrid,
    start: Cell,
    goal: Cell,
    timer: &Timer,
) -> Option<PlannerResult> {
    if let Some(detail) = endpoint_rejection(grid, start, goal) {
        return Some(PlannerResult::invalid_input(detail, timer.elapsed_ms()));
    }
    if start == goal {
        return Some(PlannerResult::success(vec![start], 0.0, 0, timer.elapsed_ms()));
    }
    None
}

/// Walks the parent map back from `tail` until a node with no parent, then
/// reverses. The start node never carries a parent entry.
pub(crate) fn reconstruct_path(parents: &HashMap<Cell, Cell>, tail: Cell) -> Vec<Cell> {
    let mut path = vec![tail];
    let mut current = tail;
    while let Some(&previous) = parents.get(&current) {
        path.push(previous);
        current = previous;
    }
    path.reverse();
    path
}

/// Open-list entry for the heap-based planners: ordered by `(f, tie,
/// counter)` with a monotone push counter so equal keys pop in FIFO order.
/// `g` is the snapshot used for lazy stale-entry deletion.
#[derive(Debug, Clone, Copy)]
pub(crate) struct HeapEntry {
    pub f: f64,
    pub tie: f64,
    pub counter: u64,
    pub g: f64,
    pub cell: Cell,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f
            .total_cmp(&other.f)
            .then(self.tie.total_cmp(&other.tie))
            .then(self.counter.cmp(&other.counter))
    }
}
