//! Shared best-first core behind A*, Dijkstra, and Greedy Best-First.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use mpb_core::heuristics::{manhattan, HeuristicFn};
use mpb_core::{Cell, MpbError, OccupancyGrid};

use crate::common::{cardinal_neighbors, preflight, reconstruct_path, HeapEntry};
use crate::result::{PlannerResult, Timer};

/// Policy applied when two open-list entries share the same f value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Oldest entry first.
    Fifo,
    /// Prefer the entry with the lower heuristic value.
    LowH,
    /// Prefer the entry with the higher accumulated cost.
    HighG,
}

impl TieBreak {
    fn priority(self, g: f64, h: f64) -> f64 {
        match self {
            TieBreak::Fifo => 0.0,
            TieBreak::LowH => h,
            TieBreak::HighG => -g,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Objective {
    CostPlusHeuristic,
    CostOnly,
    HeuristicOnly,
}

impl Objective {
    fn f(self, g: f64, h: f64) -> f64 {
        match self {
            Objective::CostPlusHeuristic => g + h,
            Objective::CostOnly => g,
            Objective::HeuristicOnly => h,
        }
    }
}

/// A* with the manhattan heuristic and low-h tie-breaking.
pub fn astar(grid: &OccupancyGrid, start: Cell, goal: Cell) -> Result<PlannerResult, MpbError> {
    Ok(astar_with(grid, start, goal, manhattan, TieBreak::LowH))
}

/// A* with an explicit heuristic and tie-break policy.
pub fn astar_with(
    grid: &OccupancyGrid,
    start: Cell,
    goal: Cell,
    heuristic: HeuristicFn,
    tie_break: TieBreak,
) -> PlannerResult {
    run_best_first(grid, start, goal, Objective::CostPlusHeuristic, heuristic, tie_break)
}

/// Uniform-cost search: f = g, FIFO among equals.
pub fn dijkstra(grid: &OccupancyGrid, start: Cell, goal: Cell) -> Result<PlannerResult, MpbError> {
    Ok(run_best_first(
        grid,
        start,
        goal,
        Objective::CostOnly,
        manhattan,
        TieBreak::Fifo,
    ))
}

/// Greedy best-first: f = h, no tie preference beyond the push counter.
pub fn greedy_best_first(
    grid: &OccupancyGrid,
    start: Cell,
    goal: Cell,
) -> Result<PlannerResult, MpbError> {
    Ok(greedy_best_first_with(grid, start, goal, manhattan))
}

/// Greedy best-first with an explicit heuristic.
pub fn greedy_best_first_with(
    grid: &OccupancyGrid,
    start: Cell,
    goal: Cell,
    heuristic: HeuristicFn,
) -> PlannerResult {
    run_best_first(grid, start, goal, Objective::HeuristicOnly, heuristic, TieBreak::Fifo)
}

fn run_best_first(
    grid: &OccupancyGrid,
    start: Cell,
    goal: Cell,
    objective: Objective,
    heuristic: HeuristicFn,
    tie_break: TieBreak,
) -> PlannerResult {
    let timer = Timer::start();
    if let Some(early) = preflight(grid, start, goal, &timer) {
        return early;
    }

    let mut open: BinaryHeap<Reverse<HeapEntry>> = BinaryHeap::new();
    let mut best_g: HashMap<Cell, f64> = HashMap::from([(start, 0.0)]);
    let mut parents: HashMap<Cell, Cell> = HashMap::new();
    let mut closed: HashSet<Cell> = HashSet::new();
    let mut counter = 0u64;
    let mut expansions = 0u64;

    let h_start = heuristic(start, goal);
    open.push(Reverse(HeapEntry {
        f: objective.f(0.0, h_start),
        tie: tie_break.priority(0.0, h_start),
        counter,
        g: 0.0,
        cell: start,
    }));
    counter += 1;

    while let Some(Reverse(entry)) = open.pop() {
        if closed.contains(&entry.cell) {
            continue;
        }
        // Stale entry: a better g was recorded after this push.
        if best_g.get(&entry.cell).map_or(true, |&g| entry.g > g) {
            continue;
        }
        closed.insert(entry.cell);
        expansions += 1;

        if entry.cell == goal {
            let path = reconstruct_path(&parents, goal);
            let cost = (path.len() - 1) as f64;
            return PlannerResult::success(path, cost, expansions, timer.elapsed_ms());
        }

        for next in cardinal_neighbors(grid, entry.cell) {
            if closed.contains(&next) {
                continue;
            }
            let tentative = entry.g + 1.0;
            if best_g.get(&next).map_or(true, |&g| tentative < g) {
                best_g.insert(next, tentative);
                parents.insert(next, entry.cell);
                let h = heuristic(next, goal);
                open.push(Reverse(HeapEntry {
                    f: objective.f(tentative, h),
                    tie: tie_break.priority(tentative, h),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::PlannerStatus;

    fn open_grid(rows: usize, cols: usize) -> OccupancyGrid {
        OccupancyGrid::new_free(rows, cols).unwrap()
    }

    #[test]
    fn astar_finds_a_manhattan_optimal_path() {
        let grid = open_grid(5, 5);
        let result = astar(&grid, Cell::new(0, 0), Cell::new(4, 4)).unwrap();
        assert_eq!(result.status, PlannerStatus::Success);
        assert_eq!(result.path_cost, Some(8.0));
        assert_eq!(result.path.len(), 9);
        assert_eq!(result.path[0], Cell::new(0, 0));
        assert_eq!(result.path[8], Cell::new(4, 4));
    }

    #[test]
    fn walled_off_goal_reports_no_path() {
        let mut grid = open_grid(3, 3);
        grid.set_blocked(Cell::new(0, 1), true);
        grid.set_blocked(Cell::new(1, 1), true);
        grid.set_blocked(Cell::new(1, 0), true);
        let result = astar(&grid, Cell::new(0, 0), Cell::new(2, 2)).unwrap();
        assert_eq!(result.status, PlannerStatus::NoPath);
        assert!(result.path.is_empty());
    }

    #[test]
    fn dijkstra_matches_astar_cost() {
        let mut grid = open_grid(6, 6);
        for col in 0..5 {
            grid.set_blocked(Cell::new(3, col), true);
        }
        let start = Cell::new(0, 0);
        let goal = Cell::new(5, 0);
        let a = astar(&grid, start, goal).unwrap();
        let d = dijkstra(&grid, start, goal).unwrap();
        assert_eq!(a.path_cost, d.path_cost);
    }

    #[test]
    fn greedy_reaches_the_goal_on_an_open_grid() {
        let grid = open_grid(4, 7);
        let result = greedy_best_first(&grid, Cell::new(0, 0), Cell::new(3, 6)).unwrap();
        assert_eq!(result.status, PlannerStatus::Success);
        assert_eq!(result.path_cost, Some(9.0));
    }
}
