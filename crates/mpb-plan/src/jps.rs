//! Jump point search restricted to the four cardinal directions.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use mpb_core::heuristics::manhattan;
use mpb_core::{Cell, ErrorInfo, MpbError, OccupancyGrid};

use crate::common::{preflight, HeapEntry, CARDINAL_DIRS};
use crate::result::{MetricValue, PlannerResult, Timer};

#[derive(Default)]
struct JumpStats {
    jump_calls: u64,
    jump_steps: u64,
    forced_stops: u64,
    open_pushes: u64,
    open_pops: u64,
    max_open_size: u64,
    pruned_neighbors: u64,
}

/// Side directions with a forced neighbor at `(r, c)` while travelling
/// along `(dr, dc)`: the cell diagonally behind on that side is blocked or
/// outside while the side cell itself is walkable.
fn forced_sides(grid: &OccupancyGrid, r: i64, c: i64, dr: i64, dc: i64) -> Vec<(i64, i64)> {
    let mut sides = Vec::new();
    if dr == 0 {
        if grid.blocked_or_outside(r - 1, c - dc) && grid.walkable_signed(r - 1, c) {
            sides.push((-1, 0));
        }
        if grid.blocked_or_outside(r + 1, c - dc) && grid.walkable_signed(r + 1, c) {
            sides.push((1, 0));
        }
    } else {
        if grid.blocked_or_outside(r - dr, c - 1) && grid.walkable_signed(r, c - 1) {
            sides.push((0, -1));
        }
        if grid.blocked_or_outside(r - dr, c + 1) && grid.walkable_signed(r, c + 1) {
            sides.push((0, 1));
        }
    }
    sides
}

/// Scans from `from` along `(dr, dc)` until the ray leaves the walkable
/// region (no jump point), reaches the goal, or hits a cell with a forced
/// neighbor.
fn jump(
    grid: &OccupancyGrid,
    from: Cell,
    dr: i64,
    dc: i64,
    goal: Cell,
    stats: &mut JumpStats,
) -> Option<Cell> {
    stats.jump_calls += 1;
    let (mut r, mut c) = from.signed();
    loop {
        r += dr;
        c += dc;
        if !grid.walkable_signed(r, c) {
            return None;
        }
        stats.jump_steps += 1;
        let cell = Cell::new(r as usize, c as usize);
        if cell == goal {
            return Some(cell);
        }
        if !forced_sides(grid, r, c, dr, dc).is_empty() {
            stats.forced_stops += 1;
            return Some(cell);
        }
    }
}

/// Cardinal jump point search: A* whose successors are jump points and
/// whose edge costs are the manhattan gaps between them.
pub fn jps_4way(grid: &OccupancyGrid, start: Cell, goal: Cell) -> Result<PlannerResult, MpbError> {
    let timer = Timer::start();
    if let Some(early) = preflight(grid, start, goal, &timer) {
        return Ok(early);
    }

    let mut open: BinaryHeap<Reverse<HeapEntry>> = BinaryHeap::new();
    let mut best_g: HashMap<Cell, f64> = HashMap::from([(start, 0.0)]);
    let mut parents: HashMap<Cell, Cell> = HashMap::new();
    let mut stats = JumpStats::default();
    let mut counter = 0u64;
    let mut expansions = 0u64;

    open.push(Reverse(HeapEntry {
        f: manhattan(start, goal),
        tie: 0.0,
        counter,
        g: 0.0,
        cell: start,
    }));
    counter += 1;
    stats.open_pushes += 1;
    stats.max_open_size = stats.max_open_size.max(open.len() as u64);

    while let Some(Reverse(entry)) = open.pop() {
        if best_g.get(&entry.cell).map_or(true, |&g| entry.g > g) {
            continue;
        }
        stats.open_pops += 1;
        expansions += 1;

        if entry.cell == goal {
            return finish(start, goal, &parents, expansions, stats, &timer);
        }

        let (r, c) = entry.cell.signed();
        let directions: Vec<(i64, i64)> = if entry.cell == start {
            CARDINAL_DIRS
                .iter()
                .copied()
                .filter(|&(dr, dc)| grid.walkable_signed(r + dr, c + dc))
                .collect()
        } else {
            let parent = parents.get(&entry.cell).copied().unwrap_or(entry.cell);
            let dr = (r - parent.signed().0).signum();
            let dc = (c - parent.signed().1).signum();
            let mut dirs = vec![(dr, dc)];
            dirs.extend(forced_sides(grid, r, c, dr, dc));
            stats.pruned_neighbors += (CARDINAL_DIRS.len() - dirs.len()) as u64;
            dirs
        };

        for (dr, dc) in directions {
            let Some(point) = jump(grid, entry.cell, dr, dc, goal, &mut stats) else {
                continue;
            };
            let tentative = entry.g + manhattan(entry.cell, point);
            if best_g.get(&point).map_or(true, |&g| tentative < g) {
                best_g.insert(point, tentative);
                parents.insert(point, entry.cell);
                open.push(Reverse(HeapEntry {
                    f: tentative + manhattan(point, goal),
                    tie: 0.0,
                    counter,
                    g: tentative,
                    cell: point,
                }));
                counter += 1;
                stats.open_pushes += 1;
                stats.max_open_size = stats.max_open_size.max(open.len() as u64);
            }
        }
    }

    Ok(attach(PlannerResult::no_path(expansions, timer.elapsed_ms()), &stats, 0))
}

fn finish(
    start: Cell,
    goal: Cell,
    parents: &HashMap<Cell, Cell>,
    expansions: u64,
    stats: JumpStats,
    timer: &Timer,
) -> Result<PlannerResult, MpbError> {
    let mut points = vec![goal];
    let mut current = goal;
    while let Some(&previous) = parents.get(&current) {
        points.push(previous);
        current = previous;
    }
    points.reverse();

    let mut path = vec![start];
    for pair in points.windows(2) {
        let (ar, ac) = pair[0].signed();
        let (br, bc) = pair[1].signed();
        if ar != br && ac != bc {
            return Err(MpbError::Planner(
                ErrorInfo::new(
                    "planner-internal",
                    "jump chain produced a non-cardinal segment",
                )
                .with_context("from", pair[0].to_string())
                .with_context("to", pair[1].to_string()),
            ));
        }
        let dr = (br - ar).signum();
        let dc = (bc - ac).signum();
        let (mut r, mut c) = (ar, ac);
        while (r, c) != (br, bc) {
            r += dr;
            c += dc;
            path.push(Cell::new(r as usize, c as usize));
        }
    }

    let cost = (path.len() - 1) as f64;
    let jump_path_length = points.len() as i64;
    let result = PlannerResult::success(path, cost, expansions, timer.elapsed_ms());
    Ok(attach(result, &stats, jump_path_length))
}

fn attach(result: PlannerResult, stats: &JumpStats, jump_path_length: i64) -> PlannerResult {
    result
        .with_metric("jump_calls", MetricValue::Int(stats.jump_calls as i64))
        .with_metric("jump_steps", MetricValue::Int(stats.jump_steps as i64))
        .with_metric("forced_stops", MetricValue::Int(stats.forced_stops as i64))
        .with_metric("open_pushes", MetricValue::Int(stats.open_pushes as i64))
        .with_metric("open_pops", MetricValue::Int(stats.open_pops as i64))
        .with_metric("max_open_size", MetricValue::Int(stats.max_open_size as i64))
        .with_metric("pruned_neighbors", MetricValue::Int(stats.pruned_neighbors as i64))
        .with_metric("jump_path_length", MetricValue::Int(jump_path_length))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bestfirst::astar;
    use crate::result::PlannerStatus;
    use mpb_maze::{generate, occupancy_from_maze, MazeAlgorithm};

    #[test]
    fn jump_points_reproduce_the_astar_cost_in_corridors() {
        for seed in 0..4u64 {
            let maze = generate(6, 5, seed, MazeAlgorithm::Backtracker).unwrap();
            let (grid, start, goal) = occupancy_from_maze(&maze).unwrap();
            let exact = astar(&grid, start, goal).unwrap();
            let result = jps_4way(&grid, start, goal).unwrap();
            assert_eq!(result.status, PlannerStatus::Success);
            assert_eq!(result.path_cost, exact.path_cost);
        }
    }

    #[test]
    fn expanded_path_is_cardinal_and_contiguous() {
        let maze = generate(8, 8, 21, MazeAlgorithm::Prim).unwrap();
        let (grid, start, goal) = occupancy_from_maze(&maze).unwrap();
        let result = jps_4way(&grid, start, goal).unwrap();
        assert_eq!(result.status, PlannerStatus::Success);
        assert_eq!(result.path.first(), Some(&start));
        assert_eq!(result.path.last(), Some(&goal));
        for pair in result.path.windows(2) {
            let dr = pair[0].row.abs_diff(pair[1].row);
            let dc = pair[0].col.abs_diff(pair[1].col);
            assert_eq!(dr + dc, 1);
        }
    }

    #[test]
    fn obstacle_free_corridor_needs_no_forced_stops() {
        let grid = OccupancyGrid::new_free(1, 10).unwrap();
        let result = jps_4way(&grid, Cell::new(0, 0), Cell::new(0, 9)).unwrap();
        assert_eq!(result.path_cost, Some(9.0));
        assert_eq!(result.extensions.get("forced_stops"), Some(&MetricValue::Int(0)));
    }
}
