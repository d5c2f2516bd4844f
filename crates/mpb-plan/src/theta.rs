//! Any-angle Theta* and the supercover line-of-sight raster.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use mpb_core::heuristics::euclidean;
use mpb_core::{Cell, MpbError, OccupancyGrid};

use crate::common::{preflight, HeapEntry};
use crate::result::{MetricValue, PlannerResult, Timer};

/// Minimum g improvement accepted during relaxation.
const G_EPSILON: f64 = 1e-9;

const OCTILE_DIRS: [(i64, i64); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// Number of raster steps on the supercover segment from `a` to `b`, or
/// `None` when the segment crosses a blocked cell or a pinched corner.
///
/// The raster walks cell by cell choosing the axis whose next grid-line
/// crossing comes first, by comparing `(1 + 2*ix) * ny` against
/// `(1 + 2*iy) * nx`; equality means the segment passes exactly through a
/// corner and both axes step at once. Such a diagonal step is rejected when
/// the two cells flanking the corner are both blocked.
pub fn supercover_hops(grid: &OccupancyGrid, a: Cell, b: Cell) -> Option<usize> {
    let (r0, c0) = a.signed();
    let (r1, c1) = b.signed();
    let ny = (r1 - r0).abs();
    let nx = (c1 - c0).abs();
    let sy = (r1 - r0).signum();
    let sx = (c1 - c0).signum();

    if grid.blocked_or_outside(r0, c0) {
        return None;
    }
    let (mut r, mut c) = (r0, c0);
    let (mut ix, mut iy) = (0i64, 0i64);
    let mut hops = 0usize;
    while ix < nx || iy < ny {
        match ((1 + 2 * ix) * ny).cmp(&((1 + 2 * iy) * nx)) {
            std::cmp::Ordering::Equal => {
                if grid.blocked_or_outside(r + sy, c) && grid.blocked_or_outside(r, c + sx) {
                    return None;
                }
                r += sy;
                c += sx;
                ix += 1;
                iy += 1;
            }
            std::cmp::Ordering::Less => {
                c += sx;
                ix += 1;
            }
            std::cmp::Ordering::Greater => {
                r += sy;
                iy += 1;
            }
        }
        if grid.blocked_or_outside(r, c) {
            return None;
        }
        hops += 1;
    }
    Some(hops)
}

/// True when the supercover segment from `a` to `b` is clear.
pub fn supercover_clear(grid: &OccupancyGrid, a: Cell, b: Cell) -> bool {
    supercover_hops(grid, a, b).is_some()
}

struct LosCache {
    map: HashMap<(Cell, Cell), bool>,
    checks: u64,
    hits: u64,
    successes: u64,
}

impl LosCache {
    fn new() -> Self {
        Self {
            map: HashMap::new(),
            checks: 0,
            hits: 0,
            successes: 0,
        }
    }

    /// Cached line-of-sight lookup keyed by the unordered cell pair.
    fn query(&mut self, grid: &OccupancyGrid, a: Cell, b: Cell) -> bool {
        self.checks += 1;
        let key = if a <= b { (a, b) } else { (b, a) };
        if let Some(&cached) = self.map.get(&key) {
            self.hits += 1;
            if cached {
                self.successes += 1;
            }
            return cached;
        }
        let clear = supercover_clear(grid, a, b);
        self.map.insert(key, clear);
        if clear {
            self.successes += 1;
        }
        clear
    }
}

fn angle_neighbors(grid: &OccupancyGrid, cell: Cell) -> Vec<Cell> {
    let (r, c) = cell.signed();
    let mut out = Vec::with_capacity(8);
    for &(dr, dc) in &OCTILE_DIRS {
        let Some(next) = grid.cell_at(r + dr, c + dc) else {
            continue;
        };
        if grid.is_blocked(next) {
            continue;
        }
        // Diagonal moves cannot squeeze between two blocked side cells.
        if dr != 0 && dc != 0 && grid.blocked_or_outside(r + dr, c) && grid.blocked_or_outside(r, c + dc) {
            continue;
        }
        out.push(next);
    }
    out
}

/// Any-angle Theta* on the 8-connected grid with euclidean costs.
///
/// Whenever the grandparent of the current node has line of sight to a
/// neighbor, the neighbor's parent is re-pointed past the current node,
/// pulling the path taut.
pub fn theta_star(
    grid: &OccupancyGrid,
    start: Cell,
    goal: Cell,
) -> Result<PlannerResult, MpbError> {
    let timer = Timer::start();
    if let Some(early) = preflight(grid, start, goal, &timer) {
        return Ok(early);
    }

    let mut open: BinaryHeap<Reverse<HeapEntry>> = BinaryHeap::new();
    let mut g: HashMap<Cell, f64> = HashMap::from([(start, 0.0)]);
    let mut parents: HashMap<Cell, Cell> = HashMap::from([(start, start)]);
    let mut los = LosCache::new();
    let mut counter = 0u64;
    let mut expansions = 0u64;
    let mut open_pushes = 0u64;
    let mut smoothed_segments = 0u64;

    open.push(Reverse(HeapEntry {
        f: euclidean(start, goal),
        tie: 0.0,
        counter,
        g: 0.0,
        cell: start,
    }));
    counter += 1;
    open_pushes += 1;

    while let Some(Reverse(entry)) = open.pop() {
        let current_g = g.get(&entry.cell).copied().unwrap_or(f64::INFINITY);
        if (entry.g - current_g).abs() > G_EPSILON {
            continue;
        }
        expansions += 1;

        if entry.cell == goal {
            let path = taut_path(&parents, start, goal);
            let cost = segment_cost(&path);
            return Ok(PlannerResult::success(path, cost, expansions, timer.elapsed_ms())
                .with_metric("los_checks", MetricValue::Int(los.checks as i64))
                .with_metric("los_successes", MetricValue::Int(los.successes as i64))
                .with_metric("los_cache_hits", MetricValue::Int(los.hits as i64))
                .with_metric("open_pushes", MetricValue::Int(open_pushes as i64))
                .with_metric("smoothed_segments", MetricValue::Int(smoothed_segments as i64)));
        }

        let parent = parents.get(&entry.cell).copied().unwrap_or(entry.cell);
        let parent_g = g.get(&parent).copied().unwrap_or(f64::INFINITY);

        for next in angle_neighbors(grid, entry.cell) {
            let (candidate_parent, candidate_g, smoothed) =
                if parent != entry.cell && los.query(grid, parent, next) {
                    (parent, parent_g + euclidean(parent, next), true)
                } else {
                    (entry.cell, current_g + euclidean(entry.cell, next), false)
                };
            let known = g.get(&next).copied().unwrap_or(f64::INFINITY);
            if candidate_g + G_EPSILON < known {
                g.insert(next, candidate_g);
                parents.insert(next, candidate_parent);
                if smoothed {
                    smoothed_segments += 1;
                }
                open.push(Reverse(HeapEntry {
                    f: candidate_g + euclidean(next, goal),
                    tie: 0.0,
                    counter,
                    g: candidate_g,
                    cell: next,
                }));
                counter += 1;
                open_pushes += 1;
            }
        }
    }

    Ok(PlannerResult::no_path(expansions, timer.elapsed_ms())
        .with_metric("los_checks", MetricValue::Int(los.checks as i64))
        .with_metric("los_successes", MetricValue::Int(los.successes as i64))
        .with_metric("los_cache_hits", MetricValue::Int(los.hits as i64))
        .with_metric("open_pushes", MetricValue::Int(open_pushes as i64))
        .with_metric("smoothed_segments", MetricValue::Int(smoothed_segments as i64)))
}

fn taut_path(parents: &HashMap<Cell, Cell>, start: Cell, goal: Cell) -> Vec<Cell> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        let Some(&previous) = parents.get(&current) else {
            break;
        };
        path.push(previous);
        current = previous;
    }
    path.reverse();
    path
}

fn segment_cost(path: &[Cell]) -> f64 {
    path.windows(2).map(|pair| euclidean(pair[0], pair[1])).sum()
}
