//! Lifelong Planning A* behind an owned incremental handle.

use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeSet, BinaryHeap, HashMap};

use mpb_core::heuristics::manhattan;
use mpb_core::{Cell, ErrorInfo, MpbError, OccupancyGrid};

use crate::common::{cardinal_neighbors, endpoint_rejection, CARDINAL_DIRS};
use crate::result::{MetricValue, PlannerResult, Timer};

#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    k1: f64,
    k2: f64,
    stamp: u64,
    cell: Cell,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.k1
            .total_cmp(&other.k1)
            .then(self.k2.total_cmp(&other.k2))
            .then(self.stamp.cmp(&other.stamp))
    }
}

fn key_less(a: (f64, f64), b: (f64, f64)) -> bool {
    a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)) == Ordering::Less
}

/// Owned LPA* search tree that survives across grid edits.
///
/// The queue uses lazy deletion: `live` maps each queued cell to the stamp
/// of its newest entry, and popped entries with any other stamp are
/// discarded. `replan` diffs the new grid against the stored one and only
/// repairs the touched region; a shape change forces a full reset.
#[derive(Debug)]
pub struct IncrementalPlanner {
    grid: OccupancyGrid,
    start: Cell,
    goal: Cell,
    g: Vec<f64>,
    rhs: Vec<f64>,
    open: BinaryHeap<Reverse<QueueEntry>>,
    live: HashMap<Cell, u64>,
    next_stamp: u64,
    has_planned: bool,
}

impl IncrementalPlanner {
    /// Creates a planner rooted at `start` searching toward `goal`.
    pub fn new(grid: &OccupancyGrid, start: Cell, goal: Cell) -> Self {
        let mut planner = Self {
            grid: grid.clone(),
            start,
            goal,
            g: Vec::new(),
            rhs: Vec::new(),
            open: BinaryHeap::new(),
            live: HashMap::new(),
            next_stamp: 0,
            has_planned: false,
        };
        planner.reset_tables();
        planner
    }

    fn index(&self, cell: Cell) -> usize {
        cell.row * self.grid.cols() + cell.col
    }

    fn calc_key(&self, cell: Cell) -> (f64, f64) {
        let value = self.g[self.index(cell)].min(self.rhs[self.index(cell)]);
        (value + manhattan(cell, self.goal), value)
    }

    fn reset_tables(&mut self) {
        let cells = self.grid.rows() * self.grid.cols();
        self.g = vec![f64::INFINITY; cells];
        self.rhs = vec![f64::INFINITY; cells];
        self.open.clear();
        self.live.clear();
        if self.grid.in_bounds(self.start) {
            let start_idx = self.index(self.start);
            self.rhs[start_idx] = 0.0;
            let key = self.calc_key(self.start);
            self.push_entry(self.start, key);
        }
    }

    fn push_entry(&mut self, cell: Cell, key: (f64, f64)) {
        self.next_stamp += 1;
        self.live.insert(cell, self.next_stamp);
        self.open.push(Reverse(QueueEntry {
            k1: key.0,
            k2: key.1,
            stamp: self.next_stamp,
            cell,
        }));
    }

    fn update_vertex(&mut self, cell: Cell, pushes: &mut u64) {
        let idx = self.index(cell);
        if cell != self.start {
            let new_rhs = if self.grid.is_blocked(cell) {
                f64::INFINITY
            } else {
                let mut best = f64::INFINITY;
                for predecessor in cardinal_neighbors(&self.grid, cell) {
                    let candidate = self.g[self.index(predecessor)] + 1.0;
                    if candidate < best {
                        best = candidate;
                    }
                }
                best
            };
            self.rhs[idx] = new_rhs;
        }
        self.live.remove(&cell);
        if self.g[idx] != self.rhs[idx] {
            let key = self.calc_key(cell);
            self.push_entry(cell, key);
            *pushes += 1;
        }
    }

    fn fresh_top(&mut self) -> Option<QueueEntry> {
        while let Some(&Reverse(entry)) = self.open.peek() {
            if self.live.get(&entry.cell) == Some(&entry.stamp) {
                return Some(entry);
            }
            self.open.pop();
        }
        None
    }

    fn compute_shortest_path(&mut self, pushes: &mut u64, pops: &mut u64) {
        loop {
            let top = self.fresh_top();
            let goal_idx = self.index(self.goal);
            let goal_key = self.calc_key(self.goal);
            let inconsistent_goal = self.rhs[goal_idx] != self.g[goal_idx];
            let proceed = match top {
                Some(entry) => key_less((entry.k1, entry.k2), goal_key) || inconsistent_goal,
                None => false,
            };
            if !proceed {
                break;
            }
            let Some(entry) = top else {
                break;
            };
            self.open.pop();
            self.live.remove(&entry.cell);
            *pops += 1;

            let idx = self.index(entry.cell);
            if self.g[idx] > self.rhs[idx] {
                self.g[idx] = self.rhs[idx];
                let successors: Vec<Cell> =
                    cardinal_neighbors(&self.grid, entry.cell).collect();
                for successor in successors {
                    self.update_vertex(successor, pushes);
                }
            } else {
                self.g[idx] = f64::INFINITY;
                self.update_vertex(entry.cell, pushes);
                let successors: Vec<Cell> =
                    cardinal_neighbors(&self.grid, entry.cell).collect();
                for successor in successors {
                    self.update_vertex(successor, pushes);
                }
            }
        }
    }

    /// Repairs the search tree against `grid` and extracts a path.
    pub fn replan(&mut self, grid: &OccupancyGrid) -> Result<PlannerResult, MpbError> {
        let timer = Timer::start();
        if let Some(detail) = endpoint_rejection(grid, self.start, self.goal) {
            return Ok(PlannerResult::invalid_input(detail, timer.elapsed_ms()));
        }
        if self.start == self.goal {
            return Ok(PlannerResult::success(
                vec![self.start],
                0.0,
                0,
                timer.elapsed_ms(),
            ));
        }

        let mut pushes = 0u64;
        let mut pops = 0u64;
        let mut changed_cells = 0usize;
        let shape_changed =
            grid.rows() != self.grid.rows() || grid.cols() != self.grid.cols();
        let reused_tree = self.has_planned && !shape_changed;

        if shape_changed {
            self.grid = grid.clone();
            self.reset_tables();
        } else {
            let mut touched: BTreeSet<Cell> = BTreeSet::new();
            for cell in grid.cells() {
                if grid.is_blocked(cell) != self.grid.is_blocked(cell) {
                    changed_cells += 1;
                    touched.insert(cell);
                    let (row, col) = cell.signed();
                    for (dr, dc) in CARDINAL_DIRS {
                        if let Some(neighbor) = grid.cell_at(row + dr, col + dc) {
                            touched.insert(neighbor);
                        }
                    }
                }
            }
            self.grid = grid.clone();
            for cell in touched {
                self.update_vertex(cell, &mut pushes);
            }
        }

        self.compute_shortest_path(&mut pushes, &mut pops);
        self.has_planned = true;

        let attach = |result: PlannerResult| {
            result
                .with_metric("reused_tree", MetricValue::Flag(reused_tree))
                .with_metric("full_reset", MetricValue::Flag(shape_changed))
                .with_metric("changed_cells", MetricValue::Int(changed_cells as i64))
                .with_metric("queue_pushes", MetricValue::Int(pushes as i64))
                .with_metric("queue_pops", MetricValue::Int(pops as i64))
        };

        if !self.g[self.index(self.goal)].is_finite() {
            return Ok(attach(PlannerResult::no_path(pops, timer.elapsed_ms())));
        }

        let path = self.extract_path()?;
        let cost = (path.len() - 1) as f64;
        Ok(attach(PlannerResult::success(path, cost, pops, timer.elapsed_ms())))
    }

    /// Greedy descent from the goal along minimum-g free predecessors.
    fn extract_path(&self) -> Result<Vec<Cell>, MpbError> {
        let mut path = vec![self.goal];
        let mut current = self.goal;
        let budget = self.grid.rows() * self.grid.cols();
        while current != self.start {
            if path.len() > budget {
                return Err(MpbError::Planner(ErrorInfo::new(
                    "planner-internal",
                    "path extraction exceeded the cell budget",
                )));
            }
            let mut best: Option<(f64, Cell)> = None;
            for predecessor in cardinal_neighbors(&self.grid, current) {
                let g = self.g[self.index(predecessor)];
                let better = match best {
                    None => true,
                    Some((bg, bc)) => g < bg || (g == bg && predecessor < bc),
                };
                if better {
                    best = Some((g, predecessor));
                }
            }
            match best {
                Some((g, predecessor)) if g.is_finite() => {
                    path.push(predecessor);
                    current = predecessor;
                }
                _ => {
                    return Err(MpbError::Planner(ErrorInfo::new(
                        "planner-internal",
                        "path extraction found no finite predecessor",
                    )));
                }
            }
        }
        path.reverse();
        Ok(path)
    }
}

/// Stateless wrapper constructing a fresh incremental planner per call.
pub fn lpa_star(grid: &OccupancyGrid, start: Cell, goal: Cell) -> Result<PlannerResult, MpbError> {
    IncrementalPlanner::new(grid, start, goal).replan(grid)
}
