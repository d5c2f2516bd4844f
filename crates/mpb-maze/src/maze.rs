//! Wall-grid maze representation and reachability queries.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use mpb_core::{ErrorInfo, MpbError};

/// Maze-space coordinate `(x, y)`: `x` is the column, `y` the row.
pub type MazeCoord = (usize, usize);

/// Supported carving algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MazeAlgorithm {
    /// Iterative depth-first carving with backtracking.
    Backtracker,
    /// Randomized Prim frontier carving.
    Prim,
}

impl MazeAlgorithm {
    /// Stable lowercase name used in configs and CSV rows.
    pub fn name(&self) -> &'static str {
        match self {
            MazeAlgorithm::Backtracker => "backtracker",
            MazeAlgorithm::Prim => "prim",
        }
    }
}

impl fmt::Display for MazeAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MazeAlgorithm {
    type Err = MpbError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "backtracker" => Ok(MazeAlgorithm::Backtracker),
            "prim" => Ok(MazeAlgorithm::Prim),
            other => Err(MpbError::Maze(
                ErrorInfo::new(
                    "maze-config",
                    format!("unsupported maze algorithm '{other}', available: [backtracker, prim]"),
                )
                .with_context("requested", other),
            )),
        }
    }
}

/// Grid maze with explicit horizontal and vertical wall segments.
///
/// `horizontal_walls[y][x]` is the segment on row boundary `y` between
/// columns `x` and `x + 1`; shape `(height + 1, width)`.
/// `vertical_walls[y][x]` is the segment on column boundary `x` between rows
/// `y` and `y + 1`; shape `(height, width + 1)`. `true` means wall present.
///
/// A finished maze is perfect: one spanning component, no cycles, so any two
/// cells are joined by a unique corridor path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    width: usize,
    height: usize,
    horizontal_walls: Vec<Vec<bool>>,
    vertical_walls: Vec<Vec<bool>>,
    start: MazeCoord,
    goal: MazeCoord,
    algorithm: MazeAlgorithm,
    seed: u64,
}

impl Maze {
    /// Creates a maze with every wall present, ready for carving.
    pub fn with_full_walls(
        width: usize,
        height: usize,
        start: MazeCoord,
        goal: MazeCoord,
        algorithm: MazeAlgorithm,
        seed: u64,
    ) -> Result<Self, MpbError> {
        if width == 0 || height == 0 {
            return Err(MpbError::Maze(
                ErrorInfo::new("maze-config", "maze dimensions must be positive")
                    .with_context("width", width.to_string())
                    .with_context("height", height.to_string()),
            ));
        }
        validate_cell(start, width, height, "start")?;
        validate_cell(goal, width, height, "goal")?;
        Ok(Self {
            width,
            height,
            horizontal_walls: vec![vec![true; width]; height + 1],
            vertical_walls: vec![vec![true; width + 1]; height],
            start,
            goal,
            algorithm,
            seed,
        })
    }

    /// Maze width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Maze height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Start coordinate in maze space.
    pub fn start(&self) -> MazeCoord {
        self.start
    }

    /// Goal coordinate in maze space.
    pub fn goal(&self) -> MazeCoord {
        self.goal
    }

    /// Carving algorithm that produced this maze.
    pub fn algorithm(&self) -> MazeAlgorithm {
        self.algorithm
    }

    /// Seed that produced this maze.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// In-bounds orthogonal neighbors in fixed N, E, S, W order.
    pub fn neighbors(&self, cell: MazeCoord) -> Vec<MazeCoord> {
        candidate_neighbors(cell, self.width, self.height)
    }

    /// Returns whether a wall separates two orthogonally adjacent cells.
    pub fn has_wall_between(&self, source: MazeCoord, target: MazeCoord) -> bool {
        let (x1, y1) = source;
        let (x2, y2) = target;
        debug_assert!(x1.abs_diff(x2) + y1.abs_diff(y2) == 1);
        if x2 == x1 + 1 {
            self.vertical_walls[y1][x1 + 1]
        } else if x1 == x2 + 1 {
            self.vertical_walls[y1][x1]
        } else if y2 == y1 + 1 {
            self.horizontal_walls[y1 + 1][x1]
        } else {
            self.horizontal_walls[y1][x1]
        }
    }

    /// Removes the shared wall between two orthogonally adjacent cells.
    /// Carving-only mutation; a finished maze is never modified.
    pub(crate) fn remove_wall_between(&mut self, source: MazeCoord, target: MazeCoord) {
        let (x1, y1) = source;
        let (x2, y2) = target;
        debug_assert!(x1.abs_diff(x2) + y1.abs_diff(y2) == 1);
        if x2 == x1 + 1 {
            self.vertical_walls[y1][x1 + 1] = false;
        } else if x1 == x2 + 1 {
            self.vertical_walls[y1][x1] = false;
        } else if y2 == y1 + 1 {
            self.horizontal_walls[y1 + 1][x1] = false;
        } else {
            self.horizontal_walls[y1][x1] = false;
        }
    }

    /// Adjacent cells reachable without crossing a wall.
    pub fn open_neighbors(&self, cell: MazeCoord) -> Vec<MazeCoord> {
        self.neighbors(cell)
            .into_iter()
            .filter(|&neighbor| !self.has_wall_between(cell, neighbor))
            .collect()
    }

    /// Shortest corridor path between start and goal via BFS, empty if none.
    pub fn shortest_path(&self) -> Vec<MazeCoord> {
        let mut queue = VecDeque::from([self.start]);
        let mut parents: HashMap<MazeCoord, Option<MazeCoord>> =
            HashMap::from([(self.start, None)]);

        while let Some(current) = queue.pop_front() {
            if current == self.goal {
                break;
            }
            for next in self.open_neighbors(current) {
                if let std::collections::hash_map::Entry::Vacant(entry) = parents.entry(next) {
                    entry.insert(Some(current));
                    queue.push_back(next);
                }
            }
        }

        if !parents.contains_key(&self.goal) {
            return Vec::new();
        }
        let mut path = Vec::new();
        let mut cursor = Some(self.goal);
        while let Some(cell) = cursor {
            path.push(cell);
            cursor = parents[&cell];
        }
        path.reverse();
        path
    }

    /// Whether a corridor path joins start and goal.
    pub fn is_solvable(&self) -> bool {
        !self.shortest_path().is_empty()
    }

    /// Number of cells reachable from the start cell.
    pub fn reachable_count(&self) -> usize {
        let mut visited: std::collections::HashSet<MazeCoord> =
            std::collections::HashSet::from([self.start]);
        let mut queue = VecDeque::from([self.start]);
        while let Some(current) = queue.pop_front() {
            for next in self.open_neighbors(current) {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        visited.len()
    }
}

pub(crate) fn candidate_neighbors(cell: MazeCoord, width: usize, height: usize) -> Vec<MazeCoord> {
    let (x, y) = cell;
    let mut neighbors = Vec::with_capacity(4);
    if y > 0 {
        neighbors.push((x, y - 1));
    }
    if x + 1 < width {
        neighbors.push((x + 1, y));
    }
    if y + 1 < height {
        neighbors.push((x, y + 1));
    }
    if x > 0 {
        neighbors.push((x - 1, y));
    }
    neighbors
}

pub(crate) fn validate_cell(
    cell: MazeCoord,
    width: usize,
    height: usize,
    name: &str,
) -> Result<(), MpbError> {
    let (x, y) = cell;
    if x >= width || y >= height {
        return Err(MpbError::Maze(
            ErrorInfo::new(
                "maze-config",
                format!("{name} cell ({x}, {y}) out of bounds for maze size ({width}, {height})"),
            )
            .with_context("width", width.to_string())
            .with_context("height", height.to_string()),
        ));
    }
    Ok(())
}
