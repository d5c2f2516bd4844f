//! Carving algorithms and the deterministic generation entry points.

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use mpb_core::{ErrorInfo, MpbError, RngHandle};

use crate::maze::{candidate_neighbors, validate_cell, Maze, MazeAlgorithm, MazeCoord};

/// Deterministic center goal for a maze of the given size.
pub fn center_goal(width: usize, height: usize) -> MazeCoord {
    (width / 2, height / 2)
}

/// Generates a deterministic, solvable maze from `(0, 0)` to the center goal.
pub fn generate(
    width: usize,
    height: usize,
    seed: u64,
    algorithm: MazeAlgorithm,
) -> Result<Maze, MpbError> {
    generate_with_endpoints(width, height, seed, algorithm, (0, 0), None)
}

/// Generates a deterministic, solvable maze with explicit endpoints.
///
/// When `goal` is `None` the center goal is used. After carving the maze is
/// checked for full connectivity and start-goal solvability; a failure there
/// is a carving bug and surfaces as a fatal internal error.
pub fn generate_with_endpoints(
    width: usize,
    height: usize,
    seed: u64,
    algorithm: MazeAlgorithm,
    start: MazeCoord,
    goal: Option<MazeCoord>,
) -> Result<Maze, MpbError> {
    if width == 0 || height == 0 {
        return Err(MpbError::Maze(
            ErrorInfo::new("maze-config", "maze dimensions must be positive")
                .with_context("width", width.to_string())
                .with_context("height", height.to_string()),
        ));
    }
    validate_cell(start, width, height, "start")?;
    let goal_cell = goal.unwrap_or_else(|| center_goal(width, height));
    validate_cell(goal_cell, width, height, "goal")?;

    let mut maze = Maze::with_full_walls(width, height, start, goal_cell, algorithm, seed)?;
    let mut rng = RngHandle::from_seed(seed);
    match algorithm {
        MazeAlgorithm::Backtracker => carve_backtracker(&mut maze, &mut rng, start),
        MazeAlgorithm::Prim => carve_prim(&mut maze, &mut rng, start),
    }

    let reachable = maze.reachable_count();
    let expected = width * height;
    if reachable != expected {
        return Err(MpbError::Maze(
            ErrorInfo::new("maze-internal", "carving failed to connect all cells")
                .with_context("reachable", reachable.to_string())
                .with_context("expected", expected.to_string()),
        ));
    }
    if !maze.is_solvable() {
        return Err(MpbError::Maze(ErrorInfo::new(
            "maze-internal",
            "generated maze is not solvable between start and goal",
        )));
    }
    Ok(maze)
}

/// Iterative depth-first carving: at each step pick uniformly among the
/// unvisited orthogonal neighbors of the stack top, carve, and descend;
/// backtrack on dead ends.
fn carve_backtracker(maze: &mut Maze, rng: &mut RngHandle, start: MazeCoord) {
    let mut visited: HashSet<MazeCoord> = HashSet::from([start]);
    let mut stack = vec![start];

    while let Some(&current) = stack.last() {
        let candidates: Vec<MazeCoord> =
            candidate_neighbors(current, maze.width(), maze.height())
                .into_iter()
                .filter(|candidate| !visited.contains(candidate))
                .collect();
        if candidates.is_empty() {
            stack.pop();
            continue;
        }
        let next = candidates[rng.inner_mut().gen_range(0..candidates.len())];
        maze.remove_wall_between(current, next);
        visited.insert(next);
        stack.push(next);
    }
}

/// Randomized Prim carving: grow from the start cell by repeatedly drawing a
/// uniformly random frontier edge. Removal must happen at the drawn index so
/// the edge stream stays order-dependent and reproducible.
fn carve_prim(maze: &mut Maze, rng: &mut RngHandle, start: MazeCoord) {
    fn push_frontier(
        frontier: &mut Vec<(MazeCoord, MazeCoord)>,
        visited: &HashSet<MazeCoord>,
        cell: MazeCoord,
        width: usize,
        height: usize,
    ) {
        for next in candidate_neighbors(cell, width, height) {
            if !visited.contains(&next) {
                frontier.push((cell, next));
            }
        }
    }

    let mut visited: HashSet<MazeCoord> = HashSet::from([start]);
    let mut frontier: Vec<(MazeCoord, MazeCoord)> = Vec::new();
    push_frontier(&mut frontier, &visited, start, maze.width(), maze.height());

    while !frontier.is_empty() {
        let edge_index = rng.inner_mut().gen_range(0..frontier.len());
        let (source, target) = frontier.remove(edge_index);
        if visited.contains(&target) {
            continue;
        }
        maze.remove_wall_between(source, target);
        visited.insert(target);
        push_frontier(&mut frontier, &visited, target, maze.width(), maze.height());
    }
}

/// Episode-indexed maze source used by the benchmark harness.
///
/// Episode `i` is generated with `seed = base_seed + i`, which is the value
/// recorded in the `maze_seed` CSV column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeMazes {
    /// Master seed for episode zero.
    pub base_seed: u64,
    /// Maze width in cells.
    pub width: usize,
    /// Maze height in cells.
    pub height: usize,
    /// Carving algorithm for every episode.
    pub algorithm: MazeAlgorithm,
}

impl EpisodeMazes {
    /// Generates the maze for one episode.
    pub fn generate(&self, episode: u64) -> Result<Maze, MpbError> {
        generate(
            self.width,
            self.height,
            self.base_seed.wrapping_add(episode),
            self.algorithm,
        )
    }

    /// Seed recorded for one episode.
    pub fn episode_seed(&self, episode: u64) -> u64 {
        self.base_seed.wrapping_add(episode)
    }
}
