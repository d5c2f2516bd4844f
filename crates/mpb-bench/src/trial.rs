//! One planner attempt on one maze.

use serde::{Deserialize, Serialize};

use mpb_core::{Cell, OccupancyGrid};
use mpb_maze::MazeAlgorithm;
use mpb_plan::{PlannerRegistry, PlannerStatus, Timer};

use crate::validate::validate_claimed_path;

/// Outcome of a single planner run, one CSV row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    /// Planner name.
    pub planner: String,
    /// Zero-based maze index within the batch.
    pub maze_index: usize,
    /// Seed the maze was generated with.
    pub maze_seed: u64,
    /// Maze width in cells.
    pub width: usize,
    /// Maze height in cells.
    pub height: usize,
    /// Carving algorithm.
    pub algorithm: MazeAlgorithm,
    /// True when the validated path was accepted.
    pub success: bool,
    /// Planner-reported solve time in milliseconds.
    pub solve_time_ms: f64,
    /// Independently measured raster hop count, absent on failure.
    pub path_length: Option<u64>,
    /// Node expansions reported by the planner.
    pub expansions: u64,
    /// Failure detail, absent on success and on a plain no-path outcome.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Maze-level metadata stamped onto every trial row.
#[derive(Debug, Clone, Copy)]
pub struct TrialContext {
    /// Zero-based maze index.
    pub maze_index: usize,
    /// Seed recorded for the maze.
    pub maze_seed: u64,
    /// Maze width in cells.
    pub width: usize,
    /// Maze height in cells.
    pub height: usize,
    /// Carving algorithm.
    pub algorithm: MazeAlgorithm,
}

impl TrialContext {
    fn row(
        &self,
        planner: &str,
        success: bool,
        solve_time_ms: f64,
        path_length: Option<u64>,
        expansions: u64,
        error: Option<String>,
    ) -> TrialResult {
        TrialResult {
            planner: planner.to_string(),
            maze_index: self.maze_index,
            maze_seed: self.maze_seed,
            width: self.width,
            height: self.height,
            algorithm: self.algorithm,
            success,
            solve_time_ms,
            path_length,
            expansions,
            error,
        }
    }
}

/// Runs one planner on one grid and validates its claim.
///
/// Internal planner errors and rejected validations become failed rows;
/// the batch never stops for a single trial.
pub fn run_trial(
    registry: &PlannerRegistry,
    name: &str,
    grid: &OccupancyGrid,
    start: Cell,
    goal: Cell,
    context: TrialContext,
) -> TrialResult {
    let timer = Timer::start();
    let result = match registry.run(name, grid, start, goal) {
        Ok(result) => result,
        Err(err) => {
            return context.row(name, false, timer.elapsed_ms(), None, 0, Some(err.to_string()));
        }
    };

    match result.status {
        PlannerStatus::Success => {
            match validate_claimed_path(grid, start, goal, &result.path) {
                Ok(hops) => context.row(
                    name,
                    true,
                    result.elapsed_ms,
                    Some(hops),
                    result.expansions,
                    None,
                ),
                Err(detail) => context.row(
                    name,
                    false,
                    result.elapsed_ms,
                    None,
                    result.expansions,
                    Some(format!("validation rejected the path: {detail}")),
                ),
            }
        }
        PlannerStatus::NoPath => {
            context.row(name, false, result.elapsed_ms, None, result.expansions, None)
        }
        PlannerStatus::InvalidInput => context.row(
            name,
            false,
            result.elapsed_ms,
            None,
            result.expansions,
            result.error,
        ),
    }
}
