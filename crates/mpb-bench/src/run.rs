//! Batch execution: maze loop, planner rotation, optional rayon fan-out.

use rayon::prelude::*;

use mpb_core::{ErrorInfo, MpbError};
use mpb_maze::{occupancy_from_maze, EpisodeMazes};
use mpb_plan::PlannerRegistry;

use crate::config::BenchmarkConfig;
use crate::trial::{run_trial, TrialContext, TrialResult};

/// Requires the registry to expose exactly the configured planner set.
///
/// A mismatch is fatal; the harness never silently drops or adds a
/// planner.
pub fn ensure_planner_set(
    registry: &PlannerRegistry,
    expected: &[String],
) -> Result<(), MpbError> {
    let registered = registry.names();
    let missing: Vec<&str> = expected
        .iter()
        .filter(|name| !registered.contains(name))
        .map(String::as_str)
        .collect();
    let unexpected: Vec<&str> = registered
        .iter()
        .filter(|name| !expected.contains(name))
        .map(String::as_str)
        .collect();
    if missing.is_empty() && unexpected.is_empty() {
        return Ok(());
    }
    Err(MpbError::Benchmark(
        ErrorInfo::new(
            "bench-planner-set",
            format!(
                "planner set mismatch; missing: [{}], unexpected: [{}]",
                missing.join(", "),
                unexpected.join(", ")
            ),
        )
        .with_hint("register exactly the planners named in the benchmark config"),
    ))
}

/// Runs the configured batch and returns one row per trial.
///
/// Maze `i` is generated with `seed + i` and its planners run in rotated
/// order starting at `i % planner_count`, so no planner systematically
/// goes first. Each trial plans against a private clone of the grid.
pub fn run_benchmark(
    config: &BenchmarkConfig,
    registry: &PlannerRegistry,
) -> Result<Vec<TrialResult>, MpbError> {
    config.validate()?;
    ensure_planner_set(registry, &config.planners)?;
    let episodes = EpisodeMazes {
        base_seed: config.seed,
        width: config.width,
        height: config.height,
        algorithm: config.algorithm,
    };

    if config.parallel {
        let mut per_maze: Vec<(usize, Vec<TrialResult>)> = (0..config.maze_count)
            .into_par_iter()
            .map(|maze_index| -> Result<(usize, Vec<TrialResult>), MpbError> {
                Ok((maze_index, run_maze(config, registry, &episodes, maze_index)?))
            })
            .collect::<Result<Vec<_>, MpbError>>()?;
        per_maze.sort_by_key(|(maze_index, _)| *maze_index);
        Ok(per_maze
            .into_iter()
            .flat_map(|(_, trials)| trials)
            .collect())
    } else {
        let mut trials = Vec::with_capacity(config.maze_count * config.planners.len());
        for maze_index in 0..config.maze_count {
            trials.extend(run_maze(config, registry, &episodes, maze_index)?);
        }
        Ok(trials)
    }
}

fn run_maze(
    config: &BenchmarkConfig,
    registry: &PlannerRegistry,
    episodes: &EpisodeMazes,
    maze_index: usize,
) -> Result<Vec<TrialResult>, MpbError> {
    let maze = episodes.generate(maze_index as u64)?;
    let (grid, start, goal) = occupancy_from_maze(&maze)?;
    let context = TrialContext {
        maze_index,
        maze_seed: episodes.episode_seed(maze_index as u64),
        width: config.width,
        height: config.height,
        algorithm: config.algorithm,
    };

    let planner_count = config.planners.len();
    let rotation = maze_index % planner_count;
    let mut trials = Vec::with_capacity(planner_count);
    for offset in 0..planner_count {
        let name = &config.planners[(rotation + offset) % planner_count];
        let private = grid.clone();
        trials.push(run_trial(registry, name, &private, start, goal, context));
    }
    Ok(trials)
}
