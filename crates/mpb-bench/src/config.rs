//! Benchmark run configuration.

use serde::{Deserialize, Serialize};

use mpb_core::{ErrorInfo, MpbError};
use mpb_maze::MazeAlgorithm;
use mpb_plan::benchmark_default_names;

/// Parameters for one benchmark batch.
///
/// Every field has a serde default so a config file only needs to name
/// what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// Number of mazes in the batch.
    #[serde(default = "BenchmarkConfig::default_maze_count")]
    pub maze_count: usize,
    /// Maze width in cells.
    #[serde(default = "BenchmarkConfig::default_width")]
    pub width: usize,
    /// Maze height in cells.
    #[serde(default = "BenchmarkConfig::default_height")]
    pub height: usize,
    /// Base seed; maze `i` uses `seed + i`.
    #[serde(default = "BenchmarkConfig::default_seed")]
    pub seed: u64,
    /// Carving algorithm for every maze.
    #[serde(default = "BenchmarkConfig::default_algorithm")]
    pub algorithm: MazeAlgorithm,
    /// Planner names to run, in canonical order.
    #[serde(default = "benchmark_default_names")]
    pub planners: Vec<String>,
    /// Run mazes across rayon workers.
    #[serde(default)]
    pub parallel: bool,
}

impl BenchmarkConfig {
    const fn default_maze_count() -> usize {
        50
    }

    const fn default_width() -> usize {
        15
    }

    const fn default_height() -> usize {
        15
    }

    const fn default_seed() -> u64 {
        7
    }

    const fn default_algorithm() -> MazeAlgorithm {
        MazeAlgorithm::Backtracker
    }

    /// Rejects empty batches and empty planner lists.
    pub fn validate(&self) -> Result<(), MpbError> {
        if self.maze_count == 0 {
            return Err(MpbError::Benchmark(
                ErrorInfo::new("bench-config", "maze_count must be at least 1")
                    .with_hint("the default batch runs 50 mazes"),
            ));
        }
        if self.width == 0 || self.height == 0 {
            return Err(MpbError::Benchmark(
                ErrorInfo::new("bench-config", "maze dimensions must be positive")
                    .with_context("width", self.width.to_string())
                    .with_context("height", self.height.to_string()),
            ));
        }
        if self.planners.is_empty() {
            return Err(MpbError::Benchmark(ErrorInfo::new(
                "bench-config",
                "at least one planner must be selected",
            )));
        }
        Ok(())
    }
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            maze_count: Self::default_maze_count(),
            width: Self::default_width(),
            height: Self::default_height(),
            seed: Self::default_seed(),
            algorithm: Self::default_algorithm(),
            planners: benchmark_default_names(),
            parallel: false,
        }
    }
}
