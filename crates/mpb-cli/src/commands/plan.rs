use std::error::Error;
use std::path::PathBuf;

use clap::Args;

use mpb_maze::{generate, occupancy_from_maze, MazeAlgorithm};
use mpb_plan::{PlannerRegistry, PlannerResult, PlannerStatus};

use super::write_json;

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Planner name from the benchmark set
    #[arg(long)]
    pub planner: String,
    /// Maze width in cells
    #[arg(long, default_value_t = 15)]
    pub width: usize,
    /// Maze height in cells
    #[arg(long, default_value_t = 15)]
    pub height: usize,
    /// Carving seed
    #[arg(long, default_value_t = 7)]
    pub seed: u64,
    /// Carving algorithm: backtracker or prim
    #[arg(long, default_value = "backtracker")]
    pub algorithm: String,
    /// Output file for the planner result JSON
    #[arg(long)]
    pub out: PathBuf,
}

pub fn run(args: &PlanArgs) -> Result<(), Box<dyn Error>> {
    let algorithm: MazeAlgorithm = args.algorithm.parse()?;
    let maze = generate(args.width, args.height, args.seed, algorithm)?;
    let (grid, start, goal) = occupancy_from_maze(&maze)?;

    let registry = PlannerRegistry::standard();
    let result = registry.run(&args.planner, &grid, start, goal)?;
    write_json(&args.out, &result)?;

    println!("{}: {}", args.planner, describe(&result));
    println!("wrote {}", args.out.display());
    Ok(())
}

fn describe(result: &PlannerResult) -> String {
    match result.status {
        PlannerStatus::Success => format!(
            "success, cost {:.3}, {} expansions, {:.3} ms",
            result.path_cost.unwrap_or(0.0),
            result.expansions,
            result.elapsed_ms,
        ),
        PlannerStatus::NoPath => format!("no path after {} expansions", result.expansions),
        PlannerStatus::InvalidInput => format!(
            "invalid input: {}",
            result.error.as_deref().unwrap_or("unspecified")
        ),
    }
}
