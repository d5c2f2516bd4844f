use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use serde_json::json;

use mpb_maze::{generate, occupancy_from_maze, MazeAlgorithm};

use super::write_json;

#[derive(Args, Debug)]
pub struct GenerateArgs {
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
    /// Output directory for maze.json and grid.json
    #[arg(long)]
    pub out: PathBuf,
}

pub fn run(args: &GenerateArgs) -> Result<(), Box<dyn Error>> {
    let algorithm: MazeAlgorithm = args.algorithm.parse()?;
    let maze = generate(args.width, args.height, args.seed, algorithm)?;
    let (grid, start, goal) = occupancy_from_maze(&maze)?;

    let maze_path = args.out.join("maze.json");
    write_json(&maze_path, &maze)?;
    let grid_path = args.out.join("grid.json");
    write_json(&grid_path, &json!({ "grid": grid, "start": start, "goal": goal }))?;

    println!("wrote {}", maze_path.display());
    println!("wrote {}", grid_path.display());
    Ok(())
}
