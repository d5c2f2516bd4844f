#![doc = "Perfect-maze generation (recursive backtracker and randomized Prim), wall-grid queries, and the maze-to-occupancy adapter."]

pub mod adapter;
mod generate;
mod maze;

pub use adapter::occupancy_from_maze;
pub use generate::{center_goal, generate, generate_with_endpoints, EpisodeMazes};
pub use maze::{Maze, MazeAlgorithm, MazeCoord};
