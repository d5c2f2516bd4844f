#![deny(missing_docs)]
#![doc = "Shared foundation for the maze planner benchmark: error taxonomy, deterministic RNG, grid-space cells, occupancy grids, and heuristic lookup."]

pub mod errors;
pub mod grid;
pub mod heuristics;
pub mod rng;
mod types;

pub use errors::{ErrorInfo, MpbError};
pub use grid::OccupancyGrid;
pub use heuristics::{chebyshev, euclidean, manhattan, HeuristicFn, HeuristicRegistry};
pub use rng::{derive_substream_seed, RngHandle};
pub use types::Cell;
