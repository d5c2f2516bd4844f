#![deny(missing_docs)]
#![doc = "Twelve grid path planners behind one result contract, plus the ordered registry the benchmark harness runs them through."]

pub mod beam;
pub mod bestfirst;
pub mod bidir_astar;
pub mod bidir_bfs;
mod common;
pub mod fringe;
pub mod idastar;
pub mod jps;
pub mod lpa;
pub mod registry;
pub mod result;
pub mod theta;
pub mod weighted;

pub use beam::{beam_search, beam_search_with, BeamConfig, DEFAULT_BEAM_WIDTH};
pub use bestfirst::{astar, astar_with, dijkstra, greedy_best_first, greedy_best_first_with, TieBreak};
pub use bidir_astar::bidirectional_astar;
pub use bidir_bfs::bidirectional_bfs;
pub use fringe::fringe_search;
pub use idastar::idastar;
pub use jps::jps_4way;
pub use lpa::{lpa_star, IncrementalPlanner};
pub use registry::{benchmark_default_names, PlannerFn, PlannerRegistry, DEFAULT_PLANNERS};
pub use result::{MetricValue, PlannerResult, PlannerStatus, Timer};
pub use theta::{supercover_clear, supercover_hops, theta_star};
pub use weighted::{weighted_astar, weighted_astar_with, WeightedConfig, DEFAULT_WEIGHT};
