//! Explicit planner registry and the fixed benchmark set.

use mpb_core::{Cell, ErrorInfo, MpbError, OccupancyGrid};

use crate::beam::beam_search;
use crate::bestfirst::{astar, dijkstra, greedy_best_first};
use crate::bidir_astar::bidirectional_astar;
use crate::bidir_bfs::bidirectional_bfs;
use crate::fringe::fringe_search;
use crate::idastar::idastar;
use crate::jps::jps_4way;
use crate::lpa::lpa_star;
use crate::result::PlannerResult;
use crate::theta::theta_star;
use crate::weighted::weighted_astar;

/// Boxed planner entry point.
pub type PlannerFn =
    Box<dyn Fn(&OccupancyGrid, Cell, Cell) -> Result<PlannerResult, MpbError> + Send + Sync>;

/// Canonical benchmark planner names in registration order.
pub const DEFAULT_PLANNERS: [&str; 12] = [
    "astar",
    "dijkstra",
    "greedy_best_first",
    "weighted_astar",
    "bidirectional_astar",
    "theta_star",
    "idastar",
    "jps_4way",
    "lpa_star",
    "beam_search",
    "fringe_search",
    "bidirectional_bfs",
];

/// The fixed planner set the benchmark harness expects.
pub fn benchmark_default_names() -> Vec<String> {
    DEFAULT_PLANNERS.iter().map(|name| name.to_string()).collect()
}

/// Name-to-planner map preserving registration order.
///
/// Built once at startup and passed by reference; there is no
/// process-wide registration.
pub struct PlannerRegistry {
    entries: Vec<(String, PlannerFn)>,
}

impl PlannerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Creates the registry holding all twelve benchmark planners.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.insert("astar", Box::new(astar));
        registry.insert("dijkstra", Box::new(dijkstra));
        registry.insert("greedy_best_first", Box::new(greedy_best_first));
        registry.insert("weighted_astar", Box::new(weighted_astar));
        registry.insert("bidirectional_astar", Box::new(bidirectional_astar));
        registry.insert("theta_star", Box::new(theta_star));
        registry.insert("idastar", Box::new(idastar));
        registry.insert("jps_4way", Box::new(jps_4way));
        registry.insert("lpa_star", Box::new(lpa_star));
        registry.insert("beam_search", Box::new(beam_search));
        registry.insert("fringe_search", Box::new(fringe_search));
        registry.insert("bidirectional_bfs", Box::new(bidirectional_bfs));
        registry
    }

    /// Creates a registry holding the named benchmark planners, in the
    /// given order.
    ///
    /// Unknown names fail like [`PlannerRegistry::resolve`], listing the
    /// benchmark set.
    pub fn subset(names: &[String]) -> Result<Self, MpbError> {
        let mut registry = Self::new();
        for name in names {
            let planner: PlannerFn = match name.as_str() {
                "astar" => Box::new(astar),
                "dijkstra" => Box::new(dijkstra),
                "greedy_best_first" => Box::new(greedy_best_first),
                "weighted_astar" => Box::new(weighted_astar),
                "bidirectional_astar" => Box::new(bidirectional_astar),
                "theta_star" => Box::new(theta_star),
                "idastar" => Box::new(idastar),
                "jps_4way" => Box::new(jps_4way),
                "lpa_star" => Box::new(lpa_star),
                "beam_search" => Box::new(beam_search),
                "fringe_search" => Box::new(fringe_search),
                "bidirectional_bfs" => Box::new(bidirectional_bfs),
                other => {
                    return Err(MpbError::Planner(
                        ErrorInfo::new(
                            "planner-unknown",
                            format!(
                                "unknown planner '{other}', available: [{}]",
                                DEFAULT_PLANNERS.join(", ")
                            ),
                        )
                        .with_context("requested", other),
                    ))
                }
            };
            registry.insert(name.clone(), planner);
        }
        Ok(registry)
    }

    /// Registers a planner, replacing an existing entry of the same name
    /// without changing its position.
    pub fn insert(&mut self, name: impl Into<String>, planner: PlannerFn) {
        let name = name.into();
        match self.entries.iter_mut().find(|(held, _)| *held == name) {
            Some(slot) => slot.1 = planner,
            None => self.entries.push((name, planner)),
        }
    }

    /// Resolves a planner by name.
    pub fn resolve(&self, name: &str) -> Result<&PlannerFn, MpbError> {
        self.entries
            .iter()
            .find(|(held, _)| held == name)
            .map(|(_, planner)| planner)
            .ok_or_else(|| {
                MpbError::Planner(
                    ErrorInfo::new(
                        "planner-unknown",
                        format!(
                            "unknown planner '{name}', available: [{}]",
                            self.names().join(", ")
                        ),
                    )
                    .with_context("requested", name),
                )
            })
    }

    /// Runs a named planner.
    pub fn run(
        &self,
        name: &str,
        grid: &OccupancyGrid,
        start: Cell,
        goal: Cell,
    ) -> Result<PlannerResult, MpbError> {
        (self.resolve(name)?)(grid, start, goal)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Number of registered planners.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PlannerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_matches_the_benchmark_set() {
        let registry = PlannerRegistry::standard();
        assert_eq!(registry.names(), benchmark_default_names());
        assert_eq!(registry.len(), 12);
    }

    #[test]
    fn subsets_keep_the_requested_order_and_reject_strangers() {
        let names = vec!["dijkstra".to_string(), "astar".to_string()];
        let registry = PlannerRegistry::subset(&names).unwrap();
        assert_eq!(registry.names(), names);

        let err = PlannerRegistry::subset(&["dfs".to_string()]).err().unwrap();
        assert_eq!(err.info().code, "planner-unknown");
        assert!(err.info().message.contains("unknown planner 'dfs'"));
    }

    #[test]
    fn unknown_planners_list_what_is_available() {
        let registry = PlannerRegistry::standard();
        let err = registry.resolve("dfs").err().unwrap();
        assert_eq!(err.info().code, "planner-unknown");
        assert!(err.info().message.contains("unknown planner 'dfs'"));
        assert!(err.info().message.contains("astar, dijkstra"));
    }

    #[test]
    fn every_registered_planner_runs_on_a_trivial_grid() {
        let registry = PlannerRegistry::standard();
        let grid = OccupancyGrid::new_free(3, 3).unwrap();
        for name in registry.names() {
            let result = registry
                .run(&name, &grid, Cell::new(0, 0), Cell::new(0, 0))
                .unwrap();
            assert!(result.is_success(), "{name} failed the trivial case");
            assert_eq!(result.path, vec![Cell::new(0, 0)]);
        }
    }
}
