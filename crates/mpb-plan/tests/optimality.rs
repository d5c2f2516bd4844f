//! Cross-planner cost agreement on maze-derived corridor grids.

use mpb_core::heuristics::euclidean;
use mpb_core::{Cell, MpbError, OccupancyGrid};
use mpb_maze::{generate, occupancy_from_maze, MazeAlgorithm};
use mpb_plan::{
    bidirectional_astar, bidirectional_bfs, dijkstra, fringe_search, idastar, jps_4way, lpa_star,
    theta_star, weighted_astar, PlannerResult, PlannerStatus,
};

type Planner = fn(&OccupancyGrid, Cell, Cell) -> Result<PlannerResult, MpbError>;

fn maze_grid(seed: u64, algorithm: MazeAlgorithm) -> (OccupancyGrid, Cell, Cell) {
    let maze = generate(7, 6, seed, algorithm).unwrap();
    occupancy_from_maze(&maze).unwrap()
}

#[test]
fn optimal_planners_agree_with_dijkstra_across_seeds() {
    let optimal: [(&str, Planner); 5] = [
        ("astar", mpb_plan::astar),
        ("bidirectional_astar", bidirectional_astar),
        ("idastar", idastar),
        ("fringe_search", fringe_search),
        ("bidirectional_bfs", bidirectional_bfs),
    ];
    for seed in 0..6u64 {
        let (grid, start, goal) = maze_grid(seed, MazeAlgorithm::Backtracker);
        let reference = dijkstra(&grid, start, goal).unwrap();
        assert_eq!(reference.status, PlannerStatus::Success);
        for (name, planner) in optimal {
            let result = planner(&grid, start, goal).unwrap();
            assert_eq!(
                result.path_cost, reference.path_cost,
                "{name} diverged on seed {seed}"
            );
        }
    }
}

#[test]
fn jump_point_search_matches_dijkstra_on_corridors() {
    for seed in 0..6u64 {
        let (grid, start, goal) = maze_grid(seed, MazeAlgorithm::Prim);
        let reference = dijkstra(&grid, start, goal).unwrap();
        let result = jps_4way(&grid, start, goal).unwrap();
        assert_eq!(result.path_cost, reference.path_cost, "seed {seed}");
    }
}

#[test]
fn incremental_replans_match_dijkstra_on_corridors() {
    for seed in 0..6u64 {
        let (grid, start, goal) = maze_grid(seed, MazeAlgorithm::Backtracker);
        let reference = dijkstra(&grid, start, goal).unwrap();
        let result = lpa_star(&grid, start, goal).unwrap();
        assert_eq!(result.path_cost, reference.path_cost, "seed {seed}");
    }
}

#[test]
fn weighted_astar_stays_within_its_suboptimality_bound() {
    for seed in 0..6u64 {
        let (grid, start, goal) = maze_grid(seed, MazeAlgorithm::Backtracker);
        let optimal = dijkstra(&grid, start, goal).unwrap().path_cost.unwrap();
        let achieved = weighted_astar(&grid, start, goal).unwrap().path_cost.unwrap();
        assert!(
            achieved <= optimal * 1.5 + 1e-9,
            "seed {seed}: {achieved} exceeds 1.5 x {optimal}"
        );
    }
}

#[test]
fn any_angle_paths_never_cost_more_than_cardinal_ones() {
    for seed in 0..6u64 {
        let (grid, start, goal) = maze_grid(seed, MazeAlgorithm::Backtracker);
        let cardinal = dijkstra(&grid, start, goal).unwrap().path_cost.unwrap();
        let result = theta_star(&grid, start, goal).unwrap();
        assert_eq!(result.status, PlannerStatus::Success, "seed {seed}");
        let any_angle = result.path_cost.unwrap();
        assert!(
            any_angle <= cardinal + 1e-9,
            "seed {seed}: {any_angle} worse than cardinal {cardinal}"
        );
        let segments: f64 = result
            .path
            .windows(2)
            .map(|pair| euclidean(pair[0], pair[1]))
            .sum();
        assert!((segments - any_angle).abs() < 1e-9, "seed {seed}");
    }
}
