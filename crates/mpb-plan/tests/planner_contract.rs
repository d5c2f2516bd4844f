//! Contract checks every registered planner must satisfy.

use mpb_core::{Cell, OccupancyGrid};
use mpb_plan::{PlannerRegistry, PlannerStatus};

fn registry() -> PlannerRegistry {
    PlannerRegistry::standard()
}

#[test]
fn out_of_bounds_endpoints_are_rejected_with_the_shared_wording() {
    let registry = registry();
    let grid = OccupancyGrid::new_free(4, 4).unwrap();
    for name in registry.names() {
        let result = registry
            .run(&name, &grid, Cell::new(9, 0), Cell::new(0, 0))
            .unwrap();
        assert_eq!(result.status, PlannerStatus::InvalidInput, "{name}");
        assert_eq!(result.error.as_deref(), Some("start is out of bounds"), "{name}");

        let result = registry
            .run(&name, &grid, Cell::new(0, 0), Cell::new(0, 9))
            .unwrap();
        assert_eq!(result.status, PlannerStatus::InvalidInput, "{name}");
        assert_eq!(result.error.as_deref(), Some("goal is out of bounds"), "{name}");
    }
}

#[test]
fn blocked_endpoints_are_rejected_start_first() {
    let registry = registry();
    let mut grid = OccupancyGrid::new_free(4, 4).unwrap();
    grid.set_blocked(Cell::new(0, 0), true);
    grid.set_blocked(Cell::new(3, 3), true);
    for name in registry.names() {
        let result = registry
            .run(&name, &grid, Cell::new(0, 0), Cell::new(3, 3))
            .unwrap();
        assert_eq!(result.status, PlannerStatus::InvalidInput, "{name}");
        assert_eq!(result.error.as_deref(), Some("start is blocked"), "{name}");

        let result = registry
            .run(&name, &grid, Cell::new(1, 1), Cell::new(3, 3))
            .unwrap();
        assert_eq!(result.error.as_deref(), Some("goal is blocked"), "{name}");
    }
}

#[test]
fn coincident_endpoints_are_a_zero_cost_single_cell_path() {
    let registry = registry();
    let grid = OccupancyGrid::new_free(5, 5).unwrap();
    for name in registry.names() {
        let result = registry
            .run(&name, &grid, Cell::new(2, 3), Cell::new(2, 3))
            .unwrap();
        assert_eq!(result.status, PlannerStatus::Success, "{name}");
        assert_eq!(result.path, vec![Cell::new(2, 3)], "{name}");
        assert_eq!(result.path_cost, Some(0.0), "{name}");
        assert_eq!(result.expansions, 0, "{name}");
    }
}

#[test]
fn sealed_regions_report_no_path_without_an_error() {
    let registry = registry();
    let mut grid = OccupancyGrid::new_free(5, 5).unwrap();
    for row in 0..5 {
        grid.set_blocked(Cell::new(row, 2), true);
    }
    for name in registry.names() {
        let result = registry
            .run(&name, &grid, Cell::new(2, 0), Cell::new(2, 4))
            .unwrap();
        assert_eq!(result.status, PlannerStatus::NoPath, "{name}");
        assert!(result.path.is_empty(), "{name}");
        assert_eq!(result.path_cost, None, "{name}");
        assert!(result.error.is_none(), "{name}");
    }
}

#[test]
fn successful_paths_share_the_endpoint_and_step_contract() {
    let registry = registry();
    let maze = mpb_maze::generate(6, 6, 11, mpb_maze::MazeAlgorithm::Backtracker).unwrap();
    let (grid, start, goal) = mpb_maze::occupancy_from_maze(&maze).unwrap();
    for name in registry.names() {
        let result = registry.run(&name, &grid, start, goal).unwrap();
        assert_eq!(result.status, PlannerStatus::Success, "{name}");
        assert_eq!(result.path.first(), Some(&start), "{name}");
        assert_eq!(result.path.last(), Some(&goal), "{name}");
        for cell in &result.path {
            assert!(grid.is_free(*cell), "{name} walked through a wall at {cell}");
        }
        if name != "theta_star" {
            for pair in result.path.windows(2) {
                let (ar, ac) = pair[0].signed();
                let (br, bc) = pair[1].signed();
                assert_eq!(
                    (ar - br).abs() + (ac - bc).abs(),
                    1,
                    "{name} produced a non-unit step"
                );
            }
        }
    }
}
