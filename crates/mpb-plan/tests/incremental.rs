//! Incremental replanning stays consistent with from-scratch searches.

use mpb_core::{Cell, OccupancyGrid};
use mpb_maze::{generate, occupancy_from_maze, MazeAlgorithm};
use mpb_plan::{astar, IncrementalPlanner, MetricValue, PlannerStatus};

#[test]
fn a_sequence_of_edits_tracks_the_from_scratch_cost() {
    let grid = OccupancyGrid::new_free(9, 9).unwrap();
    let start = Cell::new(0, 0);
    let goal = Cell::new(8, 8);
    let mut planner = IncrementalPlanner::new(&grid, start, goal);

    let mut current = grid;
    planner.replan(&current).unwrap();

    let edits: [(Cell, bool); 4] = [
        (Cell::new(4, 4), true),
        (Cell::new(4, 5), true),
        (Cell::new(5, 4), true),
        (Cell::new(4, 4), false),
    ];
    for (step, (cell, blocked)) in edits.into_iter().enumerate() {
        current.set_blocked(cell, blocked);
        let incremental = planner.replan(&current).unwrap();
        let fresh = astar(&current, start, goal).unwrap();
        assert_eq!(incremental.status, fresh.status, "edit {step}");
        assert_eq!(incremental.path_cost, fresh.path_cost, "edit {step}");
        assert_eq!(
            incremental.extensions.get("reused_tree"),
            Some(&MetricValue::Flag(true)),
            "edit {step}"
        );
    }
}

#[test]
fn corridor_grids_replan_after_a_wall_toggle() {
    let maze = generate(6, 6, 29, MazeAlgorithm::Backtracker).unwrap();
    let (grid, start, goal) = occupancy_from_maze(&maze).unwrap();
    let mut planner = IncrementalPlanner::new(&grid, start, goal);
    let first = planner.replan(&grid).unwrap();
    assert_eq!(first.status, PlannerStatus::Success);

    // Opening a wall can only shorten the corridor distance.
    let mut opened = grid.clone();
    let mut toggled = None;
    'scan: for cell in grid.cells() {
        let (row, col) = (cell.row, cell.col);
        if row % 2 == 1 && col % 2 == 0 && col > 0 && col + 1 < grid.cols() && grid.is_blocked(cell)
        {
            opened.set_blocked(cell, false);
            toggled = Some(cell);
            break 'scan;
        }
    }
    let toggled = toggled.expect("a perfect maze always keeps interior walls");

    let second = planner.replan(&opened).unwrap();
    let fresh = astar(&opened, start, goal).unwrap();
    assert_eq!(second.path_cost, fresh.path_cost, "toggled {toggled}");
    assert!(second.path_cost <= first.path_cost);
}

#[test]
fn a_resize_forces_a_full_reset() {
    let small = OccupancyGrid::new_free(4, 4).unwrap();
    let start = Cell::new(0, 0);
    let goal = Cell::new(3, 3);
    let mut planner = IncrementalPlanner::new(&small, start, goal);
    planner.replan(&small).unwrap();

    let large = OccupancyGrid::new_free(6, 6).unwrap();
    let result = planner.replan(&large).unwrap();
    assert_eq!(result.extensions.get("full_reset"), Some(&MetricValue::Flag(true)));
    assert_eq!(result.extensions.get("reused_tree"), Some(&MetricValue::Flag(false)));
    assert_eq!(result.path_cost, Some(6.0));
}
