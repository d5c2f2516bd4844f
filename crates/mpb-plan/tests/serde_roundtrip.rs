use mpb_core::Cell;
use mpb_maze::{generate, occupancy_from_maze, MazeAlgorithm};
use mpb_plan::{fringe_search, PlannerResult, PlannerStatus};

#[test]
fn planner_results_round_trip_json() {
    let maze = generate(5, 5, 3, MazeAlgorithm::Prim).unwrap();
    let (grid, start, goal) = occupancy_from_maze(&maze).unwrap();
    let result = fringe_search(&grid, start, goal).expect("planner run");
    assert_eq!(result.status, PlannerStatus::Success);

    let json = serde_json::to_string_pretty(&result).expect("serialize");
    let decoded: PlannerResult = serde_json::from_str(&json).expect("deserialize");

    assert_eq!(decoded, result);
    assert!(json.contains("\"threshold_history\""));
}

#[test]
fn rejections_keep_the_detail_and_drop_the_empty_sections() {
    let result = PlannerResult::invalid_input("goal is blocked", 0.02);
    let json = serde_json::to_string(&result).expect("serialize");
    assert!(json.contains("\"goal is blocked\""));
    assert!(!json.contains("extensions"));

    let decoded: PlannerResult = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded.error.as_deref(), Some("goal is blocked"));
    assert_eq!(decoded.path, Vec::<Cell>::new());
}
