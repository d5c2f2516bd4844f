//! End-to-end harness runs with pinned shapes and artifacts.

use std::fs;

use mpb_bench::{
    rank_planners, render_summary, run_benchmark, summarize, write_results_csv, BenchmarkConfig,
};
use mpb_plan::PlannerRegistry;

fn two_planner_registry() -> PlannerRegistry {
    let mut registry = PlannerRegistry::new();
    registry.insert("astar", Box::new(mpb_plan::astar));
    registry.insert("dijkstra", Box::new(mpb_plan::dijkstra));
    registry
}

#[test]
fn two_planners_three_mazes_make_six_validated_trials() {
    let config = BenchmarkConfig {
        maze_count: 3,
        width: 6,
        height: 6,
        seed: 11,
        planners: vec!["astar".to_string(), "dijkstra".to_string()],
        ..BenchmarkConfig::default()
    };
    let registry = two_planner_registry();
    let trials = run_benchmark(&config, &registry).unwrap();
    assert_eq!(trials.len(), 6);
    assert!(trials.iter().all(|trial| trial.success));
    assert!(trials.iter().all(|trial| trial.path_length.is_some()));

    let summaries = summarize(&trials);
    assert_eq!(summaries.len(), 2);
    assert!(summaries.iter().all(|summary| summary.runs == 3));
    assert!(summaries.iter().all(|summary| summary.success_rate == 1.0));

    // Both planners are optimal, so the validated lengths must agree per maze.
    for maze_index in 0..3 {
        let lengths: Vec<_> = trials
            .iter()
            .filter(|trial| trial.maze_index == maze_index)
            .map(|trial| trial.path_length)
            .collect();
        assert_eq!(lengths[0], lengths[1], "maze {maze_index}");
    }

    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("benchmark_results.csv");
    write_results_csv(&csv_path, &trials).unwrap();
    let csv = fs::read_to_string(&csv_path).unwrap();
    assert!(csv.contains("solve_time_ms"));
    assert!(csv.contains("algorithm"));
    assert!(!csv.contains("success_rate"));

    let markdown = render_summary(&summaries, &rank_planners(&trials));
    assert!(markdown.contains("| Planner | Success Rate |"));
}

#[test]
fn the_default_config_demands_the_full_registry() {
    let config = BenchmarkConfig::default();
    let registry = two_planner_registry();
    let err = run_benchmark(&config, &registry).unwrap_err();
    assert_eq!(err.info().code, "bench-planner-set");
    assert!(err.info().message.contains("missing:"));
}

#[test]
fn the_full_registry_survives_a_small_batch() {
    let config = BenchmarkConfig {
        maze_count: 2,
        width: 5,
        height: 5,
        seed: 3,
        ..BenchmarkConfig::default()
    };
    let registry = PlannerRegistry::standard();
    let trials = run_benchmark(&config, &registry).unwrap();
    assert_eq!(trials.len(), 24);
    // Every planner must solve a perfect maze; beam search keeps enough
    // width for corridor grids of this size.
    for trial in &trials {
        assert!(trial.success, "{} failed maze {}", trial.planner, trial.maze_index);
    }
}
