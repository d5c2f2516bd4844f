//! The rayon path must agree with the sequential path row for row.

use mpb_bench::{run_benchmark, BenchmarkConfig, TrialResult};
use mpb_plan::PlannerRegistry;

fn strip_timing(mut trial: TrialResult) -> TrialResult {
    trial.solve_time_ms = 0.0;
    trial
}

#[test]
fn parallel_runs_merge_into_the_sequential_order() {
    let sequential_config = BenchmarkConfig {
        maze_count: 5,
        width: 6,
        height: 6,
        seed: 17,
        ..BenchmarkConfig::default()
    };
    let parallel_config = BenchmarkConfig {
        parallel: true,
        ..sequential_config.clone()
    };
    let registry = PlannerRegistry::standard();

    let sequential: Vec<_> = run_benchmark(&sequential_config, &registry)
        .unwrap()
        .into_iter()
        .map(strip_timing)
        .collect();
    let parallel: Vec<_> = run_benchmark(&parallel_config, &registry)
        .unwrap()
        .into_iter()
        .map(strip_timing)
        .collect();

    assert_eq!(sequential.len(), 60);
    assert_eq!(sequential, parallel);
}
