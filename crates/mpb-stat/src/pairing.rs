//! Pairing solve times against the baseline, with the input sanity gates.

use std::collections::{BTreeMap, BTreeSet};

use mpb_bench::TrialResult;
use mpb_core::{ErrorInfo, MpbError};

/// Per-comparator paired solve-time deltas.
#[derive(Debug, Clone, PartialEq)]
pub struct PairedDeltas {
    /// Comparator planner name.
    pub planner: String,
    /// `comparator_time - baseline_time` per shared maze, in maze order.
    pub deltas: Vec<f64>,
}

fn success_times(trials: &[TrialResult]) -> BTreeMap<&str, BTreeMap<usize, f64>> {
    let mut times: BTreeMap<&str, BTreeMap<usize, f64>> = BTreeMap::new();
    for trial in trials {
        let per_maze = times.entry(trial.planner.as_str()).or_default();
        if trial.success {
            per_maze.insert(trial.maze_index, trial.solve_time_ms);
        }
    }
    times
}

/// Pairs every comparator against the baseline over shared solved mazes.
///
/// Comparators come back in sorted-name order. Gates, all fatal: the
/// baseline must appear in the data, at least one comparator must exist,
/// every comparator must carry the same paired count, and that count must
/// be positive.
pub fn pair_deltas(
    trials: &[TrialResult],
    baseline: &str,
) -> Result<Vec<PairedDeltas>, MpbError> {
    let times = success_times(trials);
    let Some(baseline_times) = times.get(baseline) else {
        return Err(MpbError::Stats(
            ErrorInfo::new(
                "stats-baseline",
                format!("baseline planner '{baseline}' has no rows in the results"),
            )
            .with_context("baseline", baseline),
        ));
    };
    let baseline_solved: BTreeSet<usize> = baseline_times.keys().copied().collect();

    let mut paired = Vec::new();
    for (&planner, per_maze) in &times {
        if planner == baseline {
            continue;
        }
        let solved: BTreeSet<usize> = per_maze.keys().copied().collect();
        let deltas: Vec<f64> = baseline_solved
            .intersection(&solved)
            .map(|maze| per_maze[maze] - baseline_times[maze])
            .collect();
        paired.push(PairedDeltas {
            planner: planner.to_string(),
            deltas,
        });
    }

    if paired.is_empty() {
        return Err(MpbError::Stats(ErrorInfo::new(
            "stats-comparators",
            "no comparator planners besides the baseline",
        )));
    }

    let min = paired.iter().map(|pair| pair.deltas.len()).min().unwrap_or(0);
    let max = paired.iter().map(|pair| pair.deltas.len()).max().unwrap_or(0);
    if min != max {
        let unequal: Vec<String> = paired
            .iter()
            .map(|pair| format!("{} ({})", pair.planner, pair.deltas.len()))
            .collect();
        return Err(MpbError::Stats(
            ErrorInfo::new(
                "stats-unbalanced",
                format!("paired maze counts differ across comparators: {}", unequal.join(", ")),
            )
            .with_hint("every comparator must share the same solved mazes with the baseline"),
        ));
    }
    if min == 0 {
        return Err(MpbError::Stats(ErrorInfo::new(
            "stats-empty",
            "no maze was solved by both the baseline and the comparators",
        )));
    }
    Ok(paired)
}

/// Checks the total planner count when the caller knows what to expect.
pub fn ensure_planner_count(
    paired: &[PairedDeltas],
    expected_total: usize,
) -> Result<(), MpbError> {
    let actual = paired.len() + 1;
    if actual != expected_total {
        return Err(MpbError::Stats(
            ErrorInfo::new(
                "stats-count",
                format!("expected {expected_total} planners in the results, found {actual}"),
            )
            .with_context("expected", expected_total.to_string())
            .with_context("actual", actual.to_string()),
        ));
    }
    Ok(())
}
