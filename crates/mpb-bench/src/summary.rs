//! Per-planner aggregation, the fixed ranking order, and the markdown table.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::trial::TrialResult;

/// Aggregated view of one planner across the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerSummary {
    /// Planner name.
    pub planner: String,
    /// Total trials.
    pub runs: usize,
    /// Trials with a validated path.
    pub successes: usize,
    /// `successes / runs`.
    pub success_rate: f64,
    /// Mean solve time over all trials, failures included.
    pub mean_solve_time_ms: f64,
    /// Mean validated path length over success trials.
    pub mean_path_length: Option<f64>,
    /// Mean expansions over success trials.
    pub mean_expansions: Option<f64>,
}

struct Tally {
    runs: usize,
    successes: usize,
    time_total: f64,
    length_total: u64,
    expansions_total: u64,
    solved: BTreeSet<usize>,
    time_by_maze: BTreeMap<usize, f64>,
}

impl Tally {
    fn new() -> Self {
        Self {
            runs: 0,
            successes: 0,
            time_total: 0.0,
            length_total: 0,
            expansions_total: 0,
            solved: BTreeSet::new(),
            time_by_maze: BTreeMap::new(),
        }
    }

    fn absorb(&mut self, trial: &TrialResult) {
        self.runs += 1;
        self.time_total += trial.solve_time_ms;
        if trial.success {
            self.successes += 1;
            self.length_total += trial.path_length.unwrap_or_default();
            self.expansions_total += trial.expansions;
            self.solved.insert(trial.maze_index);
            self.time_by_maze.insert(trial.maze_index, trial.solve_time_ms);
        }
    }

    fn success_rate(&self) -> f64 {
        if self.runs == 0 {
            0.0
        } else {
            self.successes as f64 / self.runs as f64
        }
    }

    fn mean_time(&self) -> f64 {
        if self.runs == 0 {
            0.0
        } else {
            self.time_total / self.runs as f64
        }
    }

    fn mean_expansions(&self) -> Option<f64> {
        if self.successes == 0 {
            None
        } else {
            Some(self.expansions_total as f64 / self.successes as f64)
        }
    }
}

fn tally_by_planner(trials: &[TrialResult]) -> BTreeMap<&str, Tally> {
    let mut tallies: BTreeMap<&str, Tally> = BTreeMap::new();
    for trial in trials {
        tallies
            .entry(trial.planner.as_str())
            .or_insert_with(Tally::new)
            .absorb(trial);
    }
    tallies
}

/// Aggregates trials into per-planner summaries sorted by planner name.
pub fn summarize(trials: &[TrialResult]) -> Vec<PlannerSummary> {
    tally_by_planner(trials)
        .into_iter()
        .map(|(planner, tally)| PlannerSummary {
            planner: planner.to_string(),
            runs: tally.runs,
            successes: tally.successes,
            success_rate: tally.success_rate(),
            mean_solve_time_ms: tally.mean_time(),
            mean_path_length: if tally.successes == 0 {
                None
            } else {
                Some(tally.length_total as f64 / tally.successes as f64)
            },
            mean_expansions: tally.mean_expansions(),
        })
        .collect()
}

/// Orders planners by the fixed ranking criteria.
///
/// Success rate descending, then mean solve time over the mazes every
/// ranked planner solved, then mean expansions on successes, then overall
/// mean solve time, then name. All ascending after the first.
pub fn rank_planners(trials: &[TrialResult]) -> Vec<String> {
    let tallies = tally_by_planner(trials);
    let mut common: Option<BTreeSet<usize>> = None;
    for tally in tallies.values() {
        common = Some(match common {
            None => tally.solved.clone(),
            Some(held) => held.intersection(&tally.solved).copied().collect(),
        });
    }
    let common = common.unwrap_or_default();

    let mut ranked: Vec<(String, f64, f64, f64, f64)> = tallies
        .into_iter()
        .map(|(planner, tally)| {
            let common_time = if common.is_empty() {
                f64::INFINITY
            } else {
                let total: f64 = common
                    .iter()
                    .filter_map(|maze| tally.time_by_maze.get(maze))
                    .sum();
                total / common.len() as f64
            };
            (
                planner.to_string(),
                tally.success_rate(),
                common_time,
                tally.mean_expansions().unwrap_or(f64::INFINITY),
                tally.mean_time(),
            )
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.1.total_cmp(&a.1)
            .then(a.2.total_cmp(&b.2))
            .then(a.3.total_cmp(&b.3))
            .then(a.4.total_cmp(&b.4))
            .then(a.0.cmp(&b.0))
    });
    ranked.into_iter().map(|(planner, ..)| planner).collect()
}

/// Renders the summary table, rows in ranking order.
pub fn render_summary(summaries: &[PlannerSummary], ranking: &[String]) -> String {
    let mut out = String::from("# Benchmark Summary\n\n");
    out.push_str("| Planner | Success Rate | Mean Solve Time (ms) | Mean Path Length | Mean Expansions |\n");
    out.push_str("|---|---|---|---|---|\n");
    for name in ranking {
        let Some(summary) = summaries.iter().find(|summary| &summary.planner == name) else {
            continue;
        };
        let path_length = summary
            .mean_path_length
            .map(|value| format!("{value:.1}"))
            .unwrap_or_else(|| "-".to_string());
        let expansions = summary
            .mean_expansions
            .map(|value| format!("{value:.1}"))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "| {} | {:.1}% | {:.3} | {} | {} |\n",
            summary.planner,
            summary.success_rate * 100.0,
            summary.mean_solve_time_ms,
            path_length,
            expansions,
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mpb_maze::MazeAlgorithm;

    fn trial(planner: &str, maze_index: usize, success: bool, time: f64, expansions: u64) -> TrialResult {
        TrialResult {
            planner: planner.to_string(),
            maze_index,
            maze_seed: maze_index as u64,
            width: 5,
            height: 5,
            algorithm: MazeAlgorithm::Backtracker,
            success,
            solve_time_ms: time,
            path_length: success.then_some(10),
            expansions,
            error: None,
        }
    }

    #[test]
    fn success_rate_dominates_the_ranking() {
        let trials = vec![
            trial("slow_but_sure", 0, true, 9.0, 50),
            trial("slow_but_sure", 1, true, 9.0, 50),
            trial("fast_but_flaky", 0, true, 1.0, 10),
            trial("fast_but_flaky", 1, false, 1.0, 10),
        ];
        assert_eq!(
            rank_planners(&trials),
            vec!["slow_but_sure".to_string(), "fast_but_flaky".to_string()]
        );
    }

    #[test]
    fn common_maze_time_breaks_rate_ties() {
        let trials = vec![
            trial("lean", 0, true, 1.0, 10),
            trial("lean", 1, true, 1.0, 10),
            trial("heavy", 0, true, 5.0, 10),
            trial("heavy", 1, true, 5.0, 10),
        ];
        assert_eq!(rank_planners(&trials), vec!["lean".to_string(), "heavy".to_string()]);
    }

    #[test]
    fn names_settle_exact_ties() {
        let trials = vec![
            trial("b_planner", 0, true, 1.0, 10),
            trial("a_planner", 0, true, 1.0, 10),
        ];
        assert_eq!(
            rank_planners(&trials),
            vec!["a_planner".to_string(), "b_planner".to_string()]
        );
    }

    #[test]
    fn summaries_split_overall_and_success_only_means() {
        let trials = vec![
            trial("astar", 0, true, 2.0, 30),
            trial("astar", 1, false, 4.0, 90),
        ];
        let summaries = summarize(&trials);
        assert_eq!(summaries.len(), 1);
        let summary = &summaries[0];
        assert_eq!(summary.runs, 2);
        assert_eq!(summary.successes, 1);
        assert_eq!(summary.success_rate, 0.5);
        assert_eq!(summary.mean_solve_time_ms, 3.0);
        assert_eq!(summary.mean_path_length, Some(10.0));
        assert_eq!(summary.mean_expansions, Some(30.0));
    }

    #[test]
    fn the_table_header_is_pinned() {
        let trials = vec![trial("astar", 0, true, 2.0, 30)];
        let summaries = summarize(&trials);
        let ranking = rank_planners(&trials);
        let markdown = render_summary(&summaries, &ranking);
        assert!(markdown.contains("| Planner | Success Rate | Mean Solve Time (ms) | Mean Path Length | Mean Expansions |"));
        assert!(markdown.contains("| astar | 100.0% | 2.000 | 10.0 | 30.0 |"));
    }
}
