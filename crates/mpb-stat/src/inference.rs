//! Exact sign test, Holm correction, and the comparison pipeline.

use serde::{Deserialize, Serialize};

use mpb_bench::TrialResult;
use mpb_core::{derive_substream_seed, ErrorInfo, MpbError, RngHandle};

use crate::pairing::{ensure_planner_count, pair_deltas};
use crate::resample::{bootstrap_median_ci, median};

/// Substream tag keeping the bootstrap stream apart from maze seeding.
const BOOTSTRAP_SUBSTREAM: u64 = 3;

/// Inputs of the inferential comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Planner every comparator is paired against.
    #[serde(default = "StatsConfig::default_baseline")]
    pub baseline: String,
    /// Master seed for the bootstrap stream.
    #[serde(default = "StatsConfig::default_seed")]
    pub seed: u64,
    /// Bootstrap resamples per comparator.
    #[serde(default = "StatsConfig::default_n_resamples")]
    pub n_resamples: usize,
    /// Optional total planner count gate, baseline included.
    #[serde(default)]
    pub expected_planners: Option<usize>,
}

impl StatsConfig {
    fn default_baseline() -> String {
        "weighted_astar".to_string()
    }

    const fn default_seed() -> u64 {
        42
    }

    const fn default_n_resamples() -> usize {
        40_000
    }

    /// Rejects configurations the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), MpbError> {
        if self.baseline.is_empty() {
            return Err(MpbError::Stats(ErrorInfo::new(
                "stats-config",
                "baseline planner name must not be empty",
            )));
        }
        if self.n_resamples == 0 {
            return Err(MpbError::Stats(ErrorInfo::new(
                "stats-config",
                "n_resamples must be at least 1",
            )));
        }
        Ok(())
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            baseline: Self::default_baseline(),
            seed: Self::default_seed(),
            n_resamples: Self::default_n_resamples(),
            expected_planners: None,
        }
    }
}

/// One comparator's line of the inferential comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    /// Comparator planner name.
    pub planner: String,
    /// Median of the paired deltas, in milliseconds.
    pub median_delta_ms: f64,
    /// Lower end of the 95% bootstrap interval.
    pub ci95_low_ms: f64,
    /// Upper end of the 95% bootstrap interval.
    pub ci95_high_ms: f64,
    /// Mazes where the comparator was strictly slower.
    pub slower_count: usize,
    /// Mazes where the comparator was strictly faster.
    pub faster_count: usize,
    /// Raw two-sided exact sign-test p-value.
    pub sign_test_p_two_sided: f64,
    /// Holm-adjusted p-value across all comparators.
    pub holm_adjusted_p: f64,
    /// Resample count the interval was built from.
    pub bootstrap_resamples: usize,
    /// Baseline planner name, repeated per row for standalone CSVs.
    pub baseline_planner: String,
}

/// Exact two-sided sign test over paired deltas, ties excluded.
///
/// Returns `(slower, faster, p)` where slower counts strictly positive
/// deltas. The binomial tail is summed with incremental coefficients,
/// `term_0 = 0.5^n` and `term_i = term_{i-1} * (n - i + 1) / i`, so no
/// factorial or logarithm is needed. `p = 1` when every delta ties.
pub fn sign_test_two_sided(deltas: &[f64]) -> (usize, usize, f64) {
    let slower = deltas.iter().filter(|delta| **delta > 0.0).count();
    let faster = deltas.iter().filter(|delta| **delta < 0.0).count();
    let n = slower + faster;
    if n == 0 {
        return (slower, faster, 1.0);
    }
    let mut term = 0.5_f64.powi(n as i32);
    let mut tail = term;
    for i in 1..=slower.min(faster) {
        term *= (n - i + 1) as f64 / i as f64;
        tail += term;
    }
    (slower, faster, (2.0 * tail).min(1.0))
}

/// Holm-Bonferroni adjustment, returned in the input order.
///
/// Raw p-values are ranked ascending, scaled by `(m - rank + 1)`, clamped
/// to 1, and forced non-decreasing along the ranking with a running
/// maximum before scattering back.
pub fn holm_adjust(raw: &[f64]) -> Vec<f64> {
    let m = raw.len();
    let mut order: Vec<usize> = (0..m).collect();
    order.sort_by(|&a, &b| raw[a].total_cmp(&raw[b]));
    let mut adjusted = vec![0.0; m];
    let mut running_max = 0.0_f64;
    for (rank, &index) in order.iter().enumerate() {
        let scaled = (raw[index] * (m - rank) as f64).min(1.0);
        running_max = running_max.max(scaled);
        adjusted[index] = running_max;
    }
    adjusted
}

/// Runs the full pairing, bootstrap, sign-test, Holm pipeline.
///
/// Comparators are processed in sorted-name order over one shared RNG
/// stream, so the output is a pure function of the trials and the config.
pub fn run_inference(
    trials: &[TrialResult],
    config: &StatsConfig,
) -> Result<Vec<ComparisonRow>, MpbError> {
    config.validate()?;
    let paired = pair_deltas(trials, &config.baseline)?;
    if let Some(expected) = config.expected_planners {
        ensure_planner_count(&paired, expected)?;
    }

    let mut rng = RngHandle::from_seed(derive_substream_seed(config.seed, BOOTSTRAP_SUBSTREAM));
    let mut rows = Vec::with_capacity(paired.len());
    for pair in &paired {
        let (low, high) = bootstrap_median_ci(&pair.deltas, config.n_resamples, &mut rng);
        let (slower, faster, sign_p) = sign_test_two_sided(&pair.deltas);
        rows.push(ComparisonRow {
            planner: pair.planner.clone(),
            median_delta_ms: median(&pair.deltas),
            ci95_low_ms: low,
            ci95_high_ms: high,
            slower_count: slower,
            faster_count: faster,
            sign_test_p_two_sided: sign_p,
            holm_adjusted_p: 0.0,
            bootstrap_resamples: config.n_resamples,
            baseline_planner: config.baseline.clone(),
        });
    }

    let raw: Vec<f64> = rows.iter().map(|row| row.sign_test_p_two_sided).collect();
    for (row, adjusted) in rows.iter_mut().zip(holm_adjust(&raw)) {
        row.holm_adjusted_p = adjusted;
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_lopsided_sign_test_matches_the_closed_form() {
        let mut deltas = vec![0.1; 48];
        deltas.extend([-0.05; 2]);
        let (slower, faster, p) = sign_test_two_sided(&deltas);
        assert_eq!(slower, 48);
        assert_eq!(faster, 2);
        let choose = |n: u64, k: u64| -> f64 {
            (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
        };
        let expected =
            2.0 * (choose(50, 0) + choose(50, 1) + choose(50, 2)) * 0.5_f64.powi(50);
        assert!((p - expected).abs() < 1e-24);
    }

    #[test]
    fn ties_are_excluded_and_all_ties_give_p_one() {
        let (slower, faster, p) = sign_test_two_sided(&[0.0, 0.0, 1.0]);
        assert_eq!((slower, faster), (1, 0));
        assert_eq!(p, 1.0);

        let (slower, faster, p) = sign_test_two_sided(&[0.0; 4]);
        assert_eq!((slower, faster), (0, 0));
        assert_eq!(p, 1.0);
    }

    #[test]
    fn a_balanced_sample_is_insignificant() {
        let deltas = [1.0, -1.0, 2.0, -2.0];
        let (slower, faster, p) = sign_test_two_sided(&deltas);
        assert_eq!((slower, faster), (2, 2));
        // 2 * (C(4,0) + C(4,1) + C(4,2)) / 16 = 22/16, clamped.
        assert_eq!(p, 1.0);
    }

    #[test]
    fn holm_scales_ranks_and_keeps_monotonicity() {
        let adjusted = holm_adjust(&[0.01, 0.04, 0.03]);
        assert_eq!(adjusted, vec![0.03, 0.06, 0.06]);
    }

    #[test]
    fn holm_clamps_at_one() {
        let adjusted = holm_adjust(&[0.6, 0.7]);
        assert_eq!(adjusted, vec![1.0, 1.0]);
        assert!(holm_adjust(&[]).is_empty());
    }

    #[test]
    fn the_config_gates_bad_values_and_fills_defaults() {
        let config: StatsConfig = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(config, StatsConfig::default());
        assert_eq!(config.baseline, "weighted_astar");
        assert_eq!(config.seed, 42);
        assert_eq!(config.n_resamples, 40_000);
        assert!(config.validate().is_ok());

        let err = StatsConfig {
            n_resamples: 0,
            ..StatsConfig::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.info().code, "stats-config");

        let err = StatsConfig {
            baseline: String::new(),
            ..StatsConfig::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.info().code, "stats-config");
    }
}
