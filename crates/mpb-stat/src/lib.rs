#![deny(missing_docs)]

//! Inferential comparison of planner solve times.
//!
//! Pairs per-maze solve times against a baseline planner, builds
//! percentile bootstrap intervals for the median delta, runs the exact
//! two-sided sign test, applies the Holm correction across comparators,
//! and writes the comparison CSV and LaTeX table. Given the same trials
//! and config, the outputs are byte-identical across runs.

pub mod inference;
pub mod pairing;
pub mod report;
pub mod resample;

pub use inference::{holm_adjust, run_inference, sign_test_two_sided, ComparisonRow, StatsConfig};
pub use pairing::{ensure_planner_count, pair_deltas, PairedDeltas};
pub use report::{
    planner_display_name, write_comparison_csv, write_latex_table, COMPARISON_COLUMNS,
};
pub use resample::{bootstrap_median_ci, median, percentile};
