#![deny(missing_docs)]
#![doc = "Benchmark harness: rotated planner trials over seeded maze batches, independent path validation, ranking, and CSV/markdown/manifest artifacts."]

pub mod artifacts;
pub mod config;
pub mod run;
pub mod summary;
pub mod trial;
pub mod validate;

pub use artifacts::{
    read_results_csv, read_snapshot_manifest, sha256_file, snapshot_manifest, verify_snapshot,
    write_results_csv, write_snapshot_manifest, write_summary_markdown, SnapshotManifest,
    CSV_COLUMNS,
};
pub use config::BenchmarkConfig;
pub use run::{ensure_planner_set, run_benchmark};
pub use summary::{rank_planners, render_summary, summarize, PlannerSummary};
pub use trial::{run_trial, TrialContext, TrialResult};
pub use validate::validate_claimed_path;
