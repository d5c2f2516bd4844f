use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;

use mpb_bench::{read_results_csv, read_snapshot_manifest, verify_snapshot};
use mpb_stat::{
    pair_deltas, run_inference, write_comparison_csv, write_latex_table, StatsConfig,
};

#[derive(Args, Debug)]
pub struct InferArgs {
    /// Benchmark results CSV
    #[arg(long)]
    pub input: PathBuf,
    /// Optional snapshot manifest checked before reading the CSV
    #[arg(long)]
    pub manifest: Option<PathBuf>,
    /// Output directory for the comparison artifacts
    #[arg(long)]
    pub out: PathBuf,
    /// Baseline planner name
    #[arg(long, default_value = "weighted_astar")]
    pub baseline: String,
    /// Bootstrap seed
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
    /// Bootstrap resample count
    #[arg(long, default_value_t = 40_000)]
    pub resamples: usize,
    /// Expected total planner count, baseline included
    #[arg(long)]
    pub expect_planners: Option<usize>,
}

pub fn run(args: &InferArgs) -> Result<(), Box<dyn Error>> {
    if let Some(manifest_path) = &args.manifest {
        let manifest = read_snapshot_manifest(manifest_path)?;
        verify_snapshot(&args.input, &manifest)?;
        println!("snapshot checked: {}", manifest.designated_snapshot);
    }

    let trials = read_results_csv(&args.input)?;
    let config = StatsConfig {
        baseline: args.baseline.clone(),
        seed: args.seed,
        n_resamples: args.resamples,
        expected_planners: args.expect_planners,
    };
    let rows = run_inference(&trials, &config)?;
    // Paired maze count for the table caption.
    let n_mazes = pair_deltas(&trials, &config.baseline)?
        .first()
        .map(|pair| pair.deltas.len())
        .unwrap_or(0);

    fs::create_dir_all(&args.out)?;
    let csv_path = args.out.join("inferential_comparison.csv");
    write_comparison_csv(&csv_path, &rows)?;
    let tex_path = args.out.join("inferential_tables.tex");
    write_latex_table(&tex_path, &rows, &config.baseline, n_mazes, config.n_resamples)?;

    println!("comparators: {}", rows.len());
    println!("wrote {}", csv_path.display());
    println!("wrote {}", tex_path.display());
    Ok(())
}
