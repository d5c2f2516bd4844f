use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;

use mpb_bench::{
    rank_planners, render_summary, run_benchmark, snapshot_manifest, summarize, write_results_csv,
    write_snapshot_manifest, write_summary_markdown, BenchmarkConfig,
};
use mpb_plan::PlannerRegistry;

use super::write_json;

#[derive(Args, Debug)]
pub struct BenchArgs {
    /// Optional YAML benchmark configuration
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Output directory for benchmark artifacts
    #[arg(long)]
    pub out: PathBuf,
    /// Also write a snapshot manifest under this designation
    #[arg(long)]
    pub snapshot: Option<String>,
}

pub fn run(args: &BenchArgs) -> Result<(), Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => serde_yaml::from_str(&fs::read_to_string(path)?)?,
        None => BenchmarkConfig::default(),
    };
    let registry = PlannerRegistry::subset(&config.planners)?;
    let trials = run_benchmark(&config, &registry)?;

    fs::create_dir_all(&args.out)?;
    let csv_path = args.out.join("benchmark_results.csv");
    write_results_csv(&csv_path, &trials)?;

    let summaries = summarize(&trials);
    let ranking = rank_planners(&trials);
    write_json(args.out.join("planner_summaries.json"), &summaries)?;
    let markdown_path = args.out.join("benchmark_summary.md");
    write_summary_markdown(&markdown_path, &render_summary(&summaries, &ranking))?;

    println!("trials: {}", trials.len());
    println!("ranking: {}", ranking.join(" > "));
    println!("wrote {}", csv_path.display());
    println!("wrote {}", markdown_path.display());

    if let Some(designation) = &args.snapshot {
        let manifest = snapshot_manifest(&csv_path, designation)?;
        let manifest_path = args.out.join("snapshot_manifest.json");
        write_snapshot_manifest(&manifest_path, &manifest)?;
        println!("wrote {}", manifest_path.display());
    }
    Ok(())
}
