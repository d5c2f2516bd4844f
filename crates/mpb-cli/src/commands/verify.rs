use std::error::Error;
use std::path::PathBuf;

use clap::Args;

use mpb_bench::{read_snapshot_manifest, verify_snapshot};

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Benchmark results CSV
    #[arg(long)]
    pub csv: PathBuf,
    /// Snapshot manifest to check against
    #[arg(long)]
    pub manifest: PathBuf,
}

pub fn run(args: &VerifyArgs) -> Result<(), Box<dyn Error>> {
    let manifest = read_snapshot_manifest(&args.manifest)?;
    verify_snapshot(&args.csv, &manifest)?;
    println!("snapshot verified: {}", manifest.designated_snapshot);
    Ok(())
}
