use std::error::Error;

use clap::{Parser, Subcommand};

use commands::{
    bench::{self, BenchArgs},
    generate::{self, GenerateArgs},
    infer::{self, InferArgs},
    plan::{self, PlanArgs},
    verify::{self, VerifyArgs},
};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "mpb", about = "Maze planner benchmark CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a maze and its occupancy grid as JSON artifacts.
    Generate(GenerateArgs),
    /// Run a single planner on a generated maze and emit the result JSON.
    Plan(PlanArgs),
    /// Run the benchmark harness and write its artifacts.
    Bench(BenchArgs),
    /// Compute inferential statistics over a benchmark results CSV.
    Infer(InferArgs),
    /// Check a results CSV against its snapshot manifest.
    Verify(VerifyArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    match cli.command {
        Command::Generate(args) => generate::run(&args),
        Command::Plan(args) => plan::run(&args),
        Command::Bench(args) => bench::run(&args),
        Command::Infer(args) => infer::run(&args),
        Command::Verify(args) => verify::run(&args),
    }
}
