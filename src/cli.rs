use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// First-order solver for linear rational-expectations models.
#[derive(Parser)]
#[command(
    name = "lre",
    version,
    about = "First-order solver for linear rational-expectations models"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Compute the first-order decision rule of a model.
    Solve(SolveArgs),
    /// Solve a model and report its stationary moments.
    Moments(MomentsArgs),
}

/// Arguments for the `solve` subcommand.
#[derive(clap::Args)]
pub struct SolveArgs {
    /// Path to TOML model file.
    #[arg(short, long)]
    pub model: PathBuf,

    /// Override the algorithm from the model file (gs or cr).
    #[arg(short, long)]
    pub algorithm: Option<String>,

    /// Write JSON here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `moments` subcommand.
#[derive(clap::Args)]
pub struct MomentsArgs {
    /// Path to TOML model file.
    #[arg(short, long)]
    pub model: PathBuf,

    /// Override the algorithm from the model file (gs or cr).
    #[arg(short, long)]
    pub algorithm: Option<String>,

    /// Override the number of autocorrelation lags from the model file.
    #[arg(short = 'l', long)]
    pub max_lag: Option<usize>,

    /// Write JSON here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
