use std::path::PathBuf;

use accord_merge::{MergeStrategy, TieBreak};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "accord",
    about = "Accord — sibling resolution and patch safety for leaderless document stores",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum StrategyArg {
    ScalarWins,
    SetUnion,
}

impl From<StrategyArg> for MergeStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::ScalarWins => MergeStrategy::ScalarWins,
            StrategyArg::SetUnion => MergeStrategy::SetUnion,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum TieBreakArg {
    Arrival,
    ContentDigest,
}

impl From<TieBreakArg> for TieBreak {
    fn from(arg: TieBreakArg) -> Self {
        match arg {
            TieBreakArg::Arrival => TieBreak::Arrival,
            TieBreakArg::ContentDigest => TieBreak::ContentDigest,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Collapse a JSON array of timestamped siblings into one document
    Resolve(ResolveArgs),
    /// Dry-run the add guard for a patch against a document
    Check(CheckArgs),
    /// Apply a patch to a document and print the result
    Apply(ApplyArgs),
}

#[derive(Args)]
pub struct ResolveArgs {
    /// JSON file holding `[{"document": ..., "timestamp": ...}, ...]`
    pub siblings: PathBuf,
    #[arg(long)]
    pub strategy: Option<StrategyArg>,
    #[arg(long)]
    pub tie_break: Option<TieBreakArg>,
    /// TOML resolver configuration
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Record type to look up in the configuration
    #[arg(long, requires = "config")]
    pub record_type: Option<String>,
}

#[derive(Args)]
pub struct CheckArgs {
    pub document: PathBuf,
    pub patch: PathBuf,
}

#[derive(Args)]
pub struct ApplyArgs {
    pub document: PathBuf,
    pub patch: PathBuf,
    /// Skip the add guard
    #[arg(long)]
    pub unguarded: bool,
}
