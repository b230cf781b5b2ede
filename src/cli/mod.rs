//! Command-line parsing for the bind-or-wait advisor.
//!
//! Only argument shapes live here; `app` owns dispatch and the engine never
//! sees clap types.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "fixrate", version, about = "Fixed-rate advisor: bind now or wait for the next window")]
pub struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Score a decision input JSON and print the recommendation.
    Advise(AdviseArgs),
    /// Run the engine on a synthetic, seeded scenario.
    Demo(DemoArgs),
    /// List the rate-setting windows around a date.
    Windows(WindowsArgs),
}

/// Options shared by commands that run a decision cycle.
#[derive(Debug, Args, Clone)]
pub struct EngineArgs {
    /// Loan amount in currency units (default: FIXRATE_LOAN_AMOUNT or 500000).
    #[arg(short = 'a', long)]
    pub loan_amount: Option<f64>,

    /// Engine constants override file (TOML). Falls back to FIXRATE_CONFIG.
    #[arg(long, value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Export the full decision (per-tenor audit trail included) to JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,

    /// Print the decision as JSON instead of the text report.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct AdviseArgs {
    /// Decision input JSON (snapshot, estimates or bank products, swap history).
    #[arg(short, long, value_name = "JSON")]
    pub input: PathBuf,

    #[command(flatten)]
    pub engine: EngineArgs,
}

#[derive(Debug, Args, Clone)]
pub struct DemoArgs {
    /// Random seed for scenario generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Expected next-rate move shared by all tenors (pp).
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub drift: f64,

    /// Per-tenor and per-quote noise (pp).
    #[arg(long, default_value_t = 0.10)]
    pub noise: f64,

    /// Days of synthetic swap history.
    #[arg(long, default_value_t = 90)]
    pub history_days: i64,

    #[command(flatten)]
    pub engine: EngineArgs,
}

#[derive(Debug, Args, Clone)]
pub struct WindowsArgs {
    /// Reference date (default: today).
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,
}
