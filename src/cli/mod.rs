//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::models::{Seed, WorkloadId};

/// Seeded regression runner for parallel workloads
#[derive(Parser, Debug)]
#[command(name = "workload-runner")]
#[command(version = "0.1.0")]
#[command(about = "Run workloads in parallel, iteration after iteration, from a replayable seed")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (default: first found in the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the selected workloads
    Run(RunArgs),

    /// List available workloads
    List(ListArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Arguments for run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Workloads to run (Workload_1, Workload_2)
    #[arg(
        short,
        long = "workload",
        required = true,
        num_args = 1..,
        value_parser = parse_workload
    )]
    pub workloads: Vec<WorkloadId>,

    /// Number of iterations
    #[arg(short, long, default_value = "1", conflicts_with = "time")]
    pub iteration: u32,

    /// Run for this many seconds instead of a fixed number of iterations
    #[arg(short, long, value_parser = parse_time)]
    pub time: Option<f64>,

    /// Start seed (random when omitted)
    #[arg(short, long)]
    pub seed: Option<Seed>,

    /// Root directory of the task output files, relative to the working directory
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Directory of the workload binaries. A relative path missing from the
    /// working directory is looked up next to the executable.
    #[arg(long)]
    pub bins_dir: Option<PathBuf>,

    /// Summary format (table, summary, json, json-pretty)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Only print the final summary
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Show attributes and resolved binaries. A relative bins_dir missing from
    /// the working directory is looked up next to the executable.
    #[arg(short, long)]
    pub detailed: bool,
}

/// Arguments for config management
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a configuration file with the defaults
    Init {
        /// Output file path (.yaml, .yml or .json)
        #[arg(default_value = "./workload-runner.yaml")]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show the effective configuration
    Show {
        /// Show environment variables instead
        #[arg(short, long)]
        env: bool,

        /// Output format (yaml, json)
        #[arg(short, long, default_value = "yaml")]
        format: String,
    },

    /// Validate a configuration file
    Validate {
        /// Configuration file (default: first found in the standard locations)
        file: Option<PathBuf>,
    },

    /// Show environment variable help
    Env,
}

fn parse_workload(s: &str) -> Result<WorkloadId, String> {
    WorkloadId::from_str(s).ok_or_else(|| {
        let valid: Vec<_> = WorkloadId::all().iter().map(|w| w.name()).collect();
        format!("unknown workload '{s}'. Valid: {}", valid.join(", "))
    })
}

fn parse_time(s: &str) -> Result<f64, String> {
    let secs: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(format!("time must be a finite, non-negative number of seconds, got {s}"));
    }
    Ok(secs)
}
