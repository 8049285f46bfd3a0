//! Workload Runner - seeded regression runs of parallel workloads
//!
//! A CLI tool that launches every selected workload in parallel, waits for
//! all of them, classifies their output, and repeats from a deterministic
//! seed chain until an iteration count or a time budget is used up.
//!
//! ## Features
//!
//! - Replayable runs: every iteration seed is derived from the previous one
//! - Iteration-bound or time-bound runs
//! - Per-task stdout/stderr files grouped by seed
//! - Multiple summary formats (Table, Summary, JSON)
//!
//! ## Usage
//!
//! ```bash
//! # Run both workloads for 10 iterations from a fixed seed
//! workload-runner run -w Workload_1 Workload_2 -i 10 -s 123
//!
//! # Run for two minutes from a random seed
//! workload-runner run -w Workload_2 -t 120
//!
//! # List available workloads
//! workload-runner list --detailed
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

mod cli;
mod config;
mod executor;
mod models;
mod output;
mod utils;
mod workloads;

use cli::Args;
use config::{AppConfig, EnvConfig};
use executor::{Dispatcher, IterationController};
use models::{RunMode, Seed, WorkloadId, WorkloadSelection};
use output::{Color, Console, SinkLayout};
use utils::logger::{init_logger, LogLevel};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let env = EnvConfig::load();

    let config_path = args.config.clone().or_else(|| env.config_file.clone());
    let (mut config, source) = config::load_or_default(config_path.as_deref())?;
    config.apply_env(&env);

    let level = LogLevel::resolve(
        args.verbose,
        args.log_level
            .as_deref()
            .into_iter()
            .chain([config.log_level.as_str()]),
    );
    init_logger(level);

    if let Some(path) = &source {
        debug!("Using configuration file {}", path.display());
    }

    match args.command {
        cli::Command::Run(run_args) => {
            let all_passed = run_workloads(run_args, config, env.seed).await?;
            if !all_passed {
                std::process::exit(1);
            }
        }
        cli::Command::List(list_args) => {
            list_workloads(list_args, &config);
        }
        cli::Command::Config(config_args) => {
            manage_config(config_args, config, &env)?;
        }
    }

    Ok(())
}

async fn run_workloads(
    args: cli::RunArgs,
    mut config: AppConfig,
    env_seed: Option<Seed>,
) -> Result<bool> {
    if let Some(dir) = args.log_dir {
        config.log_dir = dir;
    }
    if let Some(dir) = args.bins_dir {
        config.bins_dir = dir;
    }
    if let Some(format) = args.format {
        config.format = format;
    }
    if args.no_color {
        config.colorize = false;
    }
    config.validate().context("Invalid configuration")?;

    let mode = match args.time {
        Some(secs) => RunMode::TimeBound(
            Duration::try_from_secs_f64(secs).context("Invalid time budget")?,
        ),
        None => RunMode::IterationBound(args.iteration),
    };
    let seed = args.seed.or(env_seed);
    let selection: WorkloadSelection = args.workloads.into_iter().collect();

    info!(
        "Selected {} workload(s), {}, logs under {}",
        selection.len(),
        mode,
        config.log_dir.display()
    );

    let dispatcher = selection.iter().fold(
        Dispatcher::new(SinkLayout::new(&config.log_dir), config.bins_root()),
        |dispatcher, id| dispatcher.with_workload(workloads::adapter_for(*id), config.workload(*id)),
    );

    let console = Console::new(config.formatter()).quiet(args.quiet);

    let report = IterationController::new(dispatcher, config.seed_sequence()?, mode)
        .with_seed(seed)
        .with_console(console)
        .run()
        .await?;

    info!(
        "Start seed {} ({} iteration seeds recorded)",
        report.start_seed,
        report.seeds.len()
    );

    Ok(report.summary.is_all_passed())
}

fn list_workloads(args: cli::ListArgs, config: &AppConfig) {
    let formatter = config.formatter();

    println!("\nAvailable Workloads\n");
    println!("{}", formatter.separator());

    let bins_root = config.bins_root();
    if args.detailed {
        println!("  Binaries under {}\n", bins_root.display());
    }

    for id in WorkloadId::all() {
        println!(
            "  {:12} {}",
            formatter.paint(id.name(), Color::Cyan),
            id.description()
        );

        if args.detailed {
            let workload = config.workload(id);
            for attribute in &workload.attributes {
                let binary = match workload.resolve(attribute, &bins_root) {
                    Some(path) if path.exists() => path.display().to_string(),
                    Some(path) => formatter.paint(&format!("{} (missing)", path.display()), Color::Red),
                    None => formatter.paint("no binary configured", Color::Red),
                };
                println!("      {attribute:10} -> {binary}");
            }
        }
    }

    println!("{}\n", formatter.separator());
}

fn manage_config(args: cli::ConfigArgs, effective: AppConfig, env: &EnvConfig) -> Result<()> {
    match args.action {
        cli::ConfigAction::Init { output, force } => {
            if output.exists() && !force {
                anyhow::bail!(
                    "Configuration file already exists: {}. Use --force to overwrite.",
                    output.display()
                );
            }

            AppConfig::default().save(&output)?;
            println!("✓ Configuration file created: {}", output.display());
            println!("\nEdit the file to customize your settings.");
        }

        cli::ConfigAction::Show { env: show_env, format } => {
            if show_env {
                if !env.has_any() {
                    println!("No WORKLOAD_RUNNER_* variables set.\n");
                }
                env.print_summary();
            } else {
                let output = if format == "json" {
                    serde_json::to_string_pretty(&effective)?
                } else {
                    serde_yaml::to_string(&effective)?
                };
                println!("{output}");
            }
        }

        cli::ConfigAction::Validate { file } => {
            let path = file
                .or_else(config::find)
                .unwrap_or_else(|| Path::new("./workload-runner.yaml").to_path_buf());

            match AppConfig::load(&path) {
                Ok(_) => {
                    println!("✓ Configuration file is valid: {}", path.display());
                }
                Err(e) => {
                    println!("✗ Configuration file is invalid: {}", path.display());
                    println!("  Error: {e:#}");
                    return Err(e);
                }
            }
        }

        cli::ConfigAction::Env => {
            config::print_env_help();
        }
    }

    Ok(())
}
