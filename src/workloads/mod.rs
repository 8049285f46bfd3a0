//! Workload adapters
//!
//! A workload knows how to launch its binary for a seed and how to decide,
//! from the captured stdout, whether that run passed.
//!
//! ## Workloads
//!
//! - `Workload_1` - number pick: the binary must echo a seeded number
//! - `Workload_2` - seed echo: the binary reports its own PASS/FAIL marker

mod number_pick;
mod seed_echo;

pub use number_pick::NumberPickWorkload;
pub use seed_echo::SeedEchoWorkload;

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use thiserror::Error;
use tokio::fs::OpenOptions;
use tokio::process::Command;
use tracing::debug;

use crate::models::{Seed, WorkloadId};
use crate::output::SinkPair;

/// Workload execution errors
#[derive(Error, Debug)]
pub enum WorkloadError {
    #[error("Failed to launch {}: {}", .bin.display(), .source)]
    Spawn {
        bin: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} exited with {}", .bin.display(), exit_label(.code))]
    Process { bin: PathBuf, code: Option<i32> },

    #[error("Failed to open sink {}: {}", .path.display(), .source)]
    SinkOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Couldn't read output file {}: {}", .path.display(), .source)]
    OutputUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

/// A workload the dispatcher can drive
#[async_trait]
pub trait Workload: Send + Sync {
    /// Which workload this adapter implements
    fn id(&self) -> WorkloadId;

    /// Run the binary at `target` for `seed`, writing into `sinks`
    async fn run(&self, seed: Seed, target: &Path, sinks: &SinkPair) -> Result<(), WorkloadError>;

    /// Classify a finished run from its stdout sink
    async fn process_output(&self, stdout: &Path) -> Result<bool, WorkloadError>;
}

/// Adapter for a workload id
pub fn adapter_for(id: WorkloadId) -> Arc<dyn Workload> {
    match id {
        WorkloadId::Workload1 => Arc::new(NumberPickWorkload::new()),
        WorkloadId::Workload2 => Arc::new(SeedEchoWorkload::new()),
    }
}

/// Run a shell script with its output appended to the sinks
pub(crate) async fn run_script(
    bin: &Path,
    args: &[String],
    sinks: &SinkPair,
) -> Result<(), WorkloadError> {
    let stdout = open_sink(&sinks.stdout).await?;
    let stderr = open_sink(&sinks.stderr).await?;

    debug!("Launching sh {} {}", bin.display(), args.join(" "));

    let status = Command::new("sh")
        .arg(bin)
        .args(args)
        .stdin(Stdio::null())
        .stdout(stdout)
        .stderr(stderr)
        .status()
        .await
        .map_err(|source| WorkloadError::Spawn {
            bin: bin.to_path_buf(),
            source,
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(WorkloadError::Process {
            bin: bin.to_path_buf(),
            code: status.code(),
        })
    }
}

/// Read a stdout sink back after the run. Invalid UTF-8 is replaced, not
/// rejected; only I/O failures are errors.
pub(crate) async fn read_output(path: &Path) -> Result<String, WorkloadError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| WorkloadError::OutputUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

async fn open_sink(path: &Path) -> Result<Stdio, WorkloadError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|source| WorkloadError::SinkOpen {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Stdio::from(file.into_std().await))
}
