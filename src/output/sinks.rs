//! Output sink layout
//!
//! Each task writes its stdout and stderr into a pair of log files under
//! `<root>/<seed hash>/`. File names carry the workload, iteration and a
//! timestamp so concurrent tasks never share a file.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use tokio::fs::{self, OpenOptions};
use tracing::debug;

use crate::models::{Seed, WorkloadId};

/// Length of the hashed per-seed directory name
const SUBDIR_HASH_LEN: usize = 16;

/// Stdout/stderr locations of one task
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SinkPair {
    pub stdout: PathBuf,
    pub stderr: PathBuf,
}

/// Directory layout for task logs
#[derive(Clone, Debug)]
pub struct SinkLayout {
    root: PathBuf,
}

impl SinkLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the log root if it does not exist yet
    pub async fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("Failed to create log directory: {}", self.root.display()))
    }

    /// Directory holding every sink of a seed
    pub fn seed_dir(&self, seed: Seed) -> PathBuf {
        self.root.join(subdir_name(seed))
    }

    /// Create the directory and empty sink files for one task
    pub async fn create(&self, seed: Seed, workload: WorkloadId, iteration: u32) -> Result<SinkPair> {
        let dir = self.seed_dir(seed);
        fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

        let (out_name, err_name) = file_names(workload, iteration, Local::now());
        let pair = SinkPair {
            stdout: dir.join(out_name),
            stderr: dir.join(err_name),
        };

        for path in [&pair.stdout, &pair.stderr] {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .await
                .with_context(|| format!("Failed to create log file: {}", path.display()))?;
        }

        debug!(
            "Sinks for {} iteration {}: {}",
            workload,
            iteration,
            pair.stdout.display()
        );
        Ok(pair)
    }
}

/// Hashed directory name for a seed
pub fn subdir_name(seed: Seed) -> String {
    let digest = match u16::try_from(seed) {
        Ok(short) => Sha256::digest(short.to_be_bytes()),
        Err(_) => Sha256::digest(seed.to_be_bytes()),
    };
    let mut name = hex::encode(digest);
    name.truncate(SUBDIR_HASH_LEN);
    name
}

/// Stdout and stderr file names for a task started at `now`
pub fn file_names(workload: WorkloadId, iteration: u32, now: DateTime<Local>) -> (String, String) {
    let stem = format!(
        "{}_{}_{}",
        workload.name().to_lowercase(),
        iteration,
        now.format("%m%d%Y_%H%M%S")
    );
    (format!("{stem}.out"), format!("{stem}.err"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    #[test]
    fn test_subdir_name() {
        let name = subdir_name(123);
        assert_eq!(name.len(), SUBDIR_HASH_LEN);
        assert!(name.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(name, subdir_name(123));
        assert_ne!(name, subdir_name(124));
        assert_eq!(subdir_name(70_000).len(), SUBDIR_HASH_LEN);
    }

    #[test]
    fn test_file_names() {
        let now = Local.with_ymd_and_hms(2025, 4, 10, 14, 16, 38).unwrap();
        let (out, err) = file_names(WorkloadId::Workload1, 3, now);
        assert_eq!(out, "workload_1_3_04102025_141638.out");
        assert_eq!(err, "workload_1_3_04102025_141638.err");
    }

    #[tokio::test]
    async fn test_create_sinks() {
        let dir = tempdir().unwrap();
        let layout = SinkLayout::new(dir.path().join("logs"));
        layout.ensure_root().await.unwrap();

        let pair = layout.create(123, WorkloadId::Workload2, 1).await.unwrap();
        assert!(pair.stdout.exists());
        assert!(pair.stderr.exists());
        assert!(pair.stdout.starts_with(layout.seed_dir(123)));
        assert_eq!(std::fs::read_to_string(&pair.stdout).unwrap(), "");
    }

    #[tokio::test]
    async fn test_sinks_distinct_per_workload() {
        let dir = tempdir().unwrap();
        let layout = SinkLayout::new(dir.path());

        let a = layout.create(500, WorkloadId::Workload1, 1).await.unwrap();
        let b = layout.create(500, WorkloadId::Workload2, 1).await.unwrap();
        let c = layout.create(500, WorkloadId::Workload1, 2).await.unwrap();

        assert_ne!(a.stdout, b.stdout);
        assert_ne!(a.stdout, c.stdout);
        assert_ne!(a.stderr, a.stdout);
    }
}
