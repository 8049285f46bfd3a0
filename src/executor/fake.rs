//! In-process workload used by the executor tests

use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::models::{Seed, WorkloadId};
use crate::output::SinkPair;
use crate::workloads::{Workload, WorkloadError};

#[derive(Clone, Copy, Debug)]
pub enum Behavior {
    Pass,
    Fail,
    /// Sleep this many milliseconds, then pass
    SleepThenPass(u64),
    /// Pass, then remove the stdout sink
    DeleteOutput,
    Panic,
}

pub struct FakeWorkload {
    id: WorkloadId,
    behavior: Behavior,
    runs: Arc<AtomicUsize>,
}

impl FakeWorkload {
    pub fn new(id: WorkloadId, behavior: Behavior) -> Self {
        Self {
            id,
            behavior,
            runs: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn arc(id: WorkloadId, behavior: Behavior) -> Arc<dyn Workload> {
        Arc::new(Self::new(id, behavior))
    }

    /// Shared counter of `run` calls
    pub fn runs(&self) -> Arc<AtomicUsize> {
        self.runs.clone()
    }
}

#[async_trait]
impl Workload for FakeWorkload {
    fn id(&self) -> WorkloadId {
        self.id
    }

    async fn run(&self, seed: Seed, _target: &Path, sinks: &SinkPair) -> Result<(), WorkloadError> {
        self.runs.fetch_add(1, Ordering::SeqCst);

        let verdict = match self.behavior {
            Behavior::Pass | Behavior::DeleteOutput => "PASS",
            Behavior::Fail => "FAIL",
            Behavior::SleepThenPass(ms) => {
                tokio::time::sleep(Duration::from_millis(ms)).await;
                "PASS"
            }
            Behavior::Panic => panic!("workload crashed"),
        };

        let content = format!("seed {seed}\n{verdict}\n");
        tokio::fs::write(&sinks.stdout, content)
            .await
            .map_err(|source| WorkloadError::SinkOpen {
                path: sinks.stdout.clone(),
                source,
            })?;

        if let Behavior::DeleteOutput = self.behavior {
            let _ = tokio::fs::remove_file(&sinks.stdout).await;
        }
        Ok(())
    }

    async fn process_output(&self, stdout: &Path) -> Result<bool, WorkloadError> {
        let content = crate::workloads::read_output(stdout).await?;
        Ok(content.lines().any(|l| l == "PASS"))
    }
}
