//! Parallel dispatch of one iteration
//!
//! Every selected workload gets its own task; the iteration only reads
//! outputs back once all of them have terminated.

use futures::future::join_all;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, warn};

use super::seed::SeedSequence;
use crate::models::{
    IterationRecord, Seed, TaskRecord, WorkloadConfig, WorkloadId, WorkloadSelection,
};
use crate::output::{SinkLayout, SinkPair};
use crate::workloads::Workload;

/// A selected workload with its adapter and run configuration
#[derive(Clone)]
struct WorkloadSlot {
    adapter: Arc<dyn Workload>,
    config: WorkloadConfig,
}

/// A task ready to launch
struct Prepared {
    task: TaskRecord,
    target: PathBuf,
    sinks: SinkPair,
}

/// Launches all workloads of an iteration and joins them
pub struct Dispatcher {
    slots: BTreeMap<WorkloadId, WorkloadSlot>,
    sinks: SinkLayout,
    bins_dir: PathBuf,
}

impl Dispatcher {
    pub fn new(sinks: SinkLayout, bins_dir: impl Into<PathBuf>) -> Self {
        Self {
            slots: BTreeMap::new(),
            sinks,
            bins_dir: bins_dir.into(),
        }
    }

    /// Select a workload. Selecting the same id again replaces it.
    pub fn with_workload(mut self, adapter: Arc<dyn Workload>, config: WorkloadConfig) -> Self {
        self.slots
            .insert(adapter.id(), WorkloadSlot { adapter, config });
        self
    }

    pub fn selection(&self) -> WorkloadSelection {
        self.slots.keys().copied().collect()
    }

    pub fn sinks(&self) -> &SinkLayout {
        &self.sinks
    }

    /// Run every selected workload once for `seed` and classify the outputs
    pub async fn run_iteration(&self, iteration: u32, seed: Seed) -> IterationRecord {
        let start = Instant::now();
        let mut record = IterationRecord::new(iteration, seed);
        let mut launched = Vec::new();
        let mut handles = Vec::new();

        for (id, slot) in &self.slots {
            let prepared = match self.prepare(*id, slot, iteration, seed).await {
                Ok(prepared) => prepared,
                Err(task) => {
                    record.tasks.push(task);
                    continue;
                }
            };

            let adapter = slot.adapter.clone();
            let Prepared {
                task,
                target,
                sinks,
            } = prepared;
            let workload = *id;

            let handle = tokio::spawn(async move {
                debug!("Starting {} with seed {}", workload, seed);
                if let Err(e) = adapter.run(seed, &target, &sinks).await {
                    warn!("{} (iteration {}): {}", workload, iteration, e);
                }
            });

            handles.push(handle);
            launched.push((slot, task));
        }

        // Barrier: nothing is read back until every task has terminated
        let joined = join_all(handles).await;

        for ((slot, mut task), outcome) in launched.into_iter().zip(joined) {
            if let Err(e) = outcome {
                error!("{} task did not finish cleanly: {}", task.workload, e);
            }

            let Some(stdout) = task.stdout_path.clone() else {
                record.tasks.push(task.failed("No output sink"));
                continue;
            };

            match slot.adapter.process_output(&stdout).await {
                Ok(passed) => task.passed = passed,
                Err(e) => {
                    error!("{}", e);
                    task = task.failed(e.to_string());
                }
            }
            record.tasks.push(task);
        }

        record.tasks.sort_by_key(|t| t.workload);

        debug!(
            "Iteration {} finished in {}ms: {}/{} passed",
            iteration,
            start.elapsed().as_millis(),
            record.passed(),
            record.tasks.len()
        );

        record
    }

    /// Pick the attribute, resolve the binary and create the sinks.
    /// Failures come back as an already-failed task.
    async fn prepare(
        &self,
        id: WorkloadId,
        slot: &WorkloadSlot,
        iteration: u32,
        seed: Seed,
    ) -> Result<Prepared, TaskRecord> {
        let attributes = &slot.config.attributes;
        let index = SeedSequence::pick(0, attributes.len(), seed).map_err(|e| {
            error!("{}: cannot pick an attribute: {}", id, e);
            TaskRecord::new(id, "-").failed(e.to_string())
        })?;
        let attribute = attributes[index].clone();

        let target = slot
            .config
            .resolve(&attribute, &self.bins_dir)
            .ok_or_else(|| {
                error!("{}: no binary configured for {}", id, attribute);
                TaskRecord::new(id, attribute.as_str())
                    .failed(format!("No binary configured for {attribute}"))
            })?;

        let sinks = self
            .sinks
            .create(seed, id, iteration)
            .await
            .map_err(|e| {
                error!("{}: {:#}", id, e);
                TaskRecord::new(id, attribute.as_str()).failed(format!("{e:#}"))
            })?;

        let task = TaskRecord::new(id, attribute)
            .with_sinks(sinks.stdout.clone(), sinks.stderr.clone());

        Ok(Prepared {
            task,
            target,
            sinks,
        })
    }
}
