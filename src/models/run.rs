//! Run models
//!
//! Seeds, run modes, per-iteration records and the running totals.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use super::WorkloadId;

/// Value driving every random choice of one iteration
pub type Seed = u32;

/// How the run decides when to stop
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RunMode {
    /// Run exactly this many iterations
    IterationBound(u32),
    /// Keep starting iterations while the budget allows it
    TimeBound(Duration),
}

impl RunMode {
    pub fn is_iter(&self) -> bool {
        matches!(self, RunMode::IterationBound(_))
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::IterationBound(count) => write!(f, "{count} iteration(s)"),
            RunMode::TimeBound(budget) => write!(f, "{:.2} seconds", budget.as_secs_f64()),
        }
    }
}

/// Flags derived once from the caller's input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunFlags {
    /// Iteration count drives termination instead of a time budget
    pub is_iter: bool,
    /// The start seed was drawn at random instead of supplied
    pub is_random: bool,
}

impl RunFlags {
    pub fn new(mode: &RunMode, seed: Option<Seed>) -> Self {
        Self {
            is_iter: mode.is_iter(),
            is_random: seed.is_none(),
        }
    }
}

/// Outcome of one workload in one iteration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TaskRecord {
    pub workload: WorkloadId,
    pub attribute: String,
    pub stdout_path: Option<PathBuf>,
    pub stderr_path: Option<PathBuf>,
    pub passed: bool,
    pub error: Option<String>,
}

impl TaskRecord {
    pub fn new(workload: WorkloadId, attribute: impl Into<String>) -> Self {
        Self {
            workload,
            attribute: attribute.into(),
            stdout_path: None,
            stderr_path: None,
            passed: false,
            error: None,
        }
    }

    pub fn with_sinks(mut self, stdout: PathBuf, stderr: PathBuf) -> Self {
        self.stdout_path = Some(stdout);
        self.stderr_path = Some(stderr);
        self
    }

    /// Mark the task failed with the reason it could not be classified
    pub fn failed(mut self, error: impl Into<String>) -> Self {
        self.passed = false;
        self.error = Some(error.into());
        self
    }
}

/// Everything that happened in one iteration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IterationRecord {
    pub iteration: u32,
    pub seed: Seed,
    pub tasks: Vec<TaskRecord>,
}

impl IterationRecord {
    pub fn new(iteration: u32, seed: Seed) -> Self {
        Self {
            iteration,
            seed,
            tasks: Vec::new(),
        }
    }

    /// Verdict per workload
    pub fn verdicts(&self) -> BTreeMap<WorkloadId, bool> {
        self.tasks.iter().map(|t| (t.workload, t.passed)).collect()
    }

    pub fn passed(&self) -> usize {
        self.tasks.iter().filter(|t| t.passed).count()
    }
}

/// Running totals of a run
///
/// Only the controller owns this, and it only records verdicts of iterations
/// whose tasks have all terminated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunTotals {
    iterations: u32,
    tasks_run: u64,
    tasks_passed: u64,
}

impl RunTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one task verdict
    pub fn record(&mut self, passed: bool) {
        self.tasks_run += 1;
        if passed {
            self.tasks_passed += 1;
        }
    }

    pub fn complete_iteration(&mut self) {
        self.iterations += 1;
    }

    /// Fold a finished iteration into the totals
    pub fn absorb(&mut self, record: &IterationRecord) {
        for task in &record.tasks {
            self.record(task.passed);
        }
        self.complete_iteration();
    }

    pub fn summary(&self, total_elapsed: Duration) -> RunSummary {
        RunSummary {
            iterations: self.iterations,
            tasks_run: self.tasks_run,
            tasks_passed: self.tasks_passed,
            tasks_failed: self.tasks_run - self.tasks_passed,
            total_elapsed_secs: total_elapsed.as_secs_f64(),
        }
    }
}

/// Final summary of a run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub iterations: u32,
    pub tasks_run: u64,
    pub tasks_passed: u64,
    pub tasks_failed: u64,
    pub total_elapsed_secs: f64,
}

impl RunSummary {
    pub fn pass_rate(&self) -> f64 {
        if self.tasks_run == 0 {
            0.0
        } else {
            (self.tasks_passed as f64 / self.tasks_run as f64) * 100.0
        }
    }

    pub fn is_all_passed(&self) -> bool {
        self.tasks_failed == 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total runtime: {:.2} seconds", self.total_elapsed_secs)?;
        writeln!(f, "Total iterations: {}", self.iterations)?;
        writeln!(f, "Total tasks: {}", self.tasks_run)?;
        writeln!(f, "Passed: {}", self.tasks_passed)?;
        write!(f, "Failed: {}", self.tasks_failed)
    }
}

/// What a finished run hands back to its caller
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunReport {
    pub summary: RunSummary,
    pub start_seed: Seed,
    pub is_random: bool,
    /// Seed used by each iteration, in order
    pub seeds: Vec<Seed>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(workload: WorkloadId, passed: bool) -> TaskRecord {
        let mut task = TaskRecord::new(workload, "wl");
        task.passed = passed;
        task
    }

    #[test]
    fn test_run_flags() {
        let flags = RunFlags::new(&RunMode::TimeBound(Duration::from_secs(60)), None);
        assert!(!flags.is_iter);
        assert!(flags.is_random);

        let flags = RunFlags::new(&RunMode::IterationBound(3), Some(123));
        assert!(flags.is_iter);
        assert!(!flags.is_random);
    }

    #[test]
    fn test_totals_record() {
        let mut totals = RunTotals::new();
        totals.record(true);
        totals.record(false);
        totals.record(true);
        totals.complete_iteration();

        let summary = totals.summary(Duration::from_millis(1500));
        assert_eq!(summary.iterations, 1);
        assert_eq!(summary.tasks_run, 3);
        assert_eq!(summary.tasks_passed, 2);
        assert_eq!(summary.tasks_failed, 1);
        assert!((summary.total_elapsed_secs - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_totals_absorb_iteration() {
        let mut record = IterationRecord::new(1, 123);
        record.tasks.push(task(WorkloadId::Workload1, true));
        record.tasks.push(task(WorkloadId::Workload2, false));

        let mut totals = RunTotals::new();
        totals.absorb(&record);
        totals.absorb(&record);

        let summary = totals.summary(Duration::ZERO);
        assert_eq!(summary.iterations, 2);
        assert_eq!(summary.tasks_run, 4);
        assert_eq!(summary.tasks_passed, 2);
    }

    #[test]
    fn test_empty_summary() {
        let summary = RunTotals::new().summary(Duration::ZERO);
        assert_eq!(summary.tasks_run, 0);
        assert_eq!(summary.pass_rate(), 0.0);
        assert!(summary.is_all_passed());
    }

    #[test]
    fn test_iteration_verdicts() {
        let mut record = IterationRecord::new(2, 456);
        record.tasks.push(task(WorkloadId::Workload2, true));
        record
            .tasks
            .push(TaskRecord::new(WorkloadId::Workload1, "wl_1").failed("output missing"));

        let verdicts = record.verdicts();
        assert_eq!(verdicts.get(&WorkloadId::Workload1), Some(&false));
        assert_eq!(verdicts.get(&WorkloadId::Workload2), Some(&true));
        assert_eq!(record.passed(), 1);
    }
}
