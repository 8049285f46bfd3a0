//! Data models for regression runs
//!
//! This module contains all data structures used throughout the application.

mod run;
mod workload;

pub use run::{
    IterationRecord, RunFlags, RunMode, RunReport, RunSummary, RunTotals, Seed, TaskRecord,
};
pub use workload::{WorkloadConfig, WorkloadId, WorkloadSelection};
