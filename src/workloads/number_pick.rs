//! Number pick workload
//!
//! Derives a number from the seed, hands it to the binary with `-n` and
//! passes when the binary reports the number it picked.

use async_trait::async_trait;
use std::path::Path;

use super::{read_output, run_script, Workload, WorkloadError};
use crate::executor::SeedSequence;
use crate::models::{Seed, WorkloadId};
use crate::output::SinkPair;

/// Text the binary prints on success
pub const PASS_PATTERN: &str = "The number picked is :";

/// Upper bound (exclusive) of the number handed to the binary
const NUMBER_RANGE: usize = 100;

#[derive(Clone, Copy, Debug, Default)]
pub struct NumberPickWorkload;

impl NumberPickWorkload {
    pub fn new() -> Self {
        Self
    }

    /// Number passed to the binary for a seed
    pub fn number_for(seed: Seed) -> usize {
        // The range is a non-empty constant
        SeedSequence::pick(0, NUMBER_RANGE, seed).unwrap_or_default()
    }

    pub fn classify(content: &str) -> bool {
        content.contains(PASS_PATTERN)
    }
}

#[async_trait]
impl Workload for NumberPickWorkload {
    fn id(&self) -> WorkloadId {
        WorkloadId::Workload1
    }

    async fn run(&self, seed: Seed, target: &Path, sinks: &SinkPair) -> Result<(), WorkloadError> {
        let number = Self::number_for(seed);
        run_script(target, &["-n".to_string(), number.to_string()], sinks).await
    }

    async fn process_output(&self, stdout: &Path) -> Result<bool, WorkloadError> {
        let content = read_output(stdout).await?;
        Ok(Self::classify(&content))
    }
}
