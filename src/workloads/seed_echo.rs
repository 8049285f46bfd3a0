//! Seed echo workload
//!
//! Hands the iteration seed to the binary with `--seed`; the binary decides
//! on its own and reports a `PASS` or `FAIL` marker line.

use async_trait::async_trait;
use std::path::Path;

use super::{read_output, run_script, Workload, WorkloadError};
use crate::models::{Seed, WorkloadId};
use crate::output::SinkPair;

const PASS_MARKER: &str = "PASS";
const FAIL_MARKER: &str = "FAIL";

#[derive(Clone, Copy, Debug, Default)]
pub struct SeedEchoWorkload;

impl SeedEchoWorkload {
    pub fn new() -> Self {
        Self
    }

    /// Passes on at least one PASS line and no FAIL line
    pub fn classify(content: &str) -> bool {
        let mut passed = false;
        for line in content.lines().map(str::trim_start) {
            if line.starts_with(FAIL_MARKER) {
                return false;
            }
            passed |= line.starts_with(PASS_MARKER);
        }
        passed
    }
}

#[async_trait]
impl Workload for SeedEchoWorkload {
    fn id(&self) -> WorkloadId {
        WorkloadId::Workload2
    }

    async fn run(&self, seed: Seed, target: &Path, sinks: &SinkPair) -> Result<(), WorkloadError> {
        run_script(target, &["--seed".to_string(), seed.to_string()], sinks).await
    }

    async fn process_output(&self, stdout: &Path) -> Result<bool, WorkloadError> {
        let content = read_output(stdout).await?;
        Ok(Self::classify(&content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workloads::test_support::{sinks_in, write_script};
    use tempfile::tempdir;

    #[test]
    fn test_classify() {
        assert!(SeedEchoWorkload::classify("seed 123\nPASS\n"));
        assert!(!SeedEchoWorkload::classify("PASS: step 1\nFAIL: step 2\n"));
        assert!(!SeedEchoWorkload::classify("seed 123\n"));
        assert!(!SeedEchoWorkload::classify(""));
    }

    #[tokio::test]
    async fn test_seed_reaches_binary() {
        let dir = tempdir().unwrap();
        let bin = write_script(
            dir.path(),
            "wl_2.sh",
            r#"echo "seed $2"
if [ $(( $2 % 2 )) -eq 0 ]; then echo PASS; else echo FAIL; fi"#,
        );
        let workload = SeedEchoWorkload::new();

        let even = sinks_in(dir.path(), "even");
        workload.run(124, &bin, &even).await.unwrap();
        assert!(workload.process_output(&even.stdout).await.unwrap());

        let odd = sinks_in(dir.path(), "odd");
        workload.run(123, &bin, &odd).await.unwrap();
        assert!(!workload.process_output(&odd.stdout).await.unwrap());
        assert!(std::fs::read_to_string(&odd.stdout)
            .unwrap()
            .starts_with("seed 123"));
    }
}
