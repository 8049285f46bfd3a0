//! Workload models
//!
//! Defines the workloads the runner knows how to drive and their run configuration.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

/// Supported workloads
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WorkloadId {
    #[serde(rename = "Workload_1")]
    Workload1,
    #[serde(rename = "Workload_2")]
    Workload2,
}

impl WorkloadId {
    /// Get workload display name
    pub fn name(&self) -> &'static str {
        match self {
            WorkloadId::Workload1 => "Workload_1",
            WorkloadId::Workload2 => "Workload_2",
        }
    }

    /// Directory name under the bins directory
    pub fn dir_name(&self) -> &'static str {
        match self {
            WorkloadId::Workload1 => "workload_1",
            WorkloadId::Workload2 => "workload_2",
        }
    }

    /// Short description shown by `list`
    pub fn description(&self) -> &'static str {
        match self {
            WorkloadId::Workload1 => "Picks a seeded number and checks the binary echoes it",
            WorkloadId::Workload2 => "Hands the seed to the binary and checks its PASS marker",
        }
    }

    /// Get all workloads
    pub fn all() -> Vec<WorkloadId> {
        vec![WorkloadId::Workload1, WorkloadId::Workload2]
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<WorkloadId> {
        match s.to_lowercase().as_str() {
            "workload_1" | "workload1" | "wl_1" | "wl1" | "1" => Some(WorkloadId::Workload1),
            "workload_2" | "workload2" | "wl_2" | "wl2" | "2" => Some(WorkloadId::Workload2),
            _ => None,
        }
    }
}

impl fmt::Display for WorkloadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The set of workloads chosen for a run. Duplicates collapse.
pub type WorkloadSelection = BTreeSet<WorkloadId>;

/// Run configuration of a single workload
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkloadConfig {
    /// Variants the workload can be run as; one is picked per iteration
    pub attributes: Vec<String>,

    /// Binary for each attribute, relative to the bins directory unless absolute
    pub bin_paths: BTreeMap<String, PathBuf>,
}

impl WorkloadConfig {
    /// Default configuration for a workload
    pub fn default_for(id: WorkloadId) -> Self {
        let attribute = match id {
            WorkloadId::Workload1 => "wl_1",
            WorkloadId::Workload2 => "wl_2",
        };
        let bin = Path::new(id.dir_name()).join(format!("{attribute}.sh"));

        Self {
            attributes: vec![attribute.to_string()],
            bin_paths: BTreeMap::from([(attribute.to_string(), bin)]),
        }
    }

    /// Resolve the binary for an attribute against the bins directory
    pub fn resolve(&self, attribute: &str, bins_dir: &Path) -> Option<PathBuf> {
        self.bin_paths.get(attribute).map(|path| {
            if path.is_absolute() {
                path.clone()
            } else {
                bins_dir.join(path)
            }
        })
    }

    /// Attributes that have no binary configured
    pub fn unmapped_attributes(&self) -> Vec<&str> {
        self.attributes
            .iter()
            .filter(|a| !self.bin_paths.contains_key(a.as_str()))
            .map(String::as_str)
            .collect()
    }
}
