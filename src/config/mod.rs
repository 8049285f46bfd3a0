//! Configuration module
//!
//! Handles loading and managing configuration.

mod env;
mod file;

pub use env::{print_env_help, EnvConfig};
pub use file::{find, load_or_default};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::executor::{SeedSequence, DEFAULT_SEED_HIGH, DEFAULT_SEED_LOW};
use crate::models::{WorkloadConfig, WorkloadId};
use crate::output::{OutputFormat, ResultFormatter};
use crate::utils::logger::LogLevel;

/// Application configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root directory of the per-task stdout/stderr files
    pub log_dir: PathBuf,

    /// Directory the workload binaries are resolved against
    pub bins_dir: PathBuf,

    /// Inclusive lower bound of generated seeds
    pub seed_low: u32,

    /// Exclusive upper bound of generated seeds
    pub seed_high: u32,

    /// Summary format (table, summary, json, json-pretty)
    pub format: String,

    /// Colored terminal output
    pub colorize: bool,

    /// Width of the progress lines
    pub width: usize,

    /// Log level of the tracing subscriber
    pub log_level: String,

    /// Per-workload attributes and binaries
    pub workloads: BTreeMap<WorkloadId, WorkloadConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("var/log/workload_runner"),
            bins_dir: PathBuf::from("bins"),
            seed_low: DEFAULT_SEED_LOW,
            seed_high: DEFAULT_SEED_HIGH,
            format: "table".to_string(),
            colorize: true,
            width: 80,
            log_level: "warn".to_string(),
            workloads: WorkloadId::all()
                .into_iter()
                .map(|id| (id, WorkloadConfig::default_for(id)))
                .collect(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if is_yaml_file(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if is_yaml_file(path) {
            serde_yaml::to_string(self).context("Failed to serialize config")?
        } else {
            serde_json::to_string_pretty(self).context("Failed to serialize config")?
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.seed_low >= self.seed_high {
            anyhow::bail!(
                "Invalid seed range [{}, {}): low must be below high",
                self.seed_low,
                self.seed_high
            );
        }

        if OutputFormat::from_str(&self.format).is_none() {
            anyhow::bail!(
                "Unknown output format '{}'. Valid: table, summary, json, json-pretty",
                self.format
            );
        }

        if LogLevel::from_str(&self.log_level).is_none() {
            anyhow::bail!("Unknown log level '{}'", self.log_level);
        }

        for (id, workload) in &self.workloads {
            if workload.attributes.is_empty() {
                anyhow::bail!("{} has no attributes configured", id);
            }
            if let Some(attr) = workload.unmapped_attributes().first() {
                anyhow::bail!("{} attribute '{}' has no binary configured", id, attr);
            }
        }

        Ok(())
    }

    /// Seed range of this configuration
    pub fn seed_sequence(&self) -> Result<SeedSequence> {
        SeedSequence::new(self.seed_low, self.seed_high).context("Invalid seed range")
    }

    /// Output format, falling back to the table
    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::from_str(&self.format).unwrap_or(OutputFormat::Table)
    }

    /// Formatter for terminal output
    pub fn formatter(&self) -> ResultFormatter {
        let formatter = ResultFormatter::new(self.output_format()).with_width(self.width);
        if self.colorize {
            formatter
        } else {
            formatter.no_color()
        }
    }

    /// Directory the binaries are looked up in. A relative `bins_dir` missing
    /// from the working directory falls back to the executable's directory.
    pub fn bins_root(&self) -> PathBuf {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        locate_dir(&self.bins_dir, exe_dir.as_deref())
    }

    /// Run configuration of a workload, falling back to its defaults
    pub fn workload(&self, id: WorkloadId) -> WorkloadConfig {
        self.workloads
            .get(&id)
            .cloned()
            .unwrap_or_else(|| WorkloadConfig::default_for(id))
    }

    /// Apply environment overrides
    pub fn apply_env(&mut self, env: &EnvConfig) {
        if let Some(dir) = &env.log_dir {
            self.log_dir = dir.clone();
        }
        if let Some(dir) = &env.bins_dir {
            self.bins_dir = dir.clone();
        }
        if let Some(format) = &env.format {
            self.format = format.clone();
        }
        if env.no_color == Some(true) {
            self.colorize = false;
        }
        if let Some(level) = &env.log_level {
            self.log_level = level.clone();
        }
    }
}

fn locate_dir(dir: &Path, anchor: Option<&Path>) -> PathBuf {
    if dir.is_absolute() || dir.exists() {
        return dir.to_path_buf();
    }
    match anchor.map(|anchor| anchor.join(dir)) {
        Some(anchored) if anchored.is_dir() => {
            debug!("Resolved {} to {}", dir.display(), anchored.display());
            anchored
        }
        _ => dir.to_path_buf(),
    }
}

/// Check if file is YAML based on extension
fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.log_dir, PathBuf::from("var/log/workload_runner"));
        assert_eq!(config.seed_low, 100);
        assert_eq!(config.seed_high, 999);
        assert_eq!(config.workloads.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_load_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/config.yaml");

        let mut config = AppConfig::default();
        config.seed_low = 10;
        config.format = "json".to_string();
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_save_load_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = AppConfig::default();
        config.save(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"Workload_1\""));
        assert_eq!(AppConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "seed_high: 5000\ncolorize: false\n").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.seed_high, 5000);
        assert!(!config.colorize);
        assert_eq!(config.seed_low, DEFAULT_SEED_LOW);
        assert_eq!(config.workloads.len(), 2);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.seed_low = 999;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.format = "csv".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.log_level = "loud".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config
            .workloads
            .get_mut(&WorkloadId::Workload1)
            .unwrap()
            .attributes
            .push("wl_9".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("wl_9"));
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "seed_low: 500\nseed_high: 400\n").unwrap();
        assert!(AppConfig::load(&path).is_err());
        assert!(AppConfig::load(dir.path().join("missing.yaml")).is_err());
    }

    #[test]
    fn test_apply_env() {
        let mut config = AppConfig::default();
        let env = EnvConfig {
            log_dir: Some(PathBuf::from("/tmp/wr")),
            format: Some("summary".to_string()),
            no_color: Some(true),
            ..Default::default()
        };

        config.apply_env(&env);

        assert_eq!(config.log_dir, PathBuf::from("/tmp/wr"));
        assert_eq!(config.output_format(), OutputFormat::Summary);
        assert!(!config.colorize);
        assert_eq!(config.bins_dir, PathBuf::from("bins"));
    }

    #[test]
    fn test_locate_dir_falls_back_to_anchor() {
        let anchor = tempdir().unwrap();
        std::fs::create_dir(anchor.path().join("wr-bins-only-here")).unwrap();

        let located = locate_dir(Path::new("wr-bins-only-here"), Some(anchor.path()));
        assert_eq!(located, anchor.path().join("wr-bins-only-here"));
    }

    #[test]
    fn test_locate_dir_keeps_existing_and_absolute() {
        let anchor = tempdir().unwrap();
        let absolute = anchor.path().join("elsewhere");
        assert_eq!(locate_dir(&absolute, Some(Path::new("/nowhere"))), absolute);

        // src exists relative to the crate root where tests run
        std::fs::create_dir(anchor.path().join("src")).unwrap();
        assert_eq!(locate_dir(Path::new("src"), Some(anchor.path())), PathBuf::from("src"));
    }

    #[test]
    fn test_locate_dir_unresolved_stays_relative() {
        let anchor = tempdir().unwrap();
        assert_eq!(
            locate_dir(Path::new("wr-no-such-dir"), Some(anchor.path())),
            PathBuf::from("wr-no-such-dir")
        );
        assert_eq!(
            locate_dir(Path::new("wr-no-such-dir"), None),
            PathBuf::from("wr-no-such-dir")
        );
    }

    #[test]
    fn test_workload_fallback() {
        let mut config = AppConfig::default();
        config.workloads.remove(&WorkloadId::Workload2);
        assert_eq!(
            config.workload(WorkloadId::Workload2),
            WorkloadConfig::default_for(WorkloadId::Workload2)
        );
    }
}
