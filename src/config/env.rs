//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;
use std::path::PathBuf;

use crate::models::Seed;

/// Environment variable prefix
const ENV_PREFIX: &str = "WORKLOAD_RUNNER";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Config file from WORKLOAD_RUNNER_CONFIG
    pub config_file: Option<PathBuf>,
    /// Log root from WORKLOAD_RUNNER_LOG_DIR
    pub log_dir: Option<PathBuf>,
    /// Bins directory from WORKLOAD_RUNNER_BINS_DIR
    pub bins_dir: Option<PathBuf>,
    /// Start seed from WORKLOAD_RUNNER_SEED
    pub seed: Option<Seed>,
    /// Output format from WORKLOAD_RUNNER_FORMAT
    pub format: Option<String>,
    /// Disable colors from WORKLOAD_RUNNER_NO_COLOR
    pub no_color: Option<bool>,
    /// Log level from WORKLOAD_RUNNER_LOG_LEVEL
    pub log_level: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            config_file: get_env("CONFIG").map(PathBuf::from),
            log_dir: get_env("LOG_DIR").map(PathBuf::from),
            bins_dir: get_env("BINS_DIR").map(PathBuf::from),
            seed: get_env_parse("SEED"),
            format: get_env("FORMAT"),
            no_color: get_env_bool("NO_COLOR"),
            log_level: get_env("LOG_LEVEL"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.config_file.is_some()
            || self.log_dir.is_some()
            || self.bins_dir.is_some()
            || self.seed.is_some()
            || self.format.is_some()
            || self.no_color.is_some()
            || self.log_level.is_some()
    }

    /// Print current environment configuration
    pub fn print_summary(&self) {
        println!("Environment Configuration:");
        println!("  {}_CONFIG:     {:?}", ENV_PREFIX, self.config_file);
        println!("  {}_LOG_DIR:    {:?}", ENV_PREFIX, self.log_dir);
        println!("  {}_BINS_DIR:   {:?}", ENV_PREFIX, self.bins_dir);
        println!("  {}_SEED:       {:?}", ENV_PREFIX, self.seed);
        println!("  {}_FORMAT:     {:?}", ENV_PREFIX, self.format);
        println!("  {}_NO_COLOR:   {:?}", ENV_PREFIX, self.no_color);
        println!("  {}_LOG_LEVEL:  {:?}", ENV_PREFIX, self.log_level);
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

/// Get environment variable and parse to type
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| v.parse().ok())
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| {
        matches!(
            v.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on" | "enabled"
        )
    })
}

/// Builder for setting environment variables in tests
#[cfg(test)]
pub struct EnvBuilder {
    vars: Vec<(String, String)>,
}

#[cfg(test)]
impl EnvBuilder {
    pub fn new() -> Self {
        Self { vars: Vec::new() }
    }

    fn var(mut self, name: &str, value: impl Into<String>) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_{name}"), value.into()));
        self
    }

    pub fn log_dir(self, dir: impl Into<String>) -> Self {
        self.var("LOG_DIR", dir)
    }

    pub fn bins_dir(self, dir: impl Into<String>) -> Self {
        self.var("BINS_DIR", dir)
    }

    pub fn seed(self, seed: &str) -> Self {
        self.var("SEED", seed)
    }

    pub fn no_color(self, value: &str) -> Self {
        self.var("NO_COLOR", value)
    }

    /// Apply and return guard that restores on drop
    pub fn apply_scoped(self) -> EnvGuard {
        let previous: Vec<_> = self
            .vars
            .iter()
            .map(|(k, _)| (k.clone(), env::var(k).ok()))
            .collect();

        for (key, value) in self.vars {
            env::set_var(key, value);
        }

        EnvGuard { previous }
    }
}

/// Guard that restores environment variables on drop
#[cfg(test)]
pub struct EnvGuard {
    previous: Vec<(String, Option<String>)>,
}

#[cfg(test)]
impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.previous {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}

/// Print all WORKLOAD_RUNNER environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {ENV_PREFIX}_CONFIG      Path to configuration file");
    println!("  {ENV_PREFIX}_LOG_DIR     Root directory of the task output files");
    println!("  {ENV_PREFIX}_BINS_DIR    Directory the workload binaries live in");
    println!("  {ENV_PREFIX}_SEED        Start seed (random when unset)");
    println!("  {ENV_PREFIX}_FORMAT      Summary format (table, summary, json, json-pretty)");
    println!("  {ENV_PREFIX}_NO_COLOR    Disable colored output (true/false)");
    println!("  {ENV_PREFIX}_LOG_LEVEL   Log level (trace, debug, info, warn, error)");
    println!();
    println!("Example:");
    println!("  export {ENV_PREFIX}_SEED=123");
    println!("  workload-runner run -w Workload_1 -i 10");
}
