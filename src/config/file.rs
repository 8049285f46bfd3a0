//! Configuration file discovery
//!
//! Finds the configuration file in the standard locations.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::AppConfig;

/// Configuration file locations (in order of precedence)
const CONFIG_LOCATIONS: &[&str] = &[
    "./workload-runner.yaml",
    "./.workload-runner.yaml",
    "~/.config/workload-runner/config.yaml",
];

/// Find configuration file in standard locations
pub fn find() -> Option<PathBuf> {
    CONFIG_LOCATIONS
        .iter()
        .map(|location| expand_path(location))
        .find(|path| path.exists())
}

/// Load the given file, else the first one found, else the defaults
pub fn load_or_default(explicit: Option<&Path>) -> Result<(AppConfig, Option<PathBuf>)> {
    let path = match explicit {
        Some(path) => Some(expand_path(&path.to_string_lossy())),
        None => find(),
    };

    match path {
        Some(path) => {
            debug!("Loading config from {}", path.display());
            Ok((AppConfig::load(&path)?, Some(path)))
        }
        None => Ok((AppConfig::default(), None)),
    }
}

/// Expand ~ to home directory
fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_expand_path() {
        assert_eq!(expand_path("./test.yaml"), PathBuf::from("./test.yaml"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~/a.yaml"), home.join("a.yaml"));
        }
    }

    #[test]
    fn test_load_explicit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wr.json");
        let mut config = AppConfig::default();
        config.seed_high = 2000;
        config.save(&path).unwrap();

        let (loaded, source) = load_or_default(Some(path.as_path())).unwrap();
        assert_eq!(loaded.seed_high, 2000);
        assert_eq!(source, Some(path));
    }

    #[test]
    fn test_load_explicit_missing_fails() {
        let dir = tempdir().unwrap();
        assert!(load_or_default(Some(dir.path().join("nope.yaml").as_path())).is_err());
    }
}
