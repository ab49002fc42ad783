//! Configuration file discovery and loading.
//!
//! This module handles finding and loading configuration files from
//! various locations in the correct priority order.

use crate::config::merger::merge_configs;
use crate::config::schema::{project_config_path, FleetConfig};
use crate::error::{FleetError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Paths to configuration files in priority order (later overrides earlier).
///
/// Merge order:
/// 1. User global config (`~/.fleetcheck/config.yml`)
/// 2. Project config (`.fleetcheck/config.yml`)
/// 3. Local overrides (`.fleetcheck/config.local.yml`)
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// User's global config: ~/.fleetcheck/config.yml
    pub user_global: Option<PathBuf>,

    /// Project config: .fleetcheck/config.yml
    pub project: Option<PathBuf>,

    /// Local overrides: .fleetcheck/config.local.yml
    pub project_local: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        Self {
            user_global: Self::find_user_global(),
            project: existing(project_config_path(project_root)),
            project_local: existing(
                project_root
                    .join(".fleetcheck")
                    .join("config.local.yml"),
            ),
        }
    }

    fn find_user_global() -> Option<PathBuf> {
        existing(dirs::home_dir()?.join(".fleetcheck").join("config.yml"))
    }

    /// Returns all existing config paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        [&self.user_global, &self.project, &self.project_local]
            .into_iter()
            .flatten()
            .collect()
    }

    /// Check if any project config exists.
    pub fn has_project_config(&self) -> bool {
        self.project.is_some()
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    if path.exists() {
        Some(path)
    } else {
        None
    }
}

/// Load a single config file and parse it into FleetConfig.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<FleetConfig> {
    let content = read_config(path)?;
    parse_config(&content, path)
}

/// Parse YAML content into FleetConfig.
///
/// An empty document yields the default configuration.
pub fn parse_config(content: &str, source_path: &Path) -> Result<FleetConfig> {
    if content.trim().is_empty() {
        return Ok(FleetConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| FleetError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load a config file as raw YAML Value (for merging).
pub fn load_config_value(path: &Path) -> Result<serde_yaml::Value> {
    let content = read_config(path)?;
    serde_yaml::from_str(&content).map_err(|e| FleetError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn read_config(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            FleetError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            FleetError::Io(e)
        }
    })
}

/// Load and merge all config files for a project.
///
/// Unlike a single explicit file, missing files are not an error here:
/// with nothing on disk the built-in defaults apply.
pub fn load_merged_config(project_root: &Path) -> Result<FleetConfig> {
    let paths = ConfigPaths::discover(project_root);

    let mut configs = Vec::new();
    for path in paths.all_existing() {
        let value = load_config_value(path)?;
        if !value.is_null() {
            configs.push(value);
        }
    }

    if configs.is_empty() {
        tracing::debug!("No config files found, using defaults");
        return Ok(FleetConfig::default());
    }

    let merged = merge_configs(&configs);
    serde_yaml::from_value(merged).map_err(|e| FleetError::ConfigParseError {
        path: project_config_path(project_root),
        message: format!("Failed to parse merged config: {}", e),
    })
}

/// Load config with optional path override.
///
/// If `config_override` is provided, loads only that file without merging.
/// Otherwise, discovers and merges all config files.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<FleetConfig> {
    if let Some(override_path) = config_override {
        load_config_file(override_path)
    } else {
        load_merged_config(project_root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::OutputMode;
    use tempfile::TempDir;

    fn project_with(config: &str, local: Option<&str>) -> TempDir {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".fleetcheck");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.yml"), config).unwrap();
        if let Some(local) = local {
            fs::write(dir.join("config.local.yml"), local).unwrap();
        }
        temp
    }

    #[test]
    fn discover_finds_project_and_local() {
        let temp = project_with("", Some(""));
        let paths = ConfigPaths::discover(temp.path());
        assert!(paths.has_project_config());
        assert!(paths.project_local.is_some());
    }

    #[test]
    fn discover_returns_none_for_missing_configs() {
        let temp = TempDir::new().unwrap();
        let paths = ConfigPaths::discover(temp.path());
        assert!(paths.project.is_none());
        assert!(paths.project_local.is_none());
        assert!(!paths.has_project_config());
    }

    #[test]
    fn load_config_file_returns_not_found_error() {
        let result = load_config_file(Path::new("/nonexistent/config.yml"));
        assert!(matches!(result, Err(FleetError::ConfigNotFound { .. })));
    }

    #[test]
    fn parse_config_returns_parse_error_for_invalid_yaml() {
        let result = parse_config("profile: [unclosed", Path::new("test.yml"));
        assert!(matches!(result, Err(FleetError::ConfigParseError { .. })));
    }

    #[test]
    fn empty_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, "").unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.profile.min_clock_mhz, 1000);
    }

    #[test]
    fn merged_config_defaults_without_files() {
        let temp = TempDir::new().unwrap();
        let config = load_merged_config(temp.path()).unwrap();
        assert_eq!(config.invoker.timeout_secs, 30);
    }

    #[test]
    fn local_overrides_win_over_project() {
        let temp = project_with(
            r#"
profile:
  min_clock_mhz: 1400
  tier_b_disk_gb: 32
settings:
  default_output: verbose
"#,
            Some(
                r#"
profile:
  min_clock_mhz: 2000
settings:
  default_output: quiet
"#,
            ),
        );

        let config = load_merged_config(temp.path()).unwrap();
        assert_eq!(config.profile.min_clock_mhz, 2000);
        assert_eq!(config.profile.tier_b_disk_gb, 32.0);
        assert_eq!(config.settings.default_output, OutputMode::Quiet);
    }

    #[test]
    fn empty_local_override_is_ignored() {
        let temp = project_with("profile:\n  min_clock_mhz: 1200\n", Some(""));
        let config = load_merged_config(temp.path()).unwrap();
        assert_eq!(config.profile.min_clock_mhz, 1200);
    }

    #[test]
    fn load_config_with_override_skips_merge() {
        let temp = project_with("profile:\n  min_clock_mhz: 1200\n", None);
        let override_path = temp.path().join("custom.yml");
        fs::write(&override_path, "targets: [ws-9]").unwrap();

        let config = load_config(temp.path(), Some(&override_path)).unwrap();
        assert_eq!(config.targets, vec!["ws-9"]);
        assert_eq!(config.profile.min_clock_mhz, 1000);
    }
}
