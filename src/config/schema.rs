//! Configuration schema definitions for fleetcheck.
//!
//! This module contains all the struct definitions that map to
//! the YAML configuration file format.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for `.fleetcheck/config.yml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    /// Thresholds applied to every assessed host
    pub profile: RequirementProfile,

    /// Diagnostic tool invocation
    pub invoker: InvokerSettings,

    /// How remote hosts are reached
    pub transport: TransportSettings,

    /// Run settings
    pub settings: Settings,

    /// Default targets when none are given on the command line
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<String>,
}

/// The full set of readiness thresholds.
///
/// Memory and disk thresholds are in GB (1024³ bytes). Comparisons are
/// inclusive: a host with exactly the threshold meets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequirementProfile {
    /// Minimum processor clock speed in MHz
    pub min_clock_mhz: u32,

    /// Minimum RAM for tier A
    pub tier_a_memory_gb: f64,

    /// Minimum RAM for tier B
    pub tier_b_memory_gb: f64,

    /// Minimum free system-volume space for tier A
    pub tier_a_disk_gb: f64,

    /// Minimum free system-volume space for tier B
    pub tier_b_disk_gb: f64,

    /// Minimum capability-interface version reported by the diagnostic tool
    pub min_interface_version: String,

    /// Minimum driver-model version reported by the diagnostic tool
    pub min_driver_model: String,

    /// Skip the diagnostic tool entirely
    #[serde(skip_serializing_if = "is_false")]
    pub skip_diagnostic: bool,
}

impl Default for RequirementProfile {
    fn default() -> Self {
        Self {
            min_clock_mhz: 1000,
            tier_a_memory_gb: 1.0,
            tier_b_memory_gb: 2.0,
            tier_a_disk_gb: 16.0,
            tier_b_disk_gb: 20.0,
            min_interface_version: "9".to_string(),
            min_driver_model: "1.0".to_string(),
            skip_diagnostic: false,
        }
    }
}

/// Settings for the external diagnostic tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvokerSettings {
    /// Tool executable (name on PATH or absolute path)
    pub tool: String,

    /// Tool arguments; `{output}` is replaced by the output file path
    pub args: Vec<String>,

    /// Directory on remote hosts that receives the tool output
    pub remote_output_dir: String,

    /// Interval between remote existence checks, in milliseconds
    pub poll_interval_ms: u64,

    /// Maximum wait for remote output, in seconds
    pub timeout_secs: u64,
}

impl Default for InvokerSettings {
    fn default() -> Self {
        Self {
            tool: "dxdiag".to_string(),
            args: vec![
                "/dontskip".to_string(),
                "/whql:off".to_string(),
                "/x".to_string(),
                "{output}".to_string(),
            ],
            remote_output_dir: "C:\\Windows\\Temp".to_string(),
            poll_interval_ms: 1000,
            timeout_secs: 30,
        }
    }
}

impl InvokerSettings {
    /// Poll interval as a duration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Remote access settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportSettings {
    /// Remote shell program used for queries and process creation
    pub ssh_program: String,

    /// Extra options passed to the remote shell program
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ssh_options: Vec<String>,

    /// Login user for remote hosts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Local path through which a remote host's system volume is reachable.
    ///
    /// `{target}` is replaced with the host name, e.g. `\\{target}\C$` or
    /// `/mnt/fleet/{target}`.
    pub share_root: String,

    /// Seconds to wait for the reachability probe
    pub ping_timeout_secs: u64,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            ssh_program: "ssh".to_string(),
            ssh_options: vec!["-o".to_string(), "BatchMode=yes".to_string()],
            user: None,
            share_root: "\\\\{target}\\C$".to_string(),
            ping_timeout_secs: 2,
        }
    }
}

/// Run settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Maximum number of hosts assessed at the same time
    pub parallelism: usize,

    /// Default output mode: verbose, normal, quiet
    pub default_output: OutputMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            parallelism: 8,
            default_output: OutputMode::Normal,
        }
    }
}

/// Output verbosity configured in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    Verbose,
    #[default]
    Normal,
    Quiet,
}

/// Path to the config file relative to a project root.
pub fn project_config_path(project_root: &std::path::Path) -> PathBuf {
    project_root.join(".fleetcheck").join("config.yml")
}

fn is_false(b: &bool) -> bool {
    !*b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_uses_defaults() {
        let config: FleetConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.profile, RequirementProfile::default());
        assert_eq!(config.invoker.timeout_secs, 30);
        assert_eq!(config.invoker.poll_interval_ms, 1000);
        assert_eq!(config.settings.parallelism, 8);
        assert!(config.targets.is_empty());
    }

    #[test]
    fn partial_profile_keeps_other_defaults() {
        let yaml = r#"
profile:
  min_clock_mhz: 1400
  skip_diagnostic: true
"#;
        let config: FleetConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.profile.min_clock_mhz, 1400);
        assert!(config.profile.skip_diagnostic);
        assert_eq!(config.profile.tier_b_disk_gb, 20.0);
    }

    #[test]
    fn invoker_durations() {
        let settings = InvokerSettings {
            poll_interval_ms: 250,
            timeout_secs: 5,
            ..Default::default()
        };
        assert_eq!(settings.poll_interval(), Duration::from_millis(250));
        assert_eq!(settings.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn default_tool_args_carry_output_placeholder() {
        let settings = InvokerSettings::default();
        assert!(settings.args.iter().any(|a| a.contains("{output}")));
    }

    #[test]
    fn output_mode_parses_lowercase() {
        let yaml = "settings:\n  default_output: quiet\n";
        let config: FleetConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.settings.default_output, OutputMode::Quiet);
    }

    #[test]
    fn targets_list_parses() {
        let yaml = "targets:\n  - ws-001\n  - ws-002\n";
        let config: FleetConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.targets, vec!["ws-001", "ws-002"]);
    }
}
