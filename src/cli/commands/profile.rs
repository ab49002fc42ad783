//! Profile command implementation.
//!
//! The `fleetcheck profile` command shows the thresholds and diagnostic
//! settings an assessment would use, after all config layers are merged.

use serde::Serialize;

use crate::cli::args::ProfileArgs;
use crate::config::{FleetConfig, InvokerSettings, RequirementProfile};
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The profile command implementation.
pub struct ProfileCommand {
    config: FleetConfig,
    args: ProfileArgs,
}

#[derive(Serialize)]
struct ProfileView<'a> {
    profile: &'a RequirementProfile,
    invoker: &'a InvokerSettings,
    parallelism: usize,
}

impl ProfileCommand {
    /// Create a new profile command.
    pub fn new(config: FleetConfig, args: ProfileArgs) -> Self {
        Self { config, args }
    }

    fn lines(&self) -> Vec<(&'static str, String)> {
        let profile = &self.config.profile;
        let invoker = &self.config.invoker;

        let mut lines = vec![
            ("Minimum clock", format!("{} MHz", profile.min_clock_mhz)),
            (
                "Memory",
                format!(
                    "{} GB (Tier A), {} GB (Tier B)",
                    profile.tier_a_memory_gb, profile.tier_b_memory_gb
                ),
            ),
            (
                "Free disk",
                format!(
                    "{} GB (Tier A), {} GB (Tier B)",
                    profile.tier_a_disk_gb, profile.tier_b_disk_gb
                ),
            ),
            ("Architecture", "64-bit for Tier B".to_string()),
        ];

        if profile.skip_diagnostic {
            lines.push(("Diagnostic", "skipped".to_string()));
        } else {
            lines.push((
                "Interface version",
                format!(">= {}", profile.min_interface_version),
            ));
            lines.push(("Driver model", format!(">= {}", profile.min_driver_model)));
            lines.push((
                "Diagnostic tool",
                format!("{} {}", invoker.tool, invoker.args.join(" ")),
            ));
            lines.push((
                "Remote wait",
                format!(
                    "{}s, polling every {}ms",
                    invoker.timeout_secs, invoker.poll_interval_ms
                ),
            ));
        }

        lines.push(("Parallelism", self.config.settings.parallelism.to_string()));
        lines
    }
}

impl Command for ProfileCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if self.args.json {
            let view = ProfileView {
                profile: &self.config.profile,
                invoker: &self.config.invoker,
                parallelism: self.config.settings.parallelism,
            };
            let json = serde_json::to_string_pretty(&view).map_err(anyhow::Error::from)?;
            ui.data(&json);
            return Ok(CommandResult::success());
        }

        ui.show_header("Requirement profile");
        for (key, value) in self.lines() {
            ui.key_value(key, &value);
        }

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;

    #[test]
    fn shows_default_thresholds() {
        let cmd = ProfileCommand::new(FleetConfig::default(), ProfileArgs::default());
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success);
        assert!(ui.has_message("1000 MHz"));
        assert!(ui.has_message("1 GB (Tier A), 2 GB (Tier B)"));
        assert!(ui.has_message("16 GB (Tier A), 20 GB (Tier B)"));
        assert!(ui.has_message("Remote wait: 30s, polling every 1000ms"));
    }

    #[test]
    fn skipped_diagnostic_hides_tool_settings() {
        let mut config = FleetConfig::default();
        config.profile.skip_diagnostic = true;
        let cmd = ProfileCommand::new(config, ProfileArgs::default());
        let mut ui = MockUI::new();

        cmd.execute(&mut ui).unwrap();

        assert!(ui.has_message("Diagnostic: skipped"));
        assert!(!ui.has_message("Diagnostic tool"));
    }

    #[test]
    fn json_output_is_parseable() {
        let cmd = ProfileCommand::new(FleetConfig::default(), ProfileArgs { json: true });
        let mut ui = MockUI::new();

        cmd.execute(&mut ui).unwrap();

        let value: serde_json::Value = serde_json::from_str(&ui.data_output()[0]).unwrap();
        assert_eq!(value["profile"]["min_clock_mhz"], 1000);
        assert_eq!(value["invoker"]["timeout_secs"], 30);
        assert_eq!(value["parallelism"], 8);
    }
}
