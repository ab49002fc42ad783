//! Assess command implementation.
//!
//! The `fleetcheck assess` command grades hosts against the requirement
//! profile and renders one row per host.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::assessment::target::{local_identity, parse_target_list};
use crate::assessment::{Assessor, RequirementProfile, Target, TargetOutcome};
use crate::cli::args::AssessArgs;
use crate::config::FleetConfig;
use crate::error::{FleetError, Result};
use crate::ui::{format_duration, OutputMode, UserInterface};

use super::dispatcher::{Command, CommandResult, EXIT_CONFIG, EXIT_NOT_READY};
use super::display::{results_table, Tally};

/// The assess command implementation.
pub struct AssessCommand {
    project_root: PathBuf,
    config: FleetConfig,
    args: AssessArgs,
}

/// JSON document written by `assess --json`.
#[derive(Serialize)]
struct JsonReport<'a> {
    profile: &'a RequirementProfile,
    ready: usize,
    total: usize,
    outcomes: &'a [TargetOutcome],
}

impl AssessCommand {
    /// Create a new assess command.
    pub fn new(project_root: &Path, config: FleetConfig, args: AssessArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config,
            args,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &AssessArgs {
        &self.args
    }

    /// Configuration with command-line overrides applied.
    pub fn effective_config(&self) -> FleetConfig {
        let mut config = self.config.clone();
        if self.args.skip_diagnostic {
            config.profile.skip_diagnostic = true;
        }
        if let Some(parallelism) = self.args.parallelism {
            config.settings.parallelism = parallelism.max(1);
        }
        if let Some(timeout) = self.args.timeout {
            config.invoker.timeout_secs = timeout;
        }
        config
    }

    /// The targets file, resolved against the project root.
    pub fn targets_file_path(&self) -> Option<PathBuf> {
        self.args.targets_file.as_ref().map(|file| {
            if file.is_absolute() {
                file.clone()
            } else {
                self.project_root.join(file)
            }
        })
    }

    /// Targets from arguments, then the targets file, then configuration,
    /// falling back to the local host. Duplicates are dropped.
    pub fn resolve_targets(&self) -> Result<Vec<Target>> {
        let mut targets: Vec<Target> = if !self.args.targets.is_empty() {
            self.args.targets.iter().map(Target::new).collect()
        } else if let Some(path) = self.targets_file_path() {
            parse_target_list(&fs::read_to_string(path)?)
        } else {
            self.config.targets.iter().map(Target::new).collect()
        };

        targets.retain(|t| !t.name().is_empty());
        if targets.is_empty() {
            targets.push(Target::new(local_identity()));
        }

        let mut seen = std::collections::HashSet::new();
        targets.retain(|t| seen.insert(t.name().to_ascii_lowercase()));
        Ok(targets)
    }

    fn render(&self, ui: &mut dyn UserInterface, outcomes: &[TargetOutcome], tally: &Tally) {
        let mode = ui.output_mode();

        if mode.shows_progress() {
            let table = results_table(outcomes.iter().filter_map(TargetOutcome::record));
            if !table.is_empty() {
                ui.message(&table.render());
            }
        }

        if mode != OutputMode::Quiet {
            for outcome in outcomes {
                if let TargetOutcome::Skipped { target, error } = outcome {
                    ui.warning(&format!("{} skipped: {}", target, error));
                }
            }
        }

        if mode.shows_detail() {
            for record in outcomes.iter().filter_map(TargetOutcome::record) {
                let unmet = record.criteria.unmet();
                if !unmet.is_empty() {
                    ui.message(&format!("  {}: unmet {}", record.target, unmet.join(", ")));
                }
                if let Some(failure) = record.diagnostic.failure() {
                    ui.message(&format!("  {}: diagnostic {}", record.target, failure));
                }
            }
        }

        if tally.all_ready() {
            ui.success(&tally.summary());
        } else {
            ui.warning(&tally.summary());
        }
    }
}

impl Command for AssessCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if ui.output_mode() == OutputMode::Normal {
            ui.set_output_mode(self.config.settings.default_output.into());
        }

        let targets = match self.resolve_targets() {
            Ok(targets) => targets,
            Err(FleetError::Io(e)) => {
                let path = self.targets_file_path().unwrap_or_default();
                ui.error(&format!("Cannot read targets file {}: {}", path.display(), e));
                return Ok(CommandResult::failure(EXIT_CONFIG));
            }
            Err(e) => return Err(e),
        };

        let config = self.effective_config();
        let assessor = Assessor::from_config(&config);
        let started = std::time::Instant::now();

        if !self.args.json {
            ui.show_header(&format!("Assessing {} host(s)", targets.len()));
        }

        let mut progress = ui.start_progress(targets.len());
        let mut outcomes: Vec<TargetOutcome> = Vec::with_capacity(targets.len());
        for outcome in assessor.assess(&targets) {
            progress.advance(outcome.target().name());
            outcomes.push(outcome);
        }
        progress.finish();
        outcomes.sort_by(|a, b| a.target().cmp(b.target()));

        tracing::debug!(
            "Assessed {} host(s) in {}",
            outcomes.len(),
            format_duration(started.elapsed())
        );

        let tally = Tally::from_outcomes(&outcomes);
        if self.args.json {
            let report = JsonReport {
                profile: assessor.profile(),
                ready: tally.ready,
                total: tally.total,
                outcomes: &outcomes,
            };
            let json = serde_json::to_string_pretty(&report).map_err(anyhow::Error::from)?;
            ui.data(&json);
        } else {
            self.render(ui, &outcomes, &tally);
        }

        if tally.all_ready() {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(EXIT_NOT_READY))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    fn command(args: AssessArgs, config: FleetConfig) -> (TempDir, AssessCommand) {
        let temp = TempDir::new().unwrap();
        let cmd = AssessCommand::new(temp.path(), config, args);
        (temp, cmd)
    }

    #[test]
    fn targets_from_arguments_win() {
        let config = FleetConfig {
            targets: vec!["from-config".to_string()],
            ..Default::default()
        };
        let args = AssessArgs {
            targets: vec!["ws-001".to_string(), "WS-001".to_string(), "ws-002".to_string()],
            ..Default::default()
        };
        let (_temp, cmd) = command(args, config);

        let names: Vec<String> = cmd
            .resolve_targets()
            .unwrap()
            .into_iter()
            .map(|t| t.name().to_string())
            .collect();
        assert_eq!(names, vec!["ws-001", "ws-002"]);
    }

    #[test]
    fn targets_from_file_relative_to_project() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("hosts.txt"), "# lab\nws-010\n\nws-011 # spare\n").unwrap();
        let args = AssessArgs {
            targets_file: Some(PathBuf::from("hosts.txt")),
            ..Default::default()
        };
        let cmd = AssessCommand::new(temp.path(), FleetConfig::default(), args);

        let targets = cmd.resolve_targets().unwrap();
        assert_eq!(targets, vec![Target::new("ws-010"), Target::new("ws-011")]);
    }

    #[test]
    fn missing_targets_file_is_config_error() {
        let args = AssessArgs {
            targets_file: Some(PathBuf::from("missing.txt")),
            ..Default::default()
        };
        let (_temp, cmd) = command(args, FleetConfig::default());

        let mut ui = MockUI::new();
        let result = cmd.execute(&mut ui).unwrap();
        assert_eq!(result.exit_code, EXIT_CONFIG);
        assert!(ui.has_error("missing.txt"));
    }

    #[test]
    fn unreadable_targets_file_keeps_io_cause() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("hosts.txt"), [0xff, 0xfe, 0x00, 0xd8]).unwrap();
        let args = AssessArgs {
            targets_file: Some(PathBuf::from("hosts.txt")),
            ..Default::default()
        };
        let cmd = AssessCommand::new(temp.path(), FleetConfig::default(), args);

        match cmd.resolve_targets() {
            Err(FleetError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::InvalidData),
            other => panic!("Expected Io error, got {:?}", other),
        }

        let mut ui = MockUI::new();
        let result = cmd.execute(&mut ui).unwrap();
        assert_eq!(result.exit_code, EXIT_CONFIG);
        assert!(ui.has_error("hosts.txt"));
        assert!(!ui.has_error("not found"));
    }

    #[test]
    fn missing_targets_file_reports_not_found() {
        let args = AssessArgs {
            targets_file: Some(PathBuf::from("absent.txt")),
            ..Default::default()
        };
        let (_temp, cmd) = command(args, FleetConfig::default());

        match cmd.resolve_targets() {
            Err(FleetError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("Expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn targets_fall_back_to_config_then_local_host() {
        let config = FleetConfig {
            targets: vec!["ws-020".to_string()],
            ..Default::default()
        };
        let (_temp, cmd) = command(AssessArgs::default(), config);
        assert_eq!(cmd.resolve_targets().unwrap(), vec![Target::new("ws-020")]);

        let (_temp, cmd) = command(AssessArgs::default(), FleetConfig::default());
        assert_eq!(cmd.resolve_targets().unwrap(), vec![Target::new(local_identity())]);
    }

    #[test]
    fn overrides_apply_to_config() {
        let args = AssessArgs {
            skip_diagnostic: true,
            parallelism: Some(0),
            timeout: Some(5),
            ..Default::default()
        };
        let (_temp, cmd) = command(args, FleetConfig::default());

        let config = cmd.effective_config();
        assert!(config.profile.skip_diagnostic);
        assert_eq!(config.settings.parallelism, 1);
        assert_eq!(config.invoker.timeout_secs, 5);
    }

    #[test]
    fn render_lists_skipped_targets_and_summary() {
        let (_temp, cmd) = command(AssessArgs::default(), FleetConfig::default());
        let outcomes = vec![TargetOutcome::Skipped {
            target: Target::new("ws-404"),
            error: FleetError::Unreachable {
                target: "ws-404".to_string(),
            },
        }];
        let tally = Tally::from_outcomes(&outcomes);

        let mut ui = MockUI::new();
        cmd.render(&mut ui, &outcomes, &tally);

        assert!(ui.has_warning("ws-404 skipped"));
        assert!(ui.has_warning("0 of 1 host(s) ready"));
    }
}
