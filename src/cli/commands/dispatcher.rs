//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{AssessArgs, Cli, Commands};
use crate::config::{load_config, validate, FleetConfig};
use crate::error::{FleetError, Result};
use crate::ui::UserInterface;

use super::assess::AssessCommand;
use super::completions::CompletionsCommand;
use super::profile::ProfileCommand;

/// Exit code when every assessed host is ready.
pub const EXIT_READY: i32 = 0;
/// Exit code when any host is not ready or could not be assessed.
pub const EXIT_NOT_READY: i32 = 1;
/// Exit code for configuration problems.
pub const EXIT_CONFIG: i32 = 2;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: EXIT_READY,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
    config_override: Option<PathBuf>,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given project root.
    pub fn new(project_root: PathBuf) -> Self {
        Self {
            project_root,
            config_override: None,
        }
    }

    /// Use an explicit config file instead of the project one.
    pub fn with_config_override(mut self, path: Option<PathBuf>) -> Self {
        self.config_override = path;
        self
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Load and validate the configuration for this invocation.
    pub fn load_config(&self) -> Result<FleetConfig> {
        let config = load_config(&self.project_root, self.config_override.as_deref())?;
        validate(&config)?;
        Ok(config)
    }

    /// Dispatch and execute a command.
    ///
    /// Configuration errors are reported through `ui` and turned into the
    /// configuration exit code.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if let Some(Commands::Completions(args)) = &cli.command {
            return CompletionsCommand::new(args.clone()).execute(ui);
        }

        let config = match self.load_config() {
            Ok(config) => config,
            Err(
                e @ (FleetError::ConfigNotFound { .. }
                | FleetError::ConfigParseError { .. }
                | FleetError::ConfigValidationError { .. }),
            ) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(EXIT_CONFIG));
            }
            Err(e) => return Err(e),
        };

        match &cli.command {
            Some(Commands::Assess(args)) => {
                AssessCommand::new(&self.project_root, config, args.clone()).execute(ui)
            }
            Some(Commands::Profile(args)) => ProfileCommand::new(config, args.clone()).execute(ui),
            Some(Commands::Completions(_)) => Ok(CommandResult::success()),
            None => {
                AssessCommand::new(&self.project_root, config, AssessArgs::default()).execute(ui)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn command_result_success() {
        let result = CommandResult::success();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn command_result_failure() {
        let result = CommandResult::failure(1);
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn dispatcher_creation() {
        let dispatcher = CommandDispatcher::new(PathBuf::from("/test"));
        assert_eq!(dispatcher.project_root(), Path::new("/test"));
    }

    #[test]
    fn invalid_config_exits_with_config_code() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".fleetcheck");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.yml"), "settings:\n  parallelism: 0\n").unwrap();

        let cli = Cli::parse_from(["fleetcheck", "profile"]);
        let mut ui = MockUI::new();
        let result = CommandDispatcher::new(temp.path().to_path_buf())
            .dispatch(&cli, &mut ui)
            .unwrap();

        assert_eq!(result.exit_code, EXIT_CONFIG);
        assert!(ui.has_error("parallelism"));
    }

    #[test]
    fn missing_override_exits_with_config_code() {
        let temp = TempDir::new().unwrap();
        let cli = Cli::parse_from(["fleetcheck", "profile"]);
        let mut ui = MockUI::new();
        let result = CommandDispatcher::new(temp.path().to_path_buf())
            .with_config_override(Some(temp.path().join("nope.yml")))
            .dispatch(&cli, &mut ui)
            .unwrap();

        assert_eq!(result.exit_code, EXIT_CONFIG);
    }

    #[test]
    fn profile_runs_without_config_files() {
        let temp = TempDir::new().unwrap();
        let cli = Cli::parse_from(["fleetcheck", "profile"]);
        let mut ui = MockUI::new();
        let result = CommandDispatcher::new(temp.path().to_path_buf())
            .dispatch(&cli, &mut ui)
            .unwrap();

        assert!(result.success);
    }
}
