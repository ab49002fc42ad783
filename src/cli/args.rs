//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Fleetcheck - hardware readiness assessment for a fleet of hosts.
#[derive(Debug, Parser)]
#[command(name = "fleetcheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default .fleetcheck/config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Assess hosts against the requirement profile (default)
    Assess(AssessArgs),

    /// Show the resolved requirement profile
    Profile(ProfileArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `assess` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct AssessArgs {
    /// Hosts to assess
    #[arg(value_name = "TARGET")]
    pub targets: Vec<String>,

    /// Read hosts from a file, one per line
    #[arg(long, value_name = "FILE")]
    pub targets_file: Option<PathBuf>,

    /// Skip the diagnostic tool
    #[arg(long)]
    pub skip_diagnostic: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Maximum number of hosts assessed at the same time
    #[arg(long, value_name = "N")]
    pub parallelism: Option<usize>,

    /// Seconds to wait for remote diagnostic output
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// Arguments for the `profile` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ProfileArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_assess_with_targets() {
        let cli = Cli::parse_from([
            "fleetcheck",
            "assess",
            "ws-001",
            "ws-002",
            "--skip-diagnostic",
            "--parallelism",
            "4",
        ]);
        match cli.command {
            Some(Commands::Assess(args)) => {
                assert_eq!(args.targets, vec!["ws-001", "ws-002"]);
                assert!(args.skip_diagnostic);
                assert_eq!(args.parallelism, Some(4));
                assert!(args.timeout.is_none());
            }
            other => panic!("Expected assess, got {:?}", other),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["fleetcheck", "profile", "--json", "--debug", "-q"]);
        assert!(cli.debug);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Some(Commands::Profile(ProfileArgs { json: true }))));
    }

    #[test]
    fn no_subcommand_is_allowed() {
        let cli = Cli::parse_from(["fleetcheck"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
