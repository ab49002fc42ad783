//! Command-line interface for fleetcheck.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{AssessArgs, Cli, Commands, CompletionsArgs, ProfileArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};
