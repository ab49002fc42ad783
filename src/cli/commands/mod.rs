//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! Commands are dispatched via [`CommandDispatcher`], which loads and
//! validates configuration once and routes subcommands
//! (`fleetcheck assess`, `fleetcheck profile`) to their implementations.

pub mod assess;
pub mod completions;
pub mod dispatcher;
pub mod display;
pub mod profile;

pub use dispatcher::{
    Command, CommandDispatcher, CommandResult, EXIT_CONFIG, EXIT_NOT_READY, EXIT_READY,
};
