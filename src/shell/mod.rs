//! External command execution and platform detection.

pub mod command;
pub mod platform;

pub use command::{run, shell_quote, spawn_detached, CommandResult};
pub use platform::{is_ci, ping_args};
