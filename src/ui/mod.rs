//! Terminal output.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for real terminals and pipes
//! - [`MockUI`] for tests
//! - Progress over targets, box-drawing tables, and the color theme
//!
//! # Example
//!
//! ```
//! use fleetcheck::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.show_header("Fleet assessment");
//! ui.success("3 of 3 hosts ready");
//! assert!(ui.has_success("3 of 3"));
//! ```

pub mod mock;
pub mod output;
pub mod progress;
pub mod table;
pub mod terminal;
pub mod theme;

pub use mock::{MockProgress, MockUI};
pub use output::OutputMode;
pub use progress::{format_duration, TargetProgress};
pub use table::{Align, Table};
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, FleetTheme};

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Change the output mode.
    fn set_output_mode(&mut self, mode: OutputMode);

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Show a labelled value.
    fn key_value(&mut self, key: &str, value: &str);

    /// Write machine-readable output, unaffected by the output mode.
    fn data(&mut self, content: &str);

    /// Start progress over `total` targets.
    fn start_progress(&mut self, total: usize) -> Box<dyn ProgressHandle>;

    /// Check if output goes to a terminal.
    fn is_interactive(&self) -> bool;
}

/// Handle for advancing a progress display.
pub trait ProgressHandle {
    /// Record one finished target.
    fn advance(&mut self, target: &str);

    /// Remove the progress display.
    fn finish(&mut self);
}
