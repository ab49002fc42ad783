//! Terminal UI.

use console::Term;
use std::io::Write;

use crate::shell::is_ci;

use super::{
    should_use_colors, FleetTheme, OutputMode, ProgressHandle, TargetProgress, UserInterface,
};

/// Terminal UI writing results to stdout and errors to stderr.
pub struct TerminalUI {
    term: Term,
    err: Term,
    theme: FleetTheme,
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode) -> Self {
        let theme = if should_use_colors() {
            FleetTheme::new()
        } else {
            FleetTheme::plain()
        };

        Self {
            term: Term::stdout(),
            err: Term::stderr(),
            theme,
            mode,
        }
    }

    pub fn theme(&self) -> &FleetTheme {
        &self.theme
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn set_output_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
    }

    fn message(&mut self, msg: &str) {
        writeln!(self.term, "{}", msg).ok();
    }

    fn success(&mut self, msg: &str) {
        writeln!(self.term, "{}", self.theme.format_success(msg)).ok();
    }

    fn warning(&mut self, msg: &str) {
        writeln!(self.term, "{}", self.theme.format_warning(msg)).ok();
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_error(msg)).ok();
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_progress() {
            writeln!(self.term, "\n{}\n", self.theme.format_header(title)).ok();
        }
    }

    fn key_value(&mut self, key: &str, value: &str) {
        writeln!(self.term, "  {}", self.theme.format_key_value(key, value)).ok();
    }

    fn data(&mut self, content: &str) {
        writeln!(self.term, "{}", content).ok();
    }

    fn start_progress(&mut self, total: usize) -> Box<dyn ProgressHandle> {
        if self.mode.shows_progress() && self.err.is_term() && !is_ci() {
            Box::new(TargetProgress::new(total))
        } else {
            Box::new(TargetProgress::hidden())
        }
    }

    fn is_interactive(&self) -> bool {
        self.term.is_term()
    }
}

/// Create the UI for the current process.
pub fn create_ui(mode: OutputMode) -> Box<dyn UserInterface> {
    Box::new(TerminalUI::new(mode))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_ui_output_mode() {
        let ui = TerminalUI::new(OutputMode::Quiet);
        assert_eq!(ui.output_mode(), OutputMode::Quiet);
    }

    #[test]
    fn create_ui_respects_mode() {
        let ui = create_ui(OutputMode::Verbose);
        assert_eq!(ui.output_mode(), OutputMode::Verbose);
    }

    #[test]
    fn quiet_mode_hides_progress() {
        let mut ui = TerminalUI::new(OutputMode::Quiet);
        let mut progress = ui.start_progress(3);
        progress.advance("ws-001");
        progress.finish();
    }
}
