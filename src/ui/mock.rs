//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion.
//!
//! # Example
//!
//! ```
//! use fleetcheck::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.message("Assessing 2 hosts");
//! ui.warning("ws-002 skipped");
//!
//! assert!(ui.has_message("2 hosts"));
//! assert!(ui.has_warning("ws-002"));
//! ```

use std::sync::{Arc, Mutex};

use super::{OutputMode, ProgressHandle, UserInterface};

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    data: Vec<String>,
    progress: Arc<Mutex<Vec<String>>>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new MockUI with a specific output mode.
    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Set whether this mock behaves as interactive.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Machine-readable output written through [`UserInterface::data`].
    pub fn data_output(&self) -> &[String] {
        &self.data
    }

    /// Targets reported to progress handles, in order.
    pub fn progressed(&self) -> Vec<String> {
        self.progress.lock().map(|p| p.clone()).unwrap_or_default()
    }

    /// Check if a specific message was shown.
    pub fn has_message(&self, msg: &str) -> bool {
        self.messages.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific success was shown.
    pub fn has_success(&self, msg: &str) -> bool {
        self.successes.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific warning was shown.
    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific error was shown.
    pub fn has_error(&self, msg: &str) -> bool {
        self.errors.iter().any(|m| m.contains(msg))
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn set_output_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn key_value(&mut self, key: &str, value: &str) {
        self.messages.push(format!("{}: {}", key, value));
    }

    fn data(&mut self, content: &str) {
        self.data.push(content.to_string());
    }

    fn start_progress(&mut self, _total: usize) -> Box<dyn ProgressHandle> {
        Box::new(MockProgress {
            seen: Arc::clone(&self.progress),
        })
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

/// Progress handle recording advanced targets into its [`MockUI`].
#[derive(Debug)]
pub struct MockProgress {
    seen: Arc<Mutex<Vec<String>>>,
}

impl ProgressHandle for MockProgress {
    fn advance(&mut self, target: &str) {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(target.to_string());
        }
    }

    fn finish(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_messages_by_kind() {
        let mut ui = MockUI::new();
        ui.message("plain");
        ui.success("good");
        ui.warning("careful");
        ui.error("bad");
        ui.show_header("Title");

        assert_eq!(ui.messages(), ["plain"]);
        assert!(ui.has_success("good"));
        assert!(ui.has_warning("care"));
        assert!(ui.has_error("bad"));
        assert_eq!(ui.headers(), ["Title"]);
    }

    #[test]
    fn data_is_kept_separately() {
        let mut ui = MockUI::new();
        ui.data("{}");
        assert_eq!(ui.data_output(), ["{}"]);
        assert!(ui.messages().is_empty());
    }

    #[test]
    fn progress_records_targets() {
        let mut ui = MockUI::new();
        let mut progress = ui.start_progress(2);
        progress.advance("ws-001");
        progress.advance("ws-002");
        progress.finish();

        assert_eq!(ui.progressed(), vec!["ws-001", "ws-002"]);
    }

    #[test]
    fn mode_and_interactivity() {
        let mut ui = MockUI::with_mode(OutputMode::Quiet);
        assert_eq!(ui.output_mode(), OutputMode::Quiet);
        assert!(!ui.is_interactive());
        ui.set_interactive(true);
        assert!(ui.is_interactive());
    }
}
