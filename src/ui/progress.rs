//! Progress over assessed targets.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use super::ProgressHandle;

const BAR_TEMPLATE: &str = "{spinner:.cyan} [{bar:24.cyan/blue}] {pos}/{len} {msg}";

/// A progress bar counting finished targets.
pub struct TargetProgress {
    bar: ProgressBar,
}

impl TargetProgress {
    /// Create a visible bar for `total` targets.
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar().template(BAR_TEMPLATE) {
            bar.set_style(style.progress_chars("█▓░").tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
        }
        bar.set_message("assessing");
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    /// Create a bar that never draws.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl ProgressHandle for TargetProgress {
    fn advance(&mut self, target: &str) {
        self.bar.set_message(target.to_string());
        self.bar.inc(1);
    }

    fn finish(&mut self) {
        self.bar.finish_and_clear();
    }
}

/// Format a duration for display.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 1.0 {
        format!("{}ms", d.as_millis())
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = secs / 60.0;
        format!("{:.1}m", mins)
    }
}
