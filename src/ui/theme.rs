//! Visual theme and styling.

use console::Style;

/// Fleetcheck's visual theme.
#[derive(Debug, Clone)]
pub struct FleetTheme {
    /// Style for success messages (green).
    pub success: Style,
    /// Style for warning messages (yellow).
    pub warning: Style,
    /// Style for error messages (red bold).
    pub error: Style,
    /// Style for dim/secondary text.
    pub dim: Style,
    /// Style for highlighted/important text (bold).
    pub highlight: Style,
    /// Style for headers (cyan bold).
    pub header: Style,
    /// Style for key labels in key-value displays (bold).
    pub key: Style,
}

impl Default for FleetTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl FleetTheme {
    /// Create the default theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
            dim: Style::new().dim(),
            highlight: Style::new().bold(),
            header: Style::new().bold().cyan(),
            key: Style::new().bold(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            dim: Style::new(),
            highlight: Style::new(),
            header: Style::new(),
            key: Style::new(),
        }
    }

    /// Format a success message (icon + text in green).
    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    /// Format a warning message (icon + text in yellow).
    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    /// Format an error message (icon + text in red bold).
    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    /// Format a header banner.
    pub fn format_header(&self, title: &str) -> String {
        format!(
            "{} {}",
            self.header.apply_to("▣"),
            self.highlight.apply_to(title)
        )
    }

    /// Format a `key: value` line.
    pub fn format_key_value(&self, key: &str, value: &str) -> String {
        format!("{} {}", self.key.apply_to(format!("{}:", key)), value)
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // Check NO_COLOR env var (https://no-color.org/)
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    console::Term::stdout().is_term()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_formats_messages() {
        let theme = FleetTheme::plain();
        assert_eq!(theme.format_success("Ready"), "✓ Ready");
        assert_eq!(theme.format_warning("Degraded"), "⚠ Degraded");
        assert_eq!(theme.format_error("Failed"), "✗ Failed");
    }

    #[test]
    fn theme_formats_header() {
        let theme = FleetTheme::plain();
        let msg = theme.format_header("Fleet");
        assert!(msg.contains("Fleet"));
        assert!(msg.contains("▣"));
    }

    #[test]
    fn theme_formats_key_value() {
        let theme = FleetTheme::plain();
        assert_eq!(theme.format_key_value("Tool", "dxdiag"), "Tool: dxdiag");
    }

    #[test]
    fn colored_theme_creates_without_panic() {
        let theme = FleetTheme::new();
        let _ = theme.format_key_value("Tier", "B");
        let _ = theme.format_success("test");
    }
}
