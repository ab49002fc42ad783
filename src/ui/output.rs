//! Output verbosity.

use std::str::FromStr;

use crate::config::schema::OutputMode as ConfigOutputMode;

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Show per-target detail and failed criteria.
    Verbose,
    /// Show progress, the result table and the summary.
    #[default]
    Normal,
    /// Show only the summary and errors.
    Quiet,
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "verbose" => Ok(Self::Verbose),
            "normal" => Ok(Self::Normal),
            "quiet" => Ok(Self::Quiet),
            _ => Err(format!("unknown output mode: {}", s)),
        }
    }
}

impl From<ConfigOutputMode> for OutputMode {
    fn from(config_mode: ConfigOutputMode) -> Self {
        match config_mode {
            ConfigOutputMode::Verbose => Self::Verbose,
            ConfigOutputMode::Normal => Self::Normal,
            ConfigOutputMode::Quiet => Self::Quiet,
        }
    }
}

impl OutputMode {
    /// Check if this mode shows per-target detail.
    pub fn shows_detail(&self) -> bool {
        matches!(self, Self::Verbose)
    }

    /// Check if this mode shows the progress bar and result table.
    pub fn shows_progress(&self) -> bool {
        matches!(self, Self::Verbose | Self::Normal)
    }
}
