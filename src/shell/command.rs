//! External command execution.

use crate::error::{FleetError, Result};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Result of executing an external command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

/// Run `program` with `args`, capturing output, and wait for it to exit.
///
/// A non-zero exit is reported through [`CommandResult::success`]; only a
/// failure to start the program is an error.
pub fn run(program: &str, args: &[String]) -> Result<CommandResult> {
    let start = Instant::now();

    tracing::debug!("Running {} {:?}", program, args);
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| {
            tracing::debug!("Failed to start {}: {}", program, e);
            FleetError::CommandFailed {
                command: program.to_string(),
                code: None,
            }
        })?;

    Ok(CommandResult {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        duration: start.elapsed(),
        success: output.status.success(),
    })
}

/// Start a command line through the platform shell without waiting.
pub fn spawn_detached(command_line: &str) -> Result<()> {
    let (shell, flag) = if cfg!(target_os = "windows") {
        (
            std::env::var("COMSPEC").unwrap_or_else(|_| "cmd.exe".to_string()),
            "/C",
        )
    } else {
        ("/bin/sh".to_string(), "-c")
    };

    Command::new(&shell)
        .arg(flag)
        .arg(command_line)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|_| FleetError::CommandFailed {
            command: command_line.to_string(),
            code: None,
        })
}

/// Quote a value for a POSIX shell command line.
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
