//! Diagnostic tool invocation.
//!
//! The tool is run in one of two ways depending on where the target is:
//!
//! - **Local**: the tool runs as a child process writing into a fresh
//!   scratch directory, and the invoker blocks until it exits
//! - **Remote**: the transport creates the process on the target, and the
//!   invoker polls for the output file until it appears or the configured
//!   timeout elapses
//!
//! Each run is tracked by an [`Invocation`] whose [`InvocationState`] only
//! moves forward. There are no retries.

use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tempfile::TempDir;
use uuid::Uuid;

use super::target::Locality;
use super::Target;
use crate::config::InvokerSettings;
use crate::error::{FleetError, Result};
use crate::shell::{run, shell_quote};
use crate::transport::{QueryTransport, RemoteFiles};

/// Placeholder in tool arguments replaced by the output file path.
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Lifecycle of one tool invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationState {
    NotStarted,
    Launched,
    Succeeded,
    Rejected,
    TimedOut,
}

impl InvocationState {
    /// Whether no further transitions are allowed.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            InvocationState::Succeeded | InvocationState::Rejected | InvocationState::TimedOut
        )
    }

    /// Whether moving from `self` to `next` is a legal step.
    pub fn can_transition_to(self, next: InvocationState) -> bool {
        use InvocationState::*;
        matches!(
            (self, next),
            (NotStarted, Launched) | (Launched, Succeeded) | (Launched, Rejected) | (Launched, TimedOut)
        )
    }
}

impl fmt::Display for InvocationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InvocationState::NotStarted => "not started",
            InvocationState::Launched => "launched",
            InvocationState::Succeeded => "succeeded",
            InvocationState::Rejected => "rejected",
            InvocationState::TimedOut => "timed out",
        };
        f.write_str(label)
    }
}

/// One run of the diagnostic tool against one target.
#[derive(Debug)]
pub struct Invocation {
    target: Target,
    locality: Locality,
    output_path: String,
    state: InvocationState,
    scratch: Option<TempDir>,
}

impl Invocation {
    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn locality(&self) -> Locality {
        self.locality
    }

    /// Where the tool was told to write its output.
    pub fn output_path(&self) -> &str {
        &self.output_path
    }

    pub fn state(&self) -> InvocationState {
        self.state
    }

    fn advance(&mut self, next: InvocationState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(FleetError::Other(anyhow::anyhow!(
                "invalid invocation transition on '{}': {} -> {}",
                self.target,
                self.state,
                next
            )));
        }
        tracing::debug!("Invocation on {}: {} -> {}", self.target, self.state, next);
        self.state = next;
        Ok(())
    }
}

/// Runs the diagnostic tool and returns its raw output.
pub struct DiagnosticInvoker {
    settings: InvokerSettings,
    identity: String,
    transport: Arc<dyn QueryTransport>,
    files: Arc<dyn RemoteFiles>,
}

impl DiagnosticInvoker {
    /// Create an invoker.
    ///
    /// `identity` is the local host name used to decide whether a target
    /// is run locally.
    pub fn new(
        settings: InvokerSettings,
        identity: impl Into<String>,
        transport: Arc<dyn QueryTransport>,
        files: Arc<dyn RemoteFiles>,
    ) -> Self {
        Self {
            settings,
            identity: identity.into(),
            transport,
            files,
        }
    }

    pub fn settings(&self) -> &InvokerSettings {
        &self.settings
    }

    /// Run the tool against `target` and return its raw output.
    pub fn invoke(&self, target: &Target) -> Result<String> {
        let mut invocation = self.prepare(target)?;
        self.execute(&mut invocation)
    }

    /// Allocate the output location for a new invocation.
    pub fn prepare(&self, target: &Target) -> Result<Invocation> {
        let locality = target.locality(&self.identity);
        let (output_path, scratch) = match locality {
            Locality::Local => {
                let dir = tempfile::Builder::new().prefix("fleetcheck-").tempdir()?;
                let path = dir.path().join("diagnostic.xml");
                (path.to_string_lossy().to_string(), Some(dir))
            }
            Locality::Remote => (remote_output_path(&self.settings.remote_output_dir), None),
        };

        Ok(Invocation {
            target: target.clone(),
            locality,
            output_path,
            state: InvocationState::NotStarted,
            scratch,
        })
    }

    /// Run a prepared invocation to a terminal state.
    ///
    /// The output file is removed afterwards; a failed removal is logged
    /// and otherwise ignored.
    pub fn execute(&self, invocation: &mut Invocation) -> Result<String> {
        let launched = match invocation.locality {
            Locality::Local => self.run_local(invocation),
            Locality::Remote => self.run_remote(invocation),
        };
        let result = launched.and_then(|()| self.read_output(invocation));
        self.cleanup(invocation);
        result
    }

    fn tool_args(&self, output_path: &str) -> Vec<String> {
        self.settings
            .args
            .iter()
            .map(|arg| arg.replace(OUTPUT_PLACEHOLDER, output_path))
            .collect()
    }

    fn run_local(&self, invocation: &mut Invocation) -> Result<()> {
        let args = self.tool_args(&invocation.output_path);
        invocation.advance(InvocationState::Launched)?;

        match run(&self.settings.tool, &args) {
            Ok(result) => {
                if !result.success {
                    tracing::warn!(
                        "{} exited with {:?} on {}",
                        self.settings.tool,
                        result.exit_code,
                        invocation.target
                    );
                }
                invocation.advance(InvocationState::Succeeded)
            }
            Err(e) => {
                invocation.advance(InvocationState::Rejected)?;
                Err(FleetError::InvocationRejected {
                    target: invocation.target.name().to_string(),
                    code: None,
                    message: e.to_string(),
                })
            }
        }
    }

    fn run_remote(&self, invocation: &mut Invocation) -> Result<()> {
        let command_line = command_line(
            &self.settings.tool,
            &self.tool_args(&invocation.output_path),
        );
        invocation.advance(InvocationState::Launched)?;

        let code = match self.transport.create_process(&invocation.target, &command_line) {
            Ok(code) => code,
            Err(e) => {
                invocation.advance(InvocationState::Rejected)?;
                return Err(FleetError::InvocationRejected {
                    target: invocation.target.name().to_string(),
                    code: None,
                    message: e.to_string(),
                });
            }
        };
        if code != 0 {
            invocation.advance(InvocationState::Rejected)?;
            return Err(FleetError::InvocationRejected {
                target: invocation.target.name().to_string(),
                code: Some(code),
                message: format!("process creation returned {}", code),
            });
        }

        let timeout = self.settings.timeout();
        let poll_interval = self.settings.poll_interval().max(Duration::from_millis(1));
        let start = Instant::now();
        let deadline = start + timeout;

        loop {
            if self.files.exists(&invocation.target, &invocation.output_path) {
                tracing::debug!(
                    "Output appeared on {} after {:?}",
                    invocation.target,
                    start.elapsed()
                );
                return invocation.advance(InvocationState::Succeeded);
            }

            let now = Instant::now();
            if now >= deadline {
                invocation.advance(InvocationState::TimedOut)?;
                return Err(FleetError::InvocationTimeout {
                    target: invocation.target.name().to_string(),
                    waited: start.elapsed(),
                });
            }
            thread::sleep(poll_interval.min(deadline - now));
        }
    }

    fn read_output(&self, invocation: &Invocation) -> Result<String> {
        let content = match invocation.locality {
            Locality::Local => std::fs::read_to_string(&invocation.output_path)
                .map_err(|e| unreadable(&invocation.output_path, &e.to_string())),
            Locality::Remote => self
                .files
                .read_to_string(&invocation.target, &invocation.output_path)
                .map_err(|e| unreadable(&invocation.output_path, &e.to_string())),
        }?;

        if content.trim().is_empty() {
            return Err(FleetError::MalformedOutput {
                reason: format!("{} is empty", invocation.output_path),
            });
        }
        Ok(content)
    }

    fn cleanup(&self, invocation: &mut Invocation) {
        match invocation.locality {
            Locality::Local => {
                if let Some(dir) = invocation.scratch.take() {
                    if let Err(e) = dir.close() {
                        tracing::warn!("Failed to remove {}: {}", invocation.output_path, e);
                    }
                }
            }
            Locality::Remote => {
                if invocation.state != InvocationState::Succeeded {
                    return;
                }
                if let Err(e) = self
                    .files
                    .remove(&invocation.target, &invocation.output_path)
                {
                    tracing::warn!(
                        "Failed to remove {} on {}: {}",
                        invocation.output_path,
                        invocation.target,
                        e
                    );
                }
            }
        }
    }
}

fn unreadable(path: &str, error: &str) -> FleetError {
    FleetError::MalformedOutput {
        reason: format!("could not read {}: {}", path, error),
    }
}

/// A unique output path below `dir`, using the directory's own separator.
fn remote_output_path(dir: &str) -> String {
    let separator = if dir.contains('\\') { '\\' } else { '/' };
    let file_name = format!("fleetcheck-{}.xml", Uuid::new_v4().simple());
    let dir = dir.trim_end_matches(['\\', '/']);
    format!("{}{}{}", dir, separator, file_name)
}

/// Join the tool and its arguments into one command line.
fn command_line(tool: &str, args: &[String]) -> String {
    std::iter::once(tool)
        .chain(args.iter().map(String::as_str))
        .map(|part| {
            let plain = !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || "/:._-=,".contains(c));
            if plain {
                part.to_string()
            } else {
                shell_quote(part)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
