//! Access to target hosts.
//!
//! The assessment engine never talks to a host directly. It goes through
//! two capabilities:
//!
//! - [`QueryTransport`] - reachability, structured fact queries, and
//!   process creation on a named target
//! - [`RemoteFiles`] - existence checks, reads and deletes of a file
//!   addressed by `(target, path)`
//!
//! Implementations:
//!
//! - [`LocalTransport`] - the machine running the assessment
//! - [`SshTransport`] - remote hosts reached through an ssh client
//! - [`ShareFiles`] - remote system volumes exposed through a share path
//! - [`HostTransport`] - routes each target to local or remote access

pub mod host;
pub mod local;
pub mod share;
pub mod ssh;

use std::collections::BTreeMap;
use std::fmt;

use crate::assessment::Target;
use crate::error::Result;

pub use host::HostTransport;
pub use local::LocalTransport;
pub use share::ShareFiles;
pub use ssh::SshTransport;

/// One result instance of a fact query: attribute name to textual value.
pub type Attributes = BTreeMap<String, String>;

/// Fact queries issued against a target.
///
/// Each query returns zero or more instances. The attributes every
/// implementation must report are listed per variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactQuery {
    /// `AddressWidth`, `DataWidth`, `MaxClockSpeed` (MHz)
    Processor,
    /// One instance per installed module, each with `Capacity` (bytes)
    MemoryModules,
    /// `Caption`, `SystemDrive`
    OperatingSystem,
    /// `FreeSpace` (bytes) of the volume mounted at `drive`
    SystemVolume { drive: String },
}

impl FactQuery {
    /// Stable identifier used in errors and logs.
    pub fn name(&self) -> &'static str {
        match self {
            FactQuery::Processor => "processor",
            FactQuery::MemoryModules => "memory-modules",
            FactQuery::OperatingSystem => "operating-system",
            FactQuery::SystemVolume { .. } => "system-volume",
        }
    }
}

impl fmt::Display for FactQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Structured queries and process creation against a named target.
pub trait QueryTransport: Send + Sync {
    /// Basic reachability check.
    fn is_reachable(&self, target: &Target) -> bool;

    /// Run a fact query and return its instances.
    fn query(&self, target: &Target, query: &FactQuery) -> Result<Vec<Attributes>>;

    /// Start `command_line` on the target without waiting for it.
    ///
    /// Returns the creation result code: zero means the process was
    /// created, anything else means the request was rejected.
    fn create_process(&self, target: &Target, command_line: &str) -> Result<u32>;
}

/// File access addressed by `(target, path)`.
pub trait RemoteFiles: Send + Sync {
    /// Whether the file exists.
    fn exists(&self, target: &Target, path: &str) -> bool;

    /// Read the whole file as text.
    fn read_to_string(&self, target: &Target, path: &str) -> Result<String>;

    /// Delete the file.
    fn remove(&self, target: &Target, path: &str) -> Result<()>;
}

/// Parse `Key=Value` output into attribute instances.
///
/// Blank lines separate instances; lines without `=` are ignored.
pub fn parse_attribute_blocks(output: &str) -> Vec<Attributes> {
    let mut instances = Vec::new();
    let mut current = Attributes::new();

    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                instances.push(std::mem::take(&mut current));
            }
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            current.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    if !current.is_empty() {
        instances.push(current);
    }

    instances
}
