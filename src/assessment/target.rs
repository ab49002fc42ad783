//! Assessment targets and host locality.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Names that always refer to the machine running the assessment.
const LOOPBACK_ALIASES: &[&str] = &["localhost", ".", "127.0.0.1", "::1"];

/// A host to be assessed, identified by name or address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Target(String);

impl Target {
    /// Create a target from a host name or address.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into().trim().to_string())
    }

    /// The host name or address.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Whether this target is the host identified by `local_identity`.
    ///
    /// Host names compare case-insensitively, and loopback aliases are
    /// always local. A bare name matches a qualified one by its first
    /// label; two qualified names must match in full.
    pub fn is_local(&self, local_identity: &str) -> bool {
        let name = self.0.as_str();
        if LOOPBACK_ALIASES
            .iter()
            .any(|alias| name.eq_ignore_ascii_case(alias))
            || name.eq_ignore_ascii_case(local_identity)
        {
            return true;
        }
        if is_qualified(name) && is_qualified(local_identity) {
            return false;
        }
        short_name(name).eq_ignore_ascii_case(short_name(local_identity))
    }

    /// Whether the name would be read as an option by `ssh` or `ping`.
    pub fn is_option_like(&self) -> bool {
        self.0.starts_with('-')
    }

    /// Which invocation strategy applies to this target.
    pub fn locality(&self, local_identity: &str) -> Locality {
        if self.is_local(local_identity) {
            Locality::Local
        } else {
            Locality::Remote
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Target {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// Where a target runs relative to the assessing machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locality {
    Local,
    Remote,
}

/// First label of a host name, unless the name is an IP address.
fn short_name(name: &str) -> &str {
    if name.parse::<std::net::IpAddr>().is_ok() {
        return name;
    }
    name.split('.').next().unwrap_or(name)
}

/// Whether `name` is a host name carrying a domain suffix.
fn is_qualified(name: &str) -> bool {
    name.contains('.') && name.parse::<std::net::IpAddr>().is_err()
}

/// The host name of the machine running the assessment.
pub fn local_identity() -> String {
    sysinfo::System::host_name()
        .or_else(|| std::env::var("COMPUTERNAME").ok())
        .or_else(|| std::env::var("HOSTNAME").ok())
        .unwrap_or_else(|| "localhost".to_string())
}

/// Parse a target list: one host per line, `#` starts a comment.
pub fn parse_target_list(content: &str) -> Vec<Target> {
    content
        .lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|line| !line.is_empty())
        .map(Target::new)
        .collect()
}
