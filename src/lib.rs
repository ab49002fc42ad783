//! Fleetcheck - hardware readiness assessment for a fleet of hosts.
//!
//! Fleetcheck collects processor, memory, disk and graphics diagnostic
//! facts from each host, local or remote, and grades every host against a
//! configurable requirement profile.
//!
//! # Modules
//!
//! - [`assessment`] - Fact collection, diagnostics, verdicts and fan-out
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, parsing, and validation
//! - [`error`] - Error types and result aliases
//! - [`shell`] - External command execution
//! - [`transport`] - Local and remote host access
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use fleetcheck::assessment::{evaluate, DiagnosticOutcome, RawFacts, Target, Tier};
//! use fleetcheck::config::RequirementProfile;
//!
//! let facts = RawFacts {
//!     address_width: 64,
//!     data_width: 64,
//!     max_clock_mhz: 2000,
//!     total_memory_bytes: 2 * 1024 * 1024 * 1024,
//!     free_disk_bytes: 21 * 1024 * 1024 * 1024,
//!     os_name: "Windows 7 Professional".to_string(),
//!     system_drive: "C:".to_string(),
//! };
//! let profile = RequirementProfile {
//!     skip_diagnostic: true,
//!     ..Default::default()
//! };
//!
//! let record = evaluate(&Target::new("ws-001"), facts, DiagnosticOutcome::Skipped, &profile);
//! assert!(record.ready);
//! assert_eq!(record.tier, Tier::TierB);
//! ```

pub mod assessment;
pub mod cli;
pub mod config;
pub mod error;
pub mod shell;
pub mod transport;
pub mod ui;

pub use error::{FleetError, Result};
