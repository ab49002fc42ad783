//! Fleet capability assessment.
//!
//! For each target the engine collects hardware facts, optionally runs the
//! diagnostic tool and parses its report, then evaluates everything against
//! a [`RequirementProfile`] into an [`AssessmentRecord`]:
//!
//! - [`facts`] - host fact collection
//! - [`invoker`] - diagnostic tool invocation, local or remote
//! - [`report`] - diagnostic report parsing
//! - [`verdict`] - threshold evaluation and tiering
//! - [`orchestrator`] - per-target pipeline and fan-out

pub mod facts;
pub mod invoker;
pub mod orchestrator;
pub mod report;
pub mod target;
pub mod verdict;

pub use crate::config::RequirementProfile;
pub use facts::{HostFactCollector, RawFacts};
pub use invoker::{DiagnosticInvoker, Invocation, InvocationState};
pub use orchestrator::{AssessmentStream, Assessor, TargetOutcome};
pub use report::{parse, DiagnosticReport, NumericVersion, VersionReading};
pub use target::{Locality, Target};
pub use verdict::{evaluate, AssessmentRecord, Criteria, DiagnosticFailure, DiagnosticOutcome, Tier};
