//! Verdict evaluation.
//!
//! A pure function of the collected facts, the diagnostic outcome and the
//! requirement profile. All thresholds are inclusive.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use super::facts::RawFacts;
use super::report::{DiagnosticReport, NumericVersion};
use super::Target;
use crate::config::RequirementProfile;
use crate::error::FleetError;

/// Readiness tier, ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    NotReady,
    TierA,
    TierB,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Tier::NotReady => "Not ready",
            Tier::TierA => "Tier A",
            Tier::TierB => "Tier B",
        };
        f.write_str(label)
    }
}

/// Why a diagnostic report is missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DiagnosticFailure {
    /// The tool could not be launched.
    Rejected { code: Option<u32>, message: String },
    /// The output did not appear in time.
    TimedOut { waited_secs: f64 },
    /// The output could not be read or interpreted.
    Malformed { reason: String },
}

impl From<FleetError> for DiagnosticFailure {
    fn from(error: FleetError) -> Self {
        match error {
            FleetError::InvocationRejected { code, message, .. } => {
                DiagnosticFailure::Rejected { code, message }
            }
            FleetError::InvocationTimeout { waited, .. } => DiagnosticFailure::TimedOut {
                waited_secs: waited.as_secs_f64(),
            },
            FleetError::MalformedOutput { reason } => DiagnosticFailure::Malformed { reason },
            other => DiagnosticFailure::Rejected {
                code: None,
                message: other.to_string(),
            },
        }
    }
}

impl fmt::Display for DiagnosticFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticFailure::Rejected {
                code: Some(code),
                message,
            } => write!(f, "rejected (code {}): {}", code, message),
            DiagnosticFailure::Rejected { code: None, message } => {
                write!(f, "rejected: {}", message)
            }
            DiagnosticFailure::TimedOut { waited_secs } => {
                write!(f, "timed out after {:.1}s", waited_secs)
            }
            DiagnosticFailure::Malformed { reason } => write!(f, "malformed output: {}", reason),
        }
    }
}

/// Result of the diagnostic step for one target.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "lowercase")]
pub enum DiagnosticOutcome {
    /// The profile skips the diagnostic.
    Skipped,
    Reported(DiagnosticReport),
    Unavailable(DiagnosticFailure),
}

impl DiagnosticOutcome {
    /// The report, only when one was produced.
    pub fn report(&self) -> Option<&DiagnosticReport> {
        match self {
            DiagnosticOutcome::Reported(report) => Some(report),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&DiagnosticFailure> {
        match self {
            DiagnosticOutcome::Unavailable(failure) => Some(failure),
            _ => None,
        }
    }
}

/// The six pass/fail criteria.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Criteria {
    pub clock_speed: bool,
    pub tier_a_memory: bool,
    pub tier_b_memory: bool,
    pub tier_a_disk: bool,
    pub tier_b_disk: bool,
    pub diagnostic: bool,
}

impl Criteria {
    /// Names of the criteria that were not met.
    pub fn unmet(&self) -> Vec<&'static str> {
        [
            ("clock-speed", self.clock_speed),
            ("tier-a-memory", self.tier_a_memory),
            ("tier-b-memory", self.tier_b_memory),
            ("tier-a-disk", self.tier_a_disk),
            ("tier-b-disk", self.tier_b_disk),
            ("diagnostic", self.diagnostic),
        ]
        .into_iter()
        .filter(|(_, met)| !met)
        .map(|(name, _)| name)
        .collect()
    }
}

/// Full assessment of one target.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentRecord {
    pub target: Target,
    pub facts: RawFacts,
    pub diagnostic: DiagnosticOutcome,
    pub criteria: Criteria,
    pub ready: bool,
    pub tier: Tier,
    pub assessed_at: DateTime<Utc>,
}

/// Apply the profile thresholds to one target's facts.
pub fn evaluate(
    target: &Target,
    facts: RawFacts,
    diagnostic: DiagnosticOutcome,
    profile: &RequirementProfile,
) -> AssessmentRecord {
    let memory_gb = facts.memory_gb();
    let disk_gb = facts.free_disk_gb();

    let criteria = Criteria {
        clock_speed: facts.max_clock_mhz >= profile.min_clock_mhz,
        tier_a_memory: memory_gb >= profile.tier_a_memory_gb,
        tier_b_memory: memory_gb >= profile.tier_b_memory_gb,
        tier_a_disk: disk_gb >= profile.tier_a_disk_gb,
        tier_b_disk: disk_gb >= profile.tier_b_disk_gb,
        diagnostic: profile.skip_diagnostic || diagnostic_met(&diagnostic, profile),
    };

    let ready = criteria.clock_speed
        && criteria.tier_a_memory
        && criteria.tier_a_disk
        && criteria.diagnostic;

    let tier = if !ready {
        Tier::NotReady
    } else if criteria.tier_b_memory && criteria.tier_b_disk && facts.is_64_bit() {
        Tier::TierB
    } else {
        Tier::TierA
    };

    AssessmentRecord {
        target: target.clone(),
        facts,
        diagnostic,
        criteria,
        ready,
        tier,
        assessed_at: Utc::now(),
    }
}

fn diagnostic_met(outcome: &DiagnosticOutcome, profile: &RequirementProfile) -> bool {
    let Some(report) = outcome.report() else {
        return false;
    };
    let (Some(min_interface), Some(min_driver)) = (
        NumericVersion::parse(&profile.min_interface_version),
        NumericVersion::parse(&profile.min_driver_model),
    ) else {
        tracing::warn!("Profile minimum versions are not numeric; diagnostic cannot pass");
        return false;
    };

    report.interface_version.meets(&min_interface) && report.driver_model.meets(&min_driver)
}
