//! Shared display helpers for assessment output.

use crate::assessment::facts::BYTES_PER_GB;
use crate::assessment::{
    AssessmentRecord, DiagnosticFailure, DiagnosticOutcome, TargetOutcome, Tier,
};
use crate::ui::{Align, Table};

/// Bytes as GB with one decimal.
pub fn format_gb(bytes: u64) -> String {
    format!("{:.1}", bytes as f64 / BYTES_PER_GB as f64)
}

/// Short description of a diagnostic outcome for a table cell.
pub fn diagnostic_cell(outcome: &DiagnosticOutcome) -> String {
    match outcome {
        DiagnosticOutcome::Skipped => "skipped".to_string(),
        DiagnosticOutcome::Reported(report) => {
            format!("{} / {}", report.interface_version, report.driver_model)
        }
        DiagnosticOutcome::Unavailable(failure) => match failure {
            DiagnosticFailure::Rejected { .. } => "rejected".to_string(),
            DiagnosticFailure::TimedOut { .. } => "timed out".to_string(),
            DiagnosticFailure::Malformed { .. } => "malformed".to_string(),
        },
    }
}

/// One row per record, in the given order.
pub fn results_table<'a>(records: impl IntoIterator<Item = &'a AssessmentRecord>) -> Table {
    let mut table = Table::new(vec![
        "Host",
        "Clock (MHz)",
        "Memory (GB)",
        "Free disk (GB)",
        "Bits",
        "Diagnostic",
        "Tier",
    ])
    .align(1, Align::Right)
    .align(2, Align::Right)
    .align(3, Align::Right)
    .align(4, Align::Right);

    for record in records {
        let facts = &record.facts;
        table.add_row(&[
            record.target.name().to_string(),
            facts.max_clock_mhz.to_string(),
            format_gb(facts.total_memory_bytes),
            format_gb(facts.free_disk_bytes),
            facts.data_width.to_string(),
            diagnostic_cell(&record.diagnostic),
            record.tier.to_string(),
        ]);
    }

    table
}

/// Counts over a set of outcomes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub total: usize,
    pub ready: usize,
    pub tier_a: usize,
    pub tier_b: usize,
    pub skipped: usize,
}

impl Tally {
    pub fn from_outcomes(outcomes: &[TargetOutcome]) -> Self {
        outcomes.iter().fold(
            Tally {
                total: outcomes.len(),
                ..Default::default()
            },
            |mut tally, outcome| {
                match outcome.record() {
                    None => tally.skipped += 1,
                    Some(record) => match record.tier {
                        Tier::TierB => {
                            tally.ready += 1;
                            tally.tier_b += 1;
                        }
                        Tier::TierA => {
                            tally.ready += 1;
                            tally.tier_a += 1;
                        }
                        Tier::NotReady => {}
                    },
                }
                tally
            },
        )
    }

    /// Whether every target was assessed and is ready.
    pub fn all_ready(&self) -> bool {
        self.total > 0 && self.ready == self.total
    }

    pub fn summary(&self) -> String {
        let mut line = format!(
            "{} of {} host(s) ready ({} Tier B, {} Tier A)",
            self.ready, self.total, self.tier_b, self.tier_a
        );
        if self.skipped > 0 {
            line.push_str(&format!(", {} skipped", self.skipped));
        }
        line
    }
}
