//! Assessment orchestration.
//!
//! Each target runs through collect, invoke, parse and evaluate. Targets are
//! independent: a pool of worker threads pulls them from a shared queue and
//! sends one [`TargetOutcome`] per target back over a channel, which the
//! caller consumes lazily through [`AssessmentStream`].

use serde::{Serialize, Serializer};
use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use super::facts::HostFactCollector;
use super::invoker::DiagnosticInvoker;
use super::report;
use super::verdict::{evaluate, AssessmentRecord, DiagnosticOutcome};
use super::Target;
use crate::config::{FleetConfig, InvokerSettings, RequirementProfile};
use crate::error::FleetError;
use crate::transport::{HostTransport, QueryTransport, RemoteFiles};

/// What happened to one target.
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum TargetOutcome {
    Assessed(AssessmentRecord),
    /// Fact collection failed; no record exists for the target.
    Skipped {
        target: Target,
        #[serde(serialize_with = "error_message")]
        error: FleetError,
    },
}

impl TargetOutcome {
    pub fn target(&self) -> &Target {
        match self {
            TargetOutcome::Assessed(record) => &record.target,
            TargetOutcome::Skipped { target, .. } => target,
        }
    }

    pub fn record(&self) -> Option<&AssessmentRecord> {
        match self {
            TargetOutcome::Assessed(record) => Some(record),
            TargetOutcome::Skipped { .. } => None,
        }
    }

    pub fn into_record(self) -> Option<AssessmentRecord> {
        match self {
            TargetOutcome::Assessed(record) => Some(record),
            TargetOutcome::Skipped { .. } => None,
        }
    }

    /// Whether the target was assessed and is ready.
    pub fn is_ready(&self) -> bool {
        self.record().is_some_and(|record| record.ready)
    }
}

fn error_message<S: Serializer>(error: &FleetError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Runs assessments over a set of targets.
pub struct Assessor {
    profile: Arc<RequirementProfile>,
    invoker: Arc<DiagnosticInvoker>,
    transport: Arc<dyn QueryTransport>,
    parallelism: usize,
}

impl Assessor {
    /// Create an assessor over explicit transports.
    pub fn new(
        profile: RequirementProfile,
        invoker_settings: InvokerSettings,
        identity: impl Into<String>,
        transport: Arc<dyn QueryTransport>,
        files: Arc<dyn RemoteFiles>,
    ) -> Self {
        let invoker = DiagnosticInvoker::new(invoker_settings, identity, transport.clone(), files);
        Self {
            profile: Arc::new(profile),
            invoker: Arc::new(invoker),
            transport,
            parallelism: 1,
        }
    }

    /// Create an assessor using the host transports described by `config`.
    pub fn from_config(config: &FleetConfig) -> Self {
        let transport = Arc::new(HostTransport::new(&config.transport));
        let identity = transport.identity().to_string();
        Self::new(
            config.profile.clone(),
            config.invoker.clone(),
            identity,
            transport.clone(),
            transport,
        )
        .with_parallelism(config.settings.parallelism)
    }

    /// Set the maximum number of concurrent workers (at least one).
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism.max(1);
        self
    }

    pub fn profile(&self) -> &RequirementProfile {
        &self.profile
    }

    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    /// Assess a single target on the calling thread.
    pub fn assess_one(&self, target: &Target) -> TargetOutcome {
        assess_target(target, self.transport.as_ref(), &self.invoker, &self.profile)
    }

    /// Start assessing `targets` and return a stream of outcomes.
    ///
    /// Outcomes arrive in completion order, one per target.
    pub fn assess(&self, targets: &[Target]) -> AssessmentStream {
        let queue: Arc<Mutex<VecDeque<Target>>> =
            Arc::new(Mutex::new(targets.iter().cloned().collect()));
        let (sender, receiver) = mpsc::channel();
        let workers = self.parallelism.min(targets.len());

        tracing::debug!(
            "Assessing {} target(s) with {} worker(s)",
            targets.len(),
            workers
        );

        let handles = (0..workers)
            .map(|_| {
                let queue = Arc::clone(&queue);
                let sender = sender.clone();
                let transport = Arc::clone(&self.transport);
                let invoker = Arc::clone(&self.invoker);
                let profile = Arc::clone(&self.profile);
                thread::spawn(move || {
                    work(&queue, &sender, transport.as_ref(), &invoker, &profile)
                })
            })
            .collect();

        AssessmentStream {
            receiver,
            workers: handles,
            remaining: targets.len(),
        }
    }
}

fn work(
    queue: &Mutex<VecDeque<Target>>,
    sender: &Sender<TargetOutcome>,
    transport: &dyn QueryTransport,
    invoker: &DiagnosticInvoker,
    profile: &RequirementProfile,
) {
    loop {
        let next = match queue.lock() {
            Ok(mut pending) => pending.pop_front(),
            Err(_) => None,
        };
        let Some(target) = next else {
            return;
        };

        let outcome = assess_target(&target, transport, invoker, profile);
        if sender.send(outcome).is_err() {
            tracing::debug!("Assessment stream dropped, stopping worker");
            return;
        }
    }
}

/// One target through the whole pipeline.
fn assess_target(
    target: &Target,
    transport: &dyn QueryTransport,
    invoker: &DiagnosticInvoker,
    profile: &RequirementProfile,
) -> TargetOutcome {
    tracing::debug!("Collecting facts for {}", target);
    let facts = match HostFactCollector::new(transport).collect(target) {
        Ok(facts) => facts,
        Err(error) => {
            tracing::warn!("Skipping {}: {}", target, error);
            return TargetOutcome::Skipped {
                target: target.clone(),
                error,
            };
        }
    };

    let diagnostic = if profile.skip_diagnostic {
        DiagnosticOutcome::Skipped
    } else {
        tracing::debug!("Running diagnostic on {}", target);
        match invoker
            .invoke(target)
            .and_then(|raw| report::parse(&raw))
        {
            Ok(report) => DiagnosticOutcome::Reported(report),
            Err(error) => {
                tracing::warn!("Diagnostic unavailable on {}: {}", target, error);
                DiagnosticOutcome::Unavailable(error.into())
            }
        }
    };

    let record = evaluate(target, facts, diagnostic, profile);
    tracing::info!("{}: {}", target, record.tier);
    TargetOutcome::Assessed(record)
}

/// Lazy stream of outcomes from a running assessment.
pub struct AssessmentStream {
    receiver: Receiver<TargetOutcome>,
    workers: Vec<JoinHandle<()>>,
    remaining: usize,
}

impl AssessmentStream {
    /// Only the assessed records, dropping skipped targets.
    pub fn records(self) -> impl Iterator<Item = AssessmentRecord> {
        self.filter_map(TargetOutcome::into_record)
    }

    /// Number of outcomes not yet received.
    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

impl Iterator for AssessmentStream {
    type Item = TargetOutcome;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        match self.receiver.recv() {
            Ok(outcome) => {
                self.remaining -= 1;
                Some(outcome)
            }
            Err(_) => {
                for handle in self.workers.drain(..) {
                    if handle.join().is_err() {
                        tracing::warn!("Assessment worker panicked");
                    }
                }
                self.remaining = 0;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}
