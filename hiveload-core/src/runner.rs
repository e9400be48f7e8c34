use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use hiveload_metrics::{MetricId, MetricKind, Registry};

use crate::accountant::OutcomeAccountant;
use crate::guard::catch_failure;
use crate::outcome::{IntoOutcome, Outcome};
use crate::workload::BoxError;

/// Metric ids the runner writes to for every iteration.
#[derive(Debug, Clone)]
pub struct IterationMetrics {
    registry: Arc<Registry>,
    scenario: Arc<str>,
    iterations_total: MetricId,
    /// Iteration duration in microseconds.
    iteration_duration: MetricId,
    checks_total: MetricId,
}

impl IterationMetrics {
    pub fn register(registry: Arc<Registry>, scenario: &str) -> Self {
        Self {
            iterations_total: registry.register("iterations_total", MetricKind::Counter),
            iteration_duration: registry.register("iteration_duration", MetricKind::Histogram),
            checks_total: registry.register("checks_total", MetricKind::Counter),
            scenario: Arc::from(scenario),
            registry,
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    fn record_iteration(&self, success: bool, duration: Duration) {
        let status = if success { "success" } else { "failure" };
        let tags = [("scenario", self.scenario.as_ref()), ("status", status)];

        if let Some(c) = self.registry.handle(self.iterations_total, &tags) {
            c.increment(1);
        }
        if let Some(h) = self.registry.handle(self.iteration_duration, &tags) {
            h.observe(duration.as_micros().try_into().unwrap_or(u64::MAX));
        }
    }

    fn record_check(&self, name: &str, passed: bool) {
        let status = if passed { "pass" } else { "fail" };
        let tags = [
            ("scenario", self.scenario.as_ref()),
            ("name", name),
            ("status", status),
        ];
        if let Some(c) = self.registry.handle(self.checks_total, &tags) {
            c.increment(1);
        }
    }
}

/// Executes one iteration per call and forwards its outcome to the accountant.
///
/// Failures never escape `run`: an `Err` or a panic inside the iteration becomes
/// `Outcome::Failure` and the next call starts from a clean slate.
#[derive(Debug, Clone)]
pub struct WorkloadRunner {
    accountant: Arc<OutcomeAccountant>,
    metrics: Option<IterationMetrics>,
}

impl WorkloadRunner {
    pub fn new(accountant: Arc<OutcomeAccountant>) -> Self {
        Self {
            accountant,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: IterationMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn accountant(&self) -> &Arc<OutcomeAccountant> {
        &self.accountant
    }

    pub fn metrics(&self) -> Option<&IterationMetrics> {
        self.metrics.as_ref()
    }

    pub async fn run<F, Fut, R>(&self, iteration: F) -> Outcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<R, BoxError>>,
        R: IntoOutcome,
    {
        self.run_checked(&[], iteration).await
    }

    /// Like [`run`](Self::run), but an `Err` or panic also records every name in
    /// `checks_on_error` as a failed check.
    pub async fn run_checked<F, Fut, R>(&self, checks_on_error: &[&str], iteration: F) -> Outcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<R, BoxError>>,
        R: IntoOutcome,
    {
        let started = Instant::now();

        let outcome = match catch_failure(async move { iteration().await }).await {
            Ok(report) => {
                if let Some(m) = &self.metrics {
                    for check in report.checks() {
                        m.record_check(&check.name, check.passed);
                    }
                }
                report.into_outcome()
            }
            Err(message) => {
                if let Some(m) = &self.metrics {
                    for name in checks_on_error {
                        m.record_check(name, false);
                    }
                }
                Outcome::Failure(format!("failed to run test: {message}"))
            }
        };

        if let Some(m) = &self.metrics {
            m.record_iteration(outcome.is_success(), started.elapsed());
        }

        self.accountant.record(&outcome);
        outcome
    }
}
