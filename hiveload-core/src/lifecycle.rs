use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant, SystemTime};

use tokio::sync::OnceCell;

use crate::accountant::OutcomeAccountant;
use crate::guard::catch_failure;
use crate::workload::BoxError;

/// Captured once setup has finished.
#[derive(Debug, Clone, Copy)]
pub struct RunContext {
    start_time: SystemTime,
    started_at: Instant,
}

impl RunContext {
    fn now() -> Self {
        Self {
            start_time: SystemTime::now(),
            started_at: Instant::now(),
        }
    }

    pub fn start_time(&self) -> SystemTime {
        self.start_time
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

/// Everything a report consumer needs to render the end-of-run summary.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub success_count: u64,
    pub failure_count: u64,
    pub unique_errors: usize,
    pub start_time: SystemTime,
    pub end_time: SystemTime,
    /// From setup to the report, teardown included.
    pub elapsed: Duration,
    /// Iteration phase only; rates are computed against this.
    pub workload_elapsed: Duration,
}

/// Runs setup and teardown exactly once each and produces the final report.
///
/// Phase failures are logged through the accountant's unique-error path and
/// otherwise ignored; the run always proceeds.
#[derive(Debug)]
pub struct LifecycleController {
    accountant: Arc<OutcomeAccountant>,
    context: OnceCell<RunContext>,
    torn_down: AtomicBool,
}

impl LifecycleController {
    pub fn new(accountant: Arc<OutcomeAccountant>) -> Self {
        Self {
            accountant,
            context: OnceCell::new(),
            torn_down: AtomicBool::new(false),
        }
    }

    /// Runs `prepare` on the first call and returns the resulting context.
    ///
    /// Later calls return the same context without invoking their callback.
    pub async fn setup<F, Fut>(&self, prepare: F) -> RunContext
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), BoxError>>,
    {
        let ctx = self
            .context
            .get_or_init(|| async move {
                tracing::debug!("setup phase started");
                if let Err(message) = catch_failure(async move { prepare().await }).await {
                    self.accountant
                        .log_unique_error(&format!("failed to run setup phase: {message}"));
                }
                RunContext::now()
            })
            .await;
        *ctx
    }

    pub fn context(&self) -> Option<RunContext> {
        self.context.get().copied()
    }

    /// Runs `cleanup` if teardown has not happened yet. Returns whether it ran.
    pub async fn teardown<F, Fut>(&self, cleanup: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), BoxError>>,
    {
        if self.torn_down.swap(true, Ordering::AcqRel) {
            tracing::debug!("teardown already ran; skipping");
            return false;
        }

        tracing::debug!("teardown phase started");
        if let Err(message) = catch_failure(async move { cleanup().await }).await {
            self.accountant
                .log_unique_error(&format!("failed to run teardown phase: {message}"));
        }
        true
    }

    /// Snapshot of the counters; the end time is taken now.
    pub fn report(&self, ctx: &RunContext) -> RunReport {
        let counters = self.accountant.counters();
        RunReport {
            success_count: counters.success,
            failure_count: counters.failure,
            unique_errors: self.accountant.unique_errors(),
            start_time: ctx.start_time,
            end_time: SystemTime::now(),
            elapsed: ctx.elapsed(),
            workload_elapsed: ctx.elapsed(),
        }
    }
}
