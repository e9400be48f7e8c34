use std::sync::Arc;
use std::time::{Duration, Instant};

use hiveload_metrics::{MetricHandle, MetricKind};
use tokio::time::MissedTickBehavior;

use super::config::RunPlan;
use super::gate::IterationGate;
use super::progress::{ProgressFn, ProgressUpdate};
use crate::error::Result;
use crate::lifecycle::{LifecycleController, RunReport};
use crate::runner::WorkloadRunner;
use crate::workload::Workload;

struct ActiveVuGuard(MetricHandle);

impl ActiveVuGuard {
    fn enter(gauge: MetricHandle) -> Self {
        gauge.add_gauge(1);
        Self(gauge)
    }
}

impl Drop for ActiveVuGuard {
    fn drop(&mut self) {
        self.0.add_gauge(-1);
    }
}

/// Full lifecycle: setup, the workload phase, teardown, then the report.
///
/// Teardown is attempted even if the workload phase ended with a driver error.
pub async fn run_workload<W: Workload>(
    workload: Arc<W>,
    plan: RunPlan,
    runner: WorkloadRunner,
    progress: Option<ProgressFn>,
) -> Result<RunReport> {
    let controller = LifecycleController::new(runner.accountant().clone());

    let ctx = controller.setup(|| workload.setup()).await;
    tracing::info!(scenario = workload.name(), vus = plan.vus, "workload phase started");

    let phase_started = Instant::now();
    let driven = run_constant_vus(plan, runner, workload.clone(), progress).await;
    let workload_elapsed = phase_started.elapsed();

    controller.teardown(|| workload.teardown()).await;
    driven?;

    let mut report = controller.report(&ctx);
    report.workload_elapsed = workload_elapsed;
    Ok(report)
}

/// Runs `plan.vus` virtual users, each calling the workload's iteration until the
/// shared gate closes.
pub async fn run_constant_vus<W: Workload>(
    plan: RunPlan,
    runner: WorkloadRunner,
    workload: Arc<W>,
    progress: Option<ProgressFn>,
) -> Result<()> {
    let gate = Arc::new(IterationGate::for_plan(&plan));
    let started = Instant::now();
    gate.start_at(started);

    let vu_active = runner.metrics().and_then(|m| {
        let id = m.registry().register("vu_active", MetricKind::Gauge);
        m.registry().handle(id, &[("scenario", m.scenario())])
    });

    let mut handles = Vec::with_capacity(usize::try_from(plan.vus).unwrap_or(usize::MAX).min(4096));
    for vu_id in 1..=plan.vus {
        let gate = gate.clone();
        let runner = runner.clone();
        let workload = workload.clone();
        let vu_active = vu_active.clone();

        handles.push(tokio::spawn(async move {
            let _active = vu_active.map(ActiveVuGuard::enter);
            let mut iterations = 0u64;
            while gate.next() {
                runner
                    .run_checked(workload.check_names(), || workload.iteration())
                    .await;
                iterations += 1;
            }
            tracing::trace!(vu_id, iterations, "virtual user finished");
        }));
    }

    let progress_handle = progress.map(|progress| {
        let accountant = runner.accountant().clone();
        let scenario = workload.name().to_string();
        let vus = plan.vus;
        let duration = plan.duration;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            // The first tick is immediate; skip it so the first update covers ~1s.
            interval.tick().await;

            let mut tick: u64 = 0;
            let mut last_at = Instant::now();
            loop {
                interval.tick().await;

                tick = tick.saturating_add(1);
                let now = Instant::now();
                let dt = now.duration_since(last_at);
                last_at = now;

                let counters = accountant.counters();
                (progress)(ProgressUpdate {
                    tick,
                    interval: dt,
                    elapsed: started.elapsed(),
                    scenario: scenario.clone(),
                    vus,
                    duration,
                    iterations_total: counters.total(),
                    failures_total: counters.failure,
                    unique_errors: accountant.unique_errors(),
                });
            }
        })
    });

    let mut joined = Ok(());
    for h in handles {
        if let Err(err) = h.await
            && joined.is_ok()
        {
            joined = Err(err.into());
        }
    }

    if let Some(h) = progress_handle {
        h.abort();
        let _ = h.await;
    }

    tracing::debug!(
        iterations = gate.issued(),
        elapsed = ?started.elapsed(),
        "workload phase finished"
    );
    joined
}
