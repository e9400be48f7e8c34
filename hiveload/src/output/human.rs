use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

mod format;
mod progress;
mod summary;

use format::{format_duration, format_rate};
use progress::HumanProgress;
use summary::render;

use super::{OutputFormatter, RunSummary};

pub(crate) struct HumanReadableOutput {
    progress: Arc<HumanProgress>,
}

impl HumanReadableOutput {
    pub(crate) fn new() -> Self {
        Self {
            progress: Arc::new(HumanProgress::new()),
        }
    }
}

impl OutputFormatter for HumanReadableOutput {
    fn print_header(&self, scenario: &str, plan: &hiveload_core::RunPlan) {
        let iterations = plan
            .iterations
            .map_or_else(|| "unbounded".to_string(), |n| n.to_string());
        let duration = plan
            .duration
            .map_or_else(|| "none".to_string(), format_duration);
        println!(
            "scenario: {scenario} vus={} iterations={iterations} duration={duration}",
            plan.vus
        );
        println!();
    }

    fn progress(&self) -> Option<hiveload_core::ProgressFn> {
        let progress = self.progress.clone();
        let prev_iters = Arc::new(AtomicU64::new(0));
        let prev_failures = Arc::new(AtomicU64::new(0));

        Some(Arc::new(move |u| {
            let dt = u.interval.as_secs_f64().max(1e-9);
            let iters_delta = u
                .iterations_total
                .saturating_sub(prev_iters.swap(u.iterations_total, Ordering::Relaxed));
            let failures_delta = u
                .failures_total
                .saturating_sub(prev_failures.swap(u.failures_total, Ordering::Relaxed));

            let message = format!(
                "vus={} elapsed={} iters/s={} failed={failures_delta}/{} unique_errors={}",
                u.vus,
                format_duration(u.elapsed),
                format_rate((iters_delta as f64) / dt),
                u.failures_total,
                u.unique_errors,
            );

            progress.update(&u.scenario, u.duration, u.elapsed, message);
        }))
    }

    fn print_summary(&self, summary: &RunSummary<'_>) -> anyhow::Result<()> {
        self.progress.finish();
        print!("{}", render(summary));
        Ok(())
    }
}
