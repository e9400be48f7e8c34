use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write as _;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::{OutputFormatter, RunSummary};

#[derive(Default)]
pub(crate) struct JsonOutput {
    prev_iterations: Arc<AtomicU64>,
}

impl OutputFormatter for JsonOutput {
    fn print_header(&self, _scenario: &str, _plan: &hiveload_core::RunPlan) {}

    fn progress(&self) -> Option<hiveload_core::ProgressFn> {
        let prev_iterations = self.prev_iterations.clone();
        Some(Arc::new(move |u| {
            let prev = prev_iterations.swap(u.iterations_total, Ordering::Relaxed);
            let line = build_progress_line(&u, prev);
            emit_json_line(&line);
        }))
    }

    fn print_summary(&self, summary: &RunSummary<'_>) -> anyhow::Result<()> {
        let line = build_summary_line(summary);
        emit_json_line(&line);
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct JsonProgressLine {
    pub kind: &'static str,
    pub scenario: String,
    pub tick: u64,
    pub elapsed_secs: u64,
    pub interval_secs: f64,
    pub vus: u64,
    pub iterations_total: u64,
    pub failures_total: u64,
    pub unique_errors: usize,
    pub iterations_per_sec: f64,
}

fn build_progress_line(u: &hiveload_core::ProgressUpdate, prev_iterations: u64) -> JsonProgressLine {
    let dt = u.interval.as_secs_f64().max(1e-9);
    let delta = u.iterations_total.saturating_sub(prev_iterations);

    JsonProgressLine {
        kind: "progress",
        scenario: u.scenario.clone(),
        tick: u.tick,
        elapsed_secs: u.elapsed.as_secs(),
        interval_secs: u.interval.as_secs_f64(),
        vus: u.vus,
        iterations_total: u.iterations_total,
        failures_total: u.failures_total,
        unique_errors: u.unique_errors,
        iterations_per_sec: (delta as f64) / dt,
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct JsonSummaryLine {
    pub kind: &'static str,
    pub scenario: String,
    pub started: String,
    pub ended: String,
    pub elapsed_secs: f64,
    pub workload_elapsed_secs: f64,
    /// Success and failure counts under the workload's own names.
    pub counters: BTreeMap<&'static str, u64>,
    pub unique_errors: usize,
    pub checks: Vec<JsonCheck>,
    pub latency: BTreeMap<String, JsonLatency>,
}

#[derive(Debug, Serialize)]
pub(crate) struct JsonCheck {
    pub name: String,
    pub pass: u64,
    pub fail: u64,
}

#[derive(Debug, Serialize)]
pub(crate) struct JsonLatency {
    pub count: u64,
    pub p50_us: Option<f64>,
    pub p90_us: Option<f64>,
    pub p95_us: Option<f64>,
    pub p99_us: Option<f64>,
    pub mean_us: Option<f64>,
    pub max_us: Option<f64>,
}

fn build_summary_line(summary: &RunSummary<'_>) -> JsonSummaryLine {
    let report = summary.report;

    let mut counters = BTreeMap::new();
    counters.insert(summary.labels.success, report.success_count);
    counters.insert(summary.labels.failure, report.failure_count);

    let checks = summary
        .checks()
        .into_iter()
        .map(|c| JsonCheck {
            name: c.name,
            pass: c.pass,
            fail: c.fail,
        })
        .collect();

    let latency = summary
        .latencies()
        .into_iter()
        .map(|(status, h)| {
            (
                status.to_string(),
                JsonLatency {
                    count: h.count,
                    p50_us: h.p50,
                    p90_us: h.p90,
                    p95_us: h.p95,
                    p99_us: h.p99,
                    mean_us: h.mean,
                    max_us: h.max,
                },
            )
        })
        .collect();

    JsonSummaryLine {
        kind: "summary",
        scenario: summary.scenario.to_string(),
        started: humantime::format_rfc3339_seconds(report.start_time).to_string(),
        ended: humantime::format_rfc3339_seconds(report.end_time).to_string(),
        elapsed_secs: report.elapsed.as_secs_f64(),
        workload_elapsed_secs: report.workload_elapsed.as_secs_f64(),
        counters,
        unique_errors: report.unique_errors,
        checks,
        latency,
    }
}

fn emit_json_line<T: Serialize>(line: &T) {
    let mut stdout = std::io::stdout().lock();
    if serde_json::to_writer(&mut stdout, line).is_ok() {
        let _ = stdout.write_all(b"\n");
        let _ = stdout.flush();
    }
}
