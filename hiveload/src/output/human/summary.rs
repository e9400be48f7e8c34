use std::fmt::Write as _;

use super::format::{format_duration, format_micros_opt, format_rate, format_timestamp};
use crate::output::RunSummary;

pub(crate) fn render(summary: &RunSummary<'_>) -> String {
    let mut out = String::new();
    let report = summary.report;

    out.push_str("summary\n");
    writeln!(out, "scenario: {}", summary.scenario).ok();
    writeln!(out, "  started: {}", format_timestamp(report.start_time)).ok();
    writeln!(out, "  ended: {}", format_timestamp(report.end_time)).ok();
    writeln!(out, "  elapsed: {}", format_duration(report.elapsed)).ok();
    writeln!(out, "  {}: {}", summary.labels.success, report.success_count).ok();
    writeln!(out, "  {}: {}", summary.labels.failure, report.failure_count).ok();
    writeln!(out, "  unique_errors: {}", report.unique_errors).ok();

    let total = report.success_count.saturating_add(report.failure_count);
    let secs = report.workload_elapsed.as_secs_f64().max(1e-9);
    writeln!(out, "  rate: iters/s={}", format_rate((total as f64) / secs)).ok();

    let latencies = summary.latencies();
    if latencies.is_empty() {
        out.push_str("  latency: n/a\n");
    }
    for (status, h) in latencies {
        writeln!(
            out,
            "  latency{{status={status}}} = p50={} p90={} p99={} mean={} max={} (n={})",
            format_micros_opt(h.p50),
            format_micros_opt(h.p90),
            format_micros_opt(h.p99),
            format_micros_opt(h.mean),
            format_micros_opt(h.max),
            h.count
        )
        .ok();
    }

    let checks = summary.checks();
    if !checks.is_empty() {
        out.push_str("\nchecks\n");
        for c in checks {
            let status = if c.fail > 0 { "FAIL" } else { "OK" };
            writeln!(out, "  {}: pass={} fail={} [{status}]", c.name, c.pass, c.fail).ok();
        }
    }

    out
}
