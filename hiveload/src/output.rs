use crate::cli::OutputFormat;
use hiveload_core::{OutcomeLabels, ProgressFn, RunPlan, RunReport};
use hiveload_metrics::{MetricSeriesSummary, MetricValue};

mod human;
mod json;

/// Everything printed at the end of a run.
pub(crate) struct RunSummary<'a> {
    pub scenario: &'a str,
    pub labels: OutcomeLabels,
    pub report: &'a RunReport,
    pub series: &'a [MetricSeriesSummary],
}

impl RunSummary<'_> {
    /// Per-check pass/fail counts, sorted by check name.
    pub(crate) fn checks(&self) -> Vec<CheckCounts> {
        let mut rows: Vec<CheckCounts> = Vec::new();

        for s in self.series.iter().filter(|s| s.name == "checks_total") {
            let MetricValue::Counter(count) = s.values else {
                continue;
            };
            let Some(name) = s.tag("name") else { continue };

            let idx = match rows.iter().position(|r| r.name == name) {
                Some(idx) => idx,
                None => {
                    rows.push(CheckCounts {
                        name: name.to_string(),
                        pass: 0,
                        fail: 0,
                    });
                    rows.len() - 1
                }
            };

            match s.tag("status") {
                Some("pass") => rows[idx].pass = rows[idx].pass.saturating_add(count),
                Some("fail") => rows[idx].fail = rows[idx].fail.saturating_add(count),
                _ => {}
            }
        }

        rows.sort_by(|a, b| a.name.cmp(&b.name));
        rows
    }

    /// Iteration latency histograms keyed by the `status` tag.
    pub(crate) fn latencies(&self) -> Vec<(&str, &hiveload_metrics::HistogramSummary)> {
        self.series
            .iter()
            .filter(|s| s.name == "iteration_duration")
            .filter_map(|s| match &s.values {
                MetricValue::Histogram(h) => Some((s.tag("status").unwrap_or("all"), h)),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CheckCounts {
    pub name: String,
    pub pass: u64,
    pub fail: u64,
}

pub(crate) trait OutputFormatter: Send + Sync {
    fn print_header(&self, scenario: &str, plan: &RunPlan);
    fn progress(&self) -> Option<ProgressFn>;
    fn print_summary(&self, summary: &RunSummary<'_>) -> anyhow::Result<()>;
}

pub(crate) fn formatter(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::HumanReadable => Box::new(human::HumanReadableOutput::new()),
        OutputFormat::Json => Box::new(json::JsonOutput::default()),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::time::{Duration, SystemTime};

    use hiveload_core::RunReport;
    use hiveload_metrics::{HistogramSummary, MetricKind, MetricSeriesSummary, MetricValue};

    pub(crate) fn report() -> RunReport {
        let start_time = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        RunReport {
            success_count: 7,
            failure_count: 3,
            unique_errors: 1,
            start_time,
            end_time: start_time + Duration::from_secs(2),
            elapsed: Duration::from_secs(2),
            workload_elapsed: Duration::from_secs(1),
        }
    }

    fn counter(name: &str, tags: &[(&str, &str)], value: u64) -> MetricSeriesSummary {
        MetricSeriesSummary {
            name: name.to_string(),
            kind: MetricKind::Counter,
            tags: tags
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            values: MetricValue::Counter(value),
        }
    }

    pub(crate) fn series() -> Vec<MetricSeriesSummary> {
        vec![
            counter(
                "checks_total",
                &[("name", "status was 200"), ("scenario", "get-user"), ("status", "fail")],
                3,
            ),
            counter(
                "checks_total",
                &[("name", "status was 200"), ("scenario", "get-user"), ("status", "pass")],
                7,
            ),
            MetricSeriesSummary {
                name: "iteration_duration".to_string(),
                kind: MetricKind::Histogram,
                tags: vec![
                    ("scenario".to_string(), "get-user".to_string()),
                    ("status".to_string(), "success".to_string()),
                ],
                values: MetricValue::Histogram(HistogramSummary {
                    p50: Some(1_500.0),
                    p90: Some(2_000.0),
                    p95: Some(2_500.0),
                    p99: Some(3_000.0),
                    min: Some(900.0),
                    max: Some(3_100.0),
                    mean: Some(1_600.0),
                    count: 7,
                }),
            },
        ]
    }
}
