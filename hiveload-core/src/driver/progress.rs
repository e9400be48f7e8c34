use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    pub tick: u64,
    pub interval: Duration,
    pub elapsed: Duration,
    pub scenario: String,
    pub vus: u64,
    /// Total configured run length, when running in duration mode.
    pub duration: Option<Duration>,
    pub iterations_total: u64,
    pub failures_total: u64,
    pub unique_errors: usize,
}

pub type ProgressFn = Arc<dyn Fn(ProgressUpdate) + Send + Sync + 'static>;
