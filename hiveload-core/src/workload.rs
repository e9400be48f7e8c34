use std::future::Future;

use crate::checks::Checks;

/// Error type returned by workload code. Only its `Display` text is kept.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Report names for the success and failure counters of a workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutcomeLabels {
    pub success: &'static str,
    pub failure: &'static str,
}

impl Default for OutcomeLabels {
    fn default() -> Self {
        Self {
            success: "successful_iterations",
            failure: "failed_iterations",
        }
    }
}

/// A load-test workload: optional one-time setup/teardown plus a per-tick iteration.
pub trait Workload: Send + Sync + 'static {
    /// Scenario name used in output and metric tags.
    fn name(&self) -> &str;

    fn outcome_labels(&self) -> OutcomeLabels {
        OutcomeLabels::default()
    }

    fn setup(&self) -> impl Future<Output = Result<(), BoxError>> + Send {
        async { Ok(()) }
    }

    /// Checks the iteration reports; all of them count as failed when it errors.
    fn check_names(&self) -> &'static [&'static str] {
        &[]
    }

    fn iteration(&self) -> impl Future<Output = Result<Checks, BoxError>> + Send;

    fn teardown(&self) -> impl Future<Output = Result<(), BoxError>> + Send {
        async { Ok(()) }
    }
}
