//! Load iteration harness: runs a workload once per virtual-user tick, classifies the
//! result, and keeps deduplicated failure accounting for the final report.

mod accountant;
mod checks;
pub mod driver;
mod error;
mod guard;
mod ledger;
mod lifecycle;
mod outcome;
mod runner;
mod workload;

pub use accountant::{Counters, OutcomeAccountant};
pub use checks::Checks;
pub use driver::{
    IterationGate, ProgressFn, ProgressUpdate, RunConfig, RunPlan, run_constant_vus,
    run_workload,
};
pub use error::{Error, Result};
pub use ledger::{ErrorLedger, ErrorSink, TracingErrorSink};
pub use lifecycle::{LifecycleController, RunContext, RunReport};
pub use outcome::{CheckResult, IntoOutcome, Outcome};
pub use runner::{IterationMetrics, WorkloadRunner};
pub use workload::{BoxError, OutcomeLabels, Workload};
