//! Virtual-user scheduling around [`WorkloadRunner`](crate::WorkloadRunner).

mod config;
mod gate;
mod progress;
mod run;

pub use config::{RunConfig, RunPlan};
pub use gate::IterationGate;
pub use progress::{ProgressFn, ProgressUpdate};
pub use run::{run_constant_vus, run_workload};
