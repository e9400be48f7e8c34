pub mod metrics;
pub mod registry;
pub mod tags;

pub use metrics::{HistogramSummary, MetricHandle, MetricKind, MetricSeriesSummary, MetricValue};
pub use registry::{MetricId, Registry};
pub use tags::TagSet;
