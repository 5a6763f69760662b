pub mod metric;

pub use metric::{MetricKind, MetricRecord, MetricRow};
