//! fleetmon types
//!
//! Shared models for the fleetmon utilization reporter. This crate contains
//! the domain vocabulary used across the client, service and report layers:
//! samples and series, summaries and anomalies, instances, sprint windows and
//! the error taxonomy.

pub mod errors;
pub mod instance;
pub mod metrics;
pub mod sprint;

// Re-export chrono for convenience
pub use chrono;

pub use errors::{ClientError, ClientResult, CollectError, CollectResult};
pub use instance::Instance;
pub use metrics::{
	CollectionResult, EnvironmentReport, InstanceReport, MetricDefinition, MetricKind,
	MetricReport, MetricSeries, MetricSummary, ReportData, Sample, TargetKind, ANOMALY_THRESHOLD,
};
pub use sprint::SprintWindow;
