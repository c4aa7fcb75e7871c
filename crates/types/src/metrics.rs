//! Metric series, summaries and the nested collection result

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Utilization percentage above which a sample counts as an anomaly.
///
/// Applied uniformly to every metric kind; per-metric thresholds are a known
/// limitation of the current report format.
pub const ANOMALY_THRESHOLD: f64 = 80.0;

/// A single timestamped observation of a utilization metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
	/// When the observation was taken
	pub timestamp: DateTime<Utc>,
	/// Observed value, in the unit of the owning series
	pub value: f64,
}

impl Sample {
	pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
		Self { timestamp, value }
	}
}

/// Ordered sequence of samples for one (instance, metric kind) pair.
///
/// Timestamps are non-decreasing in fetch order. Duplicates across chunk
/// boundaries are kept as-is; downstream aggregation treats them as
/// independent observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSeries {
	pub samples: Vec<Sample>,
	/// Unit label, e.g. "%"
	pub unit: String,
}

impl MetricSeries {
	/// Create an empty series with the given unit label
	pub fn new(unit: impl Into<String>) -> Self {
		Self {
			samples: Vec::new(),
			unit: unit.into(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.samples.is_empty()
	}

	pub fn len(&self) -> usize {
		self.samples.len()
	}
}

/// Statistical summary over a full series.
///
/// All three fields are zero for an empty series. That default is deliberate
/// and is not a sentinel for "fetch failed" - fetch failures surface as
/// errors, never as empty summaries.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricSummary {
	pub average: f64,
	pub max: f64,
	pub min: f64,
}

/// The metric kinds tracked per instance
#[derive(
	Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
	/// CPU utilization percentage
	Cpu,
	/// Memory utilization percentage
	Memory,
}

impl MetricKind {
	/// Get string representation
	pub fn as_str(&self) -> &'static str {
		match self {
			MetricKind::Cpu => "cpu",
			MetricKind::Memory => "memory",
		}
	}

	/// Uppercase label used in report headings
	pub fn label(&self) -> &'static str {
		match self {
			MetricKind::Cpu => "CPU",
			MetricKind::Memory => "MEMORY",
		}
	}
}

impl std::str::FromStr for MetricKind {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"cpu" => Ok(MetricKind::Cpu),
			"memory" => Ok(MetricKind::Memory),
			other => Err(format!("unknown metric kind '{}'", other)),
		}
	}
}

impl std::fmt::Display for MetricKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

/// The kind of monitored target, selecting which metric-definition table
/// applies (virtual machines and managed databases use different namespaces).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
	/// Web/app virtual machines
	Server,
	/// Managed database instances
	Database,
}

impl TargetKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			TargetKind::Server => "servers",
			TargetKind::Database => "database",
		}
	}
}

impl std::fmt::Display for TargetKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

/// How to query one metric from the monitoring API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDefinition {
	/// API namespace, e.g. "acs_ecs_dashboard"
	pub namespace: String,
	/// Metric name within the namespace, e.g. "CPUUtilization"
	pub metric_name: String,
	/// Unit label attached to the resulting series
	pub unit: String,
}

impl MetricDefinition {
	pub fn new(
		namespace: impl Into<String>,
		metric_name: impl Into<String>,
		unit: impl Into<String>,
	) -> Self {
		Self {
			namespace: namespace.into(),
			metric_name: metric_name.into(),
			unit: unit.into(),
		}
	}
}

/// One fully collected cell: the raw series plus its derived statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricReport {
	pub series: MetricSeries,
	pub summary: MetricSummary,
	/// Samples exceeding [`ANOMALY_THRESHOLD`], in source order
	pub anomalies: Vec<Sample>,
	pub unit: String,
}

/// All collected metrics for one instance, keyed by metric kind.
pub type InstanceReport = BTreeMap<MetricKind, MetricReport>;

/// Collected metrics for a roster, keyed by instance display name.
///
/// BTreeMap keys make iteration order deterministic regardless of the order
/// in which cells completed.
pub type CollectionResult = BTreeMap<String, InstanceReport>;

/// Collected metrics for one environment, split by target kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentReport {
	pub servers: CollectionResult,
	pub database: CollectionResult,
}

/// The report assembler's input: every environment's collected metrics,
/// keyed identically across environments for uniform rendering.
pub type ReportData = BTreeMap<String, EnvironmentReport>;
