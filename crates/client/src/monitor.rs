//! Monitor client trait and wire models

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use fleetmon_types::{ClientError, ClientResult, Sample};
use serde::Deserialize;
use serde_json::Value;

/// One range-limited metric request.
///
/// Timestamps are milliseconds since epoch and the aggregation period is
/// forwarded verbatim; both are dictated by the external API's wire format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricQuery {
	pub namespace: String,
	pub metric_name: String,
	pub instance_id: String,
	/// Range start, inclusive, in milliseconds since epoch
	pub start_ms: i64,
	/// Range end, exclusive, in milliseconds since epoch
	pub end_ms: i64,
	/// Aggregation period, passed through unchanged (e.g. "7200")
	pub period: String,
}

impl MetricQuery {
	/// Instance-scoped dimension filter in the API's expected JSON shape
	pub fn dimensions(&self) -> String {
		format!(r#"{{"instanceId": "{}"}}"#, self.instance_id)
	}
}

/// Access to the external cloud monitoring API.
///
/// The production implementation is [`crate::CmsClient`]; tests substitute
/// scripted implementations.
#[async_trait]
pub trait MonitorClient: Send + Sync {
	/// Issue a single `DescribeMetricList`-style request and return the
	/// normalized datapoints, which may legitimately be empty.
	async fn describe_metric_list(&self, query: &MetricQuery) -> ClientResult<Vec<Datapoint>>;
}

/// A single datapoint as returned by the monitoring API.
///
/// The numeric reading arrives either as a point-in-time `Value` or an
/// already-averaged `Average`; whichever is present is used, preferring
/// `Value` when both appear. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Datapoint {
	/// Milliseconds since epoch
	pub timestamp: i64,
	#[serde(rename = "Value", default)]
	pub value: Option<f64>,
	#[serde(rename = "Average", default)]
	pub average: Option<f64>,
}

impl Datapoint {
	/// Construct a datapoint carrying a point-in-time value (test helper)
	pub fn with_value(timestamp: i64, value: f64) -> Self {
		Self {
			timestamp,
			value: Some(value),
			average: None,
		}
	}

	/// Construct a datapoint carrying only an averaged value (test helper)
	pub fn with_average(timestamp: i64, average: f64) -> Self {
		Self {
			timestamp,
			value: None,
			average: Some(average),
		}
	}

	/// Effective reading: `Value` if present, otherwise `Average`
	pub fn effective_value(&self) -> Option<f64> {
		self.value.or(self.average)
	}

	/// Convert to a domain sample, or `None` if the datapoint carries no
	/// usable reading or an unrepresentable timestamp
	pub fn into_sample(self) -> Option<Sample> {
		let value = self.effective_value()?;
		let timestamp = Utc.timestamp_millis_opt(self.timestamp).single()?;
		Some(Sample::new(timestamp, value))
	}
}

/// Response envelope for `DescribeMetricList`
#[derive(Debug, Deserialize)]
pub struct MetricListResponse {
	#[serde(rename = "Code", default)]
	pub code: Option<String>,
	#[serde(rename = "Message", default)]
	pub message: Option<String>,
	#[serde(rename = "RequestId", default)]
	pub request_id: Option<String>,
	/// Either a native JSON array of datapoints or a JSON-encoded string
	/// holding the same array; absent when the range has no data
	#[serde(rename = "Datapoints", default)]
	pub datapoints: Option<Value>,
}

/// Normalize the `Datapoints` field into a list of datapoints.
///
/// The API returns the samples either as a native array or as a secondary
/// JSON-encoded string; both are accepted. A missing or null field means the
/// chunk simply has no data and contributes zero samples.
pub fn normalize_datapoints(raw: Option<&Value>) -> ClientResult<Vec<Datapoint>> {
	let raw = match raw {
		Some(raw) => raw,
		None => return Ok(Vec::new()),
	};

	match raw {
		Value::Null => Ok(Vec::new()),
		Value::String(s) if s.trim().is_empty() => Ok(Vec::new()),
		Value::String(s) => {
			serde_json::from_str(s).map_err(|e| ClientError::MalformedBody {
				reason: format!("Datapoints string is not a JSON array: {}", e),
			})
		},
		Value::Array(_) => {
			serde_json::from_value(raw.clone()).map_err(|e| ClientError::MalformedBody {
				reason: format!("Datapoints array has unexpected shape: {}", e),
			})
		},
		other => Err(ClientError::MalformedBody {
			reason: format!("Datapoints is neither array nor string: {}", other),
		}),
	}
}

/// Convert an ordered list of datapoints to samples, skipping entries with
/// no usable reading. Returns the samples and the skipped count so callers
/// can log the data-shape mismatch without aborting.
pub fn datapoints_to_samples(points: Vec<Datapoint>) -> (Vec<Sample>, usize) {
	let mut samples = Vec::with_capacity(points.len());
	let mut skipped = 0usize;
	for point in points {
		match point.into_sample() {
			Some(sample) => samples.push(sample),
			None => skipped += 1,
		}
	}
	(samples, skipped)
}
