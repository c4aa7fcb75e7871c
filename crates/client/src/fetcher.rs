//! Time-chunked metric fetching
//!
//! The monitoring API caps how much history a single request may cover, so a
//! sprint-length range is split into fixed-size chunks which are fetched in
//! order and concatenated. Chunk boundaries never overlap: each chunk starts
//! where the previous one ended.

use chrono::{DateTime, Duration, Utc};
use fleetmon_types::{ClientResult, MetricDefinition, MetricSeries};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::monitor::{datapoints_to_samples, MetricQuery, MonitorClient};

/// Fetches a full time range for one instance/metric pair by issuing a
/// sequence of chunked requests through a [`MonitorClient`].
pub struct MetricFetcher {
	client: Arc<dyn MonitorClient>,
	chunk: Duration,
}

impl MetricFetcher {
	/// Create a fetcher splitting ranges into chunks of `chunk_days` days.
	/// Values below one day are clamped to one day.
	pub fn new(client: Arc<dyn MonitorClient>, chunk_days: i64) -> Self {
		Self {
			client,
			chunk: Duration::days(chunk_days.max(1)),
		}
	}

	/// Fetch the full `[start, end)` range for one instance and metric.
	///
	/// Chunks are requested strictly in time order and their samples appended
	/// in arrival order, so the resulting series preserves the API's ordering
	/// within each chunk and chunk order across the range. Any chunk failure
	/// aborts the whole fetch.
	pub async fn fetch(
		&self,
		definition: &MetricDefinition,
		instance_id: &str,
		start: DateTime<Utc>,
		end: DateTime<Utc>,
		period: &str,
	) -> ClientResult<MetricSeries> {
		let mut series = MetricSeries::new(definition.unit.clone());
		let mut current = start;
		let mut chunk_index = 0usize;

		while current < end {
			let chunk_end = (current + self.chunk).min(end);

			let query = MetricQuery {
				namespace: definition.namespace.clone(),
				metric_name: definition.metric_name.clone(),
				instance_id: instance_id.to_string(),
				start_ms: current.timestamp_millis(),
				end_ms: chunk_end.timestamp_millis(),
				period: period.to_string(),
			};

			let points = self.client.describe_metric_list(&query).await?;
			let (samples, skipped) = datapoints_to_samples(points);

			if skipped > 0 {
				warn!(
					metric = %definition.metric_name,
					instance = %instance_id,
					chunk = chunk_index,
					skipped,
					"dropped datapoints without a usable reading"
				);
			}

			debug!(
				metric = %definition.metric_name,
				instance = %instance_id,
				chunk = chunk_index,
				samples = samples.len(),
				"fetched metric chunk"
			);

			series.samples.extend(samples);
			current = chunk_end;
			chunk_index += 1;
		}

		Ok(series)
	}
}
