//! Multi-instance collection
//!
//! Fans one sprint window out across an instance roster and a metric table,
//! fetching every (instance, metric) cell with bounded concurrency. Any cell
//! failure fails the whole collection: the report must never silently omit
//! an instance.

use fleetmon_client::MetricFetcher;
use fleetmon_types::{
	CollectError, CollectResult, CollectionResult, Instance, MetricDefinition, MetricKind,
	MetricReport, SprintWindow,
};
use futures::stream::{self, StreamExt};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::aggregator::aggregate;

/// Collects every configured metric for every instance in a roster.
pub struct CollectorService {
	fetcher: Arc<MetricFetcher>,
	period: String,
	max_concurrency: usize,
}

impl CollectorService {
	/// Create a collector with the given aggregation period and in-flight
	/// request cap. A cap of zero is clamped to one.
	pub fn new(fetcher: Arc<MetricFetcher>, period: impl Into<String>, max_concurrency: usize) -> Self {
		Self {
			fetcher,
			period: period.into(),
			max_concurrency: max_concurrency.max(1),
		}
	}

	/// Collect all metrics for all roster instances over the sprint window.
	///
	/// Cells run concurrently up to the configured cap; the result is keyed
	/// by instance display name, so its iteration order is independent of
	/// completion order. The first cell failure aborts the collection.
	pub async fn collect(
		&self,
		roster: &[Instance],
		metrics: &BTreeMap<MetricKind, MetricDefinition>,
		window: &SprintWindow,
	) -> CollectResult<CollectionResult> {
		if roster.is_empty() {
			return Err(CollectError::EmptyRoster);
		}
		if metrics.is_empty() {
			return Err(CollectError::EmptyMetricTable);
		}

		info!(
			instances = roster.len(),
			metrics = metrics.len(),
			sprint = window.number,
			"collecting sprint metrics"
		);

		let cells = roster.iter().flat_map(|instance| {
			metrics.iter().map(move |(kind, definition)| {
				self.collect_cell(instance, *kind, definition, window)
			})
		});

		let mut completed = stream::iter(cells).buffer_unordered(self.max_concurrency);

		let mut result: CollectionResult = BTreeMap::new();
		while let Some(cell) = completed.next().await {
			let (name, kind, report) = cell?;
			result.entry(name).or_default().insert(kind, report);
		}

		Ok(result)
	}

	async fn collect_cell(
		&self,
		instance: &Instance,
		kind: MetricKind,
		definition: &MetricDefinition,
		window: &SprintWindow,
	) -> CollectResult<(String, MetricKind, MetricReport)> {
		let series = self
			.fetcher
			.fetch(definition, &instance.id, window.start, window.end, &self.period)
			.await
			.map_err(|source| CollectError::Fetch {
				instance: instance.name.clone(),
				metric: definition.metric_name.clone(),
				source,
			})?;

		let (summary, anomalies) = aggregate(&series.samples);

		debug!(
			instance = %instance.name,
			metric = %kind,
			samples = series.len(),
			anomalies = anomalies.len(),
			"collected cell"
		);

		let unit = series.unit.clone();
		Ok((
			instance.name.clone(),
			kind,
			MetricReport {
				series,
				summary,
				anomalies,
				unit,
			},
		))
	}
}
