//! Shared mock monitoring client for integration tests

use async_trait::async_trait;
use fleetmon_client::{Datapoint, MetricQuery, MonitorClient};
use fleetmon_types::{ClientError, ClientResult};
use std::collections::HashMap;
use std::sync::Mutex;

/// Scripted monitoring backend.
///
/// Answers each query with one datapoint whose value is looked up by
/// (instance id, metric name); unknown cells get a neutral default. One cell
/// may be marked as failing. All queries are recorded for assertions.
pub struct MockMonitorClient {
	values: HashMap<(String, String), f64>,
	failing: Option<(String, String)>,
	queries: Mutex<Vec<MetricQuery>>,
}

impl MockMonitorClient {
	pub fn new() -> Self {
		Self {
			values: HashMap::new(),
			failing: None,
			queries: Mutex::new(Vec::new()),
		}
	}

	pub fn with_value(mut self, instance_id: &str, metric_name: &str, value: f64) -> Self {
		self.values
			.insert((instance_id.to_string(), metric_name.to_string()), value);
		self
	}

	pub fn with_failing_cell(mut self, instance_id: &str, metric_name: &str) -> Self {
		self.failing = Some((instance_id.to_string(), metric_name.to_string()));
		self
	}

	pub fn recorded_queries(&self) -> Vec<MetricQuery> {
		self.queries.lock().unwrap().clone()
	}
}

impl Default for MockMonitorClient {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl MonitorClient for MockMonitorClient {
	async fn describe_metric_list(&self, query: &MetricQuery) -> ClientResult<Vec<Datapoint>> {
		self.queries.lock().unwrap().push(query.clone());

		let key = (query.instance_id.clone(), query.metric_name.clone());
		if self.failing.as_ref() == Some(&key) {
			return Err(ClientError::Api {
				code: "InternalError".to_string(),
				message: "scripted failure".to_string(),
			});
		}

		let value = self.values.get(&key).copied().unwrap_or(42.0);
		Ok(vec![Datapoint::with_average(query.start_ms, value)])
	}
}
