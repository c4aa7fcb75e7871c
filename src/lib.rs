//! fleetmon
//!
//! Sprint-cadence cloud resource utilization reporter. Maps a date to its
//! sprint window, collects CPU and memory metrics for every configured
//! instance over that window, and assembles the sprint report with its
//! charts.
//!
//! The [`ReporterBuilder`] is the embedding surface: supply settings and
//! optionally a custom [`MonitorClient`], then run one report.
//!
//! ```no_run
//! use fleetmon::ReporterBuilder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! 	let output = ReporterBuilder::new().run(None).await?;
//! 	output.report.write_to(std::path::Path::new("."))?;
//! 	Ok(())
//! }
//! ```

use chrono::Utc;
use fleetmon_client::{CmsClient, MetricFetcher, MonitorClient};
use fleetmon_config::{LogFormat, LoggingSettings, Settings, SettingsError};
use fleetmon_report::{RenderedReport, ReportAssembler};
use fleetmon_service::{CollectorService, SprintCalendar};
use fleetmon_types::{
	ClientError, CollectError, EnvironmentReport, ReportData, SprintWindow,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Failures surfaced by a reporter run
#[derive(Debug, Error)]
pub enum ReporterError {
	#[error("configuration error: {0}")]
	Settings(#[from] SettingsError),

	#[error("credential error: {0}")]
	Credential(#[from] fleetmon_config::ConfigurableValueError),

	#[error("client error: {0}")]
	Client(#[from] ClientError),

	#[error("collection failed: {0}")]
	Collect(#[from] CollectError),
}

/// Everything one run produces: the resolved window, the raw collected
/// data and the rendered report.
pub struct ReporterOutput {
	pub window: SprintWindow,
	pub data: ReportData,
	pub report: RenderedReport,
}

/// Builder for a single reporting run.
pub struct ReporterBuilder {
	settings: Settings,
	client: Option<Arc<dyn MonitorClient>>,
}

impl Default for ReporterBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ReporterBuilder {
	/// Start from default settings
	pub fn new() -> Self {
		Self {
			settings: Settings::default(),
			client: None,
		}
	}

	/// Use the given settings instead of defaults
	pub fn with_settings(mut self, settings: Settings) -> Self {
		self.settings = settings;
		self
	}

	/// Substitute the monitoring API client. Used by tests and by embedders
	/// fronting a different monitoring backend.
	pub fn with_client(mut self, client: Arc<dyn MonitorClient>) -> Self {
		self.client = Some(client);
		self
	}

	/// Run one report.
	///
	/// `sprint_override` selects an explicit sprint; `None` reports on the
	/// sprint containing today. The whole run fails if any instance's metrics
	/// cannot be fetched.
	pub async fn run(self, sprint_override: Option<i64>) -> Result<ReporterOutput, ReporterError> {
		let settings = self.settings;
		settings.validate()?;

		let calendar = SprintCalendar::new(
			settings.sprint.reference_number,
			settings.sprint.reference_start,
			settings.sprint.length_days,
		);
		let window = calendar.window(Utc::now().date_naive(), sprint_override);
		info!(%window, "reporting window resolved");

		let client: Arc<dyn MonitorClient> = match self.client {
			Some(client) => client,
			None => Arc::new(CmsClient::new(
				&settings.api.endpoint,
				settings.api.region.clone(),
				settings.credentials.access_key_id.resolve()?,
				settings.credentials.access_key_secret.resolve()?,
				Duration::from_millis(settings.fetch.request_timeout_ms),
			)?),
		};

		let fetcher = Arc::new(MetricFetcher::new(client, settings.fetch.chunk_days));
		let collector = CollectorService::new(
			fetcher,
			settings.fetch.period.clone(),
			settings.fetch.max_concurrent_requests,
		);

		let server_metrics = settings.server_metrics()?;
		let database_metrics = settings.database_metrics()?;

		let mut data = ReportData::new();
		for (environment, roster) in &settings.environments {
			info!(environment = %environment, "collecting environment");
			let servers = collector
				.collect(&roster.servers(), &server_metrics, &window)
				.await?;
			let database = collector
				.collect(&roster.databases(), &database_metrics, &window)
				.await?;
			data.insert(
				environment.clone(),
				EnvironmentReport { servers, database },
			);
		}

		let assembler = ReportAssembler::new(
			settings.report.title.clone(),
			settings.report.incidents.clone(),
			settings.report.recommendations.clone(),
		);
		let report = assembler.assemble(&data, &window);

		info!(
			sprint = window.number,
			environments = data.len(),
			document = %report.file_name,
			"report assembled"
		);

		Ok(ReporterOutput {
			window,
			data,
			report,
		})
	}
}

/// Initialize the global tracing subscriber from logging settings.
///
/// `RUST_LOG` wins over the configured level when set.
pub fn init_tracing(settings: &LoggingSettings) {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(&settings.level));

	let builder = tracing_subscriber::fmt().with_env_filter(filter);
	match settings.format {
		LogFormat::Json => builder.json().init(),
		LogFormat::Pretty => builder.pretty().init(),
		LogFormat::Compact => builder.compact().init(),
	}
}
