//! End-to-end reporter runs against a scripted monitoring backend

mod mocks;

use fleetmon::{ReporterBuilder, ReporterError};
use fleetmon_config::{ConfigurableValue, CredentialSettings, InstanceEntry, RosterSettings, Settings};
use fleetmon_types::{CollectError, MetricKind};
use mocks::MockMonitorClient;
use std::sync::Arc;

fn test_settings() -> Settings {
	let mut settings = Settings {
		credentials: CredentialSettings {
			access_key_id: ConfigurableValue::from_plain("test-id"),
			access_key_secret: ConfigurableValue::from_plain("test-secret"),
		},
		..Settings::default()
	};
	settings.environments.insert(
		"UAT".to_string(),
		RosterSettings {
			web: vec![InstanceEntry {
				id: "i-web-1".to_string(),
				name: "UAT-WEB-1".to_string(),
			}],
			app: vec![InstanceEntry {
				id: "i-app-1".to_string(),
				name: "UAT-APP-1".to_string(),
			}],
			database: vec![InstanceEntry {
				id: "rm-db-1".to_string(),
				name: "UAT-RDS".to_string(),
			}],
		},
	);
	settings
}

#[tokio::test]
async fn run_collects_every_environment_and_assembles_the_report() {
	let client = Arc::new(
		MockMonitorClient::new()
			.with_value("i-web-1", "CPUUtilization", 12.0)
			.with_value("i-app-1", "CPUUtilization", 91.0)
			.with_value("rm-db-1", "CpuUsage", 33.0),
	);

	let output = ReporterBuilder::new()
		.with_settings(test_settings())
		.with_client(client.clone())
		.run(Some(15))
		.await
		.unwrap();

	assert_eq!(output.window.number, 15);
	assert_eq!(output.window.length_days(), 14);

	let environment = &output.data["UAT"];
	assert_eq!(environment.servers.len(), 2);
	assert_eq!(environment.database.len(), 1);

	let app_cpu = &environment.servers["UAT-APP-1"][&MetricKind::Cpu];
	assert_eq!(app_cpu.summary.average, 91.0);
	assert!(!app_cpu.anomalies.is_empty());

	let db_cpu = &environment.database["UAT-RDS"][&MetricKind::Cpu];
	assert_eq!(db_cpu.summary.average, 33.0);

	assert_eq!(
		output.report.file_name,
		"Sprint15_Cloud_Resources_Utilization_Report.md"
	);
	assert!(output.report.markdown.contains("## Sprint 15"));
	assert!(output.report.markdown.contains("UAT-APP-1"));
}

#[tokio::test]
async fn every_cell_is_fetched_in_chunks_with_the_configured_period() {
	let client = Arc::new(MockMonitorClient::new());

	ReporterBuilder::new()
		.with_settings(test_settings())
		.with_client(client.clone())
		.run(Some(15))
		.await
		.unwrap();

	let queries = client.recorded_queries();

	// 3 instances x 2 metrics, each over a 14-day window in 3-day chunks
	assert_eq!(queries.len(), 6 * 5);

	for query in &queries {
		assert_eq!(query.period, "7200");
		assert!(query.start_ms < query.end_ms);
		assert!(query.dimensions().contains("instanceId"));
	}

	// Database cells query the database namespace, server cells the ECS one
	assert!(queries
		.iter()
		.filter(|q| q.instance_id == "rm-db-1")
		.all(|q| q.namespace == "acs_rds_dashboard"));
	assert!(queries
		.iter()
		.filter(|q| q.instance_id.starts_with("i-"))
		.all(|q| q.namespace == "acs_ecs_dashboard"));
}

#[tokio::test]
async fn failing_cell_fails_the_whole_run() {
	let client = Arc::new(MockMonitorClient::new().with_failing_cell("i-app-1", "CPUUtilization"));

	let result = ReporterBuilder::new()
		.with_settings(test_settings())
		.with_client(client)
		.run(Some(15))
		.await;

	match result {
		Err(ReporterError::Collect(CollectError::Fetch { instance, metric, .. })) => {
			assert_eq!(instance, "UAT-APP-1");
			assert_eq!(metric, "CPUUtilization");
		},
		Err(other) => panic!("unexpected error: {}", other),
		Ok(_) => panic!("run should have failed"),
	}
}

#[tokio::test]
async fn run_rejects_settings_without_environments() {
	let mut settings = test_settings();
	settings.environments.clear();

	let result = ReporterBuilder::new()
		.with_settings(settings)
		.with_client(Arc::new(MockMonitorClient::new()))
		.run(Some(15))
		.await;

	assert!(matches!(result, Err(ReporterError::Settings(_))));
}

#[tokio::test]
async fn report_and_charts_land_on_disk() {
	let dir = tempfile::tempdir().unwrap();

	let output = ReporterBuilder::new()
		.with_settings(test_settings())
		.with_client(Arc::new(MockMonitorClient::new()))
		.run(Some(15))
		.await
		.unwrap();

	let path = output.report.write_to(dir.path()).unwrap();
	assert!(path.exists());

	let charts_dir = dir.path().join("charts");
	assert!(charts_dir.join("uat_servers_cpu_chart.svg").exists());
	assert!(charts_dir.join("uat_database_memory_chart.svg").exists());
}
