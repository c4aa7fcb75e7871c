//! Report assembly
//!
//! Builds the sprint report as a markdown document plus its chart artifacts.
//! Assembly is pure (collected data in, rendered strings out); writing to
//! disk is a separate, final step.

use chrono::Datelike;
use fleetmon_types::{
	CollectionResult, EnvironmentReport, MetricKind, ReportData, SprintWindow, TargetKind,
};
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::chart::{render_chart, ChartArtifact};

const METRIC_KINDS: [MetricKind; 2] = [MetricKind::Cpu, MetricKind::Memory];
const TARGET_KINDS: [TargetKind; 2] = [TargetKind::Server, TargetKind::Database];

/// Assembles the sprint utilization report from collected metrics.
pub struct ReportAssembler {
	title: String,
	incidents: Vec<String>,
	recommendations: Vec<String>,
}

/// A fully rendered report, not yet written to disk.
#[derive(Debug, Clone)]
pub struct RenderedReport {
	/// Document file name, e.g. `Sprint15_Cloud_Resources_Utilization_Report.md`
	pub file_name: String,
	pub markdown: String,
	pub charts: Vec<ChartArtifact>,
}

impl ReportAssembler {
	pub fn new(title: impl Into<String>, incidents: Vec<String>, recommendations: Vec<String>) -> Self {
		Self {
			title: title.into(),
			incidents,
			recommendations,
		}
	}

	/// Document file name for a sprint: the zero-padded sprint number
	/// followed by the underscored title
	pub fn output_file_name(&self, sprint_number: i64) -> String {
		format!("Sprint{:02}_{}.md", sprint_number, self.title.replace(' ', "_"))
	}

	/// Render the full report for one sprint window.
	pub fn assemble(&self, data: &ReportData, window: &SprintWindow) -> RenderedReport {
		let mut markdown = String::with_capacity(8192);
		let mut charts = Vec::new();

		markdown.push_str(&format!("# {}\n\n", self.title));
		markdown.push_str(&format!("## Sprint {}\n\n", window.number));
		markdown.push_str(&format!(
			"**Report period:** {} - {}\n\n",
			format_day(window.start.date_naive()),
			format_day(window.end.date_naive())
		));

		markdown.push_str("## Overall Summary\n\n");
		for (environment, report) in data {
			self.write_environment_summary(&mut markdown, environment, report);
		}

		self.write_anomalies(&mut markdown, data);
		self.write_notes(&mut markdown, "Incidents", &self.incidents, "No incidents were recorded during this sprint.");
		self.write_notes(
			&mut markdown,
			"Recommendations",
			&self.recommendations,
			"No recommendations for this sprint.",
		);

		markdown.push_str("## Dashboards\n\n");
		for (environment, report) in data {
			markdown.push_str(&format!("### {}\n\n", environment));
			for target in TARGET_KINDS {
				let collection = match target {
					TargetKind::Server => &report.servers,
					TargetKind::Database => &report.database,
				};
				for kind in METRIC_KINDS {
					let artifact = self.render_target_chart(environment, target, kind, collection);
					markdown.push_str(&format!(
						"![{} {} {}](charts/{})\n\n",
						environment,
						target,
						kind.label(),
						artifact.file_name
					));
					charts.push(artifact);
				}
			}
		}

		RenderedReport {
			file_name: self.output_file_name(window.number),
			markdown,
			charts,
		}
	}

	fn write_environment_summary(
		&self,
		markdown: &mut String,
		environment: &str,
		report: &EnvironmentReport,
	) {
		markdown.push_str(&format!("### {}\n\n", environment));

		for kind in METRIC_KINDS {
			if let Some(line) = server_summary_line(&report.servers, kind) {
				markdown.push_str(&format!("- Servers {}: {}\n", kind.label(), line));
			}
		}
		for kind in METRIC_KINDS {
			if let Some(line) = database_summary_line(&report.database, kind) {
				markdown.push_str(&format!("- Database {}: {}\n", kind.label(), line));
			}
		}
		markdown.push('\n');
	}

	fn write_anomalies(&self, markdown: &mut String, data: &ReportData) {
		let mut lines = Vec::new();
		for (environment, report) in data {
			for (target, collection) in [
				(TargetKind::Server, &report.servers),
				(TargetKind::Database, &report.database),
			] {
				for (name, instance_report) in collection {
					for (kind, metric_report) in instance_report {
						if metric_report.anomalies.is_empty() {
							continue;
						}
						let peak = metric_report
							.anomalies
							.iter()
							.map(|s| s.value)
							.fold(f64::NEG_INFINITY, f64::max);
						lines.push(format!(
							"- {} / {} ({}): {} exceeded 80{} in {} sample(s), peaking at {:.1}{}",
							environment,
							name,
							target,
							kind.label(),
							metric_report.unit,
							metric_report.anomalies.len(),
							peak,
							metric_report.unit
						));
					}
				}
			}
		}

		markdown.push_str("## Anomalies\n\n");
		if lines.is_empty() {
			markdown.push_str("No utilization anomalies were detected during this sprint.\n\n");
		} else {
			for line in lines {
				markdown.push_str(&line);
				markdown.push('\n');
			}
			markdown.push('\n');
		}
	}

	fn write_notes(&self, markdown: &mut String, heading: &str, notes: &[String], fallback: &str) {
		markdown.push_str(&format!("## {}\n\n", heading));
		if notes.is_empty() {
			markdown.push_str(fallback);
			markdown.push_str("\n\n");
		} else {
			for note in notes {
				markdown.push_str(&format!("- {}\n", note));
			}
			markdown.push('\n');
		}
	}

	fn render_target_chart(
		&self,
		environment: &str,
		target: TargetKind,
		kind: MetricKind,
		collection: &CollectionResult,
	) -> ChartArtifact {
		let mut series = Vec::new();
		let mut unit = "%".to_string();

		for (name, instance_report) in collection {
			match instance_report.get(&kind) {
				Some(metric_report) => {
					unit = metric_report.unit.clone();
					series.push((name.clone(), metric_report.series.samples.clone()));
				},
				None => series.push((name.clone(), Vec::new())),
			}
		}

		let title = format!("{} {} {} Utilization", environment, title_case(target), kind.label());
		let svg = render_chart(&title, &unit, &series);

		ChartArtifact {
			file_name: format!(
				"{}_{}_{}_chart.svg",
				slug(environment),
				target,
				kind.as_str()
			),
			svg,
		}
	}
}

impl RenderedReport {
	/// Write the document and its charts under `dir`, creating a `charts/`
	/// subdirectory. Returns the document path.
	pub fn write_to(&self, dir: &Path) -> io::Result<PathBuf> {
		let charts_dir = dir.join("charts");
		std::fs::create_dir_all(&charts_dir)?;

		for chart in &self.charts {
			std::fs::write(charts_dir.join(&chart.file_name), &chart.svg)?;
		}

		let document_path = dir.join(&self.file_name);
		std::fs::write(&document_path, &self.markdown)?;

		info!(
			document = %document_path.display(),
			charts = self.charts.len(),
			"report written"
		);
		Ok(document_path)
	}
}

/// Per-environment server summary: utilization range across all servers and
/// the mean of per-server averages. The latter weights each server equally
/// regardless of how many samples it produced.
fn server_summary_line(servers: &CollectionResult, kind: MetricKind) -> Option<String> {
	let reports: Vec<_> = servers
		.values()
		.filter_map(|instance| instance.get(&kind))
		.collect();
	if reports.is_empty() {
		return None;
	}

	let min = reports
		.iter()
		.map(|r| r.summary.min)
		.fold(f64::INFINITY, f64::min);
	let max = reports
		.iter()
		.map(|r| r.summary.max)
		.fold(f64::NEG_INFINITY, f64::max);
	let average =
		reports.iter().map(|r| r.summary.average).sum::<f64>() / reports.len() as f64;
	let unit = &reports[0].unit;

	Some(format!(
		"average {:.1}{unit}, range {:.1}{unit} to {:.1}{unit}",
		average, min, max
	))
}

/// Database summary: the first (alphabetically) database instance's own
/// statistics; rosters typically hold a single managed database.
fn database_summary_line(database: &CollectionResult, kind: MetricKind) -> Option<String> {
	let report = database.values().next()?.get(&kind)?;
	let unit = &report.unit;
	Some(format!(
		"average {:.1}{unit}, range {:.1}{unit} to {:.1}{unit}",
		report.summary.average, report.summary.min, report.summary.max
	))
}

fn format_day(date: chrono::NaiveDate) -> String {
	format!("{:02} {} {}", date.day(), month_name(date.month()), date.year())
}

fn month_name(month: u32) -> &'static str {
	match month {
		1 => "Jan",
		2 => "Feb",
		3 => "Mar",
		4 => "Apr",
		5 => "May",
		6 => "Jun",
		7 => "Jul",
		8 => "Aug",
		9 => "Sep",
		10 => "Oct",
		11 => "Nov",
		_ => "Dec",
	}
}

fn title_case(target: TargetKind) -> &'static str {
	match target {
		TargetKind::Server => "Servers",
		TargetKind::Database => "Database",
	}
}

fn slug(input: &str) -> String {
	input
		.chars()
		.map(|c| {
			if c.is_ascii_alphanumeric() {
				c.to_ascii_lowercase()
			} else {
				'_'
			}
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::{Duration, TimeZone, Utc};
	use fleetmon_types::{
		InstanceReport, MetricReport, MetricSeries, MetricSummary, Sample,
	};
	use std::collections::BTreeMap;

	fn assembler() -> ReportAssembler {
		ReportAssembler::new("Cloud Resources Utilization Report", Vec::new(), Vec::new())
	}

	fn window() -> SprintWindow {
		SprintWindow {
			number: 7,
			start: Utc.with_ymd_and_hms(2024, 10, 24, 0, 0, 0).unwrap(),
			end: Utc.with_ymd_and_hms(2024, 11, 6, 23, 59, 59).unwrap(),
		}
	}

	fn metric_report(values: &[f64]) -> MetricReport {
		let base = Utc.with_ymd_and_hms(2024, 10, 24, 0, 0, 0).unwrap();
		let samples: Vec<Sample> = values
			.iter()
			.enumerate()
			.map(|(i, &v)| Sample::new(base + Duration::hours(2 * i as i64), v))
			.collect();

		let sum: f64 = values.iter().sum();
		let summary = MetricSummary {
			average: sum / values.len() as f64,
			max: values.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
			min: values.iter().cloned().fold(f64::INFINITY, f64::min),
		};
		let anomalies = samples.iter().filter(|s| s.value > 80.0).cloned().collect();

		MetricReport {
			series: MetricSeries {
				samples,
				unit: "%".to_string(),
			},
			summary,
			anomalies,
			unit: "%".to_string(),
		}
	}

	fn instance_report(cpu: &[f64], memory: &[f64]) -> InstanceReport {
		let mut report = BTreeMap::new();
		report.insert(MetricKind::Cpu, metric_report(cpu));
		report.insert(MetricKind::Memory, metric_report(memory));
		report
	}

	fn sample_data() -> ReportData {
		let mut servers = BTreeMap::new();
		servers.insert(
			"App Server 1".to_string(),
			instance_report(&[30.0, 90.0], &[50.0, 60.0]),
		);
		servers.insert(
			"Web Server 1".to_string(),
			instance_report(&[10.0, 20.0], &[40.0, 45.0]),
		);

		let mut database = BTreeMap::new();
		database.insert("Primary DB".to_string(), instance_report(&[15.0, 25.0], &[70.0, 75.0]));

		let mut data = BTreeMap::new();
		data.insert(
			"Production".to_string(),
			EnvironmentReport { servers, database },
		);
		data
	}

	#[test]
	fn file_name_zero_pads_the_sprint_number() {
		let assembler = assembler();
		assert_eq!(
			assembler.output_file_name(7),
			"Sprint07_Cloud_Resources_Utilization_Report.md"
		);
		assert_eq!(
			assembler.output_file_name(15),
			"Sprint15_Cloud_Resources_Utilization_Report.md"
		);
	}

	#[test]
	fn report_contains_expected_sections() {
		let report = assembler().assemble(&sample_data(), &window());

		assert!(report.markdown.starts_with("# Cloud Resources Utilization Report"));
		assert!(report.markdown.contains("## Sprint 7"));
		assert!(report.markdown.contains("**Report period:** 24 Oct 2024 - 06 Nov 2024"));
		assert!(report.markdown.contains("## Overall Summary"));
		assert!(report.markdown.contains("### Production"));
		assert!(report.markdown.contains("## Anomalies"));
		assert!(report.markdown.contains("## Incidents"));
		assert!(report.markdown.contains("## Recommendations"));
		assert!(report.markdown.contains("## Dashboards"));
	}

	#[test]
	fn server_summary_averages_per_server_means() {
		let report = assembler().assemble(&sample_data(), &window());
		// (60.0 + 15.0) / 2 = 37.5 over App Server 1 and Web Server 1 CPU
		assert!(report.markdown.contains("Servers CPU: average 37.5%, range 10.0% to 90.0%"));
	}

	#[test]
	fn database_summary_uses_instance_statistics() {
		let report = assembler().assemble(&sample_data(), &window());
		assert!(report.markdown.contains("Database CPU: average 20.0%, range 15.0% to 25.0%"));
	}

	#[test]
	fn anomalies_section_names_the_offending_instance() {
		let report = assembler().assemble(&sample_data(), &window());
		assert!(report.markdown.contains("App Server 1"));
		assert!(report.markdown.contains("peaking at 90.0%"));
	}

	#[test]
	fn clean_sprint_reports_no_anomalies() {
		let mut servers = BTreeMap::new();
		servers.insert("Web Server 1".to_string(), instance_report(&[10.0], &[20.0]));
		let mut data = BTreeMap::new();
		data.insert(
			"Staging".to_string(),
			EnvironmentReport {
				servers,
				database: BTreeMap::new(),
			},
		);

		let report = assembler().assemble(&data, &window());
		assert!(report
			.markdown
			.contains("No utilization anomalies were detected during this sprint."));
	}

	#[test]
	fn empty_notes_fall_back_to_placeholder_text() {
		let report = assembler().assemble(&sample_data(), &window());
		assert!(report.markdown.contains("No incidents were recorded during this sprint."));
		assert!(report.markdown.contains("No recommendations for this sprint."));
	}

	#[test]
	fn configured_notes_render_as_bullets() {
		let assembler = ReportAssembler::new(
			"Cloud Resources Utilization Report",
			vec!["Database failover on day 3".to_string()],
			vec!["Upsize the app tier".to_string()],
		);
		let report = assembler.assemble(&sample_data(), &window());
		assert!(report.markdown.contains("- Database failover on day 3"));
		assert!(report.markdown.contains("- Upsize the app tier"));
	}

	#[test]
	fn charts_cover_every_target_and_metric() {
		let report = assembler().assemble(&sample_data(), &window());

		let names: Vec<&str> = report.charts.iter().map(|c| c.file_name.as_str()).collect();
		assert_eq!(
			names,
			vec![
				"production_servers_cpu_chart.svg",
				"production_servers_memory_chart.svg",
				"production_database_cpu_chart.svg",
				"production_database_memory_chart.svg",
			]
		);

		for chart in &report.charts {
			assert!(chart.svg.starts_with("<svg"));
			assert!(report
				.markdown
				.contains(&format!("charts/{}", chart.file_name)));
		}
	}

	#[test]
	fn report_writes_document_and_charts_to_disk() {
		let dir = tempfile::tempdir().unwrap();
		let report = assembler().assemble(&sample_data(), &window());

		let path = report.write_to(dir.path()).unwrap();
		assert!(path.ends_with("Sprint07_Cloud_Resources_Utilization_Report.md"));
		assert!(path.exists());

		let charts_dir = dir.path().join("charts");
		assert!(charts_dir.join("production_servers_cpu_chart.svg").exists());
		let svg = std::fs::read_to_string(charts_dir.join("production_database_memory_chart.svg")).unwrap();
		assert!(svg.contains("Primary DB"));
	}
}
