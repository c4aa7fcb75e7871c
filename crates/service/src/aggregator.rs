//! Series aggregation
//!
//! Pure reductions over a fetched series: summary statistics and the subset
//! of samples flagged as anomalous. No I/O and no interior state, so every
//! property is testable with plain slices.

use fleetmon_types::{MetricSummary, Sample, ANOMALY_THRESHOLD};

/// Reduce a series to its summary statistics and anomalous samples.
///
/// An empty series yields the all-zero summary and no anomalies. Anomalies
/// are samples strictly above [`ANOMALY_THRESHOLD`], returned in source
/// order; a sample sitting exactly on the threshold is not anomalous.
pub fn aggregate(samples: &[Sample]) -> (MetricSummary, Vec<Sample>) {
	if samples.is_empty() {
		return (MetricSummary::default(), Vec::new());
	}

	let mut sum = 0.0;
	let mut max = f64::NEG_INFINITY;
	let mut min = f64::INFINITY;
	let mut anomalies = Vec::new();

	for sample in samples {
		sum += sample.value;
		max = max.max(sample.value);
		min = min.min(sample.value);
		if sample.value > ANOMALY_THRESHOLD {
			anomalies.push(*sample);
		}
	}

	let summary = MetricSummary {
		average: sum / samples.len() as f64,
		max,
		min,
	};

	(summary, anomalies)
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::{Duration, TimeZone, Utc};

	fn samples(values: &[f64]) -> Vec<Sample> {
		let base = Utc.with_ymd_and_hms(2025, 2, 13, 0, 0, 0).unwrap();
		values
			.iter()
			.enumerate()
			.map(|(i, &v)| Sample::new(base + Duration::hours(2 * i as i64), v))
			.collect()
	}

	#[test]
	fn empty_series_yields_zero_summary_and_no_anomalies() {
		let (summary, anomalies) = aggregate(&[]);
		assert_eq!(summary, MetricSummary::default());
		assert!(anomalies.is_empty());
	}

	#[test]
	fn summary_over_mixed_values() {
		let (summary, anomalies) = aggregate(&samples(&[10.0, 90.0, 50.0]));
		assert_eq!(summary.average, 50.0);
		assert_eq!(summary.max, 90.0);
		assert_eq!(summary.min, 10.0);
		assert_eq!(anomalies.len(), 1);
		assert_eq!(anomalies[0].value, 90.0);
	}

	#[test]
	fn single_sample_is_its_own_summary() {
		let (summary, _) = aggregate(&samples(&[42.5]));
		assert_eq!(summary.average, 42.5);
		assert_eq!(summary.max, 42.5);
		assert_eq!(summary.min, 42.5);
	}

	#[test]
	fn threshold_boundary_is_exclusive() {
		let (_, anomalies) = aggregate(&samples(&[80.0, 80.000001, 79.999999]));
		assert_eq!(anomalies.len(), 1);
		assert_eq!(anomalies[0].value, 80.000001);
	}

	#[test]
	fn anomalies_keep_source_order() {
		let (_, anomalies) = aggregate(&samples(&[95.0, 20.0, 85.0, 99.0]));
		let values: Vec<f64> = anomalies.iter().map(|s| s.value).collect();
		assert_eq!(values, vec![95.0, 85.0, 99.0]);
	}

	#[test]
	fn duplicate_values_count_independently() {
		let (summary, anomalies) = aggregate(&samples(&[90.0, 90.0]));
		assert_eq!(summary.average, 90.0);
		assert_eq!(anomalies.len(), 2);
	}
}
