//! SVG chart rendering
//!
//! Line charts are rendered in memory as standalone SVG documents, one chart
//! per (environment, target, metric) combination, with one polyline per
//! instance. No drawing backend is involved; the report document references
//! the charts by relative path.

use chrono::{DateTime, Utc};
use fleetmon_types::Sample;

const WIDTH: f64 = 960.0;
const HEIGHT: f64 = 480.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 180.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 50.0;

const PALETTE: [&str; 6] = [
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b",
];

/// A rendered chart and the file name it should be written under.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartArtifact {
	/// File name relative to the report's `charts/` directory
	pub file_name: String,
	pub svg: String,
}

/// Render one chart with a polyline per named series.
///
/// The y axis spans from zero to the larger of 100 and the data maximum, so
/// percentage charts keep a stable scale while off-scale values stay
/// visible. Series without samples are listed in the legend but draw
/// nothing; if no series has samples the chart states so instead of
/// rendering empty axes.
pub fn render_chart(title: &str, unit: &str, series: &[(String, Vec<Sample>)]) -> String {
	let mut svg = String::with_capacity(4096);
	svg.push_str(&format!(
		r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
		w = WIDTH,
		h = HEIGHT
	));
	svg.push('\n');
	svg.push_str(&format!(
		r#"<rect width="{}" height="{}" fill="white"/>"#,
		WIDTH, HEIGHT
	));
	svg.push('\n');
	svg.push_str(&format!(
		r#"<text x="{}" y="28" font-family="sans-serif" font-size="18" text-anchor="middle">{}</text>"#,
		WIDTH / 2.0,
		escape_text(title)
	));
	svg.push('\n');

	let (t_min, t_max, v_max) = bounds(series);

	if t_min.is_none() {
		svg.push_str(&format!(
			r##"<text x="{}" y="{}" font-family="sans-serif" font-size="16" text-anchor="middle" fill="#666">No data for this period</text>"##,
			WIDTH / 2.0,
			HEIGHT / 2.0
		));
		svg.push_str("\n</svg>\n");
		return svg;
	}

	let t_min = t_min.unwrap_or_else(Utc::now);
	let t_max = t_max.unwrap_or(t_min);
	let y_top = v_max.max(100.0);

	draw_axes(&mut svg, unit, y_top);

	for (index, (name, samples)) in series.iter().enumerate() {
		let color = PALETTE[index % PALETTE.len()];
		draw_series(&mut svg, samples, t_min, t_max, y_top, color);
		draw_legend_entry(&mut svg, index, name, color);
	}

	svg.push_str("</svg>\n");
	svg
}

fn bounds(series: &[(String, Vec<Sample>)]) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>, f64) {
	let mut t_min = None;
	let mut t_max = None;
	let mut v_max = 0.0f64;

	for (_, samples) in series {
		for sample in samples {
			t_min = Some(match t_min {
				Some(current) if current <= sample.timestamp => current,
				_ => sample.timestamp,
			});
			t_max = Some(match t_max {
				Some(current) if current >= sample.timestamp => current,
				_ => sample.timestamp,
			});
			v_max = v_max.max(sample.value);
		}
	}

	(t_min, t_max, v_max)
}

fn plot_width() -> f64 {
	WIDTH - MARGIN_LEFT - MARGIN_RIGHT
}

fn plot_height() -> f64 {
	HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
}

fn draw_axes(svg: &mut String, unit: &str, y_top: f64) {
	let x0 = MARGIN_LEFT;
	let x1 = WIDTH - MARGIN_RIGHT;
	let y0 = HEIGHT - MARGIN_BOTTOM;
	let y1 = MARGIN_TOP;

	svg.push_str(&format!(
		r##"<line x1="{x0}" y1="{y0}" x2="{x1}" y2="{y0}" stroke="#333"/>"##
	));
	svg.push('\n');
	svg.push_str(&format!(
		r##"<line x1="{x0}" y1="{y0}" x2="{x0}" y2="{y1}" stroke="#333"/>"##
	));
	svg.push('\n');

	// Horizontal gridlines at quarter intervals with value labels
	for step in 0..=4 {
		let fraction = step as f64 / 4.0;
		let y = y0 - fraction * plot_height();
		let value = fraction * y_top;
		if step > 0 {
			svg.push_str(&format!(
				r##"<line x1="{x0}" y1="{y}" x2="{x1}" y2="{y}" stroke="#ddd"/>"##
			));
			svg.push('\n');
		}
		svg.push_str(&format!(
			r#"<text x="{}" y="{}" font-family="sans-serif" font-size="11" text-anchor="end">{:.0}{}</text>"#,
			x0 - 6.0,
			y + 4.0,
			value,
			escape_text(unit)
		));
		svg.push('\n');
	}
}

fn draw_series(
	svg: &mut String,
	samples: &[Sample],
	t_min: DateTime<Utc>,
	t_max: DateTime<Utc>,
	y_top: f64,
	color: &str,
) {
	if samples.is_empty() {
		return;
	}

	let span_ms = (t_max - t_min).num_milliseconds().max(1) as f64;
	let points: Vec<String> = samples
		.iter()
		.map(|sample| {
			let x_fraction = (sample.timestamp - t_min).num_milliseconds() as f64 / span_ms;
			let y_fraction = (sample.value / y_top).clamp(0.0, 1.0);
			let x = MARGIN_LEFT + x_fraction * plot_width();
			let y = (HEIGHT - MARGIN_BOTTOM) - y_fraction * plot_height();
			format!("{:.1},{:.1}", x, y)
		})
		.collect();

	if points.len() == 1 {
		// A lone sample gets a dot instead of a zero-length line
		let mut parts = points[0].split(',');
		if let (Some(x), Some(y)) = (parts.next(), parts.next()) {
			svg.push_str(&format!(
				r#"<circle cx="{}" cy="{}" r="3" fill="{}"/>"#,
				x, y, color
			));
			svg.push('\n');
		}
		return;
	}

	svg.push_str(&format!(
		r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="1.5"/>"#,
		points.join(" "),
		color
	));
	svg.push('\n');
}

fn draw_legend_entry(svg: &mut String, index: usize, name: &str, color: &str) {
	let x = WIDTH - MARGIN_RIGHT + 16.0;
	let y = MARGIN_TOP + 14.0 + index as f64 * 20.0;

	svg.push_str(&format!(
		r#"<rect x="{}" y="{}" width="12" height="12" fill="{}"/>"#,
		x,
		y - 10.0,
		color
	));
	svg.push('\n');
	svg.push_str(&format!(
		r#"<text x="{}" y="{}" font-family="sans-serif" font-size="12">{}</text>"#,
		x + 18.0,
		y,
		escape_text(name)
	));
	svg.push('\n');
}

fn escape_text(input: &str) -> String {
	input
		.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
}
