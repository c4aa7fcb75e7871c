use clap::Parser;
use fleetmon::{init_tracing, ReporterBuilder};
use fleetmon_config::load_config;
use std::path::PathBuf;
use tracing::error;

/// Sprint-cadence cloud resource utilization reporter
#[derive(Debug, Parser)]
#[command(name = "fleetmon", version, about)]
struct Cli {
	/// Path to a configuration file (default: config/config.*)
	#[arg(short, long)]
	config: Option<String>,

	/// Report on an explicit sprint instead of the current one
	#[arg(short, long, value_parser = clap::value_parser!(i64).range(1..))]
	sprint: Option<i64>,

	/// Directory the report and its charts are written to
	#[arg(short, long, default_value = ".")]
	output: PathBuf,
}

#[tokio::main]
async fn main() {
	// Missing .env is fine; real deployments set the variables directly
	dotenvy::dotenv().ok();

	let cli = Cli::parse();

	let settings = match load_config(cli.config.as_deref()) {
		Ok(settings) => settings,
		Err(e) => {
			eprintln!("failed to load configuration: {}", e);
			std::process::exit(1);
		},
	};

	init_tracing(&settings.logging);

	let result = ReporterBuilder::new()
		.with_settings(settings)
		.run(cli.sprint)
		.await;

	let output = match result {
		Ok(output) => output,
		Err(e) => {
			error!(error = %e, "reporting run failed");
			std::process::exit(1);
		},
	};

	match output.report.write_to(&cli.output) {
		Ok(path) => println!("{}", path.display()),
		Err(e) => {
			error!(error = %e, "failed to write report");
			std::process::exit(1);
		},
	}
}
