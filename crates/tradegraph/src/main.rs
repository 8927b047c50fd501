use anyhow::{Context, Result};
use clap::Parser;
use tradegraph::models::DispatchMode;
use tradegraph::runlog::RunLogWriter;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tradegraph", about = "Multi-stage trading decision pipeline")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/tradegraph.toml")]
    config: String,

    /// Ticker or other subject to analyze
    #[arg(short, long)]
    subject: String,

    /// As-of date for the analysis (YYYY-MM-DD)
    #[arg(short, long)]
    date: String,

    /// Run the analysts concurrently
    #[arg(long)]
    parallel: bool,

    /// Skip writing the run log
    #[arg(long)]
    no_log: bool,

    /// Pretty-print the output JSON
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = tradegraph::load_config(&cli.config)?;
    if cli.parallel {
        config.analysts.mode = DispatchMode::Parallel;
    }

    let graph = tradegraph::build_graph(&config)?;
    let writer = (config.log.enabled && !cli.no_log)
        .then(|| RunLogWriter::new(&config.log.results_dir));

    let outcome = tradegraph::run(&graph, &cli.subject, &cli.date, writer.as_ref())
        .await
        .with_context(|| format!("Pipeline failed for {} on {}", cli.subject, cli.date))?;

    let summary = outcome.summary();
    let output = if cli.pretty {
        serde_json::to_string_pretty(&summary)?
    } else {
        serde_json::to_string(&summary)?
    };
    println!("{output}");

    Ok(())
}
