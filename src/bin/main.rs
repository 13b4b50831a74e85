use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use ppi_network_rs::pipeline::{DEFAULT_BINS, DEFAULT_INPUT, DEFAULT_OUTPUT_DIR, DEFAULT_TOP_N};
use ppi_network_rs::{run, AnalysisConfig, AnalysisError, MetricKind};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Rank genes in a protein-protein interaction network by centrality
#[derive(Parser)]
#[command(name = "ppi-network")]
#[command(about = "Compute gene centrality over a PPI network edge list", long_about = None)]
struct Cli {
    /// Tab-separated edge list (must contain columns: gene1, gene2, weight)
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Directory for centrality_scores.csv and degree_distribution.png
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Centrality metric to rank genes by
    #[arg(short, long, value_enum, default_value_t = MetricKind::Betweenness)]
    metric: MetricKind,

    /// Number of top-ranked genes to print
    #[arg(short = 'n', long, default_value_t = DEFAULT_TOP_N)]
    top: usize,

    /// Number of bins in the degree histogram
    #[arg(long, default_value_t = DEFAULT_BINS)]
    bins: usize,

    /// Do not render the degree histogram
    #[arg(long)]
    no_plot: bool,

    /// Hide the progress bar during betweenness computation
    #[arg(long)]
    no_progress: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("PPI_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let config = AnalysisConfig {
        input: cli.input,
        output_dir: cli.output_dir,
        top_n: cli.top,
        bins: cli.bins,
        skip_plot: cli.no_plot,
    };
    let strategy = cli.metric.strategy(!cli.no_progress);

    if let Err(e) = run(&config, strategy.as_ref()) {
        report_failure(&e, &mut io::stderr());
        std::process::exit(1);
    }
}

/// Print the diagnostic once; the log only carries it at debug level.
fn report_failure<W: Write>(err: &AnalysisError, stderr: &mut W) {
    tracing::debug!(error = %err, "analysis failed");
    let _ = writeln!(stderr, "❌ Error: {}", err);
}
