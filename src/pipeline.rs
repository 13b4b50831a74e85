use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::centrality::{Centrality, CentralityScores};
use crate::edges::load_edges_from_tsv;
use crate::error::{AnalysisError, Result};
use crate::histogram::{DegreeHistogram, HistogramStyle};
use crate::network::PpiNetwork;
use crate::report::{format_top, rank_scores, save_scores_to_csv, RankedGene};

pub const DEFAULT_INPUT: &str = "data/ppi_network.tsv";
pub const DEFAULT_OUTPUT_DIR: &str = "results";
pub const SCORES_FILE: &str = "centrality_scores.csv";
pub const PLOT_FILE: &str = "degree_distribution.png";
pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_BINS: usize = 20;

/// Inputs and knobs for one analysis run
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub top_n: usize,
    pub bins: usize,
    /// Skip the degree histogram image
    pub skip_plot: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            top_n: DEFAULT_TOP_N,
            bins: DEFAULT_BINS,
            skip_plot: false,
        }
    }
}

impl AnalysisConfig {
    pub fn scores_path(&self) -> PathBuf {
        self.output_dir.join(SCORES_FILE)
    }

    pub fn plot_path(&self) -> PathBuf {
        self.output_dir.join(PLOT_FILE)
    }
}

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct AnalysisSummary {
    pub nodes: usize,
    pub edges: usize,
    pub scores: CentralityScores,
    pub ranked: Vec<RankedGene>,
    pub histogram: DegreeHistogram,
    pub scores_path: PathBuf,
    pub plot_path: Option<PathBuf>,
}

/// Run the full pipeline, reporting to stdout.
pub fn run(config: &AnalysisConfig, centrality: &dyn Centrality) -> Result<AnalysisSummary> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_with_output(config, centrality, &mut out)
}

/// Load, score, rank, save and plot, writing progress lines to `out`.
///
/// Stops at the first failure; files already written stay on disk.
pub fn run_with_output<W: Write>(
    config: &AnalysisConfig,
    centrality: &dyn Centrality,
    out: &mut W,
) -> Result<AnalysisSummary> {
    let metric = centrality.metric();

    say(out, format_args!("Loading network..."))?;
    let edges = load_edges_from_tsv(&config.input)?;
    let network = PpiNetwork::from_edges(&edges);
    say(
        out,
        format_args!(
            "Network contains {} nodes and {} edges.",
            network.node_count(),
            network.edge_count()
        ),
    )?;
    info!(
        input = %config.input.display(),
        rows = edges.len(),
        nodes = network.node_count(),
        edges = network.edge_count(),
        "network loaded"
    );

    say(out, format_args!("Computing {} centrality...", metric))?;
    let scores = centrality.compute(&network)?;

    let ranked = rank_scores(&scores);
    say(
        out,
        format_args!("\nTop {} genes by {} centrality:", config.top_n, metric),
    )?;
    for line in format_top(&ranked, config.top_n) {
        say(out, format_args!("{}", line))?;
    }

    let scores_path = config.scores_path();
    save_scores_to_csv(&scores, &scores_path)?;
    say(out, format_args!("\nResults saved to {}", scores_path.display()))?;

    let histogram = DegreeHistogram::from_network(&network, config.bins);
    let plot_path = if config.skip_plot {
        None
    } else {
        let path = config.plot_path();
        histogram.render_png(&path, &HistogramStyle::default())?;
        say(out, format_args!("Plot saved to {}", path.display()))?;
        Some(path)
    };

    Ok(AnalysisSummary {
        nodes: network.node_count(),
        edges: network.edge_count(),
        scores,
        ranked,
        histogram,
        scores_path,
        plot_path,
    })
}

fn say<W: Write>(out: &mut W, args: std::fmt::Arguments<'_>) -> Result<()> {
    writeln!(out, "{}", args).map_err(|e| AnalysisError::io(Path::new("<stdout>"), e))
}
