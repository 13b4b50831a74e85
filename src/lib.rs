pub mod centrality;
pub mod edges;
pub mod error;
pub mod histogram;
pub mod network;
pub mod pipeline;
pub mod report;

#[cfg(feature = "python")]
pub mod python_bindings;

// Re-export commonly used types and traits
pub use centrality::{Betweenness, Centrality, CentralityScores, Degree, MetricKind};
pub use edges::{load_edges, load_edges_from_tsv, EdgeRecord};
pub use error::{AnalysisError, Result};
pub use histogram::{DegreeHistogram, HistogramStyle};
pub use network::PpiNetwork;
pub use pipeline::{run, run_with_output, AnalysisConfig, AnalysisSummary};
pub use report::{format_top, rank_scores, save_scores_to_csv, RankedGene};
