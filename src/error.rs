/// Errors raised anywhere in the analysis pipeline.
///
/// Nothing is recovered locally: every variant aborts the run at the point
/// where it was produced.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// File could not be opened, created, or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Table could not be read or a row failed to parse.
    #[error("failed to read table {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// Edge table header lacks a required column.
    #[error("edge table {path} is missing required column '{column}'")]
    MissingColumn { path: String, column: &'static str },

    /// Metric is undefined for a graph this small.
    #[error("{metric} centrality is undefined for a graph with {nodes} node(s)")]
    DegenerateGraph { metric: &'static str, nodes: usize },

    /// Plot backend failure.
    #[error("failed to render plot: {0}")]
    Plot(String),
}

impl AnalysisError {
    pub(crate) fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    pub(crate) fn csv(path: impl AsRef<std::path::Path>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
