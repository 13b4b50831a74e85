use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::error::{AnalysisError, Result};

/// Columns that every edge table must carry, in any order.
pub const REQUIRED_COLUMNS: [&str; 3] = ["gene1", "gene2", "weight"];

/// One interaction row from the edge table
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EdgeRecord {
    pub gene1: String,
    pub gene2: String,
    #[serde(deserialize_with = "padded_f64")]
    pub weight: f64,
}

/// Gene identifiers are taken verbatim; only the weight tolerates padding.
fn padded_f64<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<f64, D::Error> {
    let raw = String::deserialize(deserializer)?;
    raw.trim().parse::<f64>().map_err(serde::de::Error::custom)
}

impl EdgeRecord {
    pub fn new(gene1: impl Into<String>, gene2: impl Into<String>, weight: f64) -> Self {
        Self {
            gene1: gene1.into(),
            gene2: gene2.into(),
            weight,
        }
    }
}

/// Load edges from a tab-separated file, preserving row order.
pub fn load_edges_from_tsv(path: impl AsRef<Path>) -> Result<Vec<EdgeRecord>> {
    load_edges(path, b'\t')
}

/// Load edges from a delimited file with a header row.
///
/// The header must name `gene1`, `gene2` and `weight`; extra columns are
/// ignored and the three may appear in any order. Gene identifiers are kept
/// byte for byte, so `"TP53 "` and `"TP53"` are distinct genes. Weights are
/// parsed as floats but not range-checked.
pub fn load_edges(path: impl AsRef<Path>, delimiter: u8) -> Result<Vec<EdgeRecord>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| AnalysisError::io(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(BufReader::new(file));

    let headers = reader
        .headers()
        .map_err(|e| AnalysisError::csv(path, e))?
        .clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(AnalysisError::MissingColumn {
                path: path.display().to_string(),
                column,
            });
        }
    }

    let mut edges = Vec::new();
    for result in reader.deserialize() {
        let edge: EdgeRecord = result.map_err(|e| AnalysisError::csv(path, e))?;
        edges.push(edge);
    }

    debug!(path = %path.display(), rows = edges.len(), "loaded edge table");
    Ok(edges)
}
