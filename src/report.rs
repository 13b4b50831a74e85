use std::fs;
use std::path::Path;

use tracing::debug;

use crate::centrality::CentralityScores;
use crate::error::{AnalysisError, Result};

/// A gene and its score, as ranked for display
#[derive(Debug, Clone, PartialEq)]
pub struct RankedGene {
    pub gene: String,
    pub score: f64,
}

/// Sort scores descending.
///
/// The sort is stable, so genes with equal scores keep the node order of
/// `scores` (first appearance in the edge table).
pub fn rank_scores(scores: &CentralityScores) -> Vec<RankedGene> {
    let mut ranked: Vec<RankedGene> = scores
        .iter()
        .map(|(gene, score)| RankedGene {
            gene: gene.to_string(),
            score,
        })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

/// Format the first `n` ranked genes as `"  {gene}: {score:.4}"` lines.
pub fn format_top(ranked: &[RankedGene], n: usize) -> Vec<String> {
    ranked
        .iter()
        .take(n)
        .map(|r| format!("  {}: {:.4}", r.gene, r.score))
        .collect()
}

/// Render a score the way a dataframe CSV writer does: shortest round-trip
/// digits, `.0` kept on integral values, and a signed exponent of at least
/// two digits (`3.2e-05`, `1e+16`).
pub fn format_score(score: f64) -> String {
    let repr = format!("{:?}", score);
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => repr,
    }
}

/// Save every score to CSV in node order (not ranked order).
///
/// Header is `gene,<metric>_centrality`. An existing file is overwritten.
pub fn save_scores_to_csv(scores: &CentralityScores, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| AnalysisError::io(parent, e))?;
        }
    }

    let mut writer =
        csv::Writer::from_path(output_path).map_err(|e| AnalysisError::csv(output_path, e))?;

    writer
        .write_record(["gene".to_string(), scores.column_name()])
        .map_err(|e| AnalysisError::csv(output_path, e))?;

    for (gene, score) in scores.iter() {
        writer
            .write_record([gene.to_string(), format_score(score)])
            .map_err(|e| AnalysisError::csv(output_path, e))?;
    }

    writer
        .flush()
        .map_err(|e| AnalysisError::io(output_path, e))?;

    debug!(path = %output_path.display(), rows = scores.len(), "wrote centrality scores");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(entries: &[(&str, f64)]) -> CentralityScores {
        CentralityScores {
            metric: "degree",
            scores: entries.iter().map(|(g, s)| (g.to_string(), *s)).collect(),
        }
    }

    #[test]
    fn test_rank_descending_with_stable_ties() {
        let ranked = rank_scores(&scores(&[
            ("A", 1.0 / 3.0),
            ("B", 2.0 / 3.0),
            ("C", 2.0 / 3.0),
            ("D", 1.0 / 3.0),
        ]));
        let genes: Vec<&str> = ranked.iter().map(|r| r.gene.as_str()).collect();
        assert_eq!(genes, vec!["B", "C", "A", "D"]);
    }

    #[test]
    fn test_format_top() {
        let ranked = rank_scores(&scores(&[("A", 1.0 / 3.0), ("B", 2.0 / 3.0)]));
        assert_eq!(format_top(&ranked, 10), vec!["  B: 0.6667", "  A: 0.3333"]);
        assert_eq!(format_top(&ranked, 1), vec!["  B: 0.6667"]);
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(0.0), "0.0");
        assert_eq!(format_score(1.0), "1.0");
        assert_eq!(format_score(2.0 / 3.0), "0.6666666666666666");
        assert_eq!(format_score(0.0001), "0.0001");
    }

    #[test]
    fn test_format_score_small_and_large_exponents() {
        assert_eq!(format_score(3.2e-5), "3.2e-05");
        assert_eq!(format_score(1e-5), "1e-05");
        assert_eq!(format_score(1.5e-123), "1.5e-123");
        assert_eq!(format_score(1e16), "1e+16");
    }

    #[test]
    fn test_csv_pads_exponent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.csv");
        save_scores_to_csv(&scores(&[("TP53", 3.2e-5), ("ATM", 0.25)]), &path).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "gene,degree_centrality\nTP53,3.2e-05\nATM,0.25\n");
    }

    #[test]
    fn test_csv_keeps_node_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("scores.csv");
        save_scores_to_csv(&scores(&[("A", 0.0), ("B", 1.0), ("C", 0.5)]), &path).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "gene,degree_centrality\nA,0.0\nB,1.0\nC,0.5\n");
    }

    #[test]
    fn test_csv_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.csv");
        fs::write(&path, "stale contents that are longer than the new file\n").unwrap();
        save_scores_to_csv(&scores(&[("A", 1.0), ("B", 1.0)]), &path).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "gene,degree_centrality\nA,1.0\nB,1.0\n");
    }
}
