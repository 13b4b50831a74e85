use std::collections::VecDeque;
use std::fmt;

use indicatif::{ProgressBar, ProgressStyle};
use petgraph::graph::NodeIndex;
use tracing::{debug, instrument};

use crate::error::{AnalysisError, Result};
use crate::network::PpiNetwork;

/// Metric name of [`Betweenness`]; also the CLI value and CSV column prefix.
pub const BETWEENNESS: &str = "betweenness";
/// Metric name of [`Degree`].
pub const DEGREE: &str = "degree";

/// Per-gene centrality scores in node order.
#[derive(Debug, Clone, PartialEq)]
pub struct CentralityScores {
    pub metric: &'static str,
    pub scores: Vec<(String, f64)>,
}

impl CentralityScores {
    /// Column header for the score column, e.g. `betweenness_centrality`.
    pub fn column_name(&self) -> String {
        format!("{}_centrality", self.metric)
    }

    pub fn get(&self, gene: &str) -> Option<f64> {
        self.scores
            .iter()
            .find(|(g, _)| g == gene)
            .map(|(_, score)| *score)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.scores.iter().map(|(g, s)| (g.as_str(), *s))
    }
}

/// A node centrality metric over a [`PpiNetwork`].
pub trait Centrality {
    /// Short metric name used in console output and the CSV header
    fn metric(&self) -> &'static str;

    /// Score every node in the network.
    ///
    /// # Returns
    /// One entry per node, in node order
    fn compute(&self, network: &PpiNetwork) -> Result<CentralityScores>;
}

/// Normalized shortest-path betweenness (Brandes, unweighted).
///
/// Edge weights are ignored; every edge has length one.
#[derive(Debug, Clone, Default)]
pub struct Betweenness {
    show_progress: bool,
}

impl Betweenness {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw a progress bar over source nodes while computing.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} nodes ({percent}%) | ETA: {eta}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        pb.set_style(style);
        pb
    }
}

impl Centrality for Betweenness {
    fn metric(&self) -> &'static str {
        BETWEENNESS
    }

    #[instrument(skip_all, fields(nodes = network.node_count()))]
    fn compute(&self, network: &PpiNetwork) -> Result<CentralityScores> {
        let g = network.graph();
        let n = g.node_count();
        let mut cb = vec![0.0f64; n];

        let pb = self.progress_bar(n);

        for s in g.node_indices() {
            let si = s.index();
            let mut stack: Vec<NodeIndex> = Vec::with_capacity(n);
            let mut predecessors: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];
            let mut sigma = vec![0.0f64; n];
            let mut dist = vec![-1i64; n];
            sigma[si] = 1.0;
            dist[si] = 0;

            let mut queue = VecDeque::new();
            queue.push_back(s);

            while let Some(v) = queue.pop_front() {
                let vi = v.index();
                stack.push(v);
                for w in g.neighbors(v) {
                    let wi = w.index();
                    if dist[wi] < 0 {
                        dist[wi] = dist[vi] + 1;
                        queue.push_back(w);
                    }
                    if dist[wi] == dist[vi] + 1 {
                        sigma[wi] += sigma[vi];
                        predecessors[wi].push(v);
                    }
                }
            }

            // Dependencies accumulate farthest-first.
            let mut delta = vec![0.0f64; n];
            while let Some(w) = stack.pop() {
                let wi = w.index();
                for &v in &predecessors[wi] {
                    let vi = v.index();
                    delta[vi] += (sigma[vi] / sigma[wi]) * (1.0 + delta[wi]);
                }
                if wi != si {
                    cb[wi] += delta[wi];
                }
            }

            pb.inc(1);
        }

        pb.finish_and_clear();

        // Every undirected pair was swept from both ends, so dividing by
        // (n-1)(n-2) rather than its half normalizes to [0, 1].
        if n > 2 {
            let scale = 1.0 / ((n - 1) as f64 * (n - 2) as f64);
            for value in &mut cb {
                *value *= scale;
            }
        }

        debug!(nodes = n, "betweenness computed");

        Ok(CentralityScores {
            metric: self.metric(),
            scores: g
                .node_indices()
                .map(|idx| (g[idx].clone(), cb[idx.index()]))
                .collect(),
        })
    }
}

/// Degree divided by the largest possible degree, `n - 1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Degree;

impl Centrality for Degree {
    fn metric(&self) -> &'static str {
        DEGREE
    }

    #[instrument(skip_all, fields(nodes = network.node_count()))]
    fn compute(&self, network: &PpiNetwork) -> Result<CentralityScores> {
        let n = network.node_count();
        if n <= 1 {
            return Err(AnalysisError::DegenerateGraph {
                metric: self.metric(),
                nodes: n,
            });
        }

        let scale = 1.0 / (n - 1) as f64;
        let scores = network
            .degrees()
            .into_iter()
            .map(|(gene, d)| (gene, d as f64 * scale))
            .collect();

        Ok(CentralityScores {
            metric: self.metric(),
            scores,
        })
    }
}

/// Selectable centrality strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum MetricKind {
    #[default]
    Betweenness,
    Degree,
}

impl MetricKind {
    pub fn strategy(self, show_progress: bool) -> Box<dyn Centrality> {
        match self {
            MetricKind::Betweenness => Box::new(Betweenness::new().with_progress(show_progress)),
            MetricKind::Degree => Box::new(Degree),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MetricKind::Betweenness => BETWEENNESS,
            MetricKind::Degree => DEGREE,
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for MetricKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        [MetricKind::Betweenness, MetricKind::Degree]
            .into_iter()
            .find(|kind| kind.name() == lowered)
            .ok_or_else(|| {
                format!(
                    "Unknown centrality metric '{}' (expected '{}' or '{}')",
                    lowered, BETWEENNESS, DEGREE
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edges::EdgeRecord;
    use proptest::prelude::*;

    const EPS: f64 = 1e-12;

    fn network(edges: &[(&str, &str)]) -> PpiNetwork {
        let rows: Vec<EdgeRecord> = edges
            .iter()
            .map(|(a, b)| EdgeRecord::new(*a, *b, 1.0))
            .collect();
        PpiNetwork::from_edges(&rows)
    }

    #[test]
    fn test_path_betweenness() {
        let scores = Betweenness::new()
            .compute(&network(&[("A", "B"), ("B", "C"), ("C", "D")]))
            .unwrap();
        assert_eq!(scores.metric, "betweenness");
        assert!((scores.get("A").unwrap() - 0.0).abs() < EPS);
        assert!((scores.get("B").unwrap() - 2.0 / 3.0).abs() < EPS);
        assert!((scores.get("C").unwrap() - 2.0 / 3.0).abs() < EPS);
        assert!((scores.get("D").unwrap() - 0.0).abs() < EPS);
    }

    #[test]
    fn test_star_center_carries_every_path() {
        let scores = Betweenness::new()
            .compute(&network(&[("hub", "a"), ("hub", "b"), ("hub", "c"), ("hub", "d")]))
            .unwrap();
        assert!((scores.get("hub").unwrap() - 1.0).abs() < EPS);
        for leaf in ["a", "b", "c", "d"] {
            assert_eq!(scores.get(leaf), Some(0.0));
        }
    }

    #[test]
    fn test_cycle_splits_paths() {
        // In a 4-cycle each node sits on one of two shortest paths between
        // its two neighbours.
        let scores = Betweenness::new()
            .compute(&network(&[("A", "B"), ("B", "C"), ("C", "D"), ("D", "A")]))
            .unwrap();
        for (_, score) in scores.iter() {
            assert!((score - 1.0 / 6.0).abs() < EPS);
        }
    }

    #[test]
    fn test_isolated_node_scores_zero() {
        let scores = Betweenness::new()
            .compute(&network(&[("A", "B"), ("B", "C"), ("X", "X")]))
            .unwrap();
        assert_eq!(scores.len(), 4);
        assert_eq!(scores.get("X"), Some(0.0));
        assert!((scores.get("B").unwrap() - 1.0 / 3.0).abs() < EPS);
    }

    #[test]
    fn test_betweenness_small_graphs() {
        assert!(Betweenness::new().compute(&PpiNetwork::new()).unwrap().is_empty());
        let scores = Betweenness::new().compute(&network(&[("A", "B")])).unwrap();
        assert_eq!(scores.scores, vec![("A".to_string(), 0.0), ("B".to_string(), 0.0)]);
    }

    #[test]
    fn test_degree_path() {
        let scores = Degree
            .compute(&network(&[("A", "B"), ("B", "C"), ("C", "D")]))
            .unwrap();
        assert_eq!(scores.column_name(), "degree_centrality");
        let expected = [("A", 1.0 / 3.0), ("B", 2.0 / 3.0), ("C", 2.0 / 3.0), ("D", 1.0 / 3.0)];
        for ((gene, score), (want_gene, want)) in scores.iter().zip(expected) {
            assert_eq!(gene, want_gene);
            assert!((score - want).abs() < EPS);
        }
    }

    #[test]
    fn test_degree_counts_self_loop_twice() {
        let scores = Degree.compute(&network(&[("A", "A"), ("A", "B")])).unwrap();
        assert_eq!(scores.get("A"), Some(3.0));
        assert_eq!(scores.get("B"), Some(1.0));
    }

    #[test]
    fn test_degree_single_node_is_error() {
        let err = Degree.compute(&network(&[("A", "A")])).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::DegenerateGraph { metric: "degree", nodes: 1 }
        ));
        assert!(Degree.compute(&PpiNetwork::new()).is_err());
    }

    #[test]
    fn test_metric_kind() {
        assert_eq!("Degree".parse::<MetricKind>(), Ok(MetricKind::Degree));
        assert!("closeness".parse::<MetricKind>().is_err());
        assert_eq!(MetricKind::default().strategy(false).metric(), "betweenness");
        assert_eq!(MetricKind::Degree.strategy(false).metric(), "degree");
        assert_eq!(MetricKind::Betweenness.to_string(), "betweenness");
    }

    #[test]
    fn test_metric_kind_name_matches_strategy() {
        use clap::ValueEnum;
        for kind in MetricKind::value_variants() {
            assert_eq!(kind.name(), kind.strategy(false).metric());
            assert_eq!(kind.name().parse::<MetricKind>(), Ok(*kind));
            let value = kind.to_possible_value().unwrap();
            assert_eq!(value.get_name(), kind.name());
        }
    }

    fn arb_edges() -> impl Strategy<Value = Vec<(u8, u8)>> {
        prop::collection::vec((0u8..12, 0u8..12), 0..40)
    }

    proptest! {
        #[test]
        fn betweenness_in_unit_interval(edges in arb_edges()) {
            let rows: Vec<EdgeRecord> = edges
                .iter()
                .map(|(a, b)| EdgeRecord::new(format!("g{a}"), format!("g{b}"), 1.0))
                .collect();
            let net = PpiNetwork::from_edges(&rows);
            let scores = Betweenness::new().compute(&net).unwrap();
            prop_assert_eq!(scores.len(), net.node_count());
            for (gene, score) in scores.iter() {
                prop_assert!((-EPS..=1.0 + EPS).contains(&score));
                if net.degree(gene) == Some(0) {
                    prop_assert_eq!(score, 0.0);
                }
            }
        }

        #[test]
        fn degree_matches_formula(edges in arb_edges()) {
            let rows: Vec<EdgeRecord> = edges
                .iter()
                .map(|(a, b)| EdgeRecord::new(format!("g{a}"), format!("g{b}"), 1.0))
                .collect();
            let net = PpiNetwork::from_edges(&rows);
            let k = net.node_count();
            match Degree.compute(&net) {
                Ok(scores) => {
                    prop_assert!(k > 1);
                    for (gene, score) in scores.iter() {
                        let d = net.degree(gene).unwrap() as f64;
                        prop_assert!((score - d / (k - 1) as f64).abs() < EPS);
                    }
                }
                Err(_) => prop_assert!(k <= 1),
            }
        }
    }
}
