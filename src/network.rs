use std::collections::HashMap;

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use crate::edges::EdgeRecord;

/// Undirected weighted interaction graph keyed by gene identifier.
///
/// Node indices follow first-appearance order in the edge table, so every
/// per-node sequence this type hands out iterates in that order.
#[derive(Debug, Clone, Default)]
pub struct PpiNetwork {
    graph: UnGraph<String, f64>,
    node_map: HashMap<String, NodeIndex>,
}

impl PpiNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a network from edge rows in order. A repeated gene pair (in
    /// either orientation) overwrites the earlier weight.
    pub fn from_edges(edges: &[EdgeRecord]) -> Self {
        let mut network = Self::new();
        for edge in edges {
            network.add_edge(&edge.gene1, &edge.gene2, edge.weight);
        }
        network
    }

    /// Register `gene` if unseen and return its index.
    pub fn add_gene(&mut self, gene: &str) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(gene) {
            return idx;
        }
        let idx = self.graph.add_node(gene.to_string());
        self.node_map.insert(gene.to_string(), idx);
        idx
    }

    /// Insert or overwrite the edge between two genes.
    pub fn add_edge(&mut self, gene1: &str, gene2: &str, weight: f64) {
        let a = self.add_gene(gene1);
        let b = self.add_gene(gene2);
        self.graph.update_edge(a, b, weight);
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains_gene(&self, gene: &str) -> bool {
        self.node_map.contains_key(gene)
    }

    /// Genes in node order.
    pub fn genes(&self) -> impl Iterator<Item = &str> + '_ {
        self.graph.node_indices().map(|idx| self.graph[idx].as_str())
    }

    /// Weight of the edge between two genes, regardless of orientation.
    pub fn edge_weight(&self, gene1: &str, gene2: &str) -> Option<f64> {
        let a = *self.node_map.get(gene1)?;
        let b = *self.node_map.get(gene2)?;
        let edge = self.graph.find_edge(a, b)?;
        self.graph.edge_weight(edge).copied()
    }

    /// Structural degree of `gene`. A self-loop counts twice.
    pub fn degree(&self, gene: &str) -> Option<usize> {
        let idx = *self.node_map.get(gene)?;
        Some(self.degree_vector()[idx.index()])
    }

    /// Degree of every gene in node order.
    pub fn degrees(&self) -> Vec<(String, usize)> {
        self.graph
            .node_indices()
            .zip(self.degree_vector())
            .map(|(idx, d)| (self.graph[idx].clone(), d))
            .collect()
    }

    /// Node-indexed degree counts.
    pub(crate) fn degree_vector(&self) -> Vec<usize> {
        let mut degree = vec![0usize; self.graph.node_count()];
        for edge in self.graph.edge_references() {
            degree[edge.source().index()] += 1;
            degree[edge.target().index()] += 1;
        }
        degree
    }

    pub fn graph(&self) -> &UnGraph<String, f64> {
        &self.graph
    }
}
