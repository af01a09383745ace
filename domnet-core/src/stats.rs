// Node/edge breakdowns and density for a (possibly reduced) graph

use crate::model::{Edge, Entity};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub nodes: usize,
    pub edges: usize,
    pub processed_rows: usize,
    pub skipped_rows: usize,
    pub node_breakdown: IndexMap<String, usize>,
    pub edge_breakdown: IndexMap<String, usize>,
    pub network_density: f64,
}

impl Statistics {
    pub fn compute(nodes: &[Entity], edges: &[Edge], processed_rows: usize, skipped_rows: usize) -> Self {
        Self {
            nodes: nodes.len(),
            edges: edges.len(),
            processed_rows,
            skipped_rows,
            node_breakdown: node_breakdown(nodes),
            edge_breakdown: edge_breakdown(edges),
            network_density: network_density(nodes.len(), edges.len()),
        }
    }
}

/// `2E / (N(N-1))`, zero below two nodes.
///
/// Parallel edges are counted as-is, so a multigraph can exceed the simple
/// graph value. Consumers expect this figure unchanged.
pub fn network_density(nodes: usize, edges: usize) -> f64 {
    if nodes < 2 {
        return 0.0;
    }
    let n = nodes as f64;
    (2.0 * edges as f64) / (n * (n - 1.0))
}

pub fn node_breakdown(nodes: &[Entity]) -> IndexMap<String, usize> {
    let mut counts = IndexMap::new();
    for node in nodes {
        *counts.entry(node.node_type().to_string()).or_insert(0) += 1;
    }
    counts
}

pub fn edge_breakdown(edges: &[Edge]) -> IndexMap<String, usize> {
    let mut counts = IndexMap::new();
    for edge in edges {
        *counts.entry(edge.edge_type.as_str().to_string()).or_insert(0) += 1;
    }
    counts
}

/// Percentage of edges whose discovery method mentions "intel", one decimal.
pub fn intel_coverage(edges: &[Edge]) -> f64 {
    if edges.is_empty() {
        return 0.0;
    }
    let intel = edges
        .iter()
        .filter(|edge| edge.discovery_method.to_lowercase().contains("intel"))
        .count();
    let percent = intel as f64 * 100.0 / edges.len() as f64;
    (percent * 10.0).round() / 10.0
}
