// Graph assembly: rows in, one immutable network snapshot out

use crate::error::Result;
use crate::extract::{RowOutcome, SkipReason, SourceRow, extract_row};
use crate::model::{Edge, EdgeType, Entity};
use crate::registry::NodeRegistry;
use crate::select::{SelectionLimits, select_subgraph};
use crate::source::RowRecord;
use crate::stats::Statistics;
use crate::style::StyleTable;
use petgraph::graph::{Graph, NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Nodes, links and statistics handed to a renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkMap {
    pub nodes: Vec<Entity>,
    pub links: Vec<Edge>,
    pub statistics: Statistics,
}

impl NetworkMap {
    /// Apply the size-bounded selection and recompute statistics for the
    /// kept graph. Row counters carry over unchanged.
    pub fn optimize(&self, limits: &SelectionLimits) -> NetworkMap {
        let selection = select_subgraph(&self.nodes, &self.links, limits);
        if !selection.reduced {
            return self.clone();
        }
        let statistics = Statistics::compute(
            &selection.nodes,
            &selection.edges,
            self.statistics.processed_rows,
            self.statistics.skipped_rows,
        );
        NetworkMap {
            nodes: selection.nodes,
            links: selection.edges,
            statistics,
        }
    }

    pub fn node(&self, id: &str) -> Option<&Entity> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_compact_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn export_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        info!("Graph data exported to {}", path.display());
        Ok(())
    }

    /// Undirected graph view, node weights are ids. Links whose endpoints
    /// are not in `nodes` are left out.
    pub fn to_petgraph(&self) -> UnGraph<String, EdgeType> {
        let mut graph: UnGraph<String, EdgeType> =
            Graph::with_capacity(self.nodes.len(), self.links.len());
        let mut index: HashMap<&str, NodeIndex> = HashMap::with_capacity(self.nodes.len());

        for node in &self.nodes {
            index.insert(node.id(), graph.add_node(node.id().to_string()));
        }
        for link in &self.links {
            if let (Some(&a), Some(&b)) = (index.get(link.source.as_str()), index.get(link.target.as_str())) {
                graph.add_edge(a, b, link.edge_type);
            }
        }
        graph
    }

    /// Number of connected clusters in the graph.
    pub fn cluster_count(&self) -> usize {
        petgraph::algo::connected_components(&self.to_petgraph())
    }
}

/// Owns the registry and edge list for one build.
#[derive(Debug, Clone, Default)]
pub struct MapBuilder {
    registry: NodeRegistry,
    edges: Vec<Edge>,
    processed_rows: usize,
    skipped_rows: usize,
    skipped: Vec<(usize, SkipReason)>,
}

impl MapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_styles(styles: StyleTable) -> Self {
        Self {
            registry: NodeRegistry::new(styles),
            ..Self::default()
        }
    }

    /// Build from already decoded rows.
    pub fn build(&mut self, rows: &[SourceRow]) -> NetworkMap {
        self.build_from(rows.iter().map(Ok))
    }

    /// Build from loader records; undecodable records count as skipped.
    pub fn build_records(&mut self, records: &[RowRecord]) -> NetworkMap {
        self.build_from(records.iter().map(|record| {
            record.as_ref().map_err(|err| SkipReason::Malformed {
                line: err.line,
                message: err.message.clone(),
            })
        }))
    }

    fn build_from<'a, I>(&mut self, rows: I) -> NetworkMap
    where
        I: Iterator<Item = std::result::Result<&'a SourceRow, SkipReason>>,
    {
        info!("Building network graph...");
        self.reset();

        for (index, row) in rows.enumerate() {
            match row.and_then(|row| extract_row(&mut self.registry, &mut self.edges, row)) {
                Ok(RowOutcome {
                    source,
                    nodes_created,
                    edges_added,
                }) => {
                    debug!(
                        "Row {}: {} (+{} nodes, +{} edges)",
                        index, source, nodes_created, edges_added
                    );
                    self.processed_rows += 1;
                }
                Err(reason) => {
                    warn!("Skipping row {}: {}", index, reason);
                    self.skipped_rows += 1;
                    self.skipped.push((index, reason));
                }
            }
        }

        let snapshot = self.snapshot();
        info!(
            "Graph built: {} nodes, {} edges, {} rows processed, {} skipped",
            snapshot.statistics.nodes,
            snapshot.statistics.edges,
            snapshot.statistics.processed_rows,
            snapshot.statistics.skipped_rows
        );
        snapshot
    }

    fn reset(&mut self) {
        self.registry.clear();
        self.edges.clear();
        self.processed_rows = 0;
        self.skipped_rows = 0;
        self.skipped.clear();
    }

    /// Current state as a snapshot, without any size reduction.
    pub fn snapshot(&self) -> NetworkMap {
        let nodes = self.registry.export();
        let statistics = Statistics::compute(&nodes, &self.edges, self.processed_rows, self.skipped_rows);
        NetworkMap {
            nodes,
            links: self.edges.clone(),
            statistics,
        }
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn processed_rows(&self) -> usize {
        self.processed_rows
    }

    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    /// Row index and reason for every skipped row of the last build.
    pub fn skipped(&self) -> &[(usize, SkipReason)] {
        &self.skipped
    }
}
