// Size-bounded node selection for oversized graphs

use crate::model::{DomainRole, Edge, Entity};
use std::collections::HashSet;
use tracing::{debug, info};

/// Thresholds for [`select_subgraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionLimits {
    /// Selection only runs above this many nodes.
    pub max_nodes: usize,
    /// Non-priority nodes are sampled only above this many.
    pub max_other_nodes: usize,
    /// Lookalike domains kept, in insertion order, when sampling.
    pub lookalike_cap: usize,
    /// Same-IP target when the same-IP population exceeds `same_ip_pivot`.
    pub same_ip_target_large: usize,
    /// Same-IP target otherwise.
    pub same_ip_target: usize,
    pub same_ip_pivot: usize,
}

impl Default for SelectionLimits {
    fn default() -> Self {
        Self {
            max_nodes: 1000,
            max_other_nodes: 1500,
            lookalike_cap: 100,
            same_ip_target_large: 1000,
            same_ip_target: 1200,
            same_ip_pivot: 2000,
        }
    }
}

impl SelectionLimits {
    pub fn applies_to(&self, node_count: usize) -> bool {
        node_count > self.max_nodes
    }

    fn same_ip_target_for(&self, count: usize) -> usize {
        if count > self.same_ip_pivot {
            self.same_ip_target_large
        } else {
            self.same_ip_target
        }
    }
}

/// Outcome of a selection pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub nodes: Vec<Entity>,
    pub edges: Vec<Edge>,
    pub reduced: bool,
}

/// Step between picks so that `count` items thin down to about `target`.
pub fn stride_for(count: usize, target: usize) -> usize {
    if target == 0 {
        return count.max(1);
    }
    count.div_ceil(target).max(1)
}

/// Every `stride`-th item of an ordered sequence, starting with the first.
pub fn stride_sample<T: Clone>(items: &[T], stride: usize) -> Vec<T> {
    items.iter().step_by(stride.max(1)).cloned().collect()
}

/// Keep a representative subgraph when `nodes` is over the limit.
///
/// Source domains and crypto addresses always survive. The rest are kept
/// whole up to `max_other_nodes`; beyond that lookalikes are capped and
/// same-IP domains are stride sampled in their given order. An edge
/// survives only when both endpoints do.
pub fn select_subgraph(nodes: &[Entity], edges: &[Edge], limits: &SelectionLimits) -> Selection {
    if !limits.applies_to(nodes.len()) {
        return Selection {
            nodes: nodes.to_vec(),
            edges: edges.to_vec(),
            reduced: false,
        };
    }

    info!("Optimizing network: {} nodes, {} links", nodes.len(), edges.len());

    let (priority, other): (Vec<&Entity>, Vec<&Entity>) = nodes
        .iter()
        .partition(|node| node.is_source() || node.is_crypto());

    debug!("Priority nodes: {}, other nodes: {}", priority.len(), other.len());

    let kept_other: Vec<&Entity> = if other.len() > limits.max_other_nodes {
        let lookalikes: Vec<&Entity> = other
            .iter()
            .copied()
            .filter(|node| node.domain_role() == Some(DomainRole::Lookalike))
            .take(limits.lookalike_cap)
            .collect();
        let same_ip: Vec<&Entity> = other
            .iter()
            .copied()
            .filter(|node| node.domain_role() == Some(DomainRole::SameIp))
            .collect();

        let stride = stride_for(same_ip.len(), limits.same_ip_target_for(same_ip.len()));
        let sampled = stride_sample(&same_ip, stride);
        debug!(
            "Sampling {} same-IP domains with stride {} -> {}",
            same_ip.len(),
            stride,
            sampled.len()
        );

        lookalikes.into_iter().chain(sampled).collect()
    } else {
        other
    };

    let keep: HashSet<&str> = priority
        .iter()
        .chain(kept_other.iter())
        .map(|node| node.id())
        .collect();

    // Preserve the original node order in the output.
    let selected_nodes: Vec<Entity> = nodes
        .iter()
        .filter(|node| keep.contains(node.id()))
        .cloned()
        .collect();
    let selected_edges: Vec<Edge> = edges
        .iter()
        .filter(|edge| keep.contains(edge.source.as_str()) && keep.contains(edge.target.as_str()))
        .cloned()
        .collect();

    info!(
        "Optimized to: {} nodes, {} links",
        selected_nodes.len(),
        selected_edges.len()
    );

    Selection {
        nodes: selected_nodes,
        edges: selected_edges,
        reduced: true,
    }
}
