// Tests for size-bounded selection

use domnet_core::extract::SourceRow;
use domnet_core::map::{MapBuilder, NetworkMap};
use domnet_core::model::DomainRole;
use domnet_core::select::{SelectionLimits, select_subgraph, stride_for};
use std::collections::HashSet;

fn domain_list(prefix: &str, tld: &str, count: usize) -> String {
    (0..count)
        .map(|i| format!("{}{}.{}", prefix, i, tld))
        .collect::<Vec<_>>()
        .join(",")
}

/// One hub with `lookalikes` lookalike and `same_ip` same-IP neighbours plus
/// two ETH addresses.
fn hub_map(lookalikes: usize, same_ip: usize) -> NetworkMap {
    let row = SourceRow::new("hub.com")
        .with_lookalikes(&domain_list("look", "com", lookalikes))
        .with_same_ip(&domain_list("ip", "net", same_ip))
        .with_crypto("0xAAA,0xBBB", "ETH");
    MapBuilder::new().build(&[row])
}

fn count_role(map: &NetworkMap, role: DomainRole) -> usize {
    map.nodes.iter().filter(|n| n.domain_role() == Some(role)).count()
}

fn assert_no_dangling_edges(map: &NetworkMap) {
    let ids: HashSet<&str> = map.nodes.iter().map(|n| n.id()).collect();
    for link in &map.links {
        assert!(ids.contains(link.source.as_str()), "dangling source {}", link.source);
        assert!(ids.contains(link.target.as_str()), "dangling target {}", link.target);
    }
}

// ============================================================================
// Threshold Tests
// ============================================================================

#[test]
fn test_small_graph_untouched() {
    let map = hub_map(10, 500);
    let optimized = map.optimize(&SelectionLimits::default());

    assert_eq!(optimized, map);
}

#[test]
fn test_exactly_at_limit_untouched() {
    // 1 hub + 2 crypto + 997 same-IP = 1000
    let map = hub_map(0, 997);
    assert_eq!(map.nodes.len(), 1000);

    let selection = select_subgraph(&map.nodes, &map.links, &SelectionLimits::default());
    assert!(!selection.reduced);
    assert_eq!(selection.nodes.len(), 1000);
}

#[test]
fn test_other_nodes_within_sub_threshold_kept() {
    let map = hub_map(100, 1300);
    assert!(map.nodes.len() > 1000);

    let selection = select_subgraph(&map.nodes, &map.links, &SelectionLimits::default());

    assert!(selection.reduced);
    assert_eq!(selection.nodes.len(), map.nodes.len());
    assert_eq!(selection.edges.len(), map.links.len());
}

// ============================================================================
// Sampling Tests
// ============================================================================

#[test]
fn test_large_graph_sampled() {
    let map = hub_map(200, 3000);
    assert_eq!(map.nodes.len(), 3203);

    let optimized = map.optimize(&SelectionLimits::default());

    assert!(optimized.node("hub.com").is_some());
    assert!(optimized.node("0xAAA").is_some());
    assert!(optimized.node("0xBBB").is_some());

    // Lookalikes capped at the first 100
    assert_eq!(count_role(&optimized, DomainRole::Lookalike), 100);
    assert!(optimized.node("look99.com").is_some());
    assert!(optimized.node("look100.com").is_none());

    // 3000 same-IP > 2000, target 1000, stride 3
    assert_eq!(count_role(&optimized, DomainRole::SameIp), 1000);
    assert!(optimized.node("ip0.net").is_some());
    assert!(optimized.node("ip3.net").is_some());
    assert!(optimized.node("ip1.net").is_none());

    assert_eq!(optimized.nodes.len(), 1103);
    assert_eq!(optimized.links.len(), 1102);
    assert_no_dangling_edges(&optimized);
}

#[test]
fn test_medium_same_ip_uses_larger_target() {
    // 1800 same-IP <= 2000, target 1200, stride 2
    let map = hub_map(0, 1800);
    let optimized = map.optimize(&SelectionLimits::default());

    assert_eq!(count_role(&optimized, DomainRole::SameIp), 900);
    assert_no_dangling_edges(&optimized);
}

#[test]
fn test_priority_nodes_always_survive() {
    let mut rows = Vec::new();
    for i in 0..20 {
        rows.push(
            SourceRow::new(&format!("src{}.com", i))
                .with_same_ip(&domain_list(&format!("s{}-", i), "net", 100))
                .with_crypto(&format!("addr{}", i), "BTC"),
        );
    }
    let map = MapBuilder::new().build(&rows);
    assert!(map.nodes.len() > 2000);

    let optimized = map.optimize(&SelectionLimits::default());

    for i in 0..20 {
        assert!(optimized.node(&format!("src{}.com", i)).is_some());
        assert!(optimized.node(&format!("addr{}", i)).is_some());
    }
    assert!(optimized.nodes.len() < map.nodes.len());
    assert_no_dangling_edges(&optimized);
}

#[test]
fn test_selection_preserves_node_order() {
    let map = hub_map(200, 3000);
    let optimized = map.optimize(&SelectionLimits::default());

    let positions: Vec<usize> = optimized
        .nodes
        .iter()
        .map(|kept| map.nodes.iter().position(|n| n.id() == kept.id()).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_selection_is_deterministic() {
    let map = hub_map(150, 2500);

    let first = map.optimize(&SelectionLimits::default());
    let second = map.optimize(&SelectionLimits::default());

    assert_eq!(first, second);
}

#[test]
fn test_optimize_recomputes_statistics() {
    let map = hub_map(200, 3000);
    let optimized = map.optimize(&SelectionLimits::default());

    assert_eq!(optimized.statistics.nodes, optimized.nodes.len());
    assert_eq!(optimized.statistics.edges, optimized.links.len());
    assert_eq!(optimized.statistics.node_breakdown["same_ip_domain"], 1000);
    assert_eq!(optimized.statistics.processed_rows, map.statistics.processed_rows);
    assert_eq!(optimized.statistics.skipped_rows, map.statistics.skipped_rows);
    assert!(optimized.statistics.network_density > map.statistics.network_density);
}

#[test]
fn test_custom_limits() {
    let map = hub_map(20, 80);
    let limits = SelectionLimits {
        max_nodes: 50,
        max_other_nodes: 40,
        lookalike_cap: 5,
        same_ip_target_large: 10,
        same_ip_target: 20,
        same_ip_pivot: 1000,
    };

    let optimized = map.optimize(&limits);

    assert_eq!(count_role(&optimized, DomainRole::Lookalike), 5);
    // ceil(80 / 20) = 4
    assert_eq!(stride_for(80, 20), 4);
    assert_eq!(count_role(&optimized, DomainRole::SameIp), 20);
    assert_no_dangling_edges(&optimized);
}
