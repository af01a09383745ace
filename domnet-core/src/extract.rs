// Per-row relationship extraction

use crate::identity::{normalize_domain, parse_crypto_list, parse_domain_list};
use crate::model::{CryptoMetadata, DomainMetadata, DomainRole, Edge, EdgeType};
use crate::registry::NodeRegistry;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CHAIN: &str = "BTC";

/// One input record. Columns other than these are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceRow {
    #[serde(default)]
    pub source_domain: Option<String>,
    #[serde(default)]
    pub lookalike_domain: Option<String>,
    #[serde(default)]
    pub same_ip_domain: Option<String>,
    #[serde(default)]
    pub crypto_address: Option<String>,
    #[serde(default)]
    pub chain: Option<String>,
    #[serde(default, rename = "IPs")]
    pub ips: Option<String>,
    #[serde(default)]
    pub screenshot: Option<String>,
    #[serde(default)]
    pub inreach_intel_summary: Option<String>,
    #[serde(default)]
    pub discovery_method: Option<String>,
}

impl SourceRow {
    pub fn new(source_domain: &str) -> Self {
        Self {
            source_domain: Some(source_domain.to_string()),
            ..Self::default()
        }
    }

    pub fn with_lookalikes(mut self, domains: &str) -> Self {
        self.lookalike_domain = Some(domains.to_string());
        self
    }

    pub fn with_same_ip(mut self, domains: &str) -> Self {
        self.same_ip_domain = Some(domains.to_string());
        self
    }

    pub fn with_crypto(mut self, addresses: &str, chain: &str) -> Self {
        self.crypto_address = Some(addresses.to_string());
        self.chain = Some(chain.to_string());
        self
    }

    pub fn with_discovery_method(mut self, method: &str) -> Self {
        self.discovery_method = Some(method.to_string());
        self
    }

    pub fn with_screenshot(mut self, screenshot: &str) -> Self {
        self.screenshot = Some(screenshot.to_string());
        self
    }

    /// True when at least one relationship column carries a value.
    pub fn has_relationships(&self) -> bool {
        [&self.lookalike_domain, &self.same_ip_domain, &self.crypto_address]
            .into_iter()
            .any(|cell| !is_missing(cell))
    }

    fn text(cell: &Option<String>) -> String {
        cell.as_deref().map(str::trim).unwrap_or_default().to_string()
    }

    fn chain(&self) -> String {
        let chain = Self::text(&self.chain);
        if chain.is_empty() {
            DEFAULT_CHAIN.to_string()
        } else {
            chain
        }
    }

    fn domain_metadata(&self, url: &str) -> DomainMetadata {
        DomainMetadata {
            ip_address: Self::text(&self.ips),
            screenshot: Self::text(&self.screenshot),
            url: url.to_string(),
            inreach_intel_summary: Self::text(&self.inreach_intel_summary),
            discovery_method: Self::text(&self.discovery_method),
        }
    }
}

/// A cell counts as missing when absent or empty.
pub fn is_missing(cell: &Option<String>) -> bool {
    cell.as_deref().is_none_or(str::is_empty)
}

/// Why a row contributed nothing to the graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkipReason {
    #[error("source_domain is empty after normalization")]
    EmptySourceDomain,

    #[error("malformed record at line {line}: {message}")]
    Malformed { line: u64, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowOutcome {
    pub source: String,
    pub nodes_created: usize,
    pub edges_added: usize,
}

/// Turn one row into nodes and edges.
///
/// Lookalike and same-IP entries equal to the source, or empty after
/// normalization, are skipped silently. Existing nodes are reused as-is.
pub fn extract_row(
    registry: &mut NodeRegistry,
    edges: &mut Vec<Edge>,
    row: &SourceRow,
) -> Result<RowOutcome, SkipReason> {
    let source = row
        .source_domain
        .as_deref()
        .map(normalize_domain)
        .unwrap_or_default();
    if source.is_empty() {
        return Err(SkipReason::EmptySourceDomain);
    }

    let nodes_before = registry.len();
    let edges_before = edges.len();
    let discovery_method = SourceRow::text(&row.discovery_method);

    if registry.get(&source).is_none() {
        registry.create_domain(&source, DomainRole::Source, row.domain_metadata(&source));
    }

    let related = [
        (&row.lookalike_domain, DomainRole::Lookalike, EdgeType::LookalikeDomain),
        (&row.same_ip_domain, DomainRole::SameIp, EdgeType::SameIpDomain),
    ];
    for (cell, role, edge_type) in related {
        let Some(raw) = cell.as_deref() else {
            continue;
        };
        for target in parse_domain_list(raw) {
            if target == source {
                continue;
            }
            if registry.get(&target).is_none() {
                registry.create_domain(&target, role, row.domain_metadata(&target));
            }
            edges.push(Edge::new(&source, &target, edge_type, &discovery_method));
        }
    }

    if let Some(raw) = row.crypto_address.as_deref() {
        let chain = row.chain();
        for address in parse_crypto_list(raw) {
            if address == source {
                continue;
            }
            if registry.get(&address).is_none() {
                registry.create_crypto(
                    &address,
                    &chain,
                    CryptoMetadata {
                        discovery_method: discovery_method.clone(),
                    },
                );
            }
            edges.push(
                Edge::new(&source, &address, EdgeType::DomainToCrypto, &discovery_method)
                    .with_chain(&chain),
            );
        }
    }

    Ok(RowOutcome {
        source,
        nodes_created: registry.len() - nodes_before,
        edges_added: edges.len() - edges_before,
    })
}
