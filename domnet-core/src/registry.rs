// Keyed store of unique graph entities

use crate::model::{
    CryptoEntity, CryptoMetadata, DomainEntity, DomainMetadata, DomainRole, Entity, crypto_label,
    domain_label, explorer_url,
};
use crate::style::{BTC_ADDRESS_STYLE, SOURCE_DOMAIN_STYLE, StyleTable};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryStats {
    pub total_nodes: usize,
    pub domain_nodes: usize,
    pub crypto_nodes: usize,
    pub by_type: IndexMap<String, usize>,
}

/// At most one entity per identity key, kept in insertion order.
///
/// The registry never decides whether to create: callers look a key up with
/// [`NodeRegistry::get`] first. A create call for a key that already exists
/// leaves the stored entity untouched and returns it.
#[derive(Debug, Clone)]
pub struct NodeRegistry {
    nodes: IndexMap<String, Entity>,
    styles: StyleTable,
}

impl NodeRegistry {
    pub fn new(styles: StyleTable) -> Self {
        Self {
            nodes: IndexMap::new(),
            styles,
        }
    }

    pub fn styles(&self) -> &StyleTable {
        &self.styles
    }

    pub fn get(&self, key: &str) -> Option<&Entity> {
        self.nodes.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn create_domain(&mut self, key: &str, role: DomainRole, metadata: DomainMetadata) -> &Entity {
        if self.nodes.contains_key(key) {
            debug!("Domain node {} already registered, keeping first entry", key);
        } else {
            let style = self.styles.resolve(role.as_str(), SOURCE_DOMAIN_STYLE);
            let entity = Entity::Domain(DomainEntity {
                id: key.to_string(),
                label: domain_label(key),
                node_type: role,
                size: style.size,
                color: style.color.clone(),
                shape: style.shape,
                domain_type: role,
                ip_address: metadata.ip_address,
                screenshot: metadata.screenshot,
                url: metadata.url,
                inreach_intel_summary: metadata.inreach_intel_summary,
                discovery_method: metadata.discovery_method,
                style: style.stroke(),
            });
            self.nodes.insert(key.to_string(), entity);
        }
        &self.nodes[key]
    }

    pub fn create_crypto(&mut self, address: &str, chain: &str, metadata: CryptoMetadata) -> &Entity {
        if self.nodes.contains_key(address) {
            debug!("Crypto node {} already registered, keeping first entry", address);
        } else {
            let node_type = format!("{}_address", chain.to_lowercase());
            let style = self.styles.resolve(&node_type, BTC_ADDRESS_STYLE);
            let entity = Entity::Crypto(CryptoEntity {
                id: address.to_string(),
                label: crypto_label(address),
                size: style.size,
                color: style.color.clone(),
                shape: style.shape,
                style: style.stroke(),
                node_type,
                chain: chain.to_string(),
                full_address: address.to_string(),
                discovery_method: metadata.discovery_method,
                explorer_url: explorer_url(chain, address),
            });
            self.nodes.insert(address.to_string(), entity);
        }
        &self.nodes[address]
    }

    pub fn all(&self) -> impl Iterator<Item = &Entity> {
        self.nodes.values()
    }

    pub fn by_type<'a>(&'a self, node_type: &'a str) -> impl Iterator<Item = &'a Entity> + 'a {
        self.nodes.values().filter(move |node| node.node_type() == node_type)
    }

    pub fn domain_nodes(&self) -> impl Iterator<Item = &Entity> {
        self.nodes.values().filter(|node| !node.is_crypto())
    }

    pub fn crypto_nodes(&self) -> impl Iterator<Item = &Entity> {
        self.nodes.values().filter(|node| node.is_crypto())
    }

    /// Snapshot of every entity in insertion order.
    pub fn export(&self) -> Vec<Entity> {
        self.nodes.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn statistics(&self) -> RegistryStats {
        let mut stats = RegistryStats {
            total_nodes: self.nodes.len(),
            ..RegistryStats::default()
        };

        for node in self.nodes.values() {
            if node.is_crypto() {
                stats.crypto_nodes += 1;
            } else {
                stats.domain_nodes += 1;
            }
            *stats.by_type.entry(node.node_type().to_string()).or_insert(0) += 1;
        }

        stats
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new(StyleTable::default())
    }
}
