use crate::style::{Shape, StrokeStyle};
use serde::{Deserialize, Serialize};

const MAX_DOMAIN_LABEL: usize = 25;
const CRYPTO_LABEL_EDGE: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DomainRole {
    #[serde(rename = "source_domain")]
    Source,
    #[serde(rename = "lookalike_domain")]
    Lookalike,
    #[serde(rename = "same_ip_domain")]
    SameIp,
}

impl DomainRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            DomainRole::Source => "source_domain",
            DomainRole::Lookalike => "lookalike_domain",
            DomainRole::SameIp => "same_ip_domain",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    LookalikeDomain,
    SameIpDomain,
    DomainToCrypto,
}

impl EdgeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeType::LookalikeDomain => "lookalike_domain",
            EdgeType::SameIpDomain => "same_ip_domain",
            EdgeType::DomainToCrypto => "domain_to_crypto",
        }
    }

    pub fn color(&self) -> &'static str {
        edge_color(self.as_str())
    }
}

/// Display color for a relationship tag, gray for anything unknown.
pub fn edge_color(edge_type: &str) -> &'static str {
    match edge_type {
        "lookalike_domain" => "#3498db",
        "same_ip_domain" => "#f39c12",
        "domain_to_crypto" => "#e74c3c",
        _ => "#95a5a6",
    }
}

/// Per-row attributes copied onto a domain node when it is first created.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainMetadata {
    pub ip_address: String,
    pub screenshot: String,
    pub url: String,
    pub inreach_intel_summary: String,
    pub discovery_method: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CryptoMetadata {
    pub discovery_method: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainEntity {
    pub id: String,
    pub label: String,
    pub node_type: DomainRole,
    pub size: u32,
    pub color: String,
    pub shape: Shape,
    pub domain_type: DomainRole,
    pub ip_address: String,
    pub screenshot: String,
    pub url: String,
    pub inreach_intel_summary: String,
    pub discovery_method: String,
    pub style: StrokeStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoEntity {
    pub id: String,
    pub label: String,
    pub node_type: String,
    pub size: u32,
    pub color: String,
    pub shape: Shape,
    pub chain: String,
    pub full_address: String,
    pub discovery_method: String,
    pub explorer_url: String,
    pub style: StrokeStyle,
}

/// A node in the relationship graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Entity {
    Domain(DomainEntity),
    Crypto(CryptoEntity),
}

impl Entity {
    pub fn id(&self) -> &str {
        match self {
            Entity::Domain(domain) => &domain.id,
            Entity::Crypto(crypto) => &crypto.id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Entity::Domain(domain) => &domain.label,
            Entity::Crypto(crypto) => &crypto.label,
        }
    }

    /// `"domain"` or `"crypto"`.
    pub fn kind(&self) -> &'static str {
        match self {
            Entity::Domain(_) => "domain",
            Entity::Crypto(_) => "crypto",
        }
    }

    /// Style/breakdown tag such as `source_domain` or `eth_address`.
    pub fn node_type(&self) -> &str {
        match self {
            Entity::Domain(domain) => domain.node_type.as_str(),
            Entity::Crypto(crypto) => &crypto.node_type,
        }
    }

    pub fn discovery_method(&self) -> &str {
        match self {
            Entity::Domain(domain) => &domain.discovery_method,
            Entity::Crypto(crypto) => &crypto.discovery_method,
        }
    }

    pub fn domain_role(&self) -> Option<DomainRole> {
        match self {
            Entity::Domain(domain) => Some(domain.node_type),
            Entity::Crypto(_) => None,
        }
    }

    pub fn is_crypto(&self) -> bool {
        matches!(self, Entity::Crypto(_))
    }

    pub fn is_source(&self) -> bool {
        self.domain_role() == Some(DomainRole::Source)
    }
}

/// An undirected relationship between two node ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
    pub discovery_method: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain: Option<String>,
}

impl Edge {
    pub fn new(source: &str, target: &str, edge_type: EdgeType, discovery_method: &str) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            edge_type,
            discovery_method: discovery_method.to_string(),
            color: edge_type.color().to_string(),
            chain: None,
        }
    }

    pub fn with_chain(mut self, chain: &str) -> Self {
        self.chain = Some(chain.to_string());
        self
    }
}

/// Display label for a domain: no scheme or `www.`, at most 25 characters.
pub fn domain_label(domain: &str) -> String {
    let label = domain
        .strip_prefix("https://")
        .or_else(|| domain.strip_prefix("http://"))
        .unwrap_or(domain);
    let label = label.strip_prefix("www.").unwrap_or(label);

    if label.chars().count() > MAX_DOMAIN_LABEL {
        let head: String = label.chars().take(MAX_DOMAIN_LABEL - 3).collect();
        format!("{}...", head)
    } else {
        label.to_string()
    }
}

/// Display label for an address: `first6...last6` when longer than 12.
pub fn crypto_label(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() > CRYPTO_LABEL_EDGE * 2 {
        let head: String = chars[..CRYPTO_LABEL_EDGE].iter().collect();
        let tail: String = chars[chars.len() - CRYPTO_LABEL_EDGE..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        address.to_string()
    }
}

/// Public block-explorer link for an address on `chain`.
pub fn explorer_url(chain: &str, address: &str) -> String {
    match chain.to_lowercase().as_str() {
        "btc" => format!("https://www.blockchain.com/explorer/addresses/btc/{}", address),
        "eth" => format!("https://etherscan.io/address/{}", address),
        "tron" | "trx" => format!("https://tronscan.org/#/address/{}", address),
        _ => format!("https://blockchair.com/search?q={}", address),
    }
}
