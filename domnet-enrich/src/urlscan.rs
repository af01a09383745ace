use crate::error::{EnrichError, Result};
use indexmap::IndexMap;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

pub const URLSCAN_SEARCH_API: &str = "https://urlscan.io/api/v1/search/";
pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResult {
    #[serde(default)]
    page: PageInfo,
}

#[derive(Debug, Default, Deserialize)]
struct PageInfo {
    ip: Option<String>,
    domain: Option<String>,
}

/// Same-IP discovery through the URLScan search API.
///
/// Lookups are best effort: every public method logs failures and reports
/// them as "nothing found".
pub struct UrlscanClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
    delay: Duration,
}

impl UrlscanClient {
    pub fn new(api_key: Option<String>) -> Result<Self> {
        let base_url = Url::parse(URLSCAN_SEARCH_API)
            .map_err(|e| EnrichError::InvalidUrl(format!("{}: {}", URLSCAN_SEARCH_API, e)))?;

        Ok(Self {
            client: build_client(DEFAULT_TIMEOUT)?,
            base_url,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            delay: DEFAULT_DELAY,
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url =
            Url::parse(base_url).map_err(|e| EnrichError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = build_client(timeout)?;
        Ok(self)
    }

    /// Pause before each same-IP search; a rate-limited call waits twice this.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    async fn search(&self, query: &str, size: usize) -> Result<SearchResponse> {
        debug!("URLScan query: {}", query);

        let size = size.to_string();
        let mut request = self
            .client
            .get(self.base_url.clone())
            .query(&[("q", query), ("size", size.as_str())]);
        if let Some(key) = &self.api_key {
            request = request.header("API-Key", key);
        }

        let response = request.send().await?;
        match response.status() {
            StatusCode::OK => Ok(response.json::<SearchResponse>().await?),
            StatusCode::TOO_MANY_REQUESTS => Err(EnrichError::RateLimited),
            status => Err(EnrichError::Status(status.as_u16())),
        }
    }

    async fn cool_down(&self, err: &EnrichError, context: &str) {
        warn!("URLScan lookup failed for {}: {}", context, err);
        if matches!(err, EnrichError::RateLimited) {
            tokio::time::sleep(self.delay * 2).await;
        }
    }

    /// IP of the most recent scan of `domain`.
    pub async fn domain_ip(&self, domain: &str) -> Option<String> {
        debug!("Searching URLScan for domain IP: {}", domain);

        match self.search(&format!("domain:{}", domain), 1).await {
            Ok(response) => {
                let ip = response
                    .results
                    .into_iter()
                    .next()
                    .and_then(|result| result.page.ip)
                    .filter(|ip| !ip.is_empty());
                match &ip {
                    Some(ip) => debug!("Found IP {} for domain {}", ip, domain),
                    None => debug!("No URLScan IP for domain {}", domain),
                }
                ip
            }
            Err(e) => {
                self.cool_down(&e, domain).await;
                None
            }
        }
    }

    /// Other domains URLScan has seen on the same IP as `domain`, sorted and
    /// de-duplicated, never including `domain` itself.
    pub async fn same_ip_domains(&self, domain: &str, limit: usize) -> Vec<String> {
        let Some(ip) = self.domain_ip(domain).await else {
            warn!("Could not get IP for domain {} from URLScan", domain);
            return Vec::new();
        };
        info!("Found IP {} for {}, searching for same-IP domains", ip, domain);

        tokio::time::sleep(self.delay).await;

        let query = format!("page.ip:\"{}\" AND NOT page.domain:\"{}\"", ip, domain);
        match self.search(&query, limit).await {
            Ok(response) => {
                let own = domain.to_lowercase();
                // Keyed by lowercase so case variants collapse to the first seen.
                let mut found: BTreeMap<String, String> = BTreeMap::new();
                for result in response.results {
                    if let Some(other) = result.page.domain
                        && !other.is_empty()
                        && other.to_lowercase() != own
                    {
                        found.entry(other.to_lowercase()).or_insert(other);
                    }
                }
                let mut domains: Vec<String> = found.into_values().collect();
                domains.sort();
                info!("Found {} domains sharing IP {} with {}", domains.len(), ip, domain);
                domains
            }
            Err(e) => {
                self.cool_down(&e, domain).await;
                Vec::new()
            }
        }
    }

    /// [`UrlscanClient::same_ip_domains`] for each domain, in input order.
    pub async fn same_ip_domains_batch(&self, domains: &[String], limit: usize) -> IndexMap<String, Vec<String>> {
        let mut mapping = IndexMap::new();
        if domains.is_empty() {
            warn!("No domains provided for same-IP search");
            return mapping;
        }

        info!("Finding same-IP domains for {} domains using URLScan", domains.len());
        for (i, domain) in domains.iter().enumerate() {
            info!("Processing domain {}/{}: {}", i + 1, domains.len(), domain);
            let found = self.same_ip_domains(domain, limit).await;
            if found.is_empty() {
                info!("  No same-IP domains found for {}", domain);
            } else {
                debug!("  Sample domains: {:?}", &found[..found.len().min(3)]);
            }
            mapping.insert(domain.clone(), found);
        }

        let total: usize = mapping.values().map(Vec::len).sum();
        info!("Completed same-IP search: {} total same-IP domains found", total);
        mapping
    }
}

fn build_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder()
        .user_agent("domnet/0.1 (https://github.com/trapdoorsec/domnet)")
        .timeout(timeout)
        .connect_timeout(timeout / 2)
        .build()?)
}
