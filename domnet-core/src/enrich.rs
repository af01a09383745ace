// Turn external lookup results into ordinary input rows

use crate::data::LookalikeRecord;
use crate::extract::SourceRow;
use crate::identity::normalize_optional_domain;
use indexmap::{IndexMap, IndexSet};

pub const LOOKALIKE_DISCOVERY: &str = "urlscan_scam_duplicates";
pub const SAME_IP_DISCOVERY: &str = "urlscan_same_ip";

/// One row per scam-duplicate record, rooted at the matched domain.
pub fn rows_from_lookalikes(records: &[LookalikeRecord]) -> Vec<SourceRow> {
    records
        .iter()
        .filter(|record| !record.domain.trim().is_empty() && !record.source_domain.trim().is_empty())
        .map(|record| SourceRow {
            source_domain: Some(record.domain.clone()),
            lookalike_domain: Some(record.source_domain.clone()),
            screenshot: record.screenshot.clone(),
            discovery_method: Some(LOOKALIKE_DISCOVERY.to_string()),
            ..SourceRow::default()
        })
        .collect()
}

/// One row per domain with at least one same-IP neighbour.
pub fn rows_from_same_ip(mapping: &IndexMap<String, Vec<String>>) -> Vec<SourceRow> {
    mapping
        .iter()
        .filter(|(_, neighbours)| !neighbours.is_empty())
        .map(|(domain, neighbours)| SourceRow {
            source_domain: Some(domain.clone()),
            same_ip_domain: Some(neighbours.join(",")),
            discovery_method: Some(SAME_IP_DISCOVERY.to_string()),
            ..SourceRow::default()
        })
        .collect()
}

/// Distinct normalized source domains across rows, in first-seen order.
pub fn source_domains<'a>(rows: impl IntoIterator<Item = &'a SourceRow>) -> Vec<String> {
    let mut seen = IndexSet::new();
    for row in rows {
        let key = normalize_optional_domain(row.source_domain.as_deref());
        if !key.is_empty() {
            seen.insert(key);
        }
    }
    seen.into_iter().collect()
}
