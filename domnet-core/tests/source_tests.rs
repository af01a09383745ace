// Tests for CSV loading and cleaning

use domnet_core::error::GraphError;
use domnet_core::source::{clean_rows, load_rows, read_rows};
use domnet_core::extract::SourceRow;
use std::fs;
use tempfile::TempDir;

const SAMPLE_CSV: &str = "\
source_domain,lookalike_domain,same_ip_domain,crypto_address,chain,IPs,screenshot,notes
https://Evil.com/,\"evil-2.com, evil3.com\",,1A2b3C,BTC,1.2.3.4,shot.png,ignored
b.com,,c.com,,,,,
d.com,,,,,,,
";

// ============================================================================
// Reading Tests
// ============================================================================

#[test]
fn test_read_rows_decodes_known_columns() {
    let records = read_rows(SAMPLE_CSV.as_bytes()).unwrap();
    assert_eq!(records.len(), 3);

    let first = records[0].as_ref().unwrap();
    assert_eq!(first.source_domain.as_deref(), Some("https://Evil.com/"));
    assert_eq!(first.lookalike_domain.as_deref(), Some("evil-2.com, evil3.com"));
    assert_eq!(first.crypto_address.as_deref(), Some("1A2b3C"));
    assert_eq!(first.ips.as_deref(), Some("1.2.3.4"));
    assert!(first.same_ip_domain.is_none());
}

#[test]
fn test_read_rows_missing_source_column() {
    let csv = "domain,lookalike_domain\na.com,b.com\n";
    let result = read_rows(csv.as_bytes());
    assert!(matches!(result, Err(GraphError::MissingColumn(ref col)) if col == "source_domain"));
}

#[test]
fn test_read_rows_empty_input() {
    let result = read_rows("".as_bytes());
    assert!(matches!(result, Err(GraphError::MissingColumn(_))));
}

#[test]
fn test_read_rows_short_records() {
    let csv = "source_domain,lookalike_domain,crypto_address\na.com,b.com\n";
    let records = read_rows(csv.as_bytes()).unwrap();

    let row = records[0].as_ref().unwrap();
    assert_eq!(row.lookalike_domain.as_deref(), Some("b.com"));
    assert!(row.crypto_address.is_none());
}

#[test]
fn test_read_rows_keeps_undecodable_records() {
    let mut csv = b"source_domain,lookalike_domain\na.com,b.com\n".to_vec();
    csv.extend_from_slice(b"\xff\xfe,c.com\n");
    csv.extend_from_slice(b"d.com,e.com\n");

    let records = read_rows(csv.as_slice()).unwrap();

    assert_eq!(records.len(), 3);
    assert!(records[0].is_ok());
    assert!(records[1].is_err());
    assert!(records[2].is_ok());
}

#[test]
fn test_load_rows_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("input.csv");
    fs::write(&path, SAMPLE_CSV).unwrap();

    let records = load_rows(&path).unwrap();
    assert_eq!(records.len(), 3);
}

#[test]
fn test_load_rows_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = load_rows(&dir.path().join("nope.csv"));
    assert!(matches!(result, Err(GraphError::Io(_))));
}

// ============================================================================
// Cleaning Tests
// ============================================================================

#[test]
fn test_clean_rows_drops_rows_without_relationships() {
    let records = read_rows(SAMPLE_CSV.as_bytes()).unwrap();
    let cleaned = clean_rows(records).unwrap();

    let sources: Vec<&str> = cleaned
        .iter()
        .filter_map(|r| r.as_ref().ok())
        .filter_map(|r| r.source_domain.as_deref())
        .collect();
    assert_eq!(sources, vec!["https://Evil.com/", "b.com"]);
}

#[test]
fn test_clean_rows_drops_missing_source() {
    let records = vec![
        Ok(SourceRow::default().with_lookalikes("a.com")),
        Ok(SourceRow::new("").with_lookalikes("a.com")),
        Ok(SourceRow::new("b.com").with_lookalikes("a.com")),
    ];

    let cleaned = clean_rows(records).unwrap();
    assert_eq!(cleaned.len(), 1);
}

#[test]
fn test_clean_rows_empty_dataset() {
    let records = read_rows("source_domain,lookalike_domain\na.com,\nb.com,\n".as_bytes()).unwrap();
    let result = clean_rows(records);
    assert!(matches!(result, Err(GraphError::EmptyDataset { total: 2 })));
}
