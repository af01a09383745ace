use domnet::handlers::*;
use domnet_core::data::LookalikeStore;
use domnet_core::map::NetworkMap;
use domnet_core::model::DomainRole;
use domnet_core::report::{HtmlOptions, ReportFormat};
use domnet_core::select::SelectionLimits;
use domnet_enrich::analyze_domain_similarity;
use indicatif::ProgressBar;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SAMPLE_CSV: &str = "\
source_domain,lookalike_domain,same_ip_domain,crypto_address,chain,discovery_method
https://Evil.com/,\"evil-2.com, evil3.com\",,1A2b3C,BTC,manual_intel
paypal.com,,paypal-secure.net,,,
empty.com,,,,,
";

fn write_csv(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("input.csv");
    fs::write(&path, content).unwrap();
    path
}

fn config_for(input: PathBuf, dir: &Path) -> BuildConfig {
    BuildConfig {
        input,
        output: dir.join("out").join("network.html"),
        format: ReportFormat::Html,
        json_export: None,
        html: HtmlOptions::default(),
        limits: SelectionLimits::default(),
        optimize: true,
        lookalike_db: None,
        urlscan: false,
        urlscan_api_key: None,
        same_ip_limit: 1000,
        verbose: false,
        quiet: true,
    }
}

// ============================================================================
// Build Pipeline Tests
// ============================================================================

#[tokio::test]
async fn test_build_network_from_csv() {
    let dir = TempDir::new().unwrap();
    let config = config_for(write_csv(dir.path(), SAMPLE_CSV), dir.path());

    let map = build_network(&config, &ProgressBar::hidden()).await.unwrap();

    // empty.com has no relationships and is removed during cleaning
    assert_eq!(map.statistics.processed_rows, 2);
    assert_eq!(map.statistics.skipped_rows, 0);
    assert!(map.node("empty.com").is_none());
    assert!(map.node("evil.com").unwrap().is_source());
    assert!(map.node("1A2b3C").unwrap().is_crypto());
    assert_eq!(map.statistics.nodes, 6);
    assert_eq!(map.statistics.edges, 4);
}

#[tokio::test]
async fn test_build_writes_html_and_json() {
    let dir = TempDir::new().unwrap();
    let mut config = config_for(write_csv(dir.path(), SAMPLE_CSV), dir.path());
    config.json_export = Some(dir.path().join("data").join("graph.json"));

    let map = build_network(&config, &ProgressBar::hidden()).await.unwrap();
    write_outputs(&map, &config).unwrap();

    let html = fs::read_to_string(&config.output).unwrap();
    assert!(html.contains("const graphData = {"));
    assert!(html.contains("Domain Network Visualization"));

    let json = fs::read_to_string(config.json_export.as_ref().unwrap()).unwrap();
    let exported = NetworkMap::from_json(&json).unwrap();
    assert_eq!(exported, map);
}

#[tokio::test]
async fn test_build_text_report() {
    let dir = TempDir::new().unwrap();
    let mut config = config_for(write_csv(dir.path(), SAMPLE_CSV), dir.path());
    config.format = ReportFormat::Text;
    config.output = dir.path().join("report.txt");

    let map = build_network(&config, &ProgressBar::hidden()).await.unwrap();
    write_outputs(&map, &config).unwrap();

    let report = fs::read_to_string(&config.output).unwrap();
    assert!(report.contains("Total nodes:     6"));
    assert!(report.contains("Clusters:        2"));
}

#[tokio::test]
async fn test_build_with_lookalike_store() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("lookalikes.db");
    {
        let store = LookalikeStore::new(&db_path).unwrap();
        store.insert_duplicate("paypa1.com", "paypal.com", Some("shot.png")).unwrap();
        store.insert_duplicate("amaz0n.com", "amazon.com", None).unwrap();
    }

    let mut config = config_for(write_csv(dir.path(), SAMPLE_CSV), dir.path());
    config.lookalike_db = Some(db_path);

    let map = build_network(&config, &ProgressBar::hidden()).await.unwrap();

    assert_eq!(map.statistics.processed_rows, 3);
    assert_eq!(
        map.node("paypa1.com").unwrap().domain_role(),
        Some(DomainRole::Lookalike)
    );
    assert!(map.node("amaz0n.com").is_none());
    assert!(
        map.links
            .iter()
            .any(|l| l.target == "paypa1.com" && l.discovery_method == "urlscan_scam_duplicates")
    );
}

#[tokio::test]
async fn test_build_missing_lookalike_store() {
    let dir = TempDir::new().unwrap();
    let mut config = config_for(write_csv(dir.path(), SAMPLE_CSV), dir.path());
    config.lookalike_db = Some(dir.path().join("missing.db"));

    let result = build_network(&config, &ProgressBar::hidden()).await;
    assert!(result.is_err());
}

fn hub_csv(dir: &Path) -> PathBuf {
    let same_ip: Vec<String> = (0..40).map(|i| format!("ip{}.net", i)).collect();
    let csv = format!("source_domain,same_ip_domain\nhub.com,\"{}\"\n", same_ip.join(","));
    write_csv(dir, &csv)
}

fn small_limits() -> SelectionLimits {
    SelectionLimits {
        max_nodes: 10,
        max_other_nodes: 5,
        same_ip_target: 10,
        ..SelectionLimits::default()
    }
}

#[tokio::test]
async fn test_report_map_respects_limits() {
    let dir = TempDir::new().unwrap();
    let mut config = config_for(hub_csv(dir.path()), dir.path());
    config.limits = small_limits();

    let map = build_network(&config, &ProgressBar::hidden()).await.unwrap();
    assert_eq!(map.nodes.len(), 41);
    assert_eq!(report_map(&map, &config).nodes.len(), 11);

    config.optimize = false;
    assert_eq!(report_map(&map, &config).nodes.len(), 41);
}

#[tokio::test]
async fn test_json_export_keeps_full_graph() {
    let dir = TempDir::new().unwrap();
    let mut config = config_for(hub_csv(dir.path()), dir.path());
    config.limits = small_limits();
    config.json_export = Some(dir.path().join("graph.json"));

    let map = build_network(&config, &ProgressBar::hidden()).await.unwrap();
    let rendered = write_outputs(&map, &config).unwrap();

    let json = fs::read_to_string(config.json_export.as_ref().unwrap()).unwrap();
    let exported = NetworkMap::from_json(&json).unwrap();
    assert_eq!(exported.nodes.len(), 41);
    assert_eq!(exported.links.len(), 40);
    assert_eq!(rendered.nodes.len(), 11);

    let html = fs::read_to_string(&config.output).unwrap();
    assert!(html.contains("11 nodes"));
}

#[tokio::test]
async fn test_build_missing_input() {
    let dir = TempDir::new().unwrap();
    let config = config_for(dir.path().join("nope.csv"), dir.path());

    let err = build_network(&config, &ProgressBar::hidden()).await.unwrap_err();
    assert!(format!("{:#}", err).contains("nope.csv"));
}

#[tokio::test]
async fn test_build_empty_dataset() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(dir.path(), "source_domain,lookalike_domain\na.com,\n");
    let config = config_for(input, dir.path());

    let result = build_network(&config, &ProgressBar::hidden()).await;
    assert!(result.is_err());
}

// ============================================================================
// Helper Tests
// ============================================================================

#[test]
fn test_default_title_names_input_file() {
    assert_eq!(
        default_title(Path::new("/data/threats.csv")),
        "Domain Network Visualization - threats.csv"
    );
    assert_eq!(default_title(Path::new("/")), "Domain Network Visualization");
}

#[test]
fn test_expand_path_plain() {
    assert_eq!(expand_path("/tmp/input.csv"), PathBuf::from("/tmp/input.csv"));
    assert_eq!(expand_path("relative/out.html"), PathBuf::from("relative/out.html"));
}

#[test]
fn test_expand_path_tilde() {
    let expanded = expand_path("~/input.csv");
    assert!(expanded.ends_with("input.csv"));
}

#[test]
fn test_format_similarity() {
    let results = analyze_domain_similarity("paypal.com", &["paypa1.com", "xyz.org"]);
    let output = format_similarity(&results);

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("0.778  paypa1.com"));
    assert!(lines[0].contains("substitution"));
    assert!(lines[0].contains("homograph"));
    assert!(lines[1].contains("xyz.org"));
}
