use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use colored::Colorize;
use domnet_core::data::{LookalikeStore, LookalikeSummary};
use domnet_core::enrich::{rows_from_lookalikes, rows_from_same_ip, source_domains};
use domnet_core::map::{MapBuilder, NetworkMap};
use domnet_core::report::{HtmlOptions, ReportFormat, format_type_name, network_hints, render, save_report};
use domnet_core::select::SelectionLimits;
use domnet_core::source::{RowRecord, clean_rows, load_rows};
use domnet_enrich::{SimilarityAnalysis, UrlscanClient, analyze_domain_similarity};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{Level, info};

/// Everything `domnet build` needs, resolved from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub format: ReportFormat,
    pub json_export: Option<PathBuf>,
    pub html: HtmlOptions,
    pub limits: SelectionLimits,
    pub optimize: bool,
    pub lookalike_db: Option<PathBuf>,
    pub urlscan: bool,
    pub urlscan_api_key: Option<String>,
    pub same_ip_limit: usize,
    pub verbose: bool,
    pub quiet: bool,
}

impl BuildConfig {
    pub fn from_matches(args: &ArgMatches) -> Result<Self> {
        let input = args
            .get_one::<String>("CSV")
            .map(|p| expand_path(p))
            .context("an input CSV is required")?;
        let output = args
            .get_one::<String>("output")
            .map(|p| expand_path(p))
            .unwrap_or_else(|| PathBuf::from("output/network.html"));
        let format_name = args.get_one::<String>("format").map(String::as_str).unwrap_or("html");
        let Some(format) = ReportFormat::from_str(format_name) else {
            bail!("unsupported report format: {}", format_name);
        };

        let defaults = HtmlOptions::default();
        let html = HtmlOptions {
            title: args
                .get_one::<String>("title")
                .cloned()
                .unwrap_or_else(|| default_title(&input)),
            width: args.get_one::<u32>("width").copied().unwrap_or(defaults.width),
            height: args.get_one::<u32>("height").copied().unwrap_or(defaults.height),
        };

        let mut limits = SelectionLimits::default();
        if let Some(max_nodes) = args.get_one::<usize>("max-nodes") {
            limits.max_nodes = *max_nodes;
        }
        if let Some(max_other) = args.get_one::<usize>("max-other-nodes") {
            limits.max_other_nodes = *max_other;
        }

        Ok(Self {
            input,
            output,
            format,
            json_export: args.get_one::<String>("json").map(|p| expand_path(p)),
            html,
            limits,
            optimize: !args.get_flag("no-optimize"),
            lookalike_db: args.get_one::<String>("lookalike-db").map(|p| expand_path(p)),
            urlscan: args.get_flag("urlscan"),
            urlscan_api_key: args.get_one::<String>("urlscan-api-key").cloned(),
            same_ip_limit: args.get_one::<usize>("same-ip-limit").copied().unwrap_or(1000),
            verbose: args.get_flag("verbose"),
            quiet: args.get_flag("quiet"),
        })
    }
}

/// Report title used when `--title` is not given, named after the input file.
pub fn default_title(input: &Path) -> String {
    match input.file_name() {
        Some(name) => format!("{} - {}", HtmlOptions::default().title, name.to_string_lossy()),
        None => HtmlOptions::default().title,
    }
}

/// Expand `~` and environment variables in a user supplied path.
pub fn expand_path(raw: &str) -> PathBuf {
    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(shellexpand::tilde(raw).as_ref()),
    }
}

pub fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    // A subscriber may already be installed when handlers run under tests.
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init();
}

fn spinner(quiet: bool) -> Result<ProgressBar> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}

/// Load, clean and enrich the input, then assemble the full network.
pub async fn build_network(config: &BuildConfig, progress: &ProgressBar) -> Result<NetworkMap> {
    progress.set_message(format!("Loading {}", config.input.display()));
    let records = load_rows(&config.input)
        .with_context(|| format!("failed to load {}", config.input.display()))?;
    let mut records = clean_rows(records)?;

    let sources = source_domains(records.iter().filter_map(|record| record.as_ref().ok()));
    info!("{} distinct source domains", sources.len());

    if let Some(db_path) = &config.lookalike_db {
        progress.set_message("Searching the lookalike store...");
        let store = open_store(db_path)?;
        let rows = rows_from_lookalikes(&store.find_lookalike_domains(&sources));
        info!("Adding {} lookalike rows", rows.len());
        records.extend(rows.into_iter().map(RowRecord::Ok));
    }

    if config.urlscan {
        progress.set_message(format!("Querying URLScan for {} domains...", sources.len()));
        let client = UrlscanClient::new(config.urlscan_api_key.clone())?;
        if !client.has_api_key() {
            progress.println(format!(
                "{} No URLScan API key set, requests may be rate limited",
                "⚠".yellow()
            ));
        }
        let mapping = client.same_ip_domains_batch(&sources, config.same_ip_limit).await;
        let rows = rows_from_same_ip(&mapping);
        info!("Adding {} same-IP rows", rows.len());
        records.extend(rows.into_iter().map(RowRecord::Ok));
    }

    progress.set_message("Building network graph...");
    Ok(MapBuilder::new().build_records(&records))
}

/// The map the report is rendered from: reduced to the configured limits
/// unless optimization is off.
pub fn report_map(map: &NetworkMap, config: &BuildConfig) -> NetworkMap {
    if config.optimize {
        map.optimize(&config.limits)
    } else {
        map.clone()
    }
}

/// Write the optional JSON export of the full map and the rendered report.
/// Returns the map the report was rendered from.
pub fn write_outputs(map: &NetworkMap, config: &BuildConfig) -> Result<NetworkMap> {
    if let Some(path) = &config.json_export {
        map.export_json(path)
            .with_context(|| format!("failed to export graph data to {}", path.display()))?;
    }

    let rendered = report_map(map, config);
    let content = render(&rendered, config.format, &config.html)?;
    save_report(&content, &config.output)
        .with_context(|| format!("failed to write report to {}", config.output.display()))?;
    Ok(rendered)
}

fn print_summary(map: &NetworkMap, rendered: &NetworkMap, config: &BuildConfig) {
    let stats = &map.statistics;

    println!("\n{} Network generated: {}", "✓".green().bold(), config.output.display());
    if let Some(path) = &config.json_export {
        println!("{} Graph data: {}", "✓".green().bold(), path.display());
    }
    println!("  {} {} nodes, {} edges", "→".cyan(), stats.nodes, stats.edges);
    if rendered.statistics.nodes < stats.nodes {
        println!(
            "  {} report shows {} nodes, {} edges",
            "→".cyan(),
            rendered.statistics.nodes,
            rendered.statistics.edges
        );
    }
    println!(
        "  {} {} rows processed, {} skipped",
        "→".cyan(),
        stats.processed_rows,
        stats.skipped_rows
    );
    println!("  {} density {:.4}", "→".cyan(), stats.network_density);

    for (node_type, count) in &stats.node_breakdown {
        println!("    {}: {}", format_type_name(node_type), count);
    }
    for (edge_type, count) in &stats.edge_breakdown {
        println!("    {}: {}", format_type_name(edge_type), count);
    }
    for hint in network_hints(map) {
        println!("{} {}", "⚠".yellow(), hint);
    }
}

pub async fn handle_build(args: &ArgMatches) -> Result<()> {
    let config = BuildConfig::from_matches(args)?;
    init_logging(config.verbose);

    let progress = spinner(config.quiet)?;
    let result = build_network(&config, &progress).await;
    progress.finish_and_clear();
    let map = result?;

    let rendered = write_outputs(&map, &config)?;
    if !config.quiet {
        print_summary(&map, &rendered, &config);
    }
    Ok(())
}

pub fn format_similarity(results: &[SimilarityAnalysis]) -> String {
    let mut out = String::new();
    for result in results {
        let flags = &result.flags;
        let mut marks = Vec::new();
        if flags.same_length {
            marks.push("same-length");
        }
        if flags.contains_original {
            marks.push("contains");
        }
        if flags.same_tld {
            marks.push("same-tld");
        }
        if flags.character_substitution {
            marks.push("substitution");
        }
        if flags.homograph_attack {
            marks.push("homograph");
        }
        out.push_str(&format!(
            "{:.3}  {}  [{}]\n",
            result.similarity_score,
            result.candidate_domain,
            marks.join(", ")
        ));
    }
    out
}

pub fn handle_similar(args: &ArgMatches) -> Result<()> {
    let original = args.get_one::<String>("DOMAIN").context("a domain is required")?;
    let candidates: Vec<String> = args
        .get_many::<String>("CANDIDATE")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    let results = analyze_domain_similarity(original, &candidates);
    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        if !args.get_flag("quiet") {
            println!("{} Similarity to {}\n", "→".cyan(), original.bold());
        }
        print!("{}", format_similarity(&results));
    }
    Ok(())
}

pub fn format_lookalike_summary(summary: &LookalikeSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("Input domains:      {}\n", summary.input_domains_count));
    out.push_str(&format!("Records found:      {}\n", summary.lookalike_records_found));
    out.push_str(&format!("Unique lookalikes:  {}\n", summary.unique_source_domains));
    out.push_str(&format!("Unique targets:     {}\n", summary.unique_target_domains));
    out.push_str(&format!("New domains:        {}\n", summary.new_domains_discovered));
    for domain in &summary.new_domains_sample {
        out.push_str(&format!("  - {}\n", domain));
    }
    out
}

pub fn handle_lookalikes(args: &ArgMatches) -> Result<()> {
    let db_path = args
        .get_one::<String>("db")
        .map(|p| expand_path(p))
        .context("--db is required")?;
    if !LookalikeStore::exists(&db_path) {
        bail!("lookalike store not found: {}", db_path.display());
    }
    let domains: Vec<String> = args
        .get_many::<String>("DOMAIN")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    let store = open_store(&db_path)?;
    print!("{}", format_lookalike_summary(&store.lookalike_summary(&domains)));
    Ok(())
}

fn open_store(path: &Path) -> Result<LookalikeStore> {
    LookalikeStore::open(path).with_context(|| format!("failed to open lookalike store {}", path.display()))
}
