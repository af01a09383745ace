// Report generation from an assembled network map

use crate::error::Result;
use crate::map::NetworkMap;
use crate::stats::intel_coverage;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

const LARGE_NETWORK_NODES: usize = 500;
const DENSE_NETWORK: f64 = 0.3;
const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";
const GRAPH_DATA_PLACEHOLDER: &str = "// GRAPH_DATA_PLACEHOLDER";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Html,
    Json,
    Text,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "html" | "htm" => Some(ReportFormat::Html),
            "json" => Some(ReportFormat::Json),
            "text" | "txt" => Some(ReportFormat::Text),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Json => "json",
            ReportFormat::Text => "txt",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HtmlOptions {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            title: "Domain Network Visualization".to_string(),
            width: 1200,
            height: 800,
        }
    }
}

pub fn generate_text_report(map: &NetworkMap) -> String {
    let stats = &map.statistics;
    let mut report = String::new();

    report.push_str(RULE);
    report.push('\n');
    report.push_str("                          DOMNET NETWORK REPORT\n");
    report.push_str(RULE);
    report.push_str("\n\n");

    report.push_str(&format!("Generated:       {}\n", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")));
    report.push_str(&format!("Total nodes:     {}\n", stats.nodes));
    report.push_str(&format!("Total edges:     {}\n", stats.edges));
    report.push_str(&format!("Processed rows:  {}\n", stats.processed_rows));
    if stats.skipped_rows > 0 {
        report.push_str(&format!("Skipped rows:    {}\n", stats.skipped_rows));
    }
    report.push_str(&format!("Clusters:        {}\n", map.cluster_count()));
    report.push_str(&format!("Density:         {:.4}\n", stats.network_density));
    report.push_str(&format!("Intel coverage:  {:.1}%\n\n", intel_coverage(&map.links)));

    report.push_str("Node breakdown:\n");
    for (node_type, count) in &stats.node_breakdown {
        report.push_str(&format!("  - {}: {}\n", format_type_name(node_type), count));
    }
    report.push_str("\nEdge breakdown:\n");
    for (edge_type, count) in &stats.edge_breakdown {
        report.push_str(&format!("  - {}: {}\n", format_type_name(edge_type), count));
    }

    let hints = network_hints(map);
    if !hints.is_empty() {
        report.push('\n');
        for hint in hints {
            report.push_str(&format!("Hint: {}\n", hint));
        }
    }

    report.push('\n');
    report.push_str(RULE);
    report.push('\n');
    report
}

/// Suggestions for networks that will be hard to read.
pub fn network_hints(map: &NetworkMap) -> Vec<&'static str> {
    let mut hints = Vec::new();
    if map.statistics.nodes > LARGE_NETWORK_NODES {
        hints.push("Large network detected. Consider using filters or focusing on specific domains.");
    }
    if map.statistics.network_density > DENSE_NETWORK {
        hints.push("Dense network detected. You may want to adjust the layout algorithm.");
    }
    hints
}

pub fn generate_json_report(map: &NetworkMap) -> Result<String> {
    map.to_json()
}

/// Standalone HTML page with the snapshot embedded as compact JSON.
pub fn generate_html_report(map: &NetworkMap, options: &HtmlOptions) -> Result<String> {
    // Keep "</script>" inside string values from closing the script tag.
    let graph_json = map.to_compact_json()?.replace("</", "<\\/");
    let html = HTML_TEMPLATE
        .replace("{{TITLE}}", &escape_html(&options.title))
        .replace("{{WIDTH}}", &options.width.to_string())
        .replace("{{HEIGHT}}", &options.height.to_string())
        .replace("{{NODES}}", &map.statistics.nodes.to_string())
        .replace("{{EDGES}}", &map.statistics.edges.to_string())
        .replace(GRAPH_DATA_PLACEHOLDER, &format!("const graphData = {};", graph_json));
    Ok(html)
}

pub fn render(map: &NetworkMap, format: ReportFormat, options: &HtmlOptions) -> Result<String> {
    match format {
        ReportFormat::Html => generate_html_report(map, options),
        ReportFormat::Json => generate_json_report(map),
        ReportFormat::Text => Ok(generate_text_report(map)),
    }
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// `same_ip_domain` -> `Same Ip Domain`
pub fn format_type_name(tag: &str) -> String {
    tag.replace('_', " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const HTML_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{TITLE}}</title>
<script src="https://d3js.org/d3.v7.min.js"></script>
<style>
  body { font-family: sans-serif; margin: 0; background: #f5f6fa; }
  header { padding: 12px 20px; background: #2c3e50; color: #ecf0f1; }
  svg { display: block; margin: 0 auto; background: #fff; }
  .label { font-size: 10px; pointer-events: none; fill: #2c3e50; }
</style>
</head>
<body>
<header><strong>{{TITLE}}</strong> &middot; {{NODES}} nodes &middot; {{EDGES}} links</header>
<svg id="graph" width="{{WIDTH}}" height="{{HEIGHT}}"></svg>
<script>
// GRAPH_DATA_PLACEHOLDER
const svg = d3.select("#graph");
const width = +svg.attr("width"), height = +svg.attr("height");
const nodeCount = graphData.nodes.length;
const simulation = d3.forceSimulation(graphData.nodes)
  .force("link", d3.forceLink(graphData.links).id(d => d.id).distance(nodeCount > 1000 ? 30 : 80))
  .force("charge", d3.forceManyBody().strength(nodeCount > 1000 ? -50 : -300))
  .force("center", d3.forceCenter(width / 2, height / 2));
const link = svg.append("g").selectAll("line").data(graphData.links).join("line")
  .attr("stroke", d => d.color).attr("stroke-opacity", 0.6);
const node = svg.append("g").selectAll("circle").data(graphData.nodes).join("circle")
  .attr("r", d => d.size / 3).attr("fill", d => d.color)
  .attr("stroke", d => d.style.stroke_color).attr("stroke-width", d => d.style.stroke_width);
node.append("title").text(d => d.id);
const label = nodeCount > 500 ? null : svg.append("g").selectAll("text").data(graphData.nodes).join("text")
  .attr("class", "label").text(d => d.label);
simulation.on("tick", () => {
  link.attr("x1", d => d.source.x).attr("y1", d => d.source.y)
      .attr("x2", d => d.target.x).attr("y2", d => d.target.y);
  node.attr("cx", d => d.x).attr("cy", d => d.y);
  if (label) label.attr("x", d => d.x + 6).attr("y", d => d.y + 3);
});
</script>
</body>
</html>
"##;
