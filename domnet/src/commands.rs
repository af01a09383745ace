use crate::CLAP_STYLING;
use clap::{arg, command};

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("domnet")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("domnet")
        .about("Maps lookalike, same-IP and crypto relationships between suspicious domains")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner and non-essential output")
                .required(false)
                .global(true),
        )
        .subcommand_required(true)
        .subcommand(
            command!("build")
                .about("Build a relationship graph from a CSV of domains and render it")
                .arg(
                    arg!(<CSV>)
                        .help("CSV file with a source_domain column")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Where to write the rendered report")
                        .default_value("output/network.html"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: html, json, text")
                        .value_parser(["html", "json", "text"])
                        .default_value("html"),
                )
                .arg(
                    arg!(--"json" <PATH>)
                        .required(false)
                        .help("Also export the raw graph snapshot as JSON"),
                )
                .arg(
                    arg!(--"title" <TITLE>)
                        .required(false)
                        .help("Title of the HTML report [default: named after the input file]"),
                )
                .arg(
                    arg!(--"width" <PIXELS>)
                        .required(false)
                        .help("Width of the HTML canvas")
                        .value_parser(clap::value_parser!(u32))
                        .default_value("1200"),
                )
                .arg(
                    arg!(--"height" <PIXELS>)
                        .required(false)
                        .help("Height of the HTML canvas")
                        .value_parser(clap::value_parser!(u32))
                        .default_value("800"),
                )
                .arg(
                    arg!(--"max-nodes" <COUNT>)
                        .required(false)
                        .help("Reduce graphs with more nodes than this")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("1000"),
                )
                .arg(
                    arg!(--"max-other-nodes" <COUNT>)
                        .required(false)
                        .help("Sample lookalike and same-IP nodes above this count")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("1500"),
                )
                .arg(
                    arg!(--"no-optimize")
                        .required(false)
                        .help("Keep every node even for very large graphs")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"lookalike-db" <PATH>)
                        .required(false)
                        .help("SQLite store of scam duplicates to pull lookalike domains from"),
                )
                .arg(
                    arg!(--"urlscan")
                        .required(false)
                        .help("Discover same-IP domains through the URLScan search API")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"urlscan-api-key" <KEY>)
                        .required(false)
                        .help("URLScan API key")
                        .env("URLSCAN_API_KEY")
                        .hide_env_values(true),
                )
                .arg(
                    arg!(--"same-ip-limit" <COUNT>)
                        .required(false)
                        .help("Maximum URLScan results per domain")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("1000"),
                )
                .arg(
                    arg!(-v --"verbose")
                        .required(false)
                        .help("Enable debug logging")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("similar")
                .about("Score candidate domains against an original for lookalike traits")
                .arg(arg!(<DOMAIN>).help("The original domain"))
                .arg(
                    arg!(<CANDIDATE>)
                        .help("Candidate domains to compare")
                        .num_args(1..),
                )
                .arg(
                    arg!(--"json")
                        .required(false)
                        .help("Print the analysis as JSON")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("lookalikes")
                .about("Summarize known scam duplicates for a set of domains")
                .arg(
                    arg!(--"db" <PATH>)
                        .required(true)
                        .help("SQLite store of scam duplicates"),
                )
                .arg(
                    arg!(<DOMAIN>)
                        .help("Domains to look up")
                        .num_args(1..),
                ),
        )
}
