use clap::{arg, command};
use digger_core::config::{DEFAULT_HISTORY_PATH, DEFAULT_LISTING_BASE, DEFAULT_METADATA_BASE};
use url::Url;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("digger")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("digger")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner and progress narration")
                .required(false)
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(
            command!("init")
                .about("Creates an empty history store so the first run has something to read")
                .arg(
                    arg!([PATH])
                        .required(false)
                        .help("Location of the history store")
                        .default_value(DEFAULT_HISTORY_PATH),
                )
                .arg(
                    arg!(-f --"force")
                        .help("Empties an existing history store at the specified location.")
                        .required(false),
                ),
        )
        .subcommand(
            command!("run")
                .about(
                    "Lists packages with VCS links but no author, keeps those whose hosting page \
                shows setup.py but not pyproject.toml, and reports the ones not reported before.",
                )
                .arg(
                    arg!(-n --"entries" <NUM>)
                        .required(false)
                        .help("Number of listing entries to examine, most recent first")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("20"),
                )
                .arg(
                    arg!(-H --"history" <PATH>)
                        .required(false)
                        .help("Path to the append-only history store")
                        .default_value(DEFAULT_HISTORY_PATH),
                )
                .arg(
                    arg!(-t --"workers" <NUM_WORKERS>)
                        .required(false)
                        .help("Concurrent fetches per stage. Results keep discovery order.")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("1"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("10"),
                )
                .arg(
                    arg!(--"listing-url" <URL>)
                        .required(false)
                        .help("Listing page of packages with VCS links but no author")
                        .value_parser(clap::value_parser!(Url))
                        .default_value(DEFAULT_LISTING_BASE),
                )
                .arg(
                    arg!(--"metadata-url" <URL>)
                        .required(false)
                        .help("Base URL of per-package metadata pages")
                        .value_parser(clap::value_parser!(Url))
                        .default_value(DEFAULT_METADATA_BASE),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(--"dry-run")
                        .required(false)
                        .help("Report results without appending them to the history store")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
}
