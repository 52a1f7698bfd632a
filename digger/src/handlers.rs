use crate::console::ConsoleObserver;
use anyhow::Context;
use clap::ArgMatches;
use colored::Colorize;
use digger_core::report::ReportFormat;
use digger_core::{DiggerConfig, execute_run, history};
use digger_scanner::HttpFetcher;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Expand a leading `~` in a user-supplied path.
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// Build the run configuration from the `run` subcommand's arguments.
pub fn build_config(args: &ArgMatches) -> Result<DiggerConfig, String> {
    let defaults = DiggerConfig::default();

    let entries = *args.get_one::<usize>("entries").unwrap_or(&defaults.entries);
    let workers = *args.get_one::<usize>("workers").unwrap_or(&defaults.workers);
    let timeout_secs = *args
        .get_one::<u64>("timeout")
        .unwrap_or(&defaults.timeout_secs);
    let history_path = args
        .get_one::<String>("history")
        .map(|p| expand_path(p))
        .unwrap_or(defaults.history_path.clone());
    let listing_base = args
        .get_one::<Url>("listing-url")
        .map(|u| u.to_string())
        .unwrap_or(defaults.listing_base.clone());
    let metadata_base = args
        .get_one::<Url>("metadata-url")
        .map(|u| u.to_string())
        .unwrap_or(defaults.metadata_base.clone());

    let config = DiggerConfig {
        entries,
        listing_base,
        metadata_base,
        history_path,
        workers,
        timeout_secs,
        dry_run: args.get_flag("dry-run"),
        ..defaults
    };
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

/// Log to stderr, `warn` and above unless `RUST_LOG` says otherwise.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_divider() {
    eprintln!("{}", "═".repeat(60).bright_blue().bold());
}

pub fn print_banner() {
    print_divider();
    eprintln!(
        "{}",
        format!("  DIGGER {}", env!("CARGO_PKG_VERSION")).bright_white().bold()
    );
    eprintln!("  packages with VCS links but no author metadata");
    print_divider();
    eprintln!();
}

pub fn handle_init(args: &ArgMatches, quiet: bool) -> anyhow::Result<()> {
    let raw_path = args
        .get_one::<String>("PATH")
        .context("history store path is required")?;
    let force = args.get_flag("force");
    let path = expand_path(raw_path);

    let created = history::init(&path, force)?;

    if !quiet {
        if created {
            eprintln!(
                "{} History store ready: {}",
                "✓".green().bold(),
                path.display().to_string().bright_white()
            );
        } else {
            eprintln!(
                "{} History store already exists, keeping it: {}",
                "→".blue(),
                path.display().to_string().bright_white()
            );
            eprintln!("{} Use --force to empty it", "ℹ".blue());
        }
    }
    Ok(())
}

pub async fn handle_run(args: &ArgMatches, quiet: bool) -> anyhow::Result<()> {
    let config = build_config(args).map_err(anyhow::Error::msg)?;
    let format = args
        .get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text);
    let output = args.get_one::<PathBuf>("output").cloned();

    if !quiet {
        eprintln!("{} Entries: {}", "→".blue(), config.entries);
        eprintln!("{} Workers: {}", "→".blue(), config.workers);
        eprintln!(
            "{} History: {}",
            "→".blue(),
            config.history_path.display().to_string().bright_white()
        );
        if config.dry_run {
            eprintln!("{} Dry run: history will not be updated", "ℹ".blue());
        }
        eprintln!();
    }

    let fetcher =
        HttpFetcher::with_timeout(config.timeout_secs).context("Failed to create HTTP client")?;
    let observer = ConsoleObserver::new(format, output, quiet);

    let result = execute_run(&fetcher, &config, &observer).await;
    observer.finish();
    let outcome = result?;

    if !quiet {
        eprintln!();
        if outcome.recorded {
            eprintln!(
                "{} Recorded {} new link(s) to {}",
                "✓".green().bold(),
                outcome.report.links.len().to_string().cyan(),
                config.history_path.display().to_string().bright_white()
            );
        } else {
            eprintln!(
                "{} {} new link(s), history not updated",
                "→".blue(),
                outcome.report.links.len().to_string().cyan()
            );
        }
    }
    Ok(())
}
