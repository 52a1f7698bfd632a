// Console narration for a run

use colored::Colorize;
use digger_core::model::HostingLink;
use digger_core::report::{ReportFormat, RunReport, generate_report, save_report};
use digger_core::{PipelineObserver, Stage};
use digger_scanner::FetchError;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing::error;

fn stage_title(stage: Stage) -> &'static str {
    match stage {
        Stage::Listing => "Listed candidates",
        Stage::Links => "Hosting links found",
        Stage::LegacyManifest => "With legacy manifest",
        Stage::ModernManifest => "Without modern manifest",
        Stage::History => "Not previously reported",
    }
}

fn stage_activity(stage: Stage) -> &'static str {
    match stage {
        Stage::Listing => "Reading listing page",
        Stage::Links => "Scanning metadata pages",
        Stage::LegacyManifest => "Ensuring legacy manifest on hosting pages",
        Stage::ModernManifest => "Filtering modern manifests on hosting pages",
        Stage::History => "Checking history store",
    }
}

/// Spinner-based narration on stderr; the report itself goes to stdout or
/// to the output file.
pub struct ConsoleObserver {
    spinner: Option<ProgressBar>,
    format: ReportFormat,
    output: Option<PathBuf>,
}

impl ConsoleObserver {
    pub fn new(format: ReportFormat, output: Option<PathBuf>, quiet: bool) -> Self {
        let spinner = if quiet {
            None
        } else {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.cyan} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.enable_steady_tick(Duration::from_millis(100));
            Some(pb)
        };

        Self {
            spinner,
            format,
            output,
        }
    }

    fn say(&self, msg: String) {
        if let Some(ref pb) = self.spinner {
            pb.println(msg);
        }
    }

    pub fn finish(&self) {
        if let Some(ref pb) = self.spinner {
            pb.finish_and_clear();
        }
    }

    /// Print or save the rendered report. Returns a note for the narration,
    /// which must not be printed while the spinner is suspended.
    fn emit_report(&self, report: &RunReport) -> Option<String> {
        let rendered = match generate_report(report, self.format) {
            Ok(rendered) => rendered,
            Err(e) => {
                error!("Failed to render report: {}", e);
                return None;
            }
        };

        if let Some(ref path) = self.output {
            match save_report(&rendered, path) {
                Ok(()) => {
                    return Some(format!(
                        "{} Report saved to {}",
                        "✓".green().bold(),
                        path.display().to_string().bright_white()
                    ));
                }
                Err(e) => {
                    // Print instead so the results are not lost.
                    error!("Failed to save report to {}: {}", path.display(), e);
                }
            }
        }
        print!("{}", rendered);
        None
    }
}

impl PipelineObserver for ConsoleObserver {
    fn stage_started(&self, stage: Stage, _input: usize) {
        if let Some(ref pb) = self.spinner {
            pb.set_message(format!("{}...", stage_activity(stage)));
        }
    }

    fn item_started(&self, stage: Stage, index: usize, url: &str) {
        if let Some(ref pb) = self.spinner {
            pb.set_message(format!("{} #{}: {}", stage_activity(stage), index + 1, url));
        }
    }

    fn item_failed(&self, _stage: Stage, url: &str, error: &FetchError) {
        self.say(format!("{} {} ({})", "⚠".yellow().bold(), url, error.to_string().yellow()));
    }

    fn stage_finished(&self, stage: Stage, before: usize, after: usize) {
        self.say(format!(
            "{} {}: {} → {}",
            "✓".green().bold(),
            stage_title(stage),
            before.to_string().cyan(),
            after.to_string().cyan()
        ));
    }

    fn previously_reported(&self, link: &HostingLink) {
        self.say(format!(
            "  {} previously reported: {}",
            "•".yellow(),
            link.as_str().bright_black()
        ));
    }

    fn results_ready(&self, report: &RunReport) {
        let note = match self.spinner {
            Some(ref pb) => pb.suspend(|| self.emit_report(report)),
            None => self.emit_report(report),
        };
        if let Some(note) = note {
            self.say(note);
        }
    }
}
