use crate::config::DiggerConfig;
use crate::error::Result;
use crate::history;
use crate::links::extract_all;
use crate::lister::list_candidates;
use crate::model::{HostingLink, RunSummary};
use crate::probe::SignalProbe;
use crate::report::RunReport;
use chrono::Utc;
use digger_scanner::{ContentFetcher, FetchError};
use std::fmt;
use tracing::info;

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Listing,
    Links,
    LegacyManifest,
    ModernManifest,
    History,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Listing => "listing",
            Stage::Links => "links",
            Stage::LegacyManifest => "legacy_manifest",
            Stage::ModernManifest => "modern_manifest",
            Stage::History => "history",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives progress narration from a run. Every method defaults to a no-op
/// so the core stays silent unless someone is listening.
pub trait PipelineObserver: Send + Sync {
    fn stage_started(&self, _stage: Stage, _input: usize) {}

    fn item_started(&self, _stage: Stage, _index: usize, _url: &str) {}

    fn item_failed(&self, _stage: Stage, _url: &str, _error: &FetchError) {}

    fn stage_finished(&self, _stage: Stage, _before: usize, _after: usize) {}

    fn previously_reported(&self, _link: &HostingLink) {}

    /// Called with the final result set before it is written to history.
    fn results_ready(&self, _report: &RunReport) {}
}

pub struct SilentObserver;

impl PipelineObserver for SilentObserver {}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: RunReport,
    /// Whether the results block was appended to the history store
    pub recorded: bool,
}

/// Run the whole discovery pipeline.
///
/// listing -> hosting links (flattened) -> keep pages with the legacy
/// manifest -> drop pages with the modern manifest -> drop links already in
/// history -> report -> append to history.
///
/// The history store is read before any remote work, so an unreadable store
/// aborts the run without wasting requests.
pub async fn execute_run<F: ContentFetcher + ?Sized>(
    fetcher: &F,
    config: &DiggerConfig,
    observer: &dyn PipelineObserver,
) -> Result<RunOutcome> {
    config.validate()?;
    let past = history::load(&config.history_path)?;
    let listing_url = config.listing_url()?;
    let mut summary = RunSummary::default();

    observer.stage_started(Stage::Listing, config.entries);
    let candidates = list_candidates(fetcher, &listing_url, |id| config.metadata_url(id)).await?;
    summary.listed = candidates.len();
    observer.stage_finished(Stage::Listing, config.entries, summary.listed);

    observer.stage_started(Stage::Links, candidates.len());
    let links = extract_all(fetcher, &candidates, config.workers, observer).await;
    summary.linked = links.len();
    observer.stage_finished(Stage::Links, summary.listed, summary.linked);

    observer.stage_started(Stage::LegacyManifest, links.len());
    let links = SignalProbe::keep_present(config.legacy_marker.as_str())
        .apply(fetcher, links, config.workers, Stage::LegacyManifest, observer)
        .await;
    summary.with_legacy_manifest = links.len();
    observer.stage_finished(Stage::LegacyManifest, summary.linked, summary.with_legacy_manifest);

    observer.stage_started(Stage::ModernManifest, links.len());
    let links = SignalProbe::keep_absent(config.modern_marker.as_str())
        .apply(fetcher, links, config.workers, Stage::ModernManifest, observer)
        .await;
    summary.without_modern_manifest = links.len();
    observer.stage_finished(
        Stage::ModernManifest,
        summary.with_legacy_manifest,
        summary.without_modern_manifest,
    );

    observer.stage_started(Stage::History, links.len());
    let (links, reported) = past.partition(links);
    for link in &reported {
        observer.previously_reported(link);
    }
    summary.previously_reported = reported.len();
    summary.unreported = links.len();
    observer.stage_finished(Stage::History, summary.without_modern_manifest, summary.unreported);

    info!(
        "Run complete: {} listed, {} linked, {} new",
        summary.listed, summary.linked, summary.unreported
    );

    let report = RunReport {
        generated_at: Utc::now(),
        summary,
        links,
    };
    observer.results_ready(&report);

    let recorded = if config.dry_run {
        false
    } else {
        history::append(&config.history_path, &report.links, report.generated_at)?;
        true
    };

    Ok(RunOutcome { report, recorded })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiggerError;
    use digger_scanner::StaticFetcher;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingObserver {
        boundaries: Mutex<Vec<(Stage, usize, usize)>>,
        failures: Mutex<Vec<String>>,
    }

    impl PipelineObserver for RecordingObserver {
        fn item_failed(&self, _stage: Stage, url: &str, _error: &FetchError) {
            self.failures.lock().unwrap().push(url.to_string());
        }

        fn stage_finished(&self, stage: Stage, before: usize, after: usize) {
            self.boundaries.lock().unwrap().push((stage, before, after));
        }
    }

    fn fixture_fetcher(config: &DiggerConfig) -> StaticFetcher {
        let listing = r#"
            <td><a href="/pypi/keep">keep</a></td>
            <td><a href="/pypi/modern">modern</a></td>
            <td><a href="/pypi/broken">broken</a></td>
        "#;
        let metadata = |url: &str| {
            format!(
                "&#34;project_urls&#34;: {{ &#34;Homepage&#34;: &#34;{}&#34; }}",
                url
            )
        };

        StaticFetcher::new()
            .with_page(config.listing_url().unwrap(), listing)
            .with_page(config.metadata_url("keep"), metadata("https://github.com/o/keep"))
            .with_page(config.metadata_url("modern"), metadata("https://github.com/o/modern"))
            .with_status(config.metadata_url("broken"), 500)
            .with_page("https://github.com/o/keep", "setup.py")
            .with_page("https://github.com/o/modern", "setup.py pyproject.toml")
    }

    #[tokio::test]
    async fn test_stage_counts_are_reported() {
        let temp_dir = TempDir::new().unwrap();
        let config = DiggerConfig {
            history_path: temp_dir.path().join("git_log.txt"),
            ..Default::default()
        };
        history::init(&config.history_path, false).unwrap();
        let fetcher = fixture_fetcher(&config);
        let observer = RecordingObserver::default();

        let outcome = execute_run(&fetcher, &config, &observer).await.unwrap();

        assert_eq!(outcome.report.links, vec![HostingLink::from("https://github.com/o/keep")]);
        assert!(outcome.recorded);
        assert_eq!(
            *observer.boundaries.lock().unwrap(),
            vec![
                (Stage::Listing, 20, 3),
                (Stage::Links, 3, 2),
                (Stage::LegacyManifest, 2, 2),
                (Stage::ModernManifest, 2, 1),
                (Stage::History, 1, 1),
            ]
        );
        assert_eq!(
            *observer.failures.lock().unwrap(),
            vec![config.metadata_url("broken")]
        );
    }

    #[tokio::test]
    async fn test_missing_history_aborts_before_any_request() {
        let temp_dir = TempDir::new().unwrap();
        let config = DiggerConfig {
            history_path: temp_dir.path().join("absent.txt"),
            ..Default::default()
        };
        let fetcher = fixture_fetcher(&config);

        let result = execute_run(&fetcher, &config, &SilentObserver).await;

        assert!(matches!(result, Err(DiggerError::StoreUnavailable { .. })));
        assert_eq!(fetcher.request_count(), 0);
    }

    #[tokio::test]
    async fn test_dry_run_leaves_history_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let config = DiggerConfig {
            history_path: temp_dir.path().join("git_log.txt"),
            dry_run: true,
            ..Default::default()
        };
        history::init(&config.history_path, false).unwrap();
        let fetcher = fixture_fetcher(&config);

        let outcome = execute_run(&fetcher, &config, &SilentObserver).await.unwrap();

        assert!(!outcome.recorded);
        assert_eq!(outcome.report.links.len(), 1);
        assert_eq!(std::fs::read_to_string(&config.history_path).unwrap(), "");
    }
}
