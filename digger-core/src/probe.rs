// Marker probes against hosting pages

use crate::model::HostingLink;
use crate::pipeline::{PipelineObserver, Stage};
use digger_scanner::ContentFetcher;
use digger_scanner::patterns::contains_marker;
use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

/// A stable filter that fetches each link and keeps it when the presence of
/// `marker` on the page equals `keep_when_present`.
#[derive(Debug, Clone)]
pub struct SignalProbe {
    pub marker: String,
    pub keep_when_present: bool,
}

impl SignalProbe {
    pub fn keep_present(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            keep_when_present: true,
        }
    }

    pub fn keep_absent(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            keep_when_present: false,
        }
    }

    pub fn keeps(&self, page: &str) -> bool {
        contains_marker(page, &self.marker) == self.keep_when_present
    }

    /// Probe every link, at most `workers` fetches in flight.
    ///
    /// Links whose fetch fails are dropped. Kept links come back in input
    /// order regardless of completion order.
    pub async fn apply<F: ContentFetcher + ?Sized>(
        &self,
        fetcher: &F,
        links: Vec<HostingLink>,
        workers: usize,
        stage: Stage,
        observer: &dyn PipelineObserver,
    ) -> Vec<HostingLink> {
        let verdicts: Vec<bool> = stream::iter(links.iter().enumerate())
            .map(|(index, link)| async move {
                observer.item_started(stage, index, link.as_str());
                match fetcher.fetch(link.as_str()).await {
                    Ok(page) => {
                        let keep = self.keeps(&page.body);
                        let verdict = if keep { "kept by" } else { "dropped by" };
                        debug!("{} {} {}", link, verdict, self.marker);
                        keep
                    }
                    Err(e) => {
                        warn!("Probe for {} failed on {}: {}", self.marker, link, e);
                        observer.item_failed(stage, link.as_str(), &e);
                        false
                    }
                }
            })
            .buffered(workers.max(1))
            .collect()
            .await;

        links
            .into_iter()
            .zip(verdicts)
            .filter_map(|(link, keep)| keep.then_some(link))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::SilentObserver;
    use digger_scanner::{HttpFetcher, StaticFetcher};
    use std::time::Duration;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    fn links(urls: &[&str]) -> Vec<HostingLink> {
        urls.iter().map(|u| HostingLink::from(*u)).collect()
    }

    #[test]
    fn test_keeps_follows_policy() {
        assert!(SignalProbe::keep_present("setup.py").keeps("a setup.py b"));
        assert!(!SignalProbe::keep_present("setup.py").keeps("a b"));
        assert!(SignalProbe::keep_absent("pyproject.toml").keeps("setup.py"));
        assert!(!SignalProbe::keep_absent("pyproject.toml").keeps("pyproject.toml"));
    }

    #[tokio::test]
    async fn test_stable_filter_drops_failed_fetch() {
        let fetcher = StaticFetcher::new()
            .with_page("https://github.com/o/a", "README setup.py")
            .with_status("https://github.com/o/b", 404)
            .with_page("https://github.com/o/c", "setup.py LICENSE");

        let input = links(&[
            "https://github.com/o/a",
            "https://github.com/o/b",
            "https://github.com/o/c",
        ]);
        for workers in [1, 3] {
            let kept = SignalProbe::keep_present("setup.py")
                .apply(&fetcher, input.clone(), workers, Stage::LegacyManifest, &SilentObserver)
                .await;
            assert_eq!(kept, links(&["https://github.com/o/a", "https://github.com/o/c"]));
        }
    }

    #[tokio::test]
    async fn test_kept_links_follow_input_order_not_completion_order() {
        let mock_server = MockServer::start().await;

        for (name, delay_ms) in [("r0", 800), ("r1", 400), ("r2", 0)] {
            Mock::given(method("GET"))
                .and(path(format!("/{}", name)))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_string("setup.py")
                        .set_delay(Duration::from_millis(delay_ms)),
                )
                .mount(&mock_server)
                .await;
        }

        let fetcher = HttpFetcher::with_timeout(5).unwrap();
        let input: Vec<HostingLink> = ["r0", "r1", "r2"]
            .iter()
            .map(|name| HostingLink::new(format!("{}/{}", mock_server.uri(), name)))
            .collect();

        let kept = SignalProbe::keep_present("setup.py")
            .apply(&fetcher, input.clone(), 3, Stage::LegacyManifest, &SilentObserver)
            .await;

        assert_eq!(kept, input);
    }

    #[tokio::test]
    async fn test_composed_probes_require_legacy_without_modern() {
        let fetcher = StaticFetcher::new()
            .with_page("https://github.com/o/legacy", "setup.py setup.cfg")
            .with_page("https://github.com/o/both", "setup.py pyproject.toml")
            .with_page("https://github.com/o/neither", "README.md");

        let input = links(&[
            "https://github.com/o/legacy",
            "https://github.com/o/both",
            "https://github.com/o/neither",
        ]);

        let after_legacy = SignalProbe::keep_present("setup.py")
            .apply(&fetcher, input, 1, Stage::LegacyManifest, &SilentObserver)
            .await;
        let after_modern = SignalProbe::keep_absent("pyproject.toml")
            .apply(&fetcher, after_legacy, 1, Stage::ModernManifest, &SilentObserver)
            .await;

        assert_eq!(after_modern, links(&["https://github.com/o/legacy"]));
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_requests() {
        let fetcher = StaticFetcher::new();
        let kept = SignalProbe::keep_absent("pyproject.toml")
            .apply(&fetcher, Vec::new(), 2, Stage::ModernManifest, &SilentObserver)
            .await;
        assert!(kept.is_empty());
        assert_eq!(fetcher.request_count(), 0);
    }
}
