use crate::model::{Candidate, HostingLink};
use crate::pipeline::{PipelineObserver, Stage};
use digger_scanner::ContentFetcher;
use digger_scanner::patterns::extract_hosting_links;
use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

/// Hosting links advertised by one candidate's metadata page.
///
/// A failed fetch yields no links for this candidate; it never fails the run.
pub async fn extract_links<F: ContentFetcher + ?Sized>(
    fetcher: &F,
    candidate: &Candidate,
    observer: &dyn PipelineObserver,
) -> Vec<HostingLink> {
    match fetcher.fetch(&candidate.metadata_url).await {
        Ok(page) => {
            let links: Vec<HostingLink> = extract_hosting_links(&page.body)
                .into_iter()
                .map(HostingLink::from)
                .collect();
            debug!("{} advertises {} hosting link(s)", candidate.id, links.len());
            links
        }
        Err(e) => {
            warn!("Metadata fetch failed for {}: {}", candidate.id, e);
            observer.item_failed(Stage::Links, &candidate.metadata_url, &e);
            Vec::new()
        }
    }
}

/// Extract links for every candidate and flatten them, keeping candidate
/// order and each candidate's homepage-then-repository order.
pub async fn extract_all<F: ContentFetcher + ?Sized>(
    fetcher: &F,
    candidates: &[Candidate],
    workers: usize,
    observer: &dyn PipelineObserver,
) -> Vec<HostingLink> {
    let per_candidate: Vec<Vec<HostingLink>> = stream::iter(candidates.iter().enumerate())
        .map(|(index, candidate)| async move {
            observer.item_started(Stage::Links, index, &candidate.metadata_url);
            extract_links(fetcher, candidate, observer).await
        })
        .buffered(workers.max(1))
        .collect()
        .await;

    per_candidate.into_iter().flatten().collect()
}
